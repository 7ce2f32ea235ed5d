use crate::values::map::{Map, MapRef};
use crate::values::value::Value;
use std::rc::Rc;

/// Walks `keys` down from `container` and returns the value found there.
///
/// Without `force` the walk never mutates: a missing level, or a non-map
/// value anywhere before the final key, yields `None`; a non-map value *at*
/// the final key is returned as-is. With `force`, every level that is
/// missing or holds a non-map value is replaced by a fresh empty map before
/// descending, so a forced walk always ends on a map.
///
/// An empty `keys` sequence returns the container itself.
pub fn retrieve_child(container: &MapRef, keys: &[String], force: bool) -> Option<Value> {
    let mut current = Value::Map(Rc::clone(container));
    for key in keys {
        let map = match &current {
            Value::Map(map) => Rc::clone(map),
            _ => return None,
        };
        let existing = map.borrow().get(key).cloned();
        current = match existing {
            Some(value) if value.is_map() || !force => value,
            // missing or in the way of a forced walk
            _ if force => {
                let level = Value::Map(Map::new().into_ref());
                map.borrow_mut().set(key.clone(), level.clone());
                level
            }
            _ => return None,
        };
    }
    Some(current)
}
