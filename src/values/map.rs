use crate::values::value::Value;
use indexmap::IndexMap;
use indexmap::map::Iter;
use std::cell::RefCell;
use std::fmt::{self, Display};
use std::rc::Rc;

/// A shared handle to a [`Map`]. Every nesting level of a container tree is
/// one of these, so cloning a handle aliases the same map and mutations are
/// visible through every handle.
pub type MapRef = Rc<RefCell<Map>>;

/// Insertion-ordered, string-keyed container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Map(IndexMap<String, Value>);

impl Map {
    pub fn new() -> Self {
        Map(IndexMap::new())
    }

    /// Wraps this map into a shared [`MapRef`] handle.
    pub fn into_ref(self) -> MapRef {
        Rc::new(RefCell::new(self))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    /// Removes a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&'_ self) -> Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(entries: I) -> Self {
        Map(entries.into_iter().collect())
    }
}

impl From<Vec<(&str, Value)>> for Map {
    fn from(entries: Vec<(&str, Value)>) -> Self {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}
