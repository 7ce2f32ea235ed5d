use crate::values::map::{Map, MapRef};
use std::fmt::{self, Display};
use std::rc::Rc;

/// A value stored inside a container tree.
///
/// Scalars and lists are plain owned values; maps are shared [`MapRef`]
/// handles, so cloning a `Value::Map` aliases the same underlying map.
/// Resolution only ever descends into maps — lists are leaves.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    List(Vec<Value>),
    Map(MapRef),
}

impl Value {
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Truthiness following the coercion rules the container model was
    /// designed against: null, `false`, zero, NaN and empty text are falsy;
    /// every list and map is truthy, including empty ones.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Decimal(d) => *d != 0.0 && !d.is_nan(),
            Value::Text(t) => !t.is_empty(),
            Value::List(_) | Value::Map(_) => true,
        }
    }
}

/// Equality is structural: maps are compared by their current contents,
/// not by handle identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value.into_ref())
    }
}

impl From<MapRef> for Value {
    fn from(value: MapRef) -> Self {
        Value::Map(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Text(t) => write!(f, "\"{t}\""),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => write!(f, "{}", map.borrow()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());

        assert!(Value::from(true).is_truthy());
        assert!(Value::from(-1).is_truthy());
        assert!(Value::from(0.5).is_truthy());
        assert!(Value::from("x").is_truthy());
        // empty lists and maps coerce to true
        assert!(Value::List(Vec::new()).is_truthy());
        assert!(Value::from(Map::new()).is_truthy());
    }

    #[test]
    fn structural_equality() {
        let a = Value::from(Map::from(vec![("k", Value::from(1))]));
        let b = Value::from(Map::from(vec![("k", Value::from(1))]));
        let c = Value::from(Map::from(vec![("k", Value::from(2))]));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Value::from(1));
    }

    #[test]
    fn map_values_share_their_handle() {
        let map = Map::new().into_ref();
        let value = Value::Map(Rc::clone(&map));
        let clone = value.clone();
        if let Value::Map(aliased) = &clone {
            aliased.borrow_mut().set("k", 1);
        }
        assert_eq!(map.borrow().get("k"), Some(&Value::from(1)));
        assert_eq!(value, clone);
    }
}
