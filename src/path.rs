use crate::error::PointerError;
use crate::values::value::Value;

/// A location specifier: everything that can name a position below a
/// pointer's root. Normalization turns any accepted form into a flat key
/// sequence; dynamic [`Value`]s that cannot act as keys are rejected.
#[derive(Clone, Debug)]
pub enum LocationSpec {
    None,
    Key(String),
    Keys(Vec<String>),
    Value(Value),
}

impl LocationSpec {
    /// Canonicalizes the specifier into an ordered key sequence.
    ///
    /// The sequence is owned by the caller, so later mutation of whatever the
    /// specifier was built from cannot alias into a pointer's location.
    pub fn normalize(self) -> Result<Vec<String>, PointerError> {
        match self {
            LocationSpec::None => Ok(Vec::new()),
            LocationSpec::Key(key) if key.is_empty() => Ok(Vec::new()),
            LocationSpec::Key(key) => Ok(vec![key]),
            LocationSpec::Keys(keys) => Ok(keys),
            LocationSpec::Value(value) => normalize_value(value),
        }
    }
}

fn normalize_value(value: Value) -> Result<Vec<String>, PointerError> {
    match value {
        Value::List(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Text(key) => Ok(key),
                _ => Err(PointerError::InvalidLocation),
            })
            .collect(),
        value if !value.is_truthy() => Ok(Vec::new()),
        Value::Text(key) => Ok(vec![key]),
        _ => Err(PointerError::InvalidLocation),
    }
}

impl From<()> for LocationSpec {
    fn from(_: ()) -> Self {
        LocationSpec::None
    }
}

impl From<&str> for LocationSpec {
    fn from(key: &str) -> Self {
        LocationSpec::Key(key.to_string())
    }
}

impl From<String> for LocationSpec {
    fn from(key: String) -> Self {
        LocationSpec::Key(key)
    }
}

impl From<Vec<String>> for LocationSpec {
    fn from(keys: Vec<String>) -> Self {
        LocationSpec::Keys(keys)
    }
}

impl From<Vec<&str>> for LocationSpec {
    fn from(keys: Vec<&str>) -> Self {
        LocationSpec::Keys(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for LocationSpec {
    fn from(keys: &[&str]) -> Self {
        LocationSpec::Keys(keys.iter().map(|key| key.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LocationSpec {
    fn from(keys: [&str; N]) -> Self {
        LocationSpec::Keys(keys.iter().map(|key| key.to_string()).collect())
    }
}

impl From<Value> for LocationSpec {
    fn from(value: Value) -> Self {
        LocationSpec::Value(value)
    }
}
