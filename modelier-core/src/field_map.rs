use crate::Value;
use std::{
    fmt::{self, Display},
    vec,
};

/// Insertion-ordered mapping from field name to [`Value`].
///
/// Used for query conditions, insert and update payloads and record fields. Inserting an
/// existing name overwrites the value in place, so the position of the first insertion is
/// kept. Equality ignores the order of the entries.
#[derive(Default, Debug, Clone)]
pub struct FieldMap {
    entries: Vec<(String, Value)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }
    /// Set `name`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, current)) => Some(std::mem::replace(current, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }
    pub fn retain(&mut self, mut f: impl FnMut(&str, &Value) -> bool) {
        self.entries.retain(|(k, v)| f(k, v));
    }
    /// Shallow merge: every entry of `other` overwrites the entry with the same name.
    pub fn merge(&mut self, other: FieldMap) {
        for (name, value) in other {
            self.insert(name, value);
        }
    }
    /// Like [`FieldMap::merge`] but leaves `self` untouched.
    pub fn merged(&self, other: FieldMap) -> FieldMap {
        let mut result = self.clone();
        result.merge(other);
        result
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for FieldMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut result = FieldMap::new();
        for (k, v) in iter {
            result.insert(k, v);
        }
        result
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for FieldMap {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for FieldMap {
    fn from(value: Vec<(K, V)>) -> Self {
        value.into_iter().collect()
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Display for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str("}")
    }
}

/// Builds a [`FieldMap`] from `name => value` pairs.
///
/// ```rust
/// use modelier_core::{Value, fields};
/// let payload = fields! { "username" => "boo", "admin" => false };
/// assert_eq!(payload.get("admin"), Some(&Value::Boolean(Some(false))));
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::FieldMap::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::FieldMap::from_iter([$(($name, $crate::Value::from($value))),+])
    };
}
