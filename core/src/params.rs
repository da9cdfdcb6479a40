//! Per-call parameters.
//!
//! # Design
//! Scalars are coerced to strings at the point of use: URL templates, query
//! strings and form bodies all see the same text. Booleans render as `1`/`0`,
//! which is how EnsEMBL spells its boolean options. Lists are kept as lists
//! and expand to one repeated key per element.

use std::collections::BTreeMap;
use std::fmt;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    /// Sent as `1` or `0`, the spelling EnsEMBL accepts for boolean
    /// options. Python's `str(bool)` would give `True`/`False` instead.
    Bool(bool),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Text used when the value is substituted into a URL template. Lists
    /// are comma-joined.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Text values sent as query or form fields, one per repeated key.
    pub fn field_values(&self) -> Vec<String> {
        match self {
            ParamValue::List(items) => items.iter().flat_map(ParamValue::field_values).collect(),
            scalar => vec![scalar.render()],
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            ParamValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

macro_rules! int_param {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                ParamValue::Int(value as i64)
            }
        })*
    };
}

int_param!(i8, i16, i32, i64, u8, u16, u32, isize);

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Keyword arguments for one call, kept sorted by key so requests are
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous one for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Build a [`Params`] from `key => value` pairs.
///
/// ```
/// use ensembl_core::params;
///
/// let p = params! { "id" => "ENSG00000157764", "expand" => true };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => { $crate::Params::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(params.insert($key, $value);)+
        params
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_coerce_to_strings() {
        assert_eq!(ParamValue::from(5).render(), "5");
        assert_eq!(ParamValue::from(-12i64).render(), "-12");
        assert_eq!(ParamValue::from(true).render(), "1");
        assert_eq!(ParamValue::from(false).render(), "0");
        assert_eq!(ParamValue::from(0.5).render(), "0.5");
        assert_eq!(ParamValue::from("homo_sapiens").render(), "homo_sapiens");
    }

    #[test]
    fn lists_expand_to_repeated_fields() {
        let value = ParamValue::from(vec!["gene", "transcript"]);
        assert_eq!(value.field_values(), vec!["gene", "transcript"]);
        assert_eq!(value.render(), "gene,transcript");
    }

    #[test]
    fn macro_and_builder_agree() {
        let a = params! { "id" => "ENSG00000157764", "count" => 5 };
        let b = Params::new().with("count", 5).with("id", "ENSG00000157764");
        assert_eq!(a, b);
        assert_eq!(a.get("count"), Some(&ParamValue::Int(5)));
    }

    #[test]
    fn iteration_is_sorted_by_key() {
        let p: Params = vec![("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let keys: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn insert_replaces_previous_value() {
        let mut p = Params::new();
        assert!(p.insert("species", "human").is_none());
        assert_eq!(p.insert("species", "mouse"), Some(ParamValue::from("human")));
        assert_eq!(p.len(), 1);
    }
}
