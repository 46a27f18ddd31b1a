//! Data under test
//!
//! [`Data`] wraps whatever is being validated: a plain value, a query
//! that produces one, or a stream of values. Before checking, data is
//! normalized into one of three shapes: keyed items (from a map), a group
//! of values (from a list, set or stream) or a single base element.

use crate::errors::{DatavetError, ExError};
use datavet_core_types::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// A deferred source of data or of a requirement, executed once on use.
pub trait Query: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Whatever the underlying source reports.
    fn execute(&self) -> Result<Value, ExError>;
}

/// A [`Query`] backed by a closure
#[derive(Clone)]
pub struct FnQuery {
    name: String,
    func: Arc<dyn Fn() -> Result<Value, ExError> + Send + Sync>,
}

impl FnQuery {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> Result<Value, ExError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl Query for FnQuery {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self) -> Result<Value, ExError> {
        (self.func)()
    }
}

pub enum Data {
    Value(Value),
    Deferred(Arc<dyn Query>),
    Stream(Box<dyn Iterator<Item = Value>>),
}

impl Data {
    pub fn deferred(query: impl Query + 'static) -> Self {
        Data::Deferred(Arc::new(query))
    }

    pub fn stream<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        Data::Stream(Box::new(iter.into_iter()))
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Value(v) => write!(f, "Data({v})"),
            Data::Deferred(q) => write!(f, "Data(<query {}>)", q.name()),
            Data::Stream(_) => f.write_str("Data(<stream>)"),
        }
    }
}

impl From<Value> for Data {
    fn from(value: Value) -> Self {
        Data::Value(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Data {
    fn from(items: Vec<T>) -> Self {
        Data::Value(Value::from(items))
    }
}

impl From<BTreeSet<Value>> for Data {
    fn from(items: BTreeSet<Value>) -> Self {
        Data::Value(Value::Set(items))
    }
}

impl From<BTreeMap<Value, Value>> for Data {
    fn from(entries: BTreeMap<Value, Value>) -> Self {
        Data::Value(Value::Map(entries))
    }
}

impl From<serde_json::Value> for Data {
    fn from(json: serde_json::Value) -> Self {
        Data::Value(Value::from(json))
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::Value(Value::from(s))
    }
}

impl From<i64> for Data {
    fn from(i: i64) -> Self {
        Data::Value(Value::from(i))
    }
}

impl From<i32> for Data {
    fn from(i: i32) -> Self {
        Data::Value(Value::from(i))
    }
}

impl From<f64> for Data {
    fn from(f: f64) -> Self {
        Data::Value(Value::from(f))
    }
}

impl From<bool> for Data {
    fn from(b: bool) -> Self {
        Data::Value(Value::from(b))
    }
}

/// Normalized data
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape {
    Keyed(Vec<(Value, Value)>),
    Group(Vec<Value>),
    Single(Value),
}

/// Values checked together under one key, or at the top level
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Candidates {
    Single(Value),
    Many(Vec<Value>),
}

impl Candidates {
    /// Classify the value stored under `key` in keyed data.
    ///
    /// # Errors
    ///
    /// Nested maps are rejected.
    pub(crate) fn for_key(value: Value, key: &Value) -> Result<Self, ExError> {
        match value {
            Value::Map(_) => Err(DatavetError::NestedMapping {
                key: key.to_string(),
            }
            .into()),
            Value::List(items) => Ok(Candidates::Many(items)),
            Value::Set(items) => Ok(Candidates::Many(items.into_iter().collect())),
            single => Ok(Candidates::Single(single)),
        }
    }
}

/// Execute deferred data and classify the result.
pub(crate) fn normalize_data(data: Data) -> Result<Shape, ExError> {
    let value = match data {
        Data::Value(value) => value,
        Data::Deferred(query) => query.execute()?,
        Data::Stream(iter) => return Ok(Shape::Group(iter.collect())),
    };
    Ok(match value {
        Value::Map(entries) => Shape::Keyed(entries.into_iter().collect()),
        Value::List(items) => Shape::Group(items),
        Value::Set(items) => Shape::Group(items.into_iter().collect()),
        single => Shape::Single(single),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_normalize_shapes() {
        assert_eq!(
            normalize_data(Data::from(vec!["a", "b"])).unwrap(),
            Shape::Group(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(
            normalize_data(Data::from("a")).unwrap(),
            Shape::Single(Value::from("a"))
        );
        assert_eq!(
            normalize_data(Data::from(Value::map([("k", 1)]))).unwrap(),
            Shape::Keyed(vec![(Value::from("k"), Value::Int(1))])
        );
    }

    #[test]
    fn test_stream_is_collected() {
        let data = Data::stream((1..=3).map(Value::from));
        assert_eq!(
            normalize_data(data).unwrap(),
            Shape::Group(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_deferred_data_is_executed() {
        let data = Data::deferred(FnQuery::new("letters", || Ok(Value::list(["x", "y"]))));
        assert_eq!(
            normalize_data(data).unwrap(),
            Shape::Group(vec![Value::from("x"), Value::from("y")])
        );
    }

    #[test]
    fn test_nested_map_rejected() {
        let err = Candidates::for_key(Value::map([("a", 1)]), &Value::from("k")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::TypeMismatch);
        assert_eq!(err.key(), Some("'k'"));
    }
}
