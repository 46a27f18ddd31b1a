//! Predicate adapter
//!
//! A [`Predicate`] decides whether a single value satisfies a requirement.
//! Plain values compare by equality; the other variants cover truthiness,
//! wildcards, type checks, regular expressions, set membership, element-wise
//! tuple matching and named user functions.

use crate::errors::{DatavetError, ExError, ExErrorKind};
use datavet_core_types::{Difference, Value, ValueKind};
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Result of applying a predicate to one value
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pass,
    Fail,
    /// Failure with a caller-chosen difference used in place of the
    /// synthesized one
    Diff(Difference),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        if passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }
}

impl From<Difference> for Outcome {
    fn from(diff: Difference) -> Self {
        Outcome::Diff(diff)
    }
}

/// Signature of user predicate functions
pub type PredicateFn = dyn Fn(&Value) -> Result<Outcome, ExError> + Send + Sync;

/// A user function with a display name and optional doc string
#[derive(Clone)]
pub struct NamedFn {
    name: String,
    doc: Option<String>,
    func: Arc<PredicateFn>,
}

impl NamedFn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// True when both handles wrap the same function object
    pub fn same_as(&self, other: &NamedFn) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

/// A single-value matcher
#[derive(Clone)]
pub enum Predicate {
    /// Equality; integers and floats compare numerically
    Equals(Value),
    Truthy,
    Falsy,
    /// Wildcard, matches anything
    Any,
    /// Exact type check: `Int` does not match floats
    Kind(ValueKind),
    /// Regex search; only strings can match
    Regex(Regex),
    /// Membership in a set, or equality with the whole set
    OneOf(BTreeSet<Value>),
    /// Element-wise matching of a tuple of the same arity
    Tuple(Vec<Predicate>),
    Function(NamedFn),
}

impl Predicate {
    /// Wrap a user function that may return a custom difference.
    pub fn function<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Outcome, ExError> + Send + Sync + 'static,
    {
        Predicate::Function(NamedFn {
            name: name.into(),
            doc: None,
            func: Arc::new(func),
        })
    }

    /// Wrap an infallible boolean test.
    pub fn from_fn<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate::function(name, move |v| Ok(Outcome::from(func(v))))
    }

    /// Attach a doc string; its first line becomes the failure description.
    /// Has no effect on non-function predicates.
    pub fn with_doc(self, doc: impl Into<String>) -> Self {
        match self {
            Predicate::Function(mut named) => {
                named.doc = Some(doc.into());
                Predicate::Function(named)
            }
            other => other,
        }
    }

    /// Compile a regex predicate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the pattern does not compile.
    pub fn regex(pattern: &str) -> Result<Self, ExError> {
        Regex::new(pattern).map(Predicate::Regex).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("compile_regex")
                .with_message(e.to_string())
        })
    }

    pub fn one_of<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Predicate::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Combine parts element-wise. Parts that are all plain values collapse
    /// into a single equality test on the tuple.
    pub fn tuple(parts: Vec<Predicate>) -> Self {
        if parts.iter().all(|p| matches!(p, Predicate::Equals(_))) {
            let values = parts
                .into_iter()
                .filter_map(|p| match p {
                    Predicate::Equals(v) => Some(v),
                    _ => None,
                })
                .collect();
            return Predicate::Equals(Value::Tuple(values));
        }
        Predicate::Tuple(parts)
    }

    /// Apply the predicate to one value.
    ///
    /// # Errors
    ///
    /// Errors raised by user functions propagate unchanged. Regex
    /// predicates fail with `TypeMismatch` on non-string input.
    pub fn matches(&self, value: &Value) -> Result<Outcome, ExError> {
        match self {
            Predicate::Equals(expected) => Ok((value == expected).into()),
            Predicate::Truthy => Ok(value.is_truthy().into()),
            Predicate::Falsy => Ok((!value.is_truthy()).into()),
            Predicate::Any => Ok(Outcome::Pass),
            Predicate::Kind(kind) => Ok((value.kind() == *kind).into()),
            Predicate::Regex(regex) => match value.as_str() {
                Some(s) => Ok(regex.is_match(s).into()),
                None => Err(DatavetError::RegexTarget {
                    kind: value.kind().name().to_string(),
                    value: value.to_string(),
                }
                .into()),
            },
            Predicate::OneOf(members) => {
                let whole = matches!(value, Value::Set(s) if s == members);
                Ok((whole || members.contains(value)).into())
            }
            Predicate::Tuple(parts) => {
                let Value::Tuple(items) = value else {
                    return Ok(Outcome::Fail);
                };
                if items.len() != parts.len() {
                    return Ok(Outcome::Fail);
                }
                for (part, item) in parts.iter().zip(items) {
                    if !part.matches(item)?.is_pass() {
                        return Ok(Outcome::Fail);
                    }
                }
                Ok(Outcome::Pass)
            }
            Predicate::Function(named) => (named.func)(value),
        }
    }

    /// The value this predicate was built from, when it has one.
    ///
    /// Used as the expected side of synthesized differences.
    pub fn obj(&self) -> Option<Value> {
        match self {
            Predicate::Equals(v) => Some(v.clone()),
            Predicate::Truthy => Some(Value::Bool(true)),
            Predicate::Falsy => Some(Value::Bool(false)),
            Predicate::OneOf(members) => Some(Value::Set(members.clone())),
            Predicate::Tuple(parts) => parts
                .iter()
                .map(Predicate::obj)
                .collect::<Option<Vec<_>>>()
                .map(Value::Tuple),
            Predicate::Any | Predicate::Kind(_) | Predicate::Regex(_) | Predicate::Function(_) => {
                None
            }
        }
    }

    /// Failure description used when this predicate is a requirement.
    pub fn description(&self) -> String {
        match self {
            Predicate::Function(named) => {
                let first_line = named
                    .doc
                    .as_deref()
                    .and_then(|doc| doc.lines().map(str::trim).find(|l| !l.is_empty()));
                match first_line {
                    Some(line) => line.to_string(),
                    None => format!("does not satisfy {}()", named.name),
                }
            }
            other => format!("does not satisfy {other}"),
        }
    }
}

/// Diagnostic repr: `'abc'`, `True`, `...`, `int`, `regex('a+')`,
/// `{1, 2}`, `(is_odd, ...)`, `is_odd`.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals(v) => write!(f, "{v}"),
            Predicate::Truthy => f.write_str("True"),
            Predicate::Falsy => f.write_str("False"),
            Predicate::Any => f.write_str("..."),
            Predicate::Kind(kind) => f.write_str(kind.name()),
            Predicate::Regex(regex) => write!(f, "regex({})", Value::from(regex.as_str())),
            Predicate::OneOf(members) => write!(f, "{}", Value::Set(members.clone())),
            Predicate::Tuple(parts) => {
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{part}")?;
                }
                if parts.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Predicate::Function(named) => f.write_str(&named.name),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({self})")
    }
}

/// Booleans become truthiness tests, sets become membership tests and
/// tuples match element-wise; every other value is an equality test.
impl From<Value> for Predicate {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(true) => Predicate::Truthy,
            Value::Bool(false) => Predicate::Falsy,
            Value::Set(members) => Predicate::OneOf(members),
            Value::Tuple(items) => {
                Predicate::tuple(items.into_iter().map(Predicate::from).collect())
            }
            other => Predicate::Equals(other),
        }
    }
}

impl From<&str> for Predicate {
    fn from(s: &str) -> Self {
        Predicate::Equals(Value::from(s))
    }
}

impl From<Regex> for Predicate {
    fn from(regex: Regex) -> Self {
        Predicate::Regex(regex)
    }
}

impl From<ValueKind> for Predicate {
    fn from(kind: ValueKind) -> Self {
        Predicate::Kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passes(p: &Predicate, v: impl Into<Value>) -> bool {
        p.matches(&v.into()).unwrap().is_pass()
    }

    #[test]
    fn test_kind_does_not_coerce() {
        let p = Predicate::Kind(ValueKind::Int);
        assert!(passes(&p, 0));
        assert!(!passes(&p, 1.0));
    }

    #[test]
    fn test_number_one_does_not_match_true() {
        let p = Predicate::from(Value::Int(1));
        assert!(passes(&p, 1.0));
        assert!(!passes(&p, true));
        assert!(!passes(&p, "x"));
    }

    #[test]
    fn test_truthy_and_falsy() {
        let truthy = Predicate::from(Value::Bool(true));
        let falsy = Predicate::from(Value::Bool(false));
        for v in [Value::from("x"), Value::Float(1.0), Value::list([1])] {
            assert!(passes(&truthy, v.clone()));
            assert!(!passes(&falsy, v));
        }
        assert!(passes(&falsy, ""));
        assert!(passes(&falsy, Value::list(Vec::<i64>::new())));
    }

    #[test]
    fn test_regex_rejects_non_strings() {
        let p = Predicate::regex("(Ch|H)ann?ukk?ah?").unwrap();
        assert!(passes(&p, "Happy Chanukah"));
        assert!(!passes(&p, "Merry Christmas"));

        let err = p.matches(&Value::Int(123)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::TypeMismatch);
        assert!(err.message().ends_with("got int: 123"));
    }

    #[test]
    fn test_set_membership_and_whole_set() {
        let p = Predicate::one_of(["a", "b", "c"]);
        assert!(passes(&p, "a"));
        assert!(!passes(&p, "x"));
        assert!(passes(&p, Value::set(["a", "b", "c"])));
    }

    #[test]
    fn test_returned_difference_is_not_a_pass() {
        let p = Predicate::function("true_or_difference", |v| {
            if v == &Value::from("foo") {
                Ok(Outcome::Pass)
            } else {
                Ok(Difference::missing(v.clone()).into())
            }
        });
        assert!(passes(&p, "foo"));
        assert!(!passes(&p, "bar"));
    }

    #[test]
    fn test_tuple_collapses_to_equality() {
        let p = Predicate::from(Value::from(("abc", 123)));
        assert!(matches!(p, Predicate::Equals(_)));
    }

    #[test]
    fn test_tuple_integration() {
        let is_underscore = Predicate::from_fn("is_underscore", |v| v == &Value::from("_"));
        let p = Predicate::tuple(vec![
            is_underscore,
            Predicate::regex("_").unwrap(),
            Predicate::one_of(["_"]),
            Predicate::from("_"),
            Predicate::Any,
        ]);
        assert!(passes(&p, Value::tuple(["_", "_", "_", "_", "_"])));
        assert!(!passes(&p, Value::tuple(["X", "_", "_", "_", "_"])));
        assert!(!passes(&p, Value::tuple(["_", "X", "_", "_", "_"])));
        assert!(!passes(&p, Value::tuple(["_", "_", "X", "_", "_"])));
        assert!(!passes(&p, Value::tuple(["_", "_", "_", "X", "_"])));
        assert!(passes(&p, Value::tuple(["_", "_", "_", "_", "X"])));
        assert!(!passes(&p, Value::tuple(["_", "_"])));
        assert_eq!(
            p.to_string(),
            "(is_underscore, regex('_'), {'_'}, '_', ...)"
        );
    }

    #[test]
    fn test_obj() {
        assert_eq!(Predicate::from("a").obj(), Some(Value::from("a")));
        assert_eq!(Predicate::Truthy.obj(), Some(Value::Bool(true)));
        assert_eq!(Predicate::Any.obj(), None);
        let mixed = Predicate::tuple(vec![Predicate::from("a"), Predicate::Any]);
        assert_eq!(mixed.obj(), None);
    }

    #[test]
    fn test_description() {
        assert_eq!(Predicate::from("abc").description(), "does not satisfy 'abc'");
        let is_odd = Predicate::from_fn("is_odd", |_| true);
        assert_eq!(is_odd.description(), "does not satisfy is_odd()");
        let documented = is_odd.with_doc("\n  must be odd\n  (checked per row)");
        assert_eq!(documented.description(), "must be odd");
    }

    #[test]
    fn test_errors_propagate() {
        let p = Predicate::function("fails_internally", |_| {
            Err(ExError::new(ExErrorKind::PredicateFailed).with_message("raising an error"))
        });
        let err = p.matches(&Value::from("abc")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::PredicateFailed);
    }
}
