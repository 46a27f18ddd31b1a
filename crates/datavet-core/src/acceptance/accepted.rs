//! Acceptances by difference type, key or arguments

use crate::acceptance::{Acceptance, Item};
use crate::errors::ExError;
use crate::predicate::Predicate;
use datavet_core_types::{Difference, Value};
use std::fmt;

/// Accepts every `Missing` difference
#[derive(Debug, Clone, Default)]
pub struct AcceptedMissing {
    msg: Option<String>,
}

impl AcceptedMissing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Acceptance for AcceptedMissing {
    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        Ok(matches!(item.1, Difference::Missing(_)))
    }
}

/// Accepts every `Extra` difference
#[derive(Debug, Clone, Default)]
pub struct AcceptedExtra {
    msg: Option<String>,
}

impl AcceptedExtra {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Acceptance for AcceptedExtra {
    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        Ok(matches!(item.1, Difference::Extra(_)))
    }
}

/// Accepts every `Invalid` difference
#[derive(Debug, Clone, Default)]
pub struct AcceptedInvalid {
    msg: Option<String>,
}

impl AcceptedInvalid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Acceptance for AcceptedInvalid {
    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        Ok(matches!(item.1, Difference::Invalid { .. }))
    }
}

/// Accepts differences whose mapping key satisfies a predicate.
///
/// List differences have no key; the predicate sees `Null` for them. Tuple
/// keys are matched as a whole.
#[derive(Debug, Clone)]
pub struct AcceptedKeys {
    predicate: Predicate,
    msg: Option<String>,
}

impl AcceptedKeys {
    pub fn new(predicate: impl Into<Predicate>) -> Self {
        Self {
            predicate: predicate.into(),
            msg: None,
        }
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Acceptance for AcceptedKeys {
    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        let key = item.0.as_ref().unwrap_or(&Value::Null);
        Ok(self.predicate.matches(key)?.is_pass())
    }
}

impl fmt::Display for AcceptedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AcceptedKeys({})", self.predicate)
    }
}

/// Accepts differences whose arguments satisfy a predicate.
///
/// A difference with one argument passes it alone; one with several passes
/// them as a tuple.
#[derive(Debug, Clone)]
pub struct AcceptedArgs {
    predicate: Predicate,
    msg: Option<String>,
}

impl AcceptedArgs {
    pub fn new(predicate: impl Into<Predicate>) -> Self {
        Self {
            predicate: predicate.into(),
            msg: None,
        }
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Acceptance for AcceptedArgs {
    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        let mut args = item.1.args();
        let subject = if args.len() == 1 {
            args.remove(0)
        } else {
            Value::Tuple(args)
        };
        Ok(self.predicate.matches(&subject)?.is_pass())
    }
}

impl fmt::Display for AcceptedArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AcceptedArgs({})", self.predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Differences, ValidationError};
    use std::collections::BTreeMap;

    fn list_error(diffs: Vec<Difference>) -> ValidationError {
        ValidationError::new(diffs).unwrap()
    }

    #[test]
    fn test_accepted_missing_keeps_others() {
        let err = list_error(vec![Difference::missing("X"), Difference::extra("Y")]);
        let remaining = AcceptedMissing::new().filter(err).unwrap().unwrap();
        assert_eq!(
            remaining.differences(),
            &Differences::List(vec![Difference::extra("Y")])
        );
    }

    #[test]
    fn test_accepted_keys_on_mapping() {
        let err = ValidationError::new(BTreeMap::from([
            (Value::from("aaa"), Difference::missing(1)),
            (Value::from("bbb"), Difference::missing(2)),
        ]))
        .unwrap();
        let mut accepted = AcceptedKeys::new("aaa");
        assert_eq!(accepted.to_string(), "AcceptedKeys('aaa')");
        let remaining = accepted.filter(err).unwrap().unwrap();
        assert_eq!(
            remaining.differences(),
            &Differences::from(BTreeMap::from([(Value::from("bbb"), Difference::missing(2))]))
        );
    }

    #[test]
    fn test_accepted_keys_leaves_list_differences_for_named_keys() {
        let err = list_error(vec![Difference::missing("aaa")]);
        let remaining = AcceptedKeys::new("aaa").filter(err).unwrap().unwrap();
        assert_eq!(
            remaining.differences(),
            &Differences::List(vec![Difference::missing("aaa")])
        );
    }

    #[test]
    fn test_accepted_keys_sees_null_key_for_list_differences() {
        let err = list_error(vec![Difference::missing(1), Difference::extra(2)]);
        let remaining = AcceptedKeys::new(Predicate::from(Value::Null))
            .filter(err)
            .unwrap();
        assert!(remaining.is_none());
    }

    #[test]
    fn test_accepted_args_single_argument() {
        let err = list_error(vec![
            Difference::missing("aaa"),
            Difference::missing("bbb"),
            Difference::extra("bbb"),
        ]);
        let remaining = AcceptedArgs::new("bbb").filter(err).unwrap().unwrap();
        assert_eq!(
            remaining.differences(),
            &Differences::List(vec![Difference::missing("aaa")])
        );
    }

    #[test]
    fn test_accepted_args_multiple_arguments_as_tuple() {
        let err = list_error(vec![
            Difference::deviation(1, 5),
            Difference::deviation(2, 5),
        ]);
        let small = Predicate::from_fn("small_deviation", |args| match args {
            Value::Tuple(parts) => matches!(parts.first(), Some(Value::Int(d)) if *d < 2),
            _ => false,
        });
        let remaining = AcceptedArgs::new(small).filter(err).unwrap().unwrap();
        assert_eq!(
            remaining.differences(),
            &Differences::List(vec![Difference::deviation(2, 5)])
        );
    }
}
