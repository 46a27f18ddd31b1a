use crate::acceptance::{Acceptance, Item, LIMIT_PRIORITY};
use crate::errors::{DatavetError, ExError};
use datavet_core_types::Value;

/// Accepts the first `limit` differences of a pass and rejects the rest.
///
/// Counting spans the whole failure, across every group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedLimit {
    limit: usize,
    count: usize,
    msg: Option<String>,
}

impl AcceptedLimit {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            count: 0,
            msg: None,
        }
    }

    /// # Errors
    ///
    /// Returns `TypeMismatch` unless `value` is a non-negative integer.
    pub fn from_value(value: &Value) -> Result<Self, ExError> {
        match value {
            Value::Int(n) if *n >= 0 => usize::try_from(*n)
                .map(Self::new)
                .map_err(|_| invalid_limit(value)),
            _ => Err(invalid_limit(value)),
        }
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

fn invalid_limit(value: &Value) -> ExError {
    DatavetError::InvalidLimit {
        value: value.to_string(),
    }
    .into()
}

impl Acceptance for AcceptedLimit {
    fn priority(&self) -> u32 {
        LIMIT_PRIORITY
    }

    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn start_collection(&mut self) -> Result<(), ExError> {
        self.count = 0;
        Ok(())
    }

    fn call_predicate(&mut self, _item: &Item) -> Result<bool, ExError> {
        self.count += 1;
        Ok(self.count <= self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::validation::{Differences, ValidationError};
    use datavet_core_types::Difference;
    use std::collections::BTreeMap;

    #[test]
    fn test_over_limit_keeps_the_rest() {
        let err =
            ValidationError::new(vec![Difference::extra("xxx"), Difference::missing("yyy")]).unwrap();
        let remaining = AcceptedLimit::new(1).filter(err).unwrap().unwrap();
        assert_eq!(
            remaining.differences(),
            &Differences::List(vec![Difference::missing("yyy")])
        );
    }

    #[test]
    fn test_at_limit_suppresses() {
        let err = ValidationError::new(BTreeMap::from([
            (Value::from("a"), Difference::extra("xxx")),
            (Value::from("b"), Difference::missing("yyy")),
        ]))
        .unwrap();
        assert!(AcceptedLimit::new(2).filter(err).unwrap().is_none());
    }

    #[test]
    fn test_count_resets_between_passes() {
        let mut accepted = AcceptedLimit::new(1);
        for _ in 0..2 {
            let err = ValidationError::new(Difference::extra("x")).unwrap();
            assert!(accepted.filter(err).unwrap().is_none());
        }
    }

    #[test]
    fn test_from_value_rejects_non_integers() {
        assert_eq!(AcceptedLimit::from_value(&Value::Int(3)).unwrap().limit(), 3);
        let err = AcceptedLimit::from_value(&Value::Float(2.5)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::TypeMismatch);
        assert!(AcceptedLimit::from_value(&Value::Int(-1)).is_err());
    }
}
