use crate::acceptance::{Acceptance, Item};
use crate::errors::{DatavetError, ExError};
use crate::requirement::opcodes::string_ratio;
use datavet_core_types::{Difference, Value};

pub const DEFAULT_CUTOFF: f64 = 0.6;

/// Accepts `Invalid` strings that closely resemble their expected value.
///
/// Only differences carrying an expected value, with both sides strings,
/// are considered; the similarity ratio must reach the cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedFuzzy {
    cutoff: f64,
    msg: Option<String>,
}

impl AcceptedFuzzy {
    /// # Errors
    ///
    /// Returns `InvalidInput` when `cutoff` is outside `[0, 1]`.
    pub fn new(cutoff: f64) -> Result<Self, ExError> {
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(DatavetError::InvalidCutoff { cutoff }.into());
        }
        Ok(Self { cutoff, msg: None })
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl Default for AcceptedFuzzy {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            msg: None,
        }
    }
}

impl Acceptance for AcceptedFuzzy {
    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        match &item.1 {
            Difference::Invalid {
                invalid: Value::Str(actual),
                expected: Some(Value::Str(expected)),
            } => Ok(string_ratio(actual, expected) >= self.cutoff),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Differences, ValidationError};
    use std::collections::BTreeMap;

    #[test]
    fn test_default_cutoff() {
        let err = ValidationError::new(BTreeMap::from([
            (Value::from("a"), Difference::invalid_expected("aaax", "aaaa")),
            (Value::from("b"), Difference::invalid_expected("bbyy", "bbbb")),
        ]))
        .unwrap();
        let remaining = AcceptedFuzzy::default().filter(err).unwrap().unwrap();
        assert_eq!(
            remaining.differences(),
            &Differences::from(BTreeMap::from([(
                Value::from("b"),
                Difference::invalid_expected("bbyy", "bbbb")
            )]))
        );
    }

    #[test]
    fn test_incompatible_differences_remain() {
        let mut accepted = AcceptedFuzzy::new(0.0).unwrap();
        for diff in [
            Difference::invalid("aaa"),
            Difference::invalid_expected(1, "aaa"),
            Difference::missing("aaa"),
            Difference::deviation(1, 5),
        ] {
            assert!(!accepted.call_predicate(&(None, diff)).unwrap());
        }
    }

    #[test]
    fn test_cutoff_out_of_range() {
        assert!(AcceptedFuzzy::new(1.5).is_err());
    }
}
