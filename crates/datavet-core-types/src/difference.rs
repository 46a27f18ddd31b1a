//! Difference model
//!
//! A [`Difference`] records one discrepancy between the data under test and
//! its requirement. Differences are plain data: they never carry errors and
//! are compared, hashed and sorted by their constructor arguments.

use crate::value::{safe_cmp_slices, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One discrepancy between data and requirement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difference {
    /// A required value that the data does not contain
    Missing(Value),
    /// A value in the data that the requirement does not allow
    Extra(Value),
    /// A value that fails its requirement, optionally with the expected value
    Invalid {
        invalid: Value,
        expected: Option<Value>,
    },
    /// A numeric miss: `deviation = actual - expected`
    Deviation { deviation: Value, expected: Value },
}

impl Difference {
    pub fn missing(value: impl Into<Value>) -> Self {
        Difference::Missing(value.into())
    }

    pub fn extra(value: impl Into<Value>) -> Self {
        Difference::Extra(value.into())
    }

    pub fn invalid(value: impl Into<Value>) -> Self {
        Difference::Invalid {
            invalid: value.into(),
            expected: None,
        }
    }

    pub fn invalid_expected(value: impl Into<Value>, expected: impl Into<Value>) -> Self {
        Difference::Invalid {
            invalid: value.into(),
            expected: Some(expected.into()),
        }
    }

    pub fn deviation(deviation: impl Into<Value>, expected: impl Into<Value>) -> Self {
        Difference::Deviation {
            deviation: deviation.into(),
            expected: expected.into(),
        }
    }

    /// Build the difference describing `actual` where `expected` was required.
    ///
    /// - booleans on either side give `Invalid`
    /// - two numbers give `Deviation(actual - expected, expected)`
    /// - an empty placeholder (`None` or `''`) paired with a number counts as zero
    /// - anything else gives `Invalid`, carrying `expected` only when
    ///   `show_expected` is set
    pub fn make(actual: Value, expected: Value, show_expected: bool) -> Self {
        let either_bool =
            matches!(actual, Value::Bool(_)) || matches!(expected, Value::Bool(_));
        if !either_bool {
            if actual.is_numeric() && expected.is_numeric() {
                if let Some(deviation) = actual.checked_sub(&expected) {
                    return Difference::Deviation {
                        deviation,
                        expected,
                    };
                }
            }
            if actual.is_empty_placeholder() && expected.is_numeric() {
                if let Some(deviation) = expected.negated() {
                    return Difference::Deviation {
                        deviation,
                        expected,
                    };
                }
            }
            if actual.is_numeric() && expected.is_empty_placeholder() {
                return Difference::Deviation {
                    deviation: actual,
                    expected,
                };
            }
        }
        Difference::Invalid {
            invalid: actual,
            expected: show_expected.then_some(expected),
        }
    }

    /// Variant name, e.g. `"Missing"`
    pub fn name(&self) -> &'static str {
        match self {
            Difference::Missing(_) => "Missing",
            Difference::Extra(_) => "Extra",
            Difference::Invalid { .. } => "Invalid",
            Difference::Deviation { .. } => "Deviation",
        }
    }

    /// Constructor arguments. `Invalid` omits an absent expected value.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Difference::Missing(v) | Difference::Extra(v) => vec![v.clone()],
            Difference::Invalid {
                invalid,
                expected: None,
            } => vec![invalid.clone()],
            Difference::Invalid {
                invalid,
                expected: Some(expected),
            } => vec![invalid.clone(), expected.clone()],
            Difference::Deviation {
                deviation,
                expected,
            } => vec![deviation.clone(), expected.clone()],
        }
    }

    /// Display ordering: compares [`Difference::args`] with [`Value::safe_cmp`].
    pub fn display_cmp(&self, other: &Difference) -> Ordering {
        safe_cmp_slices(&self.args(), &other.args())
    }

    /// Relative deviation `deviation / expected` for `Deviation` values.
    ///
    /// Empty placeholders count as zero and `0 / 0` is zero. A non-zero
    /// deviation against a zero expected value, a NaN on either side, or a
    /// non-numeric argument yields NaN. Returns `None` for other variants.
    pub fn percent_deviation(&self) -> Option<f64> {
        let Difference::Deviation {
            deviation,
            expected,
        } = self
        else {
            return None;
        };
        let (Some(dev), Some(exp)) = (deviation.as_f64_or_zero(), expected.as_f64_or_zero())
        else {
            return Some(f64::NAN);
        };
        if dev.is_nan() || exp.is_nan() {
            return Some(f64::NAN);
        }
        if exp == 0.0 {
            return Some(if dev == 0.0 { 0.0 } else { f64::NAN });
        }
        Some(dev / exp)
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::Missing(v) => write!(f, "Missing({v})"),
            Difference::Extra(v) => write!(f, "Extra({v})"),
            Difference::Invalid {
                invalid,
                expected: None,
            } => write!(f, "Invalid({invalid})"),
            Difference::Invalid {
                invalid,
                expected: Some(expected),
            } => write!(f, "Invalid({invalid}, {expected})"),
            Difference::Deviation {
                deviation,
                expected,
            } => write!(f, "Deviation({}, {expected})", deviation.signed_repr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_numeric_gives_deviation() {
        let diff = Difference::make(Value::Int(12), Value::Int(10), false);
        assert_eq!(diff, Difference::deviation(2, 10));
        assert_eq!(diff.to_string(), "Deviation(+2, 10)");
    }

    #[test]
    fn test_make_empty_placeholder_counts_as_zero() {
        assert_eq!(
            Difference::make(Value::Null, Value::Int(5), false),
            Difference::deviation(-5, 5)
        );
        assert_eq!(
            Difference::make(Value::Int(5), Value::from(""), false),
            Difference::deviation(5, "")
        );
    }

    #[test]
    fn test_make_bool_gives_invalid() {
        assert_eq!(
            Difference::make(Value::Bool(true), Value::Int(1), true),
            Difference::invalid_expected(true, 1)
        );
        assert_eq!(
            Difference::make(Value::Int(0), Value::Bool(true), false),
            Difference::invalid(0)
        );
    }

    #[test]
    fn test_make_show_expected() {
        assert_eq!(
            Difference::make(Value::from("XX"), Value::from("YY"), true),
            Difference::invalid_expected("XX", "YY")
        );
        assert_eq!(
            Difference::make(Value::from("XX"), Value::from("YY"), false),
            Difference::invalid("XX")
        );
    }

    #[test]
    fn test_args() {
        assert_eq!(Difference::invalid("a").args(), vec![Value::from("a")]);
        assert_eq!(
            Difference::deviation(1, 5).args(),
            vec![Value::Int(1), Value::Int(5)]
        );
    }

    #[test]
    fn test_percent_deviation() {
        assert_eq!(Difference::deviation(4, 16).percent_deviation(), Some(0.25));
        assert_eq!(Difference::deviation((), 0).percent_deviation(), Some(0.0));
        assert_eq!(Difference::deviation(0, ()).percent_deviation(), Some(0.0));
        assert!(Difference::deviation(2, 0).percent_deviation().unwrap().is_nan());
        assert!(Difference::deviation(2, ()).percent_deviation().unwrap().is_nan());
        assert_eq!(Difference::missing(1).percent_deviation(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Difference::missing((2, "c")).to_string(), "Missing((2, 'c'))");
        assert_eq!(Difference::invalid_expected("x", "y").to_string(), "Invalid('x', 'y')");
        assert_eq!(Difference::deviation(-1, 10).to_string(), "Deviation(-1, 10)");
    }
}
