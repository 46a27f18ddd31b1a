//! Numeric tolerances for `Deviation` differences
//!
//! Both acceptances take either a symmetric tolerance or explicit
//! `lower, upper` bounds. Empty placeholders (`None`, `''`) count as zero;
//! NaN values and non-deviation differences are never accepted.

use crate::acceptance::{Acceptance, Item};
use crate::errors::{DatavetError, ExError};
use datavet_core_types::Difference;

fn symmetric(tolerance: f64) -> Result<(f64, f64), ExError> {
    if tolerance < 0.0 {
        return Err(DatavetError::NegativeTolerance.into());
    }
    Ok((-tolerance, tolerance))
}

fn ordered(lower: f64, upper: f64) -> Result<(f64, f64), ExError> {
    if lower > upper {
        return Err(DatavetError::InvertedBounds { lower, upper }.into());
    }
    Ok((lower, upper))
}

/// Accepts deviations within an absolute range
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedDeviation {
    lower: f64,
    upper: f64,
    msg: Option<String>,
}

impl AcceptedDeviation {
    /// Accept deviations in `[-tolerance, tolerance]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTolerance` for a negative tolerance.
    pub fn tolerance(tolerance: f64) -> Result<Self, ExError> {
        let (lower, upper) = symmetric(tolerance)?;
        Ok(Self {
            lower,
            upper,
            msg: None,
        })
    }

    /// Accept deviations in `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTolerance` when `lower > upper`.
    pub fn range(lower: f64, upper: f64) -> Result<Self, ExError> {
        let (lower, upper) = ordered(lower, upper)?;
        Ok(Self {
            lower,
            upper,
            msg: None,
        })
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl Acceptance for AcceptedDeviation {
    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        let Difference::Deviation {
            deviation,
            expected,
        } = &item.1
        else {
            return Ok(false);
        };
        if expected.is_nan() {
            return Ok(false);
        }
        match deviation.as_f64_or_zero() {
            Some(dev) if !dev.is_nan() => Ok(self.lower <= dev && dev <= self.upper),
            _ => Ok(false),
        }
    }
}

/// Accepts deviations within a range relative to the expected value
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedPercent {
    lower: f64,
    upper: f64,
    msg: Option<String>,
}

impl AcceptedPercent {
    /// Accept percent deviations in `[-tolerance, tolerance]`, where `0.25`
    /// means 25%.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTolerance` for a negative tolerance.
    pub fn tolerance(tolerance: f64) -> Result<Self, ExError> {
        let (lower, upper) = symmetric(tolerance)?;
        Ok(Self {
            lower,
            upper,
            msg: None,
        })
    }

    /// # Errors
    ///
    /// Returns `InvalidTolerance` when `lower > upper`.
    pub fn range(lower: f64, upper: f64) -> Result<Self, ExError> {
        let (lower, upper) = ordered(lower, upper)?;
        Ok(Self {
            lower,
            upper,
            msg: None,
        })
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl Acceptance for AcceptedPercent {
    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        match item.1.percent_deviation() {
            Some(percent) if !percent.is_nan() => {
                Ok(self.lower <= percent && percent <= self.upper)
            }
            _ => Ok(false),
        }
    }
}
