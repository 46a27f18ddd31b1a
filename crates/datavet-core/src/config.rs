//! Report configuration
//!
//! Controls how long a failure report may grow before it is truncated.

use crate::data::Data;
use crate::errors::{ExError, ExErrorKind, VetError};
use crate::requirement::Requirement;
use crate::validation::{validate_with_message, ValidationError};
use serde::{Deserialize, Serialize};

/// Default character budget for a report body
pub const DEFAULT_MAX_DIFF: usize = 80 * 8;

pub const DEFAULT_TRUNCATION_NOTICE: &str =
    "Diff is too long. Set max_diff to None to see it.";

/// Environment variable overriding [`ReportConfig::max_diff`]; `none`
/// disables truncation.
pub const MAX_DIFF_ENV: &str = "DATAVET_MAX_DIFF";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Truncate once the rendered lines exceed this many characters;
    /// `None` never truncates
    pub max_diff: Option<usize>,
    pub truncation_notice: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_diff: Some(DEFAULT_MAX_DIFF),
            truncation_notice: DEFAULT_TRUNCATION_NOTICE.to_string(),
        }
    }
}

impl ReportConfig {
    /// Defaults, with `max_diff` read from `DATAVET_MAX_DIFF` when set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the variable is neither `none` nor a
    /// non-negative integer.
    pub fn from_env() -> Result<Self, ExError> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(MAX_DIFF_ENV) {
            config.max_diff = parse_max_diff(&raw)?;
        }
        Ok(config)
    }

    /// Install this configuration's truncation settings on `err`.
    pub fn apply(&self, err: ValidationError) -> ValidationError {
        let err = err.with_truncation_notice(self.truncation_notice.clone());
        match self.max_diff {
            Some(max_diff) => err.with_truncation(move |_lines, chars| chars > max_diff),
            None => err,
        }
    }

    /// Validate and apply this configuration to any resulting failure.
    ///
    /// # Errors
    ///
    /// See [`crate::validation::validate`].
    pub fn validate(
        &self,
        data: impl Into<Data>,
        requirement: impl Into<Requirement>,
        msg: Option<&str>,
    ) -> Result<(), VetError> {
        validate_with_message(data, requirement, msg).map_err(|err| match err {
            VetError::Validation(err) => VetError::Validation(self.apply(err)),
            fault => fault,
        })
    }
}

fn parse_max_diff(raw: &str) -> Result<Option<usize>, ExError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    trimmed.parse::<usize>().map(Some).map_err(|e| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("config_from_env")
            .with_message(format!("{MAX_DIFF_ENV} must be 'none' or an integer, got {raw:?}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use datavet_core_types::Difference;

    #[test]
    fn test_parse_max_diff() {
        assert_eq!(parse_max_diff("100").unwrap(), Some(100));
        assert_eq!(parse_max_diff("None").unwrap(), None);
        assert_eq!(
            parse_max_diff("-3").unwrap_err().kind(),
            ExErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_apply_truncates_long_reports() {
        let diffs: Vec<Difference> = (0..200).map(Difference::missing).collect();
        let err = ValidationError::new(diffs).unwrap();
        let rendered = ReportConfig::default().apply(err).to_string();
        assert!(rendered.starts_with("200 differences: [\n"));
        assert!(rendered.ends_with(&format!("    ...\n\n{DEFAULT_TRUNCATION_NOTICE}")));
    }

    #[test]
    fn test_unbounded_config_never_truncates() {
        let config = ReportConfig {
            max_diff: None,
            ..ReportConfig::default()
        };
        let diffs: Vec<Difference> = (0..200).map(Difference::missing).collect();
        let rendered = config.apply(ValidationError::new(diffs).unwrap()).to_string();
        assert!(rendered.ends_with("\n]"));
    }
}
