use crate::validation::ValidationError;
use thiserror::Error;

/// Result type alias using VetError
pub type Result<T> = std::result::Result<T, VetError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Validation failures are not errors in this taxonomy: they travel as
/// [`ValidationError`] values inside [`VetError::Validation`]. The kinds
/// below classify misuse and faults, each mapped to a stable error code
/// for programmatic handling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input shape
    InvalidInput,
    TypeMismatch,
    ShapeMismatch,

    // Requirements
    InvalidRequirement,
    ExhaustibleRequirement,

    // Differences and acceptances
    EmptyDifferences,
    InvalidTolerance,
    KeyCollision,

    // User code
    /// A user-supplied predicate or group requirement reported a failure
    PredicateFailed,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::ShapeMismatch => "ERR_SHAPE_MISMATCH",
            ExErrorKind::InvalidRequirement => "ERR_INVALID_REQUIREMENT",
            ExErrorKind::ExhaustibleRequirement => "ERR_EXHAUSTIBLE_REQUIREMENT",
            ExErrorKind::EmptyDifferences => "ERR_EMPTY_DIFFERENCES",
            ExErrorKind::InvalidTolerance => "ERR_INVALID_TOLERANCE",
            ExErrorKind::KeyCollision => "ERR_KEY_COLLISION",
            ExErrorKind::PredicateFailed => "ERR_PREDICATE_FAILED",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus context for debugging: the operation
/// that failed, the mapping key being processed, and any candidate names
/// involved (e.g. the predicates that collided on one key).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    key: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add mapping key context (rendered as a repr)
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add candidate names (used for KeyCollision to carry predicate names)
    pub fn with_candidates(mut self, names: Vec<String>) -> Self {
        self.candidates = Some(names);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the mapping key context, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get candidate names, if any (populated on KeyCollision)
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for datavet operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatavetError {
    // ===== Input shape =====
    /// Regex predicates only apply to strings
    #[error("expected string, got {kind}: {value}")]
    RegexTarget { kind: String, value: String },

    /// Mapping requirements need keyed data
    #[error("data must be mapping or iterable of key-value items")]
    DataNotMapping,

    /// Group values inside keyed data must be base elements or collections
    #[error("value for key {key} must be a base element or collection, got map")]
    NestedMapping { key: String },

    // ===== Requirements =====
    /// One-shot iterators cannot be replayed per key
    #[error("exhaustible type '{type_name}' cannot be used as a requirement")]
    ExhaustibleRequirement { type_name: String },

    /// Mappings are only valid as the top-level requirement
    #[error("mapping requirement cannot be used as a group requirement")]
    NestedMappingRequirement,

    /// Deferred requirements must be fetched before resolution
    #[error("deferred requirement '{name}' must be fetched before it can be resolved")]
    UnfetchedRequirement { name: String },

    // ===== Differences and acceptances =====
    #[error("differences container must not be empty")]
    EmptyDifferences,

    #[error("tolerance should not be negative, for full control of lower and upper bounds, use \"lower, upper\" syntax")]
    NegativeTolerance,

    #[error("lower must not be greater than upper, got {lower} (lower) and {upper} (upper)")]
    InvertedBounds { lower: f64, upper: f64 },

    #[error("cutoff must be between 0.0 and 1.0, got {cutoff}")]
    InvalidCutoff { cutoff: f64 },

    #[error("limit must be a non-negative integer, got {value}")]
    InvalidLimit { value: String },

    #[error("the key {key} matches multiple predicates: {}", .predicates.join(", "))]
    KeyCollision { key: String, predicates: Vec<String> },

    /// A keyed catalogue of accepted differences needs keyed differences
    #[error("keyed catalogue of accepted differences requires mapping differences")]
    CatalogueShape,
}

/// Conversion from DatavetError to ExError
impl From<DatavetError> for ExError {
    fn from(err: DatavetError) -> Self {
        let message = err.to_string();
        match err {
            DatavetError::RegexTarget { .. } => ExError::new(ExErrorKind::TypeMismatch)
                .with_op("match_regex")
                .with_message(message),

            DatavetError::DataNotMapping => {
                ExError::new(ExErrorKind::TypeMismatch).with_message(message)
            }

            DatavetError::NestedMapping { key } => ExError::new(ExErrorKind::TypeMismatch)
                .with_key(key)
                .with_message(message),

            DatavetError::ExhaustibleRequirement { .. } => {
                ExError::new(ExErrorKind::ExhaustibleRequirement)
                    .with_op("normalize_requirement")
                    .with_message(message)
            }

            DatavetError::NestedMappingRequirement | DatavetError::UnfetchedRequirement { .. } => {
                ExError::new(ExErrorKind::InvalidRequirement)
                    .with_op("resolve")
                    .with_message(message)
            }

            DatavetError::EmptyDifferences => {
                ExError::new(ExErrorKind::EmptyDifferences).with_message(message)
            }

            DatavetError::NegativeTolerance | DatavetError::InvertedBounds { .. } => {
                ExError::new(ExErrorKind::InvalidTolerance).with_message(message)
            }

            DatavetError::InvalidCutoff { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            DatavetError::InvalidLimit { .. } => {
                ExError::new(ExErrorKind::TypeMismatch).with_message(message)
            }

            DatavetError::KeyCollision { key, predicates } => {
                ExError::new(ExErrorKind::KeyCollision)
                    .with_key(key)
                    .with_candidates(predicates)
                    .with_message(message)
            }

            DatavetError::CatalogueShape => {
                ExError::new(ExErrorKind::ShapeMismatch).with_message(message)
            }
        }
    }
}

/// Outcome of a failed validation call
///
/// `Validation` carries the differences found; `Fault` carries misuse or a
/// failure raised by user code. Acceptances only ever absorb the former.
#[derive(Error, Debug, Clone)]
pub enum VetError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fault(#[from] ExError),
}

impl VetError {
    pub fn is_validation(&self) -> bool {
        matches!(self, VetError::Validation(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            VetError::Validation(err) => Some(err),
            VetError::Fault(_) => None,
        }
    }

    pub fn into_validation(self) -> Option<ValidationError> {
        match self {
            VetError::Validation(err) => Some(err),
            VetError::Fault(_) => None,
        }
    }

    pub fn as_fault(&self) -> Option<&ExError> {
        match self {
            VetError::Fault(err) => Some(err),
            VetError::Validation(_) => None,
        }
    }
}

impl From<DatavetError> for VetError {
    fn from(err: DatavetError) -> Self {
        VetError::Fault(err.into())
    }
}
