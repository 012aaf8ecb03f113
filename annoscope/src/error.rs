//! Resolution errors.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Why a resolution failed.
///
/// Every variant names the requested kind and the subject (or the specific
/// declaration site) so callers can report an actionable diagnostic. None of
/// these are transient; re-running the same query yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The requested kind is abstract.
    #[error("annotation kind `{kind}` is abstract and cannot be requested (subject `{subject}`)")]
    InvalidAnnotationKind {
        /// Requested kind.
        kind: String,
        /// Subject type of the query.
        subject: String,
    },

    /// No attached instance at the site conforms to the requested kind.
    #[error("no annotation of kind `{kind}` is attached to `{site}`")]
    NotFound {
        /// Requested kind.
        kind: String,
        /// Declaration site that was searched.
        site: String,
    },

    /// The subject has no slots that can be enumerated.
    #[error("`{subject}` cannot be inspected for `{kind}` slot annotations: {reason}")]
    NotInspectable {
        /// Requested kind.
        kind: String,
        /// Subject type of the query.
        subject: String,
        /// What the mirror reported.
        reason: String,
    },

    /// The requested kind is not declared.
    #[error("annotation kind `{kind}` is not declared")]
    UnknownKind {
        /// Requested kind.
        kind: String,
    },

    /// The subject type is not declared.
    #[error("type `{subject}` is not declared")]
    UnknownType {
        /// Subject type of the query.
        subject: String,
    },

    /// More than one attached instance conforms and the policy forbids choosing.
    #[error("{count} annotations conforming to `{kind}` are attached to `{site}`")]
    Ambiguous {
        /// Requested kind.
        kind: String,
        /// Declaration site that was searched.
        site: String,
        /// Number of conforming instances.
        count: usize,
    },

    /// An instance payload could not be turned into a Rust value.
    #[error("annotation `{kind}` at `{site}` does not decode as `{target}`: {message}")]
    Decode {
        /// Concrete kind of the instance.
        kind: String,
        /// Declaration site of the instance.
        site: String,
        /// Rust type the payload was decoded into.
        target: String,
        /// Underlying serde error.
        message: String,
    },

    /// A Rust annotation value could not be turned into a payload.
    #[error("annotation `{kind}` at `{site}` cannot be encoded: {message}")]
    Encode {
        /// Kind of the instance.
        kind: String,
        /// Declaration site of the instance.
        site: String,
        /// Underlying serde error.
        message: String,
    },
}

impl ResolveError {
    /// Stable machine-readable name of the error variant.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::InvalidAnnotationKind { .. } => "invalid_annotation_kind",
            ResolveError::NotFound { .. } => "not_found",
            ResolveError::NotInspectable { .. } => "not_inspectable",
            ResolveError::UnknownKind { .. } => "unknown_kind",
            ResolveError::UnknownType { .. } => "unknown_type",
            ResolveError::Ambiguous { .. } => "ambiguous",
            ResolveError::Decode { .. } => "decode",
            ResolveError::Encode { .. } => "encode",
        }
    }
}
