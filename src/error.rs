//! Error types for Vivero operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Vivero operations.
///
/// Provides detailed context about failures including schema violations,
/// missing or mistyped raw values, and stale profile/vector snapshots.
///
/// # Examples
///
/// ```
/// use vivero::error::ViveroError;
///
/// let err = ViveroError::UnknownCategory {
///     attribute: "family".to_string(),
///     token: "Rosaceae".to_string(),
/// };
/// assert!(err.to_string().contains("Unknown category"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ViveroError {
    /// Schema declared with no attributes.
    EmptySchema,

    /// Two attributes in the same schema share a name.
    DuplicateAttribute {
        /// The repeated attribute name
        name: String,
    },

    /// More than one attribute is marked unique.
    MultipleUniqueAttributes {
        /// First unique attribute found
        first: String,
        /// Second unique attribute found
        second: String,
    },

    /// Attribute priority is negative or non-finite.
    InvalidPriority {
        /// Attribute name
        attribute: String,
        /// Offending priority value
        value: f32,
    },

    /// All attribute priorities are zero, so no weighted average exists.
    ZeroPriority,

    /// A required attribute has no raw value on an item.
    MissingAttribute {
        /// Item name
        item: String,
        /// Attribute name
        attribute: String,
    },

    /// Raw value variant does not match the attribute kind.
    TypeMismatch {
        /// Attribute name
        attribute: String,
        /// Expected raw value kind
        expected: String,
        /// Actual raw value kind found
        actual: String,
    },

    /// A category token on an already-encoded item is absent from the vocabulary.
    UnknownCategory {
        /// Attribute name
        attribute: String,
        /// The unregistered token
        token: String,
    },

    /// Profile building or scoring was asked to run over zero exemplars.
    EmptyExemplarSet,

    /// Exemplar index does not point into the item slice.
    ExemplarOutOfRange {
        /// Offending index
        index: usize,
        /// Length of the item slice
        len: usize,
    },

    /// Feature vector or profile width disagrees with the current schema.
    SchemaMismatch {
        /// Expected width description
        expected: String,
        /// Actual width found
        actual: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for ViveroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViveroError::EmptySchema => {
                write!(f, "Schema must declare at least one attribute")
            }
            ViveroError::DuplicateAttribute { name } => {
                write!(f, "Duplicate attribute name: {name}")
            }
            ViveroError::MultipleUniqueAttributes { first, second } => {
                write!(
                    f,
                    "Multiple unique attributes: {first} and {second}, at most one allowed"
                )
            }
            ViveroError::InvalidPriority { attribute, value } => {
                write!(
                    f,
                    "Invalid priority for {attribute}: {value}, expected a finite value >= 0"
                )
            }
            ViveroError::ZeroPriority => {
                write!(f, "Attribute priorities sum to zero, cannot weight scores")
            }
            ViveroError::MissingAttribute { item, attribute } => {
                write!(f, "Item '{item}' is missing required attribute '{attribute}'")
            }
            ViveroError::TypeMismatch {
                attribute,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Type mismatch for attribute '{attribute}': expected {expected}, got {actual}"
                )
            }
            ViveroError::UnknownCategory { attribute, token } => {
                write!(
                    f,
                    "Unknown category for attribute '{attribute}': '{token}' is not in the vocabulary"
                )
            }
            ViveroError::EmptyExemplarSet => {
                write!(f, "Exemplar set is empty")
            }
            ViveroError::ExemplarOutOfRange { index, len } => {
                write!(f, "Exemplar index {index} out of bounds (len={len})")
            }
            ViveroError::SchemaMismatch { expected, actual } => {
                write!(f, "Schema mismatch: expected {expected}, got {actual}")
            }
            ViveroError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ViveroError {}

impl From<&str> for ViveroError {
    fn from(msg: &str) -> Self {
        ViveroError::Other(msg.to_string())
    }
}

impl From<String> for ViveroError {
    fn from(msg: String) -> Self {
        ViveroError::Other(msg)
    }
}

impl ViveroError {
    /// Create a schema mismatch error for a stale feature vector or profile
    #[must_use]
    pub fn width_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::SchemaMismatch {
            expected: format!("{context} of width {expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create a type mismatch error from raw value kind names
    #[must_use]
    pub fn type_mismatch(attribute: &str, expected: &str, actual: &str) -> Self {
        Self::TypeMismatch {
            attribute: attribute.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a missing attribute error
    #[must_use]
    pub fn missing_attribute(item: &str, attribute: &str) -> Self {
        Self::MissingAttribute {
            item: item.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for ViveroError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<ViveroError> for &str {
    fn eq(&self, other: &ViveroError) -> bool {
        *self == other.to_string()
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ViveroError>;
