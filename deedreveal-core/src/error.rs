//! Core error types for `deedreveal`
//!
//! The reveal engine itself is total and never fails. These errors cover
//! the few places where the core is asked to interpret user input:
//! section names, raw metadata bytes and human-entered amounts.

use thiserror::Error;

// ============================================================================
// Section Errors
// ============================================================================

/// A section identifier could not be recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    /// The input names no known section
    #[error("unknown section '{input}'{}", suggestion.as_ref().map_or_else(String::new, |s| format!(" (did you mean '{s}'?)")))]
    Unknown {
        /// The rejected input
        input: String,
        /// Closest known section id, if one is near enough
        suggestion: Option<String>,
    },
}

// ============================================================================
// Metadata Errors
// ============================================================================

/// Raw metadata could not be turned into a document at all.
///
/// Individual malformed items never produce this error; they are skipped
/// and reported through [`crate::metadata::ParsedMetadata::skipped`].
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The bytes are not valid JSON
    #[error("metadata is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document root is something other than an object
    #[error("metadata root must be a JSON object, got {found}")]
    NotAnObject {
        /// JSON type that was found instead
        found: &'static str,
    },
}

// ============================================================================
// Amount Errors
// ============================================================================

/// Failures parsing or validating a human-entered token amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Nothing to parse
    #[error("amount is empty")]
    Empty,

    /// The input is not a decimal number
    #[error("invalid amount '{input}'")]
    Invalid {
        /// The rejected input
        input: String,
    },

    /// More fractional digits than the token supports
    #[error("amount has more than {decimals} fractional digits")]
    TooPrecise {
        /// Fractional digits supported by the token
        decimals: u8,
    },

    /// The amount does not fit in 128 bits of base units
    #[error("amount is too large")]
    Overflow,

    /// The token precision is outside the supported range
    #[error("unsupported token precision: {decimals} decimals (max {max})")]
    UnsupportedDecimals {
        /// Requested precision
        decimals: u8,
        /// Largest supported precision
        max: u8,
    },

    /// A transfer of nothing
    #[error("amount must be greater than zero")]
    Zero,

    /// A transfer larger than the available balance
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Requested base units
        requested: u128,
        /// Available base units
        available: u128,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_section_mentions_suggestion() {
        let err = SectionError::Unknown {
            input: "secton_1".to_string(),
            suggestion: Some("section_1".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown section 'secton_1' (did you mean 'section_1'?)"
        );
    }

    #[test]
    fn unknown_section_without_suggestion() {
        let err = SectionError::Unknown {
            input: "zzz".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unknown section 'zzz'");
    }

    #[test]
    fn insufficient_balance_message() {
        let err = AmountError::InsufficientBalance {
            requested: 10,
            available: 3,
        };
        assert!(err.to_string().contains("requested 10"));
    }
}
