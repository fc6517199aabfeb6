//! Payload validation errors.

use thiserror::Error;

/// A result type using `ValidationError`.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A request payload failed structural validation before being sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty or missing.
    #[error("field '{field}' of {payload} is required")]
    Required {
        /// Payload type name.
        payload: &'static str,
        /// Dotted path of the offending field.
        field: &'static str,
    },

    /// A field is required because of the value of another field.
    #[error("field '{field}' of {payload} is required when {condition}")]
    RequiredIf {
        /// Payload type name.
        payload: &'static str,
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable condition that made the field mandatory.
        condition: &'static str,
    },
}

/// Structural validation of request payloads.
pub trait Validate {
    /// Check required and conditional fields.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    fn validate(&self) -> Result<()>;
}

/// Reject empty or whitespace-only strings.
pub(crate) fn require(value: &str, payload: &'static str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { payload, field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_blank() {
        assert!(require("x", "CreateNode", "name").is_ok());
        assert_eq!(
            require("  ", "CreateNode", "name"),
            Err(ValidationError::Required {
                payload: "CreateNode",
                field: "name"
            })
        );
    }

    #[test]
    fn messages_name_the_field() {
        let err = ValidationError::RequiredIf {
            payload: "CreateNode",
            field: "providerConfig",
            condition: "type is cloud",
        };
        assert_eq!(
            err.to_string(),
            "field 'providerConfig' of CreateNode is required when type is cloud"
        );
    }
}
