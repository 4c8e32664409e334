use thiserror::Error;

/// A required numeric input was missing, non-positive, or non-finite.
///
/// Raised before any table lookup runs. Optional inputs never produce this
/// error: their fallbacks (bottom-width estimation, skipping the hydraulic
/// check when no slope was measured) are documented behavior.
///
/// # Example
/// ```rust
/// use culvert_core::ValidationError;
///
/// let err = ValidationError::non_positive("slope", 0.0);
/// assert_eq!(err.field(), "slope");
/// assert_eq!(err.to_string(), "invalid slope: must be greater than zero, got 0");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    field: &'static str,
    reason: String,
}

impl ValidationError {
    /// Create error for a required input that was not supplied.
    ///
    /// # Arguments
    /// * `field` - The name of the missing input (e.g., `"slope"`, `"depths"`)
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            reason: "a value is required".to_string(),
        }
    }

    /// Create error for a required input that must be strictly positive.
    ///
    /// # Arguments
    /// * `field` - The name of the invalid input
    /// * `value` - The rejected value
    pub fn non_positive(field: &'static str, value: f64) -> Self {
        Self {
            field,
            reason: format!("must be greater than zero, got {value}"),
        }
    }

    /// Create error for a value that is NaN or infinite.
    pub fn non_finite(field: &'static str, value: f64) -> Self {
        Self {
            field,
            reason: format!("must be a finite number, got {value}"),
        }
    }

    /// Create error for a value outside an allowed range.
    ///
    /// # Arguments
    /// * `field` - The name of the invalid input
    /// * `constraint` - Description of the constraint (e.g., `"must be at least 1.0"`)
    /// * `value` - The rejected value
    pub fn out_of_range(field: &'static str, constraint: &str, value: f64) -> Self {
        Self {
            field,
            reason: format!("{constraint}, got {value}"),
        }
    }

    /// Name of the input that failed validation.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Human-readable reason, without the field prefix.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Require a finite, strictly positive value.
///
/// # Errors
/// Returns [`ValidationError`] when `value` is NaN, infinite, zero or negative.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::non_finite(field, value));
    }
    if value <= 0.0 {
        return Err(ValidationError::non_positive(field, value));
    }
    Ok(value)
}
