use serde_json::{Map, Value};

/// Validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub kind: ValidationErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    Missing,
    InvalidValue,
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("Required field missing: {}", field),
            field,
            kind: ValidationErrorKind::Missing,
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ValidationErrorKind::InvalidValue,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Validation error for field '{}': {}",
            self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Require a field to be present and non-null
pub fn require_present<'a>(
    fields: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Value, ValidationError> {
    fields
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ValidationError::missing(field))
}

/// Require a finite numeric field
pub fn require_number(fields: &Map<String, Value>, field: &str) -> Result<f64, ValidationError> {
    let value = require_present(fields, field)?;

    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ValidationError::invalid(
            field,
            format!("Field {} must be a number, got {}", field, value),
        )),
    }
}
