/// API route handlers
///
/// Route modules:
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, and current-user endpoints
/// - `tasks`: Task CRUD endpoints

pub mod auth;
pub mod health;
pub mod tasks;

use crate::error::{ApiError, ValidationErrorDetail};
use validator::ValidationErrors;

/// Converts validator output into the API's validation error shape
pub(crate) fn validation_error(errors: ValidationErrors) -> ApiError {
    let details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::ValidationError(details)
}
