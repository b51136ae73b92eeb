//! Error formatting utilities
//!
//! Renders errors as a single line including their cause chain, for logs
//! and for plain-text error responses.

use crate::Error;
use std::error::Error as StdError;

/// Format error for display, appending every distinct nested cause.
pub fn format_error(error: &Error) -> String {
    let formatted = match error {
        Error::Validation {
            field,
            message,
            value,
        } => match value {
            Some(val) => format!(
                "Validation failed for {} (value: '{}'): {}",
                field, val, message
            ),
            None => format!("Validation failed for {}: {}", field, message),
        },

        Error::Internal { message, context } => match context {
            Some(context) => format!("Internal error in {}: {}", context, message),
            None => format!("Internal error: {}", message),
        },

        _ => error.to_string(),
    };

    let mut result = formatted;
    let mut source = error.source();

    while let Some(cause) = source {
        if !result.contains(&cause.to_string()) {
            result = format!("{} (caused by {})", result, cause);
        }
        source = cause.source();
    }

    result
}

/// Format error as structured JSON for logging
pub fn format_error_for_logging(error: &Error) -> serde_json::Value {
    let mut log_data = serde_json::json!({
        "message": format_error(error),
        "category": error.category(),
    });

    match error {
        Error::Upstream { status, .. } => {
            log_data["upstream_status"] = serde_json::Value::Number((*status).into());
        }
        Error::Validation {
            field,
            value: Some(value),
            ..
        } => {
            log_data["field"] = serde_json::Value::String(field.clone());
            log_data["value"] = serde_json::Value::String(value.clone());
        }
        _ => {}
    }

    log_data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_formatting() {
        let error = Error::validation_with_value("choice2_count", "not a vote count", "abc");
        let formatted = format_error(&error);

        assert_eq!(
            formatted,
            "Validation failed for choice2_count (value: 'abc'): not a vote count"
        );
    }

    #[test]
    fn test_nested_error_formatting() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let wrapped_error = Error::Io(io_error);

        let formatted = format_error(&wrapped_error);
        assert!(formatted.contains("File not found"));
    }

    #[test]
    fn test_internal_error_with_context() {
        let error = Error::Internal {
            message: "body too large".to_string(),
            context: Some("cache_gateway".to_string()),
        };
        assert_eq!(
            format_error(&error),
            "Internal error in cache_gateway: body too large"
        );
    }

    #[test]
    fn test_logging_error_formatting() {
        let error = Error::upstream(404, "status not found");
        let log_data = format_error_for_logging(&error);

        assert!(
            log_data["message"]
                .as_str()
                .unwrap()
                .contains("status not found")
        );
        assert_eq!(log_data["category"].as_str().unwrap(), "upstream");
        assert_eq!(log_data["upstream_status"].as_u64().unwrap(), 404);
    }
}
