use std::error::Error as StdError;
use thiserror::Error;

use crate::types::AlertContactType;

/// Result type alias for UptimeRobot operations
pub type Result<T> = std::result::Result<T, UptimeRobotError>;

/// Errors that can occur when interacting with UptimeRobot
#[derive(Debug, Error)]
pub enum UptimeRobotError {
    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest_middleware::Error),

    /// Failed to read the response body
    #[error("Failed to read response body: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// Failed to build the request URL
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[source] url::ParseError),

    /// Response body is not the JSON shape this API version returns
    #[error("Failed to parse response: {0}")]
    Parse(#[source] serde_json::Error),

    /// Server answered with a non-success HTTP status
    #[error("Request error: HTTP {status} - {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// UptimeRobot answered with `"stat": "fail"`
    #[error("UptimeRobot API error: {message} (code: {code})")]
    Api {
        /// Vendor error code (`"id"` in the legacy API, `error.type` in v2)
        code: String,
        /// Vendor error message
        message: String,
    },

    /// Response was successful but lacked the expected payload
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Input was rejected before any request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl UptimeRobotError {
    /// Check if the error is retryable
    ///
    /// Returns `true` for:
    /// - Network/connection errors
    /// - Timeout errors
    /// - Server errors (5xx status codes)
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(source) => {
                if let Some(reqwest_err) = StdError::source(source) {
                    if let Some(err) = reqwest_err.downcast_ref::<reqwest::Error>() {
                        return err.is_connect() || err.is_timeout();
                    }
                }
                false
            }
            Self::ReadBody(err) => err.is_timeout(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Vendor error code, if this is an [`UptimeRobotError::Api`] error
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Input rejected locally, before contacting UptimeRobot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid e-mail address: {0}")]
    InvalidEmail(String),

    #[error("Name must be at least {min} characters")]
    NameTooShort { min: usize },

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Alert contacts of type {0} cannot be created through this API version")]
    UnsupportedAlertContactType(AlertContactType),

    #[error("Alert contact {0} is the account's main contact and cannot be deleted")]
    MainAlertContact(String),

    #[error("Unknown API version: {0}")]
    UnknownApiVersion(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_retryable_5xx() {
        for status in [500, 502, 503] {
            let error = UptimeRobotError::Http {
                status,
                message: "Server error".to_string(),
            };
            assert!(error.is_retryable());
        }
    }

    #[test]
    fn test_http_error_not_retryable_4xx() {
        for status in [400, 401, 404] {
            let error = UptimeRobotError::Http {
                status,
                message: "Client error".to_string(),
            };
            assert!(!error.is_retryable());
        }
    }

    #[test]
    fn test_api_error_not_retryable() {
        let error = UptimeRobotError::Api {
            code: "100".to_string(),
            message: "apiKey not mentioned".to_string(),
        };
        assert!(!error.is_retryable());
        assert_eq!(error.api_code(), Some("100"));
    }

    #[test]
    fn test_error_display() {
        let error = UptimeRobotError::Api {
            code: "101".to_string(),
            message: "apiKey is wrong".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "UptimeRobot API error: apiKey is wrong (code: 101)"
        );

        let error = UptimeRobotError::Http {
            status: 503,
            message: "Service unavailable".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Request error: HTTP 503 - Service unavailable"
        );
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let error: UptimeRobotError = ValidationError::PasswordTooShort { min: 6 }.into();
        assert_eq!(error.to_string(), "Password must be at least 6 characters");
        assert!(!error.is_retryable());
        assert_eq!(error.api_code(), None);
    }

    #[test]
    fn test_parse_error_not_retryable() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let error = UptimeRobotError::Parse(json_err);
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_unsupported_alert_contact_display() {
        let error = ValidationError::UnsupportedAlertContactType(AlertContactType::Sms);
        assert_eq!(
            error.to_string(),
            "Alert contacts of type SMS cannot be created through this API version"
        );
    }
}
