use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument};

use crate::client::UptimeRobotClient;
use crate::dialect::{self, Operation};
use crate::errors::{Result, ValidationError};

const MIN_NAME_LENGTH: usize = 3;
const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn get_email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[\w.\-]+@[\w\-]+(\.[\w\-]+)*\.\w{2,10}$").expect("Static regex is valid")
    })
}

/// Reject blank or malformed e-mail addresses
pub(crate) fn validate_email(email: &str) -> std::result::Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if !get_email_pattern().is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

fn validate_registration(
    full_name: &str,
    email: &str,
    password: &str,
) -> std::result::Result<(), ValidationError> {
    if full_name.is_empty() {
        return Err(ValidationError::MissingField("full_name"));
    }
    if password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    validate_email(email)?;

    if full_name.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::NameTooShort {
            min: MIN_NAME_LENGTH,
        });
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

impl UptimeRobotClient {
    /// Check whether `email` can still be used to register an account
    ///
    /// A vendor `fail` answer means "taken" and is returned as `false`
    /// rather than raised.
    #[instrument(name = "UptimeRobotClient::is_email_available", skip_all)]
    pub async fn is_email_available(&self, email: &str) -> Result<bool> {
        validate_email(email)?;

        let body = self
            .send(Operation::CheckUserEmail, dialect::check_email_params(email))
            .await?;
        let status = self.api_version().decode_status(&body)?;

        debug!(available = status.ok, "Checked e-mail availability");
        Ok(status.ok)
    }

    /// Register a new UptimeRobot account
    ///
    /// Returns `false` when UptimeRobot refuses the registration.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without contacting UptimeRobot, if:
    /// - Any argument is empty
    /// - The e-mail address is malformed
    /// - The name is shorter than 3 characters
    /// - The password is shorter than 6 characters
    #[instrument(name = "UptimeRobotClient::register_account", skip_all)]
    pub async fn register_account(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<bool> {
        validate_registration(full_name, email, password)?;

        let body = self
            .send(
                Operation::NewUser,
                dialect::new_user_params(full_name, email, password),
            )
            .await?;
        let status = self.api_version().decode_status(&body)?;

        debug!(registered = status.ok, "Account registration finished");
        Ok(status.ok)
    }
}
