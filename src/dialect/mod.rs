//! Per-version adapters for the UptimeRobot wire format.
//!
//! The vendor renamed parameters and fields, changed how lists are nested,
//! and changed how errors are reported between API versions. Each version
//! gets its own module with its own DTOs; [`ApiVersion`] is chosen when the
//! client is configured and dispatches to the matching module.

mod legacy;
mod v2;

use reqwest::Method;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use url::Url;

use crate::errors::{Result, ValidationError};
use crate::params::{MonitorQuery, MonitorUpdate, NewAlertContact, NewMonitor, Params};
use crate::types::{AlertContact, AlertContactType, MonitorList};

/// UptimeRobot API version to speak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    /// The original `api.uptimerobot.com` API: GET requests, numeric strings,
    /// lists wrapped in singleton objects
    Legacy,

    /// The `/v2/` API: POST form requests, JSON numbers, raw lists
    #[default]
    V2,
}

impl Display for ApiVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiVersion::Legacy => write!(f, "legacy"),
            ApiVersion::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ValidationError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" | "v1" | "1" => Ok(ApiVersion::Legacy),
            "v2" | "2" => Ok(ApiVersion::V2),
            _ => Err(ValidationError::UnknownApiVersion(value.to_string())),
        }
    }
}

/// Remote method invoked by a client operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    GetMonitors,
    NewMonitor,
    EditMonitor,
    DeleteMonitor,
    GetAlertContacts,
    NewAlertContact,
    DeleteAlertContact,
    CheckUserEmail,
    NewUser,
}

impl Operation {
    /// Path segment appended to the base URL
    pub(crate) fn method_name(self) -> &'static str {
        match self {
            Operation::GetMonitors => "getMonitors",
            Operation::NewMonitor => "newMonitor",
            Operation::EditMonitor => "editMonitor",
            Operation::DeleteMonitor => "deleteMonitor",
            Operation::GetAlertContacts => "getAlertContacts",
            Operation::NewAlertContact => "newAlertContact",
            Operation::DeleteAlertContact => "deleteAlertContact",
            Operation::CheckUserEmail => "checkUserEmail",
            Operation::NewUser => "newUser",
        }
    }
}

/// The status part of a response envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EnvelopeStatus {
    pub(crate) ok: bool,
    pub(crate) code: Option<String>,
    pub(crate) message: Option<String>,
}

impl EnvelopeStatus {
    fn from_stat(stat: &str, code: Option<String>, message: Option<String>) -> Self {
        Self {
            ok: stat.eq_ignore_ascii_case("ok"),
            code,
            message,
        }
    }
}

impl ApiVersion {
    /// Base URL of the public API
    pub fn default_base_url(self) -> Url {
        let url = match self {
            ApiVersion::Legacy => legacy::BASE_URL,
            ApiVersion::V2 => v2::BASE_URL,
        };
        Url::parse(url).expect("Valid base URL")
    }

    pub(crate) fn http_method(self, operation: Operation) -> Method {
        match self {
            ApiVersion::Legacy => legacy::http_method(operation),
            ApiVersion::V2 => v2::http_method(operation),
        }
    }

    /// Parameters attached to every request
    pub(crate) fn auth_params(self, api_key: &str) -> Params {
        match self {
            ApiVersion::Legacy => legacy::auth_params(api_key),
            ApiVersion::V2 => v2::auth_params(api_key),
        }
    }

    /// Vendor error codes that do not indicate a failed call
    pub(crate) fn is_benign_error(self, code: &str) -> bool {
        match self {
            ApiVersion::Legacy => legacy::BENIGN_ERROR_CODES.contains(&code),
            ApiVersion::V2 => v2::BENIGN_ERROR_CODES.contains(&code),
        }
    }

    pub(crate) fn check_alert_contact_type(
        self,
        contact_type: AlertContactType,
    ) -> std::result::Result<(), ValidationError> {
        let supported = match self {
            ApiVersion::Legacy => legacy::supports_alert_contact_type(contact_type),
            ApiVersion::V2 => v2::supports_alert_contact_type(contact_type),
        };
        if supported {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedAlertContactType(contact_type))
        }
    }

    pub(crate) fn monitor_query_params(self, query: &MonitorQuery) -> Params {
        match self {
            ApiVersion::Legacy => legacy::monitor_query_params(query),
            ApiVersion::V2 => v2::monitor_query_params(query),
        }
    }

    pub(crate) fn new_monitor_params(self, monitor: &NewMonitor) -> Params {
        match self {
            ApiVersion::Legacy => legacy::new_monitor_params(monitor),
            ApiVersion::V2 => v2::new_monitor_params(monitor),
        }
    }

    pub(crate) fn edit_monitor_params(self, update: &MonitorUpdate) -> Params {
        match self {
            ApiVersion::Legacy => legacy::edit_monitor_params(update),
            ApiVersion::V2 => v2::edit_monitor_params(update),
        }
    }

    pub(crate) fn delete_monitor_params(self, id: u64) -> Params {
        match self {
            ApiVersion::Legacy => legacy::delete_monitor_params(id),
            ApiVersion::V2 => v2::delete_monitor_params(id),
        }
    }

    pub(crate) fn alert_contact_query_params(self, ids: &[String]) -> Params {
        match self {
            ApiVersion::Legacy => legacy::alert_contact_query_params(ids),
            ApiVersion::V2 => v2::alert_contact_query_params(ids),
        }
    }

    pub(crate) fn new_alert_contact_params(self, contact: &NewAlertContact) -> Params {
        match self {
            ApiVersion::Legacy => legacy::new_alert_contact_params(contact),
            ApiVersion::V2 => v2::new_alert_contact_params(contact),
        }
    }

    pub(crate) fn delete_alert_contact_params(self, id: &str) -> Params {
        match self {
            ApiVersion::Legacy => legacy::delete_alert_contact_params(id),
            ApiVersion::V2 => v2::delete_alert_contact_params(id),
        }
    }

    pub(crate) fn decode_status(self, body: &str) -> Result<EnvelopeStatus> {
        match self {
            ApiVersion::Legacy => legacy::decode_status(body),
            ApiVersion::V2 => v2::decode_status(body),
        }
    }

    pub(crate) fn decode_monitors(self, body: &str) -> Result<MonitorList> {
        match self {
            ApiVersion::Legacy => legacy::decode_monitors(body),
            ApiVersion::V2 => v2::decode_monitors(body),
        }
    }

    pub(crate) fn decode_alert_contacts(self, body: &str) -> Result<Vec<AlertContact>> {
        match self {
            ApiVersion::Legacy => legacy::decode_alert_contacts(body),
            ApiVersion::V2 => v2::decode_alert_contacts(body),
        }
    }

    /// Id of the monitor created by `newMonitor`
    pub(crate) fn decode_created_monitor(self, body: &str) -> Result<Option<u64>> {
        match self {
            ApiVersion::Legacy => legacy::decode_created_monitor(body),
            ApiVersion::V2 => v2::decode_created_monitor(body),
        }
    }

    /// Id of the alert contact created by `newAlertContact`
    pub(crate) fn decode_created_alert_contact(self, body: &str) -> Result<Option<String>> {
        match self {
            ApiVersion::Legacy => legacy::decode_created_alert_contact(body),
            ApiVersion::V2 => v2::decode_created_alert_contact(body),
        }
    }
}

/// Account parameters share their names across versions.
pub(crate) fn check_email_params(email: &str) -> Params {
    let mut params = Params::new();
    params.push("userEmail", email);
    params
}

pub(crate) fn new_user_params(full_name: &str, email: &str, password: &str) -> Params {
    let mut params = Params::new();
    params
        .push("userFirstLastName", full_name)
        .push("userEmail", email)
        .push("userPassword", password);
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITORS_LEGACY: &str = r#"{
        "stat": "ok",
        "offset": "0",
        "limit": "50",
        "total": "2",
        "monitors": {"monitor": [
            {"id": "775851423", "friendlyname": "Website", "url": "https://example.com", "type": "1", "status": "2"},
            {"id": "775851424", "friendlyname": "Router", "url": "192.168.0.1", "type": "3", "status": "9"}
        ]}
    }"#;

    const MONITORS_V2: &str = r#"{
        "stat": "ok",
        "pagination": {"offset": 0, "limit": 50, "total": 2},
        "monitors": [
            {"id": 775851423, "friendly_name": "Website", "url": "https://example.com", "type": 1, "status": 2},
            {"id": 775851424, "friendly_name": "Router", "url": "192.168.0.1", "type": 3, "status": 9}
        ]
    }"#;

    const CONTACTS_LEGACY: &str = r#"{
        "stat": "ok",
        "alertcontacts": {"alertcontact": [
            {"id": "0526", "value": "ops@example.com", "type": "2", "status": "2"},
            {"id": "2014599", "value": "example", "type": "4", "status": "0"}
        ]}
    }"#;

    const CONTACTS_V2: &str = r#"{
        "stat": "ok",
        "alert_contacts": [
            {"id": "0526", "value": "ops@example.com", "type": 2, "status": 2},
            {"id": "2014599", "value": "example", "type": 4, "status": 0}
        ]
    }"#;

    #[test]
    fn test_wrapped_and_raw_monitor_lists_decode_identically() {
        let legacy = ApiVersion::Legacy.decode_monitors(MONITORS_LEGACY).unwrap();
        let v2 = ApiVersion::V2.decode_monitors(MONITORS_V2).unwrap();

        assert_eq!(legacy.monitors, v2.monitors);
        assert_eq!(legacy.total, Some(2));
        assert_eq!(v2.total, Some(2));

        let ids: Vec<u64> = v2.monitors.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![775851423, 775851424]);
    }

    #[test]
    fn test_wrapped_and_raw_contact_lists_decode_identically() {
        let legacy = ApiVersion::Legacy
            .decode_alert_contacts(CONTACTS_LEGACY)
            .unwrap();
        let v2 = ApiVersion::V2.decode_alert_contacts(CONTACTS_V2).unwrap();

        assert_eq!(legacy, v2);
        assert_eq!(legacy[0].id, "0526");
        assert!(legacy[0].is_main());
        assert_eq!(legacy[1].contact_type, AlertContactType::Boxcar);
    }

    #[test]
    fn test_api_version_from_str() {
        assert_eq!("legacy".parse::<ApiVersion>(), Ok(ApiVersion::Legacy));
        assert_eq!("V1".parse::<ApiVersion>(), Ok(ApiVersion::Legacy));
        assert_eq!(" v2 ".parse::<ApiVersion>(), Ok(ApiVersion::V2));
        assert_eq!(
            "v3".parse::<ApiVersion>(),
            Err(ValidationError::UnknownApiVersion("v3".to_string()))
        );
    }

    #[test]
    fn test_default_base_urls() {
        assert_eq!(
            ApiVersion::Legacy.default_base_url().as_str(),
            "http://api.uptimerobot.com/"
        );
        assert_eq!(
            ApiVersion::V2.default_base_url().as_str(),
            "https://api.uptimerobot.com/v2/"
        );
        assert_eq!(ApiVersion::default(), ApiVersion::V2);
    }

    #[test]
    fn test_benign_codes_are_version_specific() {
        assert!(ApiVersion::Legacy.is_benign_error("212"));
        assert!(ApiVersion::Legacy.is_benign_error("221"));
        assert!(!ApiVersion::Legacy.is_benign_error("100"));
        assert!(!ApiVersion::V2.is_benign_error("212"));
    }

    #[test]
    fn test_alert_contact_type_support() {
        for version in [ApiVersion::Legacy, ApiVersion::V2] {
            assert!(version.check_alert_contact_type(AlertContactType::Email).is_ok());
            assert!(version.check_alert_contact_type(AlertContactType::Boxcar).is_ok());
            assert_eq!(
                version.check_alert_contact_type(AlertContactType::Sms),
                Err(ValidationError::UnsupportedAlertContactType(
                    AlertContactType::Sms
                ))
            );
            assert!(version
                .check_alert_contact_type(AlertContactType::Twitter)
                .is_err());
        }
        assert!(ApiVersion::V2
            .check_alert_contact_type(AlertContactType::WebHook)
            .is_ok());
        assert!(ApiVersion::Legacy
            .check_alert_contact_type(AlertContactType::WebHook)
            .is_err());
    }

    #[test]
    fn test_http_methods() {
        assert_eq!(
            ApiVersion::Legacy.http_method(Operation::GetMonitors),
            Method::GET
        );
        assert_eq!(ApiVersion::Legacy.http_method(Operation::NewUser), Method::POST);
        assert_eq!(ApiVersion::V2.http_method(Operation::GetMonitors), Method::POST);
        assert_eq!(
            ApiVersion::V2.http_method(Operation::CheckUserEmail),
            Method::GET
        );
    }

    #[test]
    fn test_account_params() {
        let params = new_user_params("Jane Doe", "jane@example.com", "secret1");
        assert_eq!(params.get("userFirstLastName"), Some("Jane Doe"));
        assert_eq!(params.get("userEmail"), Some("jane@example.com"));
        assert_eq!(params.get("userPassword"), Some("secret1"));
        assert_eq!(
            check_email_params("jane@example.com").get("userEmail"),
            Some("jane@example.com")
        );
    }
}
