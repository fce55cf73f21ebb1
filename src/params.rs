//! Typed request options and the key/value set they are flattened into.
//!
//! The option types here are version-neutral; each API dialect decides
//! which vendor parameter names they map to.

use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::time::Duration;

use crate::encoding;
use crate::errors::ValidationError;
use crate::types::{AlertContactType, KeywordType, Monitor, MonitorSubtype, MonitorType};

/// Ordered request parameters
///
/// Absent values are never added: every `push_*` helper skips `None`,
/// blank strings and empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn push_opt<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn push_text(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) if !value.trim().is_empty() => self.push(key, value),
            _ => self,
        }
    }

    pub fn push_flag(&mut self, key: &str, value: Option<bool>) -> &mut Self {
        self.push_opt(key, value.map(encoding::encode_bool))
    }

    pub fn push_list<T: Display>(&mut self, key: &str, values: &[T]) -> &mut Self {
        let joined = encoding::join_dashed(values);
        self.push_text(key, Some(joined.as_str()))
    }

    pub fn push_timestamp(&mut self, key: &str, value: Option<DateTime<Utc>>) -> &mut Self {
        self.push_opt(key, value.map(encoding::encode_timestamp))
    }

    pub fn extend(&mut self, other: Params) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

#[cfg(test)]
impl Params {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Options for `getMonitors`
///
/// # Example
///
/// ```rust
/// use uptime_robot_api::MonitorQuery;
///
/// let query = MonitorQuery::new()
///     .with_monitor(775851423)
///     .with_custom_uptime_ratio(7)
///     .with_custom_uptime_ratio(30)
///     .with_logs(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorQuery {
    /// Restrict to these monitors; empty means all
    pub monitor_ids: Vec<u64>,

    /// Periods in days to compute uptime ratios for
    pub custom_uptime_ratios: Vec<u32>,

    pub logs: Option<bool>,

    /// Include the alert contacts notified for each log entry (legacy API only)
    pub log_alert_contacts: Option<bool>,

    /// Include the alert contacts attached to each monitor
    pub alert_contacts: Option<bool>,

    pub response_times: Option<bool>,

    /// Include the account timezone in the response
    pub timezone: Option<bool>,

    /// Only logs after this time (v2 API only)
    pub logs_since: Option<DateTime<Utc>>,

    /// Only logs before this time (v2 API only)
    pub logs_until: Option<DateTime<Utc>>,

    pub logs_limit: Option<u32>,

    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl MonitorQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_monitor(mut self, id: u64) -> Self {
        self.monitor_ids.push(id);
        self
    }

    pub fn with_monitors(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.monitor_ids.extend(ids);
        self
    }

    pub fn with_custom_uptime_ratio(mut self, days: u32) -> Self {
        self.custom_uptime_ratios.push(days);
        self
    }

    pub fn with_logs(mut self, enabled: bool) -> Self {
        self.logs = Some(enabled);
        self
    }

    pub fn with_log_alert_contacts(mut self, enabled: bool) -> Self {
        self.log_alert_contacts = Some(enabled);
        self
    }

    pub fn with_alert_contacts(mut self, enabled: bool) -> Self {
        self.alert_contacts = Some(enabled);
        self
    }

    pub fn with_response_times(mut self, enabled: bool) -> Self {
        self.response_times = Some(enabled);
        self
    }

    pub fn with_timezone(mut self, enabled: bool) -> Self {
        self.timezone = Some(enabled);
        self
    }

    pub fn with_logs_between(mut self, since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.logs_since = Some(since);
        self.logs_until = Some(until);
        self
    }

    pub fn with_logs_limit(mut self, limit: u32) -> Self {
        self.logs_limit = Some(limit);
        self
    }

    pub fn with_page(mut self, offset: u32, limit: u32) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }
}

/// A monitor to create via `newMonitor`
///
/// Use the per-type constructors so the required fields are set:
///
/// ```rust
/// use uptime_robot_api::{KeywordType, MonitorSubtype, NewMonitor};
///
/// let site = NewMonitor::http("Website", "https://example.com");
/// let keyword = NewMonitor::keyword("Login page", "https://example.com/login", KeywordType::NotExists, "Error");
/// let smtp = NewMonitor::port("Mail", "mail.example.com", MonitorSubtype::Smtp);
/// let custom = NewMonitor::port("Game server", "play.example.com", MonitorSubtype::Custom).with_port(25565);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMonitor {
    pub name: String,
    pub url: String,
    pub monitor_type: MonitorType,
    pub subtype: Option<MonitorSubtype>,
    pub port: Option<u16>,
    pub keyword_type: Option<KeywordType>,
    pub keyword_value: Option<String>,
    pub http_username: Option<String>,
    pub http_password: Option<String>,

    /// Ids of existing alert contacts to notify
    pub alert_contacts: Vec<String>,

    pub interval: Option<Duration>,
}

impl NewMonitor {
    pub fn new(name: &str, url: &str, monitor_type: MonitorType) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            monitor_type,
            subtype: None,
            port: None,
            keyword_type: None,
            keyword_value: None,
            http_username: None,
            http_password: None,
            alert_contacts: Vec::new(),
            interval: None,
        }
    }

    pub fn http(name: &str, url: &str) -> Self {
        Self::new(name, url, MonitorType::Http)
    }

    pub fn keyword(name: &str, url: &str, keyword_type: KeywordType, keyword: &str) -> Self {
        let mut monitor = Self::new(name, url, MonitorType::Keyword);
        monitor.keyword_type = Some(keyword_type);
        monitor.keyword_value = Some(keyword.to_string());
        monitor
    }

    pub fn ping(name: &str, host: &str) -> Self {
        Self::new(name, host, MonitorType::Ping)
    }

    pub fn port(name: &str, host: &str, subtype: MonitorSubtype) -> Self {
        let mut monitor = Self::new(name, host, MonitorType::Port);
        monitor.subtype = Some(subtype);
        monitor
    }

    /// Port to watch; only used with [`MonitorSubtype::Custom`]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// HTTP basic-auth credentials for the target
    pub fn with_http_auth(mut self, username: &str, password: &str) -> Self {
        self.http_username = Some(username.to_string());
        self.http_password = Some(password.to_string());
        self
    }

    pub fn with_alert_contact(mut self, id: &str) -> Self {
        self.alert_contacts.push(id.to_string());
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Check that the fields the monitor type needs are present
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingField("url"));
        }

        match self.monitor_type {
            MonitorType::Keyword => {
                if self.keyword_type.is_none() {
                    return Err(ValidationError::MissingField("keyword_type"));
                }
                if is_blank(self.keyword_value.as_deref()) {
                    return Err(ValidationError::MissingField("keyword_value"));
                }
            }
            MonitorType::Port => match self.subtype {
                None => return Err(ValidationError::MissingField("subtype")),
                Some(MonitorSubtype::Custom) if self.port.is_none() => {
                    return Err(ValidationError::MissingField("port"));
                }
                Some(_) => {}
            },
            _ => {}
        }

        Ok(())
    }
}

/// Changes to an existing monitor, sent via `editMonitor`
///
/// The monitor type cannot be changed. Fields left as `None` (or an empty
/// alert contact list) are not sent and keep their current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorUpdate {
    pub id: u64,
    pub name: Option<String>,
    pub url: Option<String>,
    pub subtype: Option<MonitorSubtype>,
    pub port: Option<u16>,
    pub keyword_type: Option<KeywordType>,
    pub keyword_value: Option<String>,
    pub http_username: Option<String>,
    pub http_password: Option<String>,
    pub alert_contacts: Vec<String>,
    pub interval: Option<Duration>,
}

impl MonitorUpdate {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: None,
            url: None,
            subtype: None,
            port: None,
            keyword_type: None,
            keyword_value: None,
            http_username: None,
            http_password: None,
            alert_contacts: Vec::new(),
            interval: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_subtype(mut self, subtype: MonitorSubtype) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_keyword(mut self, keyword_type: KeywordType, keyword: &str) -> Self {
        self.keyword_type = Some(keyword_type);
        self.keyword_value = Some(keyword.to_string());
        self
    }

    pub fn with_http_auth(mut self, username: &str, password: &str) -> Self {
        self.http_username = Some(username.to_string());
        self.http_password = Some(password.to_string());
        self
    }

    pub fn with_alert_contact(mut self, id: &str) -> Self {
        self.alert_contacts.push(id.to_string());
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }
}

impl From<&Monitor> for MonitorUpdate {
    /// Re-submit a fetched monitor, typically after changing some of its fields
    fn from(monitor: &Monitor) -> Self {
        Self {
            id: monitor.id,
            name: Some(monitor.name.clone()),
            url: Some(monitor.url.clone()),
            subtype: monitor.subtype,
            port: monitor.port,
            keyword_type: monitor.keyword_type,
            keyword_value: monitor.keyword_value.clone(),
            http_username: monitor.http_username.clone(),
            http_password: monitor.http_password.clone(),
            alert_contacts: monitor
                .alert_contacts
                .iter()
                .map(|contact| contact.id.clone())
                .collect(),
            interval: monitor.interval,
        }
    }
}

/// An alert contact to create via `newAlertContact`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlertContact {
    pub contact_type: AlertContactType,

    /// E-mail address, handle or URL, depending on the type
    pub value: String,

    /// Friendly name (v2 API only)
    pub friendly_name: Option<String>,
}

impl NewAlertContact {
    pub fn new(contact_type: AlertContactType, value: &str) -> Self {
        Self {
            contact_type,
            value: value.to_string(),
            friendly_name: None,
        }
    }

    pub fn email(address: &str) -> Self {
        Self::new(AlertContactType::Email, address)
    }

    pub fn web_hook(url: &str) -> Self {
        Self::new(AlertContactType::WebHook, url)
    }

    pub fn with_friendly_name(mut self, name: &str) -> Self {
        self.friendly_name = Some(name.to_string());
        self
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}
