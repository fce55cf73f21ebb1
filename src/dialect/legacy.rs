//! The original UptimeRobot API.
//!
//! Every call is a GET with query parameters, every scalar in the response
//! is a string, and lists come wrapped in a singleton object such as
//! `{"monitors": {"monitor": [...]}}`. Failures look like
//! `{"stat": "fail", "id": "212", "message": "..."}`.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{EnvelopeStatus, Operation};
use crate::encoding::{self, Wrapped};
use crate::errors::{Result, UptimeRobotError};
use crate::params::{MonitorQuery, MonitorUpdate, NewAlertContact, NewMonitor, Params};
use crate::types::{
    AlertContact, AlertContactStatus, AlertContactType, KeywordType, Log, LogType, Monitor,
    MonitorList, MonitorStatus, MonitorSubtype, MonitorType, ResponseTime,
};

pub(super) const BASE_URL: &str = "http://api.uptimerobot.com/";

/// `212`: the account has no monitors; `221`: the account has no alert contacts
pub(super) const BENIGN_ERROR_CODES: &[&str] = &["212", "221"];

/// Callback name used when the API falls back to JSON-P
const JSONP_CALLBACK: &str = "jsonUptimeRobotApi";

pub(super) fn http_method(operation: Operation) -> Method {
    match operation {
        Operation::NewUser => Method::POST,
        _ => Method::GET,
    }
}

pub(super) fn auth_params(api_key: &str) -> Params {
    let mut params = Params::new();
    params
        .push("apiKey", api_key)
        .push("format", "json")
        .push("noJsonCallback", "1");
    params
}

pub(super) fn supports_alert_contact_type(contact_type: AlertContactType) -> bool {
    matches!(
        contact_type,
        AlertContactType::Email | AlertContactType::Boxcar
    )
}

pub(super) fn monitor_query_params(query: &MonitorQuery) -> Params {
    let mut params = Params::new();
    params
        .push_list("monitors", &query.monitor_ids)
        .push_list("customUptimeRatio", &query.custom_uptime_ratios)
        .push_flag("logs", query.logs)
        .push_flag("alertContacts", query.log_alert_contacts)
        .push_flag("showMonitorAlertContacts", query.alert_contacts)
        .push_flag("responseTimes", query.response_times)
        .push_flag("showTimezone", query.timezone)
        .push_opt("logsLimit", query.logs_limit)
        .push_opt("offset", query.offset)
        .push_opt("limit", query.limit);

    if query.logs_since.is_some() || query.logs_until.is_some() {
        debug!("Log date window is not supported by the legacy API, ignoring");
    }

    params
}

pub(super) fn new_monitor_params(monitor: &NewMonitor) -> Params {
    let mut params = Params::new();
    params
        .push_text("monitorFriendlyName", Some(monitor.name.as_str()))
        .push_text("monitorURL", Some(monitor.url.as_str()))
        .push("monitorType", monitor.monitor_type.code());

    if monitor.monitor_type == MonitorType::Port {
        params.push_opt("monitorSubType", monitor.subtype.map(MonitorSubtype::code));
        if monitor.subtype == Some(MonitorSubtype::Custom) {
            params.push_opt("monitorPort", monitor.port);
        }
    }

    if monitor.monitor_type == MonitorType::Keyword {
        params
            .push_opt("monitorKeywordType", monitor.keyword_type.map(KeywordType::code))
            .push_text("monitorKeywordValue", monitor.keyword_value.as_deref());
    }

    params
        .push_text("monitorHTTPUsername", monitor.http_username.as_deref())
        .push_text("monitorHTTPPassword", monitor.http_password.as_deref())
        .push_list("monitorAlertContacts", &monitor.alert_contacts)
        .push_opt("monitorInterval", monitor.interval.map(interval_minutes));
    params
}

pub(super) fn edit_monitor_params(update: &MonitorUpdate) -> Params {
    let mut params = Params::new();
    params
        .push("monitorID", update.id)
        .push_text("monitorFriendlyName", update.name.as_deref())
        .push_text("monitorURL", update.url.as_deref())
        // editMonitor misbehaves when no subtype is sent at all
        .push("monitorSubType", update.subtype.map_or(0, MonitorSubtype::code))
        .push_opt("monitorPort", update.port)
        .push_opt("monitorKeywordType", update.keyword_type.map(KeywordType::code))
        .push_text("monitorKeywordValue", update.keyword_value.as_deref())
        .push_text("monitorHTTPUsername", update.http_username.as_deref())
        .push_text("monitorHTTPPassword", update.http_password.as_deref())
        .push_list("monitorAlertContacts", &update.alert_contacts)
        .push_opt("monitorInterval", update.interval.map(interval_minutes));
    params
}

pub(super) fn delete_monitor_params(id: u64) -> Params {
    let mut params = Params::new();
    params.push("monitorID", id);
    params
}

pub(super) fn alert_contact_query_params(ids: &[String]) -> Params {
    let mut params = Params::new();
    params.push_list("alertcontacts", ids);
    params
}

pub(super) fn new_alert_contact_params(contact: &NewAlertContact) -> Params {
    let mut params = Params::new();
    params
        .push("alertContactType", contact.contact_type.code())
        .push_text("alertContactValue", Some(contact.value.as_str()));
    params
}

pub(super) fn delete_alert_contact_params(id: &str) -> Params {
    let mut params = Params::new();
    params.push("alertContactID", id);
    params
}

/// The legacy API counts intervals in whole minutes, at least one
fn interval_minutes(interval: Duration) -> u64 {
    (interval.as_secs() / 60).max(1)
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(strip_jsonp(body)).map_err(UptimeRobotError::Parse)
}

fn strip_jsonp(body: &str) -> &str {
    let trimmed = body.trim();
    trimmed
        .strip_prefix(JSONP_CALLBACK)
        .and_then(|rest| rest.trim_start().strip_prefix('('))
        .and_then(|rest| rest.trim_end().strip_suffix(')'))
        .unwrap_or(trimmed)
}

#[derive(Deserialize)]
struct RawStatus {
    stat: String,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    message: Option<String>,
}

pub(super) fn decode_status(body: &str) -> Result<EnvelopeStatus> {
    let raw: RawStatus = parse(body)?;
    Ok(EnvelopeStatus::from_stat(&raw.stat, raw.id, raw.message))
}

#[derive(Deserialize)]
struct RawAlertContact {
    #[serde(deserialize_with = "encoding::id")]
    id: String,
    #[serde(rename = "type")]
    contact_type: AlertContactType,
    #[serde(default, deserialize_with = "encoding::text")]
    value: String,
    #[serde(default, deserialize_with = "encoding::opt_code")]
    status: Option<AlertContactStatus>,
}

impl From<RawAlertContact> for AlertContact {
    fn from(raw: RawAlertContact) -> Self {
        Self {
            id: raw.id,
            contact_type: raw.contact_type,
            value: raw.value,
            status: raw.status,
            friendly_name: None,
        }
    }
}

#[derive(Deserialize)]
struct RawLog {
    #[serde(rename = "type")]
    log_type: LogType,
    #[serde(default, deserialize_with = "encoding::opt_timestamp")]
    datetime: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, deserialize_with = "encoding::list")]
    alertcontact: Vec<RawAlertContact>,
}

impl From<RawLog> for Log {
    fn from(raw: RawLog) -> Self {
        Self {
            log_type: raw.log_type,
            datetime: raw.datetime,
            duration: None,
            alert_contacts: raw.alertcontact.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawResponseTime {
    #[serde(default, deserialize_with = "encoding::opt_timestamp")]
    datetime: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(deserialize_with = "encoding::u64_value")]
    value: u64,
}

impl From<RawResponseTime> for ResponseTime {
    fn from(raw: RawResponseTime) -> Self {
        Self {
            datetime: raw.datetime,
            value: raw.value,
        }
    }
}

#[derive(Deserialize)]
struct RawMonitor {
    #[serde(deserialize_with = "encoding::u64_value")]
    id: u64,
    #[serde(default, deserialize_with = "encoding::text")]
    friendlyname: String,
    #[serde(default, deserialize_with = "encoding::text")]
    url: String,
    #[serde(rename = "type")]
    monitor_type: MonitorType,
    #[serde(default, deserialize_with = "encoding::opt_nonzero_code")]
    subtype: Option<MonitorSubtype>,
    #[serde(default, deserialize_with = "encoding::opt_port")]
    port: Option<u16>,
    #[serde(default, deserialize_with = "encoding::opt_nonzero_code")]
    keywordtype: Option<KeywordType>,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    keywordvalue: Option<String>,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    httpusername: Option<String>,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    httppassword: Option<String>,
    /// Minutes
    #[serde(default, deserialize_with = "encoding::opt_u64")]
    interval: Option<u64>,
    status: MonitorStatus,
    #[serde(default, deserialize_with = "encoding::opt_f64")]
    alltimeuptimeratio: Option<f64>,
    #[serde(default, deserialize_with = "encoding::ratio_list")]
    customuptimeratio: Vec<f64>,
    #[serde(default, deserialize_with = "encoding::list")]
    alertcontact: Vec<RawAlertContact>,
    #[serde(default, deserialize_with = "encoding::list")]
    log: Vec<RawLog>,
    #[serde(default, deserialize_with = "encoding::list")]
    responsetime: Vec<RawResponseTime>,
}

impl From<RawMonitor> for Monitor {
    fn from(raw: RawMonitor) -> Self {
        Self {
            id: raw.id,
            name: raw.friendlyname,
            url: raw.url,
            monitor_type: raw.monitor_type,
            subtype: raw.subtype,
            port: raw.port,
            keyword_type: raw.keywordtype,
            keyword_value: raw.keywordvalue,
            http_username: raw.httpusername,
            http_password: raw.httppassword,
            interval: raw
                .interval
                .map(|minutes| Duration::from_secs(minutes.saturating_mul(60))),
            status: raw.status,
            all_time_uptime_ratio: raw.alltimeuptimeratio,
            custom_uptime_ratios: raw.customuptimeratio,
            created_at: None,
            alert_contacts: raw.alertcontact.into_iter().map(Into::into).collect(),
            logs: raw.log.into_iter().map(Into::into).collect(),
            response_times: raw.responsetime.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
struct MonitorsPayload {
    #[serde(default)]
    monitors: Option<Wrapped<RawMonitor>>,
    #[serde(default, deserialize_with = "encoding::opt_i32")]
    timezone: Option<i32>,
    #[serde(default, deserialize_with = "encoding::opt_u64")]
    total: Option<u64>,
}

pub(super) fn decode_monitors(body: &str) -> Result<MonitorList> {
    let payload: MonitorsPayload = parse(body)?;
    Ok(MonitorList {
        monitors: payload
            .monitors
            .map(|Wrapped(monitors)| monitors.into_iter().map(Into::into).collect())
            .unwrap_or_default(),
        timezone: payload.timezone,
        total: payload.total,
    })
}

#[derive(Deserialize)]
struct AlertContactsPayload {
    #[serde(default)]
    alertcontacts: Option<Wrapped<RawAlertContact>>,
}

pub(super) fn decode_alert_contacts(body: &str) -> Result<Vec<AlertContact>> {
    let payload: AlertContactsPayload = parse(body)?;
    Ok(payload
        .alertcontacts
        .map(|Wrapped(contacts)| contacts.into_iter().map(Into::into).collect())
        .unwrap_or_default())
}

#[derive(Deserialize)]
struct CreatedItem {
    #[serde(default, deserialize_with = "encoding::opt_string")]
    id: Option<String>,
}

#[derive(Deserialize)]
struct CreatedMonitorPayload {
    #[serde(default)]
    monitor: Option<CreatedItem>,
}

pub(super) fn decode_created_monitor(body: &str) -> Result<Option<u64>> {
    let payload: CreatedMonitorPayload = parse(body)?;
    payload
        .monitor
        .and_then(|item| item.id)
        .map(|id| {
            id.parse::<u64>().map_err(|_| {
                UptimeRobotError::UnexpectedResponse(format!("non-numeric monitor id: {id}"))
            })
        })
        .transpose()
}

#[derive(Deserialize)]
struct CreatedAlertContactPayload {
    #[serde(default)]
    alertcontact: Option<CreatedItem>,
}

pub(super) fn decode_created_alert_contact(body: &str) -> Result<Option<String>> {
    let payload: CreatedAlertContactPayload = parse(body)?;
    Ok(payload.alertcontact.and_then(|item| item.id))
}
