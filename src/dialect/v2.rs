//! The `/v2/` UptimeRobot API.
//!
//! Calls are POSTs with form bodies, scalars are mostly JSON numbers (unset
//! ones are `""` or `null`), and lists are plain arrays. Failures carry an
//! error object: `{"stat": "fail", "error": {"type": "...", "message": "..."}}`.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{EnvelopeStatus, Operation};
use crate::encoding;
use crate::errors::{Result, UptimeRobotError};
use crate::params::{MonitorQuery, MonitorUpdate, NewAlertContact, NewMonitor, Params};
use crate::types::{
    AlertContact, AlertContactStatus, AlertContactType, KeywordType, Log, LogType, Monitor,
    MonitorList, MonitorStatus, MonitorSubtype, MonitorType, ResponseTime,
};

pub(super) const BASE_URL: &str = "https://api.uptimerobot.com/v2/";

/// v2 reports empty accounts as empty lists rather than errors
pub(super) const BENIGN_ERROR_CODES: &[&str] = &[];

pub(super) fn http_method(operation: Operation) -> Method {
    match operation {
        Operation::CheckUserEmail => Method::GET,
        _ => Method::POST,
    }
}

pub(super) fn auth_params(api_key: &str) -> Params {
    let mut params = Params::new();
    params.push("api_key", api_key).push("format", "json");
    params
}

pub(super) fn supports_alert_contact_type(contact_type: AlertContactType) -> bool {
    matches!(
        contact_type,
        AlertContactType::Email | AlertContactType::Boxcar | AlertContactType::WebHook
    )
}

pub(super) fn monitor_query_params(query: &MonitorQuery) -> Params {
    let mut params = Params::new();
    params
        .push_list("monitors", &query.monitor_ids)
        .push_list("custom_uptime_ratios", &query.custom_uptime_ratios)
        .push_flag("logs", query.logs)
        .push_flag("alert_contacts", query.alert_contacts)
        .push_flag("response_times", query.response_times)
        .push_flag("timezone", query.timezone)
        .push_timestamp("logs_start_date", query.logs_since)
        .push_timestamp("logs_end_date", query.logs_until)
        .push_opt("logs_limit", query.logs_limit)
        .push_opt("offset", query.offset)
        .push_opt("limit", query.limit);

    if query.log_alert_contacts.is_some() {
        debug!("Alert contacts on log entries are not supported by the v2 API, ignoring");
    }

    params
}

/// v2 attaches contacts as `id_threshold_recurrence`; zeros notify
/// immediately and once.
fn alert_contact_refs(ids: &[String]) -> Vec<String> {
    ids.iter()
        .filter(|id| !id.trim().is_empty())
        .map(|id| format!("{id}_0_0"))
        .collect()
}

pub(super) fn new_monitor_params(monitor: &NewMonitor) -> Params {
    let mut params = Params::new();
    params
        .push_text("friendly_name", Some(monitor.name.as_str()))
        .push_text("url", Some(monitor.url.as_str()))
        .push("type", monitor.monitor_type.code());

    if monitor.monitor_type == MonitorType::Port {
        params.push_opt("sub_type", monitor.subtype.map(MonitorSubtype::code));
        if monitor.subtype == Some(MonitorSubtype::Custom) {
            params.push_opt("port", monitor.port);
        }
    }

    if monitor.monitor_type == MonitorType::Keyword {
        params
            .push_opt("keyword_type", monitor.keyword_type.map(KeywordType::code))
            .push_text("keyword_value", monitor.keyword_value.as_deref());
    }

    params
        .push_text("http_username", monitor.http_username.as_deref())
        .push_text("http_password", monitor.http_password.as_deref())
        .push_list("alert_contacts", &alert_contact_refs(&monitor.alert_contacts))
        .push_opt("interval", monitor.interval.map(|interval| interval.as_secs()));
    params
}

pub(super) fn edit_monitor_params(update: &MonitorUpdate) -> Params {
    let mut params = Params::new();
    params
        .push("id", update.id)
        .push_text("friendly_name", update.name.as_deref())
        .push_text("url", update.url.as_deref())
        .push_opt("sub_type", update.subtype.map(MonitorSubtype::code))
        .push_opt("port", update.port)
        .push_opt("keyword_type", update.keyword_type.map(KeywordType::code))
        .push_text("keyword_value", update.keyword_value.as_deref())
        .push_text("http_username", update.http_username.as_deref())
        .push_text("http_password", update.http_password.as_deref())
        .push_list("alert_contacts", &alert_contact_refs(&update.alert_contacts))
        .push_opt("interval", update.interval.map(|interval| interval.as_secs()));
    params
}

pub(super) fn delete_monitor_params(id: u64) -> Params {
    let mut params = Params::new();
    params.push("id", id);
    params
}

pub(super) fn alert_contact_query_params(ids: &[String]) -> Params {
    let mut params = Params::new();
    params.push_list("alert_contacts", ids);
    params
}

pub(super) fn new_alert_contact_params(contact: &NewAlertContact) -> Params {
    let mut params = Params::new();
    params
        .push("type", contact.contact_type.code())
        .push_text("value", Some(contact.value.as_str()))
        .push_text("friendly_name", contact.friendly_name.as_deref());
    params
}

pub(super) fn delete_alert_contact_params(id: &str) -> Params {
    let mut params = Params::new();
    params.push("id", id);
    params
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(UptimeRobotError::Parse)
}

#[derive(Deserialize)]
struct RawError {
    #[serde(rename = "type", default, deserialize_with = "encoding::opt_string")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    parameter_name: Option<String>,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    message: Option<String>,
}

#[derive(Deserialize)]
struct RawStatus {
    stat: String,
    #[serde(default)]
    error: Option<RawError>,
}

pub(super) fn decode_status(body: &str) -> Result<EnvelopeStatus> {
    let raw: RawStatus = parse(body)?;
    let (code, message) = match raw.error {
        Some(error) => {
            let message = match (error.message, error.parameter_name) {
                (Some(message), _) => Some(message),
                (None, Some(parameter)) => Some(format!("invalid parameter: {parameter}")),
                (None, None) => None,
            };
            (error.kind, message)
        }
        None => (None, None),
    };
    Ok(EnvelopeStatus::from_stat(&raw.stat, code, message))
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
    #[serde(default, deserialize_with = "encoding::opt_string")]
    friendly_name: Option<String>,
}

impl From<RawAlertContact> for AlertContact {
    fn from(raw: RawAlertContact) -> Self {
        Self {
            id: raw.id,
            contact_type: raw.contact_type,
            value: raw.value,
            status: raw.status,
            friendly_name: raw.friendly_name,
        }
    }
}

#[derive(Deserialize)]
struct RawLog {
    #[serde(rename = "type")]
    log_type: LogType,
    #[serde(default, deserialize_with = "encoding::opt_timestamp")]
    datetime: Option<DateTime<Utc>>,
    /// Seconds
    #[serde(default, deserialize_with = "encoding::opt_u64")]
    duration: Option<u64>,
    #[serde(default, deserialize_with = "encoding::list")]
    alert_contacts: Vec<RawAlertContact>,
}

impl From<RawLog> for Log {
    fn from(raw: RawLog) -> Self {
        Self {
            log_type: raw.log_type,
            datetime: raw.datetime,
            duration: raw.duration.map(Duration::from_secs),
            alert_contacts: raw.alert_contacts.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawResponseTime {
    #[serde(default, deserialize_with = "encoding::opt_timestamp")]
    datetime: Option<DateTime<Utc>>,
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
    friendly_name: String,
    #[serde(default, deserialize_with = "encoding::text")]
    url: String,
    #[serde(rename = "type")]
    monitor_type: MonitorType,
    #[serde(default, deserialize_with = "encoding::opt_nonzero_code")]
    sub_type: Option<MonitorSubtype>,
    #[serde(default, deserialize_with = "encoding::opt_port")]
    port: Option<u16>,
    #[serde(default, deserialize_with = "encoding::opt_nonzero_code")]
    keyword_type: Option<KeywordType>,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    keyword_value: Option<String>,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    http_username: Option<String>,
    #[serde(default, deserialize_with = "encoding::opt_string")]
    http_password: Option<String>,
    /// Seconds
    #[serde(default, deserialize_with = "encoding::opt_u64")]
    interval: Option<u64>,
    status: MonitorStatus,
    #[serde(default, deserialize_with = "encoding::opt_timestamp")]
    create_datetime: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "encoding::opt_f64")]
    all_time_uptime_ratio: Option<f64>,
    #[serde(default, deserialize_with = "encoding::ratio_list")]
    custom_uptime_ratio: Vec<f64>,
    #[serde(default, deserialize_with = "encoding::list")]
    alert_contacts: Vec<RawAlertContact>,
    #[serde(default, deserialize_with = "encoding::list")]
    logs: Vec<RawLog>,
    #[serde(default, deserialize_with = "encoding::list")]
    response_times: Vec<RawResponseTime>,
}

impl From<RawMonitor> for Monitor {
    fn from(raw: RawMonitor) -> Self {
        Self {
            id: raw.id,
            name: raw.friendly_name,
            url: raw.url,
            monitor_type: raw.monitor_type,
            subtype: raw.sub_type,
            port: raw.port,
            keyword_type: raw.keyword_type,
            keyword_value: raw.keyword_value,
            http_username: raw.http_username,
            http_password: raw.http_password,
            interval: raw.interval.map(Duration::from_secs),
            status: raw.status,
            all_time_uptime_ratio: raw.all_time_uptime_ratio,
            custom_uptime_ratios: raw.custom_uptime_ratio,
            created_at: raw.create_datetime,
            alert_contacts: raw.alert_contacts.into_iter().map(Into::into).collect(),
            logs: raw.logs.into_iter().map(Into::into).collect(),
            response_times: raw.response_times.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
struct Pagination {
    #[serde(default, deserialize_with = "encoding::opt_u64")]
    total: Option<u64>,
}

#[derive(Deserialize)]
struct MonitorsPayload {
    #[serde(default, deserialize_with = "encoding::list")]
    monitors: Vec<RawMonitor>,
    #[serde(default, deserialize_with = "encoding::opt_i32")]
    timezone: Option<i32>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

pub(super) fn decode_monitors(body: &str) -> Result<MonitorList> {
    let payload: MonitorsPayload = parse(body)?;
    Ok(MonitorList {
        monitors: payload.monitors.into_iter().map(Into::into).collect(),
        timezone: payload.timezone,
        total: payload.pagination.and_then(|page| page.total),
    })
}

#[derive(Deserialize)]
struct AlertContactsPayload {
    #[serde(default, deserialize_with = "encoding::list")]
    alert_contacts: Vec<RawAlertContact>,
}

pub(super) fn decode_alert_contacts(body: &str) -> Result<Vec<AlertContact>> {
    let payload: AlertContactsPayload = parse(body)?;
    Ok(payload.alert_contacts.into_iter().map(Into::into).collect())
}

#[derive(Deserialize)]
struct CreatedMonitor {
    #[serde(default, deserialize_with = "encoding::opt_u64")]
    id: Option<u64>,
}

#[derive(Deserialize)]
struct CreatedMonitorPayload {
    #[serde(default)]
    monitor: Option<CreatedMonitor>,
}

pub(super) fn decode_created_monitor(body: &str) -> Result<Option<u64>> {
    let payload: CreatedMonitorPayload = parse(body)?;
    Ok(payload.monitor.and_then(|monitor| monitor.id))
}

#[derive(Deserialize)]
struct CreatedAlertContact {
    #[serde(default, deserialize_with = "encoding::opt_string")]
    id: Option<String>,
}

#[derive(Deserialize)]
struct CreatedAlertContactPayload {
    #[serde(default)]
    alertcontact: Option<CreatedAlertContact>,
}

pub(super) fn decode_created_alert_contact(body: &str) -> Result<Option<String>> {
    let payload: CreatedAlertContactPayload = parse(body)?;
    Ok(payload.alertcontact.and_then(|contact| contact.id))
}
