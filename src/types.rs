use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use url::Url;

/// Declares an enum that travels as a numeric vendor code.
///
/// Codes without a named variant are kept in `Other` so a newer vendor
/// release cannot break decoding of a whole response.
macro_rules! vendor_code {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $code:literal => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
            /// Code not known to this crate
            Other(u16),
        }

        impl $name {
            /// Numeric code used on the wire
            pub fn code(self) -> u16 {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Other(code) => code,
                }
            }
        }

        impl From<u16> for $name {
            fn from(code: u16) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    other => Self::Other(other),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $label),)+
                    Self::Other(code) => write!(f, "unknown ({code})"),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u16(self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                crate::encoding::code(deserializer).map(Self::from)
            }
        }
    };
}

vendor_code! {
    /// What a monitor checks
    pub enum MonitorType {
        Http = 1 => "HTTP(s)",
        Keyword = 2 => "Keyword",
        Ping = 3 => "Ping",
        Port = 4 => "Port",
    }
}

vendor_code! {
    /// Predefined service (or custom port) watched by a port monitor
    pub enum MonitorSubtype {
        Http = 1 => "HTTP",
        Https = 2 => "HTTPS",
        Ftp = 3 => "FTP",
        Smtp = 4 => "SMTP",
        Pop3 = 5 => "POP3",
        Imap = 6 => "IMAP",
        Custom = 99 => "Custom port",
    }
}

vendor_code! {
    /// Whether a keyword monitor is down when the keyword exists or when it is missing
    pub enum KeywordType {
        Exists = 1 => "exists",
        NotExists = 2 => "not exists",
    }
}

vendor_code! {
    /// Monitor state as reported by UptimeRobot
    pub enum MonitorStatus {
        Paused = 0 => "paused",
        NotChecked = 1 => "not checked yet",
        Up = 2 => "up",
        SeemsDown = 8 => "seems down",
        Down = 9 => "down",
    }
}

vendor_code! {
    /// Notification channel of an alert contact
    pub enum AlertContactType {
        Sms = 1 => "SMS",
        Email = 2 => "E-mail",
        Twitter = 3 => "Twitter DM",
        Boxcar = 4 => "Boxcar",
        WebHook = 5 => "Web-Hook",
    }
}

vendor_code! {
    /// Activation state of an alert contact
    pub enum AlertContactStatus {
        NotActivated = 0 => "not activated",
        Paused = 1 => "paused",
        Active = 2 => "active",
    }
}

vendor_code! {
    /// Kind of event recorded in a monitor log
    pub enum LogType {
        Down = 1 => "down",
        Up = 2 => "up",
        Started = 98 => "started",
        Paused = 99 => "paused",
    }
}

/// A monitored endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Monitor {
    pub id: u64,

    /// Friendly name shown in the dashboard
    pub name: String,

    /// Target URL, or host/IP for ping and port monitors
    pub url: String,

    pub monitor_type: MonitorType,

    /// Only set for port monitors
    pub subtype: Option<MonitorSubtype>,

    /// Only set for custom-port monitors
    pub port: Option<u16>,

    pub keyword_type: Option<KeywordType>,
    pub keyword_value: Option<String>,

    pub http_username: Option<String>,
    pub http_password: Option<String>,

    /// Check interval
    pub interval: Option<Duration>,

    pub status: MonitorStatus,

    /// Uptime ratio since the monitor was created, in percent
    pub all_time_uptime_ratio: Option<f64>,

    /// Uptime ratios for the periods requested via
    /// [`MonitorQuery::with_custom_uptime_ratio`](crate::MonitorQuery::with_custom_uptime_ratio)
    pub custom_uptime_ratios: Vec<f64>,

    /// Creation time (v2 API only)
    pub created_at: Option<DateTime<Utc>>,

    /// Alert contacts notified for this monitor
    pub alert_contacts: Vec<AlertContact>,

    pub logs: Vec<Log>,

    pub response_times: Vec<ResponseTime>,
}

impl Monitor {
    /// The target as a parsed URL, if it is one (ping and port targets
    /// are usually bare hosts)
    pub fn target_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }

    pub fn is_up(&self) -> bool {
        self.status == MonitorStatus::Up
    }

    pub fn is_paused(&self) -> bool {
        self.status == MonitorStatus::Paused
    }
}

/// A notification channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertContact {
    /// Vendor id; leading zeros are significant
    pub id: String,

    pub contact_type: AlertContactType,

    /// E-mail address, phone number, handle or URL, depending on the type
    pub value: String,

    pub status: Option<AlertContactStatus>,

    /// Friendly name (v2 API only)
    pub friendly_name: Option<String>,
}

impl AlertContact {
    /// The account's main contact has an id starting with `0` and cannot be deleted
    pub fn is_main(&self) -> bool {
        is_main_alert_contact(&self.id)
    }
}

pub(crate) fn is_main_alert_contact(id: &str) -> bool {
    id.starts_with('0')
}

/// A monitor log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Log {
    pub log_type: LogType,
    pub datetime: Option<DateTime<Utc>>,

    /// How long the state lasted (v2 API only)
    pub duration: Option<Duration>,

    /// Alert contacts notified for this event
    pub alert_contacts: Vec<AlertContact>,
}

/// A response time sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseTime {
    pub datetime: Option<DateTime<Utc>>,

    /// Response time in milliseconds
    pub value: u64,
}

impl ResponseTime {
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.value)
    }
}

/// Result of a `getMonitors` call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonitorList {
    pub monitors: Vec<Monitor>,

    /// Account timezone offset in minutes, when requested
    pub timezone: Option<i32>,

    /// Total number of monitors on the account
    pub total: Option<u64>,
}
