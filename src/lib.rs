//! # UptimeRobot API
//!
//! A Rust client library for the [UptimeRobot](https://uptimerobot.com/) monitoring API.
//!
//! ## Features
//!
//! - List, create, edit and delete monitors (HTTP, keyword, ping and port)
//! - List, create and delete alert contacts
//! - Check e-mail availability and register accounts
//! - Speaks both the legacy API and the `/v2/` API, chosen per client
//! - Input is validated locally before any request is sent
//!
//! ## Example
//!
//! ```rust,no_run
//! use uptime_robot_api::{ApiVersion, MonitorQuery, NewMonitor, UptimeRobotClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UptimeRobotClient::builder("u123456-0123456789abcdef")
//!         .api_version(ApiVersion::V2)
//!         .timeout(Duration::from_secs(10))
//!         .build()?;
//!
//!     let monitor = NewMonitor::http("Website", "https://example.com")
//!         .with_interval(Duration::from_secs(300));
//!     let id = client.add_monitor(&monitor).await?;
//!
//!     let list = client
//!         .get_monitors(&MonitorQuery::new().with_monitor(id).with_logs(true))
//!         .await?;
//!     for monitor in list.monitors {
//!         println!("{} is {}", monitor.name, monitor.status);
//!     }
//!     Ok(())
//! }
//! ```

mod account;
mod alert_contacts;
mod client;
mod dialect;
mod encoding;
mod errors;
mod monitors;
mod params;
mod types;

pub use client::{
    LastResponse, PreRequestHook, UptimeRobotClient, UptimeRobotClientBuilder, DEFAULT_TIMEOUT,
};
pub use dialect::ApiVersion;
pub use errors::{Result, UptimeRobotError, ValidationError};
pub use params::{MonitorQuery, MonitorUpdate, NewAlertContact, NewMonitor};
pub use types::{
    AlertContact, AlertContactStatus, AlertContactType, KeywordType, Log, LogType, Monitor,
    MonitorList, MonitorStatus, MonitorSubtype, MonitorType, ResponseTime,
};
