use tracing::{debug, instrument};

use crate::client::UptimeRobotClient;
use crate::dialect::Operation;
use crate::errors::{Result, UptimeRobotError};
use crate::params::{MonitorQuery, MonitorUpdate, NewMonitor};
use crate::types::{Monitor, MonitorList};

impl UptimeRobotClient {
    /// List every monitor on the account
    ///
    /// An account without monitors yields an empty list, not an error.
    #[instrument(name = "UptimeRobotClient::list_monitors", skip_all)]
    pub async fn list_monitors(&self) -> Result<Vec<Monitor>> {
        Ok(self.get_monitors(&MonitorQuery::new()).await?.monitors)
    }

    /// Fetch monitors with the options in `query`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP request fails or returns a non-success status code
    /// - UptimeRobot reports a failure
    /// - The response cannot be decoded
    #[instrument(
        name = "UptimeRobotClient::get_monitors",
        skip_all,
        fields(monitor_ids = query.monitor_ids.len())
    )]
    pub async fn get_monitors(&self, query: &MonitorQuery) -> Result<MonitorList> {
        let version = self.api_version();
        let body = self
            .call(Operation::GetMonitors, version.monitor_query_params(query))
            .await?;

        let list = version.decode_monitors(&body)?;
        debug!(monitor_count = list.monitors.len(), "Fetched monitors");
        Ok(list)
    }

    /// Fetch a single monitor, or `None` if the account has no such monitor
    #[instrument(name = "UptimeRobotClient::get_monitor", skip_all, fields(monitor_id = id))]
    pub async fn get_monitor(&self, id: u64) -> Result<Option<Monitor>> {
        let list = self
            .get_monitors(&MonitorQuery::new().with_monitor(id))
            .await?;
        Ok(list.monitors.into_iter().find(|monitor| monitor.id == id))
    }

    /// Create a monitor and return its id
    ///
    /// The monitor is validated locally first; an invalid monitor is
    /// rejected without contacting UptimeRobot.
    #[instrument(
        name = "UptimeRobotClient::add_monitor",
        skip_all,
        fields(monitor_type = %monitor.monitor_type)
    )]
    pub async fn add_monitor(&self, monitor: &NewMonitor) -> Result<u64> {
        monitor.validate()?;

        let version = self.api_version();
        let body = self
            .call(Operation::NewMonitor, version.new_monitor_params(monitor))
            .await?;

        let id = version.decode_created_monitor(&body)?.ok_or_else(|| {
            UptimeRobotError::UnexpectedResponse("newMonitor returned no monitor id".to_string())
        })?;

        debug!(monitor_id = id, "Monitor created");
        Ok(id)
    }

    /// Apply `update` to an existing monitor
    #[instrument(
        name = "UptimeRobotClient::modify_monitor",
        skip_all,
        fields(monitor_id = update.id)
    )]
    pub async fn modify_monitor(&self, update: &MonitorUpdate) -> Result<()> {
        let version = self.api_version();
        self.call(Operation::EditMonitor, version.edit_monitor_params(update))
            .await?;

        debug!("Monitor updated");
        Ok(())
    }

    #[instrument(name = "UptimeRobotClient::delete_monitor", skip_all, fields(monitor_id = id))]
    pub async fn delete_monitor(&self, id: u64) -> Result<()> {
        let version = self.api_version();
        self.call(Operation::DeleteMonitor, version.delete_monitor_params(id))
            .await?;

        debug!("Monitor deleted");
        Ok(())
    }
}
