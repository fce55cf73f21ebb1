use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, Method};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::env;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::dialect::{ApiVersion, Operation};
use crate::errors::{Result, UptimeRobotError, ValidationError};
use crate::params::Params;

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_API_KEY: &str = "UPTIMEROBOT_API_KEY";
const ENV_API_VERSION: &str = "UPTIMEROBOT_API_VERSION";
const ENV_API_URL: &str = "UPTIMEROBOT_API_URL";
const ENV_TIMEOUT_SECS: &str = "UPTIMEROBOT_TIMEOUT_SECS";

/// Callback invoked with the vendor method name (e.g. `getMonitors`)
/// right before each request is sent
pub type PreRequestHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Raw copy of the most recent HTTP response, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

/// Client for the UptimeRobot monitoring API
///
/// Monitor, alert contact and account operations are available as methods
/// on this type. Which wire format is spoken is fixed by the
/// [`ApiVersion`] chosen when the client is built.
///
/// # Example
///
/// ```rust,no_run
/// use uptime_robot_api::{ApiVersion, NewMonitor, UptimeRobotClient};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = UptimeRobotClient::builder("u123456-0123456789abcdef")
///         .api_version(ApiVersion::V2)
///         .timeout(Duration::from_secs(10))
///         .build()?;
///
///     let id = client
///         .add_monitor(&NewMonitor::http("Website", "https://example.com"))
///         .await?;
///     println!("created monitor {id}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct UptimeRobotClient {
    client: ClientWithMiddleware,
    api_url: Url,
    api_key: String,
    version: ApiVersion,
    pre_request: Option<PreRequestHook>,
    last_response: Arc<Mutex<Option<LastResponse>>>,
}

impl UptimeRobotClient {
    /// Create a client for the default API version and its public base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be built.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self> {
        Self::builder(api_key).timeout(timeout).build()
    }

    pub fn builder(api_key: &str) -> UptimeRobotClientBuilder {
        UptimeRobotClientBuilder::new(api_key)
    }

    /// Create a new client with a custom reqwest middleware client
    ///
    /// This allows you to add custom middleware (retry, logging, etc.)
    pub fn with_client(
        client: ClientWithMiddleware,
        api_key: &str,
        api_url: Url,
        version: ApiVersion,
    ) -> Self {
        Self {
            client,
            api_url: with_trailing_slash(api_url),
            api_key: api_key.to_string(),
            version,
            pre_request: None,
            last_response: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a client from `UPTIMEROBOT_*` environment variables
    ///
    /// | variable | meaning |
    /// |---|---|
    /// | `UPTIMEROBOT_API_KEY` | API key (required) |
    /// | `UPTIMEROBOT_API_VERSION` | `legacy`, `v1` or `v2` (default `v2`) |
    /// | `UPTIMEROBOT_API_URL` | base URL override |
    /// | `UPTIMEROBOT_TIMEOUT_SECS` | request timeout in seconds (default 30) |
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY).ok_or(ValidationError::MissingField(ENV_API_KEY))?;
        let mut builder = Self::builder(&api_key);

        if let Some(version) = lookup(ENV_API_VERSION) {
            builder = builder.api_version(version.parse::<ApiVersion>()?);
        }

        if let Some(api_url) = lookup(ENV_API_URL) {
            let api_url = Url::parse(&api_url).map_err(UptimeRobotError::InvalidUrl)?;
            builder = builder.api_url(api_url);
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ValidationError::InvalidSetting {
                    name: ENV_TIMEOUT_SECS,
                    value: secs.clone(),
                })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base API URL
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn api_version(&self) -> ApiVersion {
        self.version
    }

    /// The most recent response received by this client or any of its clones
    ///
    /// Concurrent calls overwrite each other's entry.
    pub fn last_response(&self) -> Option<LastResponse> {
        self.last_response
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
    }

    fn remember(&self, response: LastResponse) {
        if let Ok(mut slot) = self.last_response.lock() {
            *slot = Some(response);
        }
    }

    /// Send one vendor call and return the raw body of a 2xx response
    #[instrument(
        name = "UptimeRobotClient::send",
        skip_all,
        fields(method = operation.method_name(), version = %self.version)
    )]
    pub(crate) async fn send(&self, operation: Operation, params: Params) -> Result<String> {
        let method_name = operation.method_name();
        let url = self
            .api_url
            .join(method_name)
            .map_err(UptimeRobotError::InvalidUrl)?;

        let mut request_params = self.version.auth_params(&self.api_key);
        request_params.extend(params);

        if let Some(hook) = &self.pre_request {
            hook(method_name);
        }

        let http_method = self.version.http_method(operation);
        debug!(url = %url, http_method = %http_method, "Sending request to UptimeRobot");

        let request = self
            .client
            .request(http_method.clone(), url)
            .header(ACCEPT, "application/json");
        let request = if http_method == Method::GET {
            request.query(request_params.as_pairs())
        } else {
            request.form(request_params.as_pairs())
        };

        let response = request.send().await.map_err(UptimeRobotError::Request)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(UptimeRobotError::ReadBody)?;

        debug!(status = status.as_u16(), "Received response from UptimeRobot");

        self.remember(LastResponse {
            status: status.as_u16(),
            headers,
            body: body.clone(),
        });

        if !status.is_success() {
            return Err(UptimeRobotError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }

    /// Send one vendor call and fail unless the envelope reports success
    /// or a benign error code
    pub(crate) async fn call(&self, operation: Operation, params: Params) -> Result<String> {
        let body = self.send(operation, params).await?;
        let status = self.version.decode_status(&body)?;

        if status.ok {
            return Ok(body);
        }

        let code = status.code.unwrap_or_default();
        if self.version.is_benign_error(&code) {
            debug!(code = %code, "Ignoring benign UptimeRobot error");
            return Ok(body);
        }

        Err(UptimeRobotError::Api {
            code,
            message: status.message.unwrap_or_default(),
        })
    }
}

impl Debug for UptimeRobotClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UptimeRobotClient")
            .field("api_url", &self.api_url.as_str())
            .field("api_version", &self.version)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Builder for [`UptimeRobotClient`]
pub struct UptimeRobotClientBuilder {
    api_key: String,
    version: ApiVersion,
    api_url: Option<Url>,
    timeout: Duration,
    client: Option<ClientWithMiddleware>,
    pre_request: Option<PreRequestHook>,
}

impl UptimeRobotClientBuilder {
    fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            version: ApiVersion::default(),
            api_url: None,
            timeout: DEFAULT_TIMEOUT,
            client: None,
            pre_request: None,
        }
    }

    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    /// Override the version's public base URL (proxies, tests)
    pub fn api_url(mut self, api_url: Url) -> Self {
        self.api_url = Some(api_url);
        self
    }

    /// Ignored when a custom HTTP client is supplied
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.client = Some(client);
        self
    }

    pub fn pre_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.pre_request = Some(Arc::new(hook));
        self
    }

    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be built.
    pub fn build(self) -> Result<UptimeRobotClient> {
        if self.api_key.trim().is_empty() {
            return Err(ValidationError::EmptyApiKey.into());
        }

        let client = match self.client {
            Some(client) => client,
            None => {
                let client = Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(UptimeRobotError::BuildHttpClient)?;
                ClientBuilder::new(client).build()
            }
        };

        let api_url = self
            .api_url
            .unwrap_or_else(|| self.version.default_base_url());

        let mut client =
            UptimeRobotClient::with_client(client, &self.api_key, api_url, self.version);
        client.pre_request = self.pre_request;
        Ok(client)
    }
}

/// `Url::join` replaces the last segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
