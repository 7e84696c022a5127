#[cfg(feature = "parse-cfg")]
pub mod config_file;

use crate::signing::SigningAlgorithm;
use crate::Error;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::time::Duration;
use url::Url;

/// Admin API host used when none is configured.
pub const DEFAULT_HOST: &str = "http://centrifuge.example.com";
/// Admin API port used when none is configured.
pub const DEFAULT_PORT: u16 = 8000;
/// Request timeout in seconds used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_HTTP_PORT: u16 = 80;
const API_PATH_PREFIX: &str = "/api/";

const ENV_SECRET_KEY: &str = "CENTRIFUGE_SECRET_KEY";
const ENV_PROJECT_ID: &str = "CENTRIFUGE_PROJECT_ID";
const ENV_HOST: &str = "CENTRIFUGE_HOST";
const ENV_PORT: &str = "CENTRIFUGE_PORT";
const ENV_URL: &str = "CENTRIFUGE_URL";
const ENV_DEBUG: &str = "CENTRIFUGE_DEBUG";
const ENV_TIMEOUT: &str = "CENTRIFUGE_TIMEOUT";

/// Resolved, immutable settings of an [`AdminClient`][crate::AdminClient].
#[derive(Clone)]
pub struct ClientSettings {
    server: String,
    port: u16,
    project_id: String,
    secret_key: String,
    url_path: String,
    debug: bool,
    timeout: Duration,
    algorithm: SigningAlgorithm,
    endpoint: Url,
}

/// Values passed explicitly by the application when creating a client.
///
/// Any value left unset falls back to the built-in default, and any value the
/// [`ExternalConfig`] supplies takes precedence over what is set here.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SettingsOverrides {
    project_id: Option<String>,
    secret_key: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    url: Option<String>,
    debug: Option<bool>,
    timeout: Option<u64>,
}

/// Settings supplied by the hosting application's configuration source.
///
/// Field names match the host configuration keys. A value that is empty, `0` or `false`
/// counts as not supplied.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct ExternalConfig {
    /// Secret key shared with the Centrifuge server.
    #[serde(default)]
    pub centrifuge_secret_key: Option<String>,
    /// Project identifier.
    #[serde(default)]
    pub centrifuge_project_id: Option<String>,
    /// Server address including scheme.
    #[serde(default)]
    pub centrifuge_host: Option<String>,
    /// Server port.
    #[serde(default)]
    pub centrifuge_port: Option<PortValue>,
    /// Admin API path.
    #[serde(default)]
    pub centrifuge_url: Option<String>,
    /// Debug logging of request and response bodies.
    #[serde(default)]
    pub centrifuge_debug: Option<bool>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub centrifuge_timeout: Option<u64>,
}

/// Port as written in a configuration source, either `8000` or `"8000"`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum PortValue {
    /// Numeric port.
    Number(i64),
    /// Port given as text.
    Text(String),
}

impl PortValue {
    fn to_port(&self) -> Result<Option<u16>, Error> {
        let number = match self {
            PortValue::Number(number) => *number,
            PortValue::Text(text) if text.trim().is_empty() => return Ok(None),
            PortValue::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::invalid_configuration(format!("centrifuge_port '{}' is not a number", text)))?,
        };

        match number {
            0 => Ok(None),
            1..=65535 => Ok(Some(number as u16)),
            _ => Err(Error::InvalidPortNumber(number)),
        }
    }
}

impl SettingsOverrides {
    /// Create a new `SettingsOverrides` with the project id and secret key.
    pub fn new<P: AsRef<str>, K: AsRef<str>>(project_id: P, secret_key: K) -> Self {
        Self {
            project_id: Some(project_id.as_ref().to_string()),
            secret_key: Some(secret_key.as_ref().to_string()),
            ..Default::default()
        }
    }

    /// Set the server, including its scheme (`http://host`).
    pub fn host<S: AsRef<str>>(mut self, host: S) -> Self {
        self.host = Some(host.as_ref().to_string());
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the admin API path.
    pub fn url<S: AsRef<str>>(mut self, url: S) -> Self {
        self.url = Some(url.as_ref().to_string());
        self
    }

    /// Enable or disable debug logging of full request and response bodies.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }
}

impl ExternalConfig {
    /// Parse the host configuration from TOML using the `centrifuge_*` keys.
    #[cfg(feature = "parse-cfg")]
    pub fn from_toml(string: &str) -> Result<Self, Error> {
        config_file::ExternalConfigFileParser::from(string)
    }

    /// Read the host configuration from `CENTRIFUGE_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the host configuration from any key lookup using the upper-case variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let debug = match lookup(ENV_DEBUG) {
            None => None,
            Some(value) => Some(parse_flag(ENV_DEBUG, &value)?),
        };
        let timeout = match lookup(ENV_TIMEOUT).filter(|value| !value.trim().is_empty()) {
            None => None,
            Some(value) => Some(value.trim().parse::<u64>().map_err(|_| {
                Error::invalid_configuration(format!("{} '{}' is not a whole number of seconds", ENV_TIMEOUT, value))
            })?),
        };

        Ok(Self {
            centrifuge_secret_key: lookup(ENV_SECRET_KEY),
            centrifuge_project_id: lookup(ENV_PROJECT_ID),
            centrifuge_host: lookup(ENV_HOST),
            centrifuge_port: lookup(ENV_PORT).map(PortValue::Text),
            centrifuge_url: lookup(ENV_URL),
            centrifuge_debug: debug,
            centrifuge_timeout: timeout,
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(Error::invalid_configuration(format!("{} '{}' is not a boolean", key, value))),
    }
}

fn supplied(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|value| !value.trim().is_empty()).cloned()
}

impl ClientSettings {
    /// Create `ClientSettings` from a project id and secret key with every other value defaulted.
    pub fn new<P: AsRef<str>, K: AsRef<str>>(project_id: P, secret_key: K) -> Result<Self, Error> {
        Self::resolve(&ExternalConfig::default(), SettingsOverrides::new(project_id, secret_key))
    }

    /// Combine the host configuration with explicit values.
    ///
    /// Each value is taken from `external` when supplied there, then from `overrides`, then
    /// from the built-in defaults.
    pub fn resolve(external: &ExternalConfig, overrides: SettingsOverrides) -> Result<Self, Error> {
        let project_id = supplied(&external.centrifuge_project_id)
            .or(supplied(&overrides.project_id))
            .ok_or(Error::MissingProjectId)?;
        let secret_key = supplied(&external.centrifuge_secret_key)
            .or(supplied(&overrides.secret_key))
            .ok_or(Error::MissingSecretKey)?;

        let server = supplied(&external.centrifuge_host)
            .or(supplied(&overrides.host))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let external_port = match &external.centrifuge_port {
            None => None,
            Some(port) => port.to_port()?,
        };
        let port = external_port.or(overrides.port).unwrap_or(DEFAULT_PORT);
        let url_path = supplied(&external.centrifuge_url)
            .or(supplied(&overrides.url))
            .unwrap_or_else(|| format!("{}{}", API_PATH_PREFIX, project_id));
        let debug = external.centrifuge_debug.filter(|debug| *debug).or(overrides.debug).unwrap_or(false);
        let timeout = external
            .centrifuge_timeout
            .filter(|timeout| *timeout > 0)
            .or(overrides.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::validate(&url_path, timeout)?;

        Ok(ClientSettings {
            endpoint: build_endpoint(&server, port, &url_path)?,
            server: server.trim_end_matches('/').to_string(),
            port,
            project_id,
            secret_key,
            url_path,
            debug,
            timeout: Duration::from_secs(timeout),
            algorithm: SigningAlgorithm::Md5,
        })
    }

    /// Return the server, including its scheme.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Return the server port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Return the project id.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Return the secret key.
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Return the admin API path.
    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    /// Return whether debug logging is enabled for every request.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Return the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Return the signing algorithm.
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Return the full admin API URL: `{server}[:{port}]{url_path}`, the port omitted when it is 80.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn validate(url_path: &str, timeout: u64) -> Result<(), Error> {
        if timeout == 0 {
            return Err(Error::invalid_configuration("centrifuge_timeout must be at least one second"));
        }
        if !url_path.starts_with('/') {
            return Err(Error::invalid_configuration(format!("centrifuge_url '{}' must start with '/'", url_path)));
        }
        Ok(())
    }
}

fn build_endpoint(server: &str, port: u16, url_path: &str) -> Result<Url, Error> {
    let server = server.trim_end_matches('/');
    let full_url = match port {
        DEFAULT_HTTP_PORT => format!("{}{}", server, url_path),
        _ => format!("{}:{}{}", server, port, url_path),
    };

    let endpoint = Url::parse(&full_url)?;
    match endpoint.scheme() {
        "http" | "https" if endpoint.has_host() => Ok(endpoint),
        _ => Err(Error::invalid_configuration(format!(
            "centrifuge_host '{}' must be an http:// or https:// address",
            server
        ))),
    }
}

impl Debug for ClientSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("project_id", &self.project_id)
            .field("secret_key", &"<redacted>")
            .field("url_path", &self.url_path)
            .field("debug", &self.debug)
            .field("timeout", &self.timeout)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[cfg(feature = "parse-cfg")]
impl TryFrom<&str> for ExternalConfig {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ExternalConfig::from_toml(value)
    }
}

#[cfg(feature = "parse-cfg")]
impl TryFrom<&str> for ClientSettings {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let external = ExternalConfig::try_from(value)?;
        ClientSettings::resolve(&external, SettingsOverrides::default())
    }
}
