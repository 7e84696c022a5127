use crate::configuration::ExternalConfig;
use crate::Error;

/// Reads [`ExternalConfig`] from TOML using the `centrifuge_*` keys.
///
/// Keys not belonging to this library are ignored so the settings can live in a shared file.
///
/// ```toml
/// centrifuge_secret_key = "secret"
/// centrifuge_project_id = "project"
/// centrifuge_host = "http://localhost"
/// centrifuge_port = 8000
/// ```
#[derive(Debug)]
pub struct ExternalConfigFileParser;

impl ExternalConfigFileParser {
    /// Parse [`ExternalConfig`] from provided TOML.
    pub fn from(string: &str) -> Result<ExternalConfig, Error> {
        let parsed: ExternalConfig = toml::from_str(string)?;
        Ok(parsed)
    }
}
