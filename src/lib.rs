#![warn(missing_docs)]
//! # Centrifuge Admin
//! A blocking client for the HTTP admin API of a Centrifuge real-time messaging server, plus the
//! HMAC signatures used to authenticate admin calls and browser connections.
//!
//! ## Client Example
//! Resolve [`ClientSettings`] from the host configuration and explicit values, then build one
//! [`AdminClient`] and share it with whatever needs to publish.
//!
//! ```
//! use centrifuge_admin::{AdminClient, ClientSettings, Error, ExternalConfig, SettingsOverrides};
//! use serde_json::json;
//!
//! const HOST_TOML_CONFIG: &str = r#"
//!     centrifuge_secret_key = "secret"
//!     centrifuge_project_id = "project"
//!     centrifuge_host = "http://localhost"
//! "#;
//!
//! fn main() -> Result<(), Error> {
//!     let external = ExternalConfig::try_from(HOST_TOML_CONFIG)?;
//!     let settings = ClientSettings::resolve(&external, SettingsOverrides::default().port(8000))?;
//!     let client = AdminClient::new(settings)?;
//!
//!     let reply = client.publish("news", &json!({"text": "hello"}), false)?;
//!     println!("publish answered with status {}", reply.status());
//!
//!     let token = client.get_client_token("42", 1_400_000_000, None);
//!     println!("browser token: {}", token);
//!     Ok(())
//! }
//! ```

mod client;
mod configuration;
mod error;
pub mod event;
pub mod logger;
pub mod response;
pub mod signing;

pub use self::client::AdminClient;
#[cfg(feature = "parse-cfg")]
pub use self::configuration::config_file::ExternalConfigFileParser;
pub use self::configuration::{
    ClientSettings, ExternalConfig, PortValue, SettingsOverrides, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
};
pub use self::error::Error;
pub use self::event::{Event, Method, SignedRequest};
pub use self::response::Reply;

/// Logging target value used for the library.
pub const LIB_LOG_TARGET: &str = "centrifuge_admin";
