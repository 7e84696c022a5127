use crate::configuration::ClientSettings;
use crate::event::{Event, Method};
use crate::logger::{Logger, TracingLogger};
use crate::response::Reply;
use crate::signing::Signer;
use crate::{Error, LIB_LOG_TARGET};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Blocking client for the Centrifuge admin API.
///
/// Every call performs exactly one HTTP request bounded by the configured timeout. Settings
/// are fixed at construction, so a single client can be shared between threads.
#[derive(Debug)]
pub struct AdminClient {
    settings: ClientSettings,
    signer: Signer,
    http: Client,
    logger: Box<dyn Logger>,
}

impl AdminClient {
    /// Create a new `AdminClient` that traces through [`tracing`].
    pub fn new(settings: ClientSettings) -> Result<Self, Error> {
        Self::with_logger(settings, TracingLogger)
    }

    /// Create a new `AdminClient` reporting request and response details to `logger`.
    pub fn with_logger<L: Logger + 'static>(settings: ClientSettings, logger: L) -> Result<Self, Error> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|error| Error::setup(error.to_string()))?;
        let signer = Signer::new(settings.project_id(), settings.secret_key());
        debug!(target: LIB_LOG_TARGET, "Admin client ready for {}", settings.endpoint());

        Ok(Self { settings, signer, http, logger: Box::new(logger) })
    }

    /// Return the settings this client was built with.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Return the [`Signer`] for this project.
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Sign an encoded admin API payload.
    pub fn socket_auth<S: AsRef<str>>(&self, encoded_data: S) -> String {
        self.signer.socket_auth(encoded_data)
    }

    /// Create the connection token for a browser client.
    pub fn get_client_token<U: Display, T: Display>(&self, user: U, timestamp: T, custom_data: Option<&str>) -> String {
        self.signer.client_token(user, timestamp, custom_data)
    }

    /// Send a message into `channel`.
    ///
    /// `debug` has the same meaning for this and the other admin operations as in [`AdminClient::trigger`].
    pub fn publish<S: AsRef<str>, T: Serialize + ?Sized>(&self, channel: S, data: &T, debug: bool) -> Result<Reply, Error> {
        self.trigger(&Event::publish(channel, data)?, debug)
    }

    /// Unsubscribe `user` from `channel`.
    pub fn unsubscribe<S: AsRef<str>, U: AsRef<str>>(&self, channel: S, user: U, debug: bool) -> Result<Reply, Error> {
        self.trigger(&Event::unsubscribe(channel, user), debug)
    }

    /// Disconnect every connection of `user`.
    pub fn disconnect<U: AsRef<str>>(&self, user: U, debug: bool) -> Result<Reply, Error> {
        self.trigger(&Event::disconnect(user), debug)
    }

    /// Return the clients currently subscribed to `channel`.
    pub fn presence<S: AsRef<str>>(&self, channel: S, debug: bool) -> Result<Reply, Error> {
        self.trigger(&Event::presence(channel), debug)
    }

    /// Return the last messages sent into `channel`.
    pub fn history<S: AsRef<str>>(&self, channel: S, debug: bool) -> Result<Reply, Error> {
        self.trigger(&Event::history(channel), debug)
    }

    /// Sign and send `event`, decoding the server's answer.
    ///
    /// `debug` logs the full request and response bodies for this call even when the client
    /// settings leave debug off. A status other than `200 OK` is returned as
    /// [`Error::RemoteRejection`].
    pub fn trigger(&self, event: &Event, debug: bool) -> Result<Reply, Error> {
        let debug = debug || self.settings.debug();
        let url = self.settings.endpoint();
        let request = event.sign(&self.signer)?;

        self.logger.log(format!("POST {} method={}", url, event.method()).as_str());
        if debug {
            self.logger.log(format!("trigger POST: data={}&sign={}", request.data(), request.sign()).as_str());
        }

        let response = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(&request)
            .send()
            .map_err(|error| self.transport_failure(event.method(), error))?;

        let status = response.status();
        let body = response.text().map_err(|error| self.transport_failure(event.method(), error))?;

        self.logger.log(format!("response status={} method={}", status.as_u16(), event.method()).as_str());
        if debug {
            self.logger.log(format!("response body: {}", body).as_str());
        }

        if status != StatusCode::OK {
            debug!(target: LIB_LOG_TARGET, "Admin API rejected {} with status {}", event.method(), status);
            return Err(Error::RemoteRejection { status: status.as_u16(), body });
        }
        Reply::decode(status.as_u16(), body)
    }

    fn transport_failure(&self, method: Method, error: reqwest::Error) -> Error {
        warn!(target: LIB_LOG_TARGET, "Admin API {} request to {} failed: {}", method, self.settings.endpoint(), error);
        self.logger.log(format!("transport failure: {}", error).as_str());
        Error::Transport(error)
    }
}
