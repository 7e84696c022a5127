//! Admin API commands and their signed wire representation.

use crate::signing::Signer;
use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Admin API method names understood by the Centrifuge server.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Send a message into a channel.
    Publish,
    /// Unsubscribe a user from a channel.
    Unsubscribe,
    /// Disconnect all connections of a user.
    Disconnect,
    /// Clients currently subscribed to a channel.
    Presence,
    /// Last messages sent into a channel.
    History,
}

impl Method {
    /// Return the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Publish => "publish",
            Method::Unsubscribe => "unsubscribe",
            Method::Disconnect => "disconnect",
            Method::Presence => "presence",
            Method::History => "history",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(Method::Publish),
            "unsubscribe" => Ok(Method::Unsubscribe),
            "disconnect" => Ok(Method::Disconnect),
            "presence" => Ok(Method::Presence),
            "history" => Ok(Method::History),
            other => Err(Error::invalid_configuration(format!("unknown admin API method '{}'", other))),
        }
    }
}

/// A single admin API command.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Event {
    method: Method,
    params: Map<String, Value>,
}

impl Event {
    /// Create a new `Event` from a method and its parameters.
    pub fn new(method: Method, params: Map<String, Value>) -> Self {
        Self { method, params }
    }

    /// `publish` command carrying `data` into `channel`.
    pub fn publish<S: AsRef<str>, T: Serialize + ?Sized>(channel: S, data: &T) -> Result<Self, Error> {
        let mut params = channel_params(channel);
        params.insert("data".to_string(), serde_json::to_value(data)?);
        Ok(Self::new(Method::Publish, params))
    }

    /// `unsubscribe` command removing `user` from `channel`.
    pub fn unsubscribe<S: AsRef<str>, U: AsRef<str>>(channel: S, user: U) -> Self {
        let mut params = channel_params(channel);
        params.insert("user".to_string(), Value::from(user.as_ref()));
        Self::new(Method::Unsubscribe, params)
    }

    /// `disconnect` command for every connection of `user`.
    pub fn disconnect<U: AsRef<str>>(user: U) -> Self {
        let mut params = Map::new();
        params.insert("user".to_string(), Value::from(user.as_ref()));
        Self::new(Method::Disconnect, params)
    }

    /// `presence` command for `channel`.
    pub fn presence<S: AsRef<str>>(channel: S) -> Self {
        Self::new(Method::Presence, channel_params(channel))
    }

    /// `history` command for `channel`.
    pub fn history<S: AsRef<str>>(channel: S) -> Self {
        Self::new(Method::History, channel_params(channel))
    }

    /// Return the command method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Return the command parameters.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Serialize `Event` to JSON.
    ///
    /// [`Event::sign`] signs exactly the string returned here, which is also the string sent.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode this `Event` and sign it, producing the form fields of an admin API request.
    pub fn sign(&self, signer: &Signer) -> Result<SignedRequest, Error> {
        let data = self.to_json()?;
        let sign = signer.socket_auth(&data);
        Ok(SignedRequest { data, sign })
    }
}

fn channel_params<S: AsRef<str>>(channel: S) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("channel".to_string(), Value::from(channel.as_ref()));
    params
}

/// Form body of an admin API request: the encoded [`Event`] and its signature.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    data: String,
    sign: String,
}

impl SignedRequest {
    /// Return the JSON encoded [`Event`].
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Return the hex signature of [`SignedRequest::data`].
    pub fn sign(&self) -> &str {
        &self.sign
    }
}
