use thiserror::Error;
use thiserror_ext::Construct;

/// Errors returned by centrifuge-admin library.
#[derive(Error, Debug, Construct)]
pub enum Error {
    /// The secret key used for signing was not supplied or is empty.
    #[error("Centrifuge secret key must be configured")]
    MissingSecretKey,

    /// The project identifier was not supplied or is empty.
    #[error("Centrifuge project id must be configured")]
    MissingProjectId,

    /// Port needs to be in a valid u16 range.
    #[error("Invalid port number, valid u16 value expected and got {0}")]
    InvalidPortNumber(i64),

    /// A configuration value could not be used.
    #[error("Invalid Configuration: {0}")]
    InvalidConfiguration(String),

    /// The HTTP client needed to reach the admin API could not be created.
    #[error("Unable to set up HTTP client: {0}")]
    Setup(String),

    /// The request never produced an HTTP response: connection refused, timed out or the body could not be read.
    #[error("Transport failure: {0}")]
    #[construct(skip)]
    Transport(#[source] reqwest::Error),

    /// The admin API answered with a status other than `200 OK`.
    #[error("Admin API rejected the request with status {status}")]
    RemoteRejection {
        /// HTTP status code returned by the remote service.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The admin API answered `200 OK` but the body is not valid JSON.
    #[error("Malformed admin API response: {0}")]
    #[construct(skip)]
    MalformedResponse(#[source] serde_json::Error),

    /// The admin API answered with JSON that is neither an object nor a list starting with an object.
    #[error("Unexpected admin API response shape: {0}")]
    UnexpectedResponseShape(String),

    // ### Converting from other error types ###
    /// Pass-thru [`std::io::Error`].
    #[error("std::io Error: {0}")]
    #[construct(skip)]
    IOError(#[from] std::io::Error),

    /// Pass-thru `serde_json::Error`.
    #[error("Serde_json Error: {0}")]
    #[construct(skip)]
    SerdeJsonError(#[from] serde_json::Error),

    #[cfg(feature = "parse-cfg")]
    /// Pass-thru `toml::de::Error`.
    #[error("Serde Toml Error: {0}")]
    #[construct(skip)]
    SerdeTomlError(#[from] toml::de::Error),

    /// Pass-thru `url::ParseError`.
    #[error("Url Parse Error: {0}")]
    #[construct(skip)]
    UrlParseError(#[from] url::ParseError),
}

impl Error {
    /// HTTP status carried by a [`Error::RemoteRejection`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteRejection { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the failure happened before any HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    #[test]
    fn constructors_build_expected_variants() {
        let error = Error::invalid_configuration("centrifuge_timeout must be positive");
        assert_eq!(error.to_string(), "Invalid Configuration: centrifuge_timeout must be positive");

        let error = Error::remote_rejection(403u16, "forbidden");
        assert_eq!(error.status(), Some(403));
        assert!(!error.is_transport());
    }

    #[test]
    fn status_is_only_reported_for_rejections() {
        assert_eq!(Error::MissingSecretKey.status(), None);
        assert_eq!(Error::InvalidPortNumber(70000).status(), None);
    }
}
