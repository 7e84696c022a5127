//! HMAC signatures expected by the Centrifuge server.
//!
//! Two signatures are produced from the project id and secret key:
//! * the socket signature sent with every admin API call, computed over `project_id + data`
//! * the client token a browser presents when connecting, computed over `project_id + user + timestamp [+ info]`

use hmac::{Hmac, Mac};
use md5::Md5;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

type HmacMd5 = Hmac<Md5>;

/// Digest used for HMAC signatures. Centrifuge only accepts `md5`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SigningAlgorithm {
    /// HMAC-MD5, hex encoded.
    #[default]
    Md5,
}

impl SigningAlgorithm {
    /// Identifier of the algorithm as the remote service names it.
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::Md5 => "md5",
        }
    }
}

impl Display for SigningAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes signatures for a single project.
#[derive(Clone)]
pub struct Signer {
    project_id: String,
    secret_key: String,
    algorithm: SigningAlgorithm,
}

impl Signer {
    /// Create a new `Signer` for the project keyed by `secret_key`.
    pub fn new<P: AsRef<str>, K: AsRef<str>>(project_id: P, secret_key: K) -> Self {
        Self {
            project_id: project_id.as_ref().to_string(),
            secret_key: secret_key.as_ref().to_string(),
            algorithm: SigningAlgorithm::default(),
        }
    }

    /// Return the project id every signature is prefixed with.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Return the algorithm in use.
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Sign an encoded admin API payload (the JSON `data` field of a request).
    pub fn socket_auth<S: AsRef<str>>(&self, encoded_data: S) -> String {
        let mut mac = self.mac();
        mac.update(self.project_id.as_bytes());
        mac.update(encoded_data.as_ref().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Create the token a browser client sends to authenticate its connection.
    ///
    /// `custom_data` is appended only when present and neither empty nor `"0"`; those values
    /// sign exactly like no custom data at all.
    pub fn client_token<U: Display, T: Display>(&self, user: U, timestamp: T, custom_data: Option<&str>) -> String {
        let mut mac = self.mac();
        mac.update(self.project_id.as_bytes());
        mac.update(user.to_string().as_bytes());
        mac.update(timestamp.to_string().as_bytes());
        if let Some(info) = custom_data.filter(|info| !info.is_empty() && *info != "0") {
            mac.update(info.as_bytes());
        }
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check a hex signature against `encoded_data` in constant time.
    pub fn verify<S: AsRef<str>>(&self, encoded_data: S, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(self.project_id.as_bytes());
        mac.update(encoded_data.as_ref().as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    fn mac(&self) -> HmacMd5 {
        // HMAC accepts keys of any length, so construction cannot fail.
        match self.algorithm {
            SigningAlgorithm::Md5 => <HmacMd5 as Mac>::new_from_slice(self.secret_key.as_bytes())
                .unwrap_or_else(|_| unreachable!("HMAC key length is unrestricted")),
        }
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("project_id", &self.project_id)
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Signer, SigningAlgorithm};

    // RFC 2104 test vector: HMAC-MD5("Jefe", "what do ya want for nothing?")
    const RFC_2104_DIGEST: &str = "750c783e6ab0b503eaa86e310a5db738";

    #[test]
    fn socket_auth_signs_project_id_followed_by_payload() {
        let signer = Signer::new("what do ya ", "Jefe");
        assert_eq!(signer.socket_auth("want for nothing?"), RFC_2104_DIGEST);
    }

    #[test]
    fn socket_auth_is_deterministic() {
        let signer = Signer::new("project", "secret");
        let payload = r#"{"method":"publish","params":{"channel":"room1","data":{"text":"hi"}}}"#;
        assert_eq!(signer.socket_auth(payload), signer.socket_auth(payload));
        assert_eq!(signer.socket_auth(payload).len(), 32);
    }

    #[test]
    fn client_token_concatenates_user_and_timestamp() {
        let signer = Signer::new("what do ya ", "Jefe");
        assert_eq!(signer.client_token("want for ", "nothing?", None), RFC_2104_DIGEST);
    }

    #[test]
    fn client_token_appends_custom_data_when_present() {
        let signer = Signer::new("what do ya ", "Jefe");
        assert_eq!(signer.client_token("want ", "for ", Some("nothing?")), RFC_2104_DIGEST);
    }

    #[test]
    fn client_token_differs_with_custom_data() {
        let signer = Signer::new("project", "secret");
        let plain = signer.client_token(42, 1_400_000_000, None);
        let custom = signer.client_token(42, 1_400_000_000, Some(r#"{"name":"alice"}"#));
        assert_ne!(plain, custom);
        assert_eq!(plain, signer.client_token("42", "1400000000", None));
    }

    #[test]
    fn empty_custom_data_is_ignored() {
        let signer = Signer::new("project", "secret");
        assert_eq!(signer.client_token("42", "1400000000", Some("")), signer.client_token("42", "1400000000", None));
    }

    #[test]
    fn zero_custom_data_is_ignored() {
        let signer = Signer::new("project", "secret");
        assert_eq!(signer.client_token("42", "1400000000", Some("0")), signer.client_token("42", "1400000000", None));
        assert_ne!(signer.client_token("42", "1400000000", Some("00")), signer.client_token("42", "1400000000", None));
    }

    #[test]
    fn verify_accepts_own_signature_only() {
        let signer = Signer::new("project", "secret");
        let signature = signer.socket_auth("payload");
        assert!(signer.verify("payload", &signature));
        assert!(!signer.verify("other payload", &signature));
        assert!(!signer.verify("payload", "not-hex"));
        assert!(!Signer::new("project", "other secret").verify("payload", &signature));
    }

    #[test]
    fn debug_output_hides_secret() {
        let signer = Signer::new("project", "very-secret");
        let debug = format!("{:?}", signer);
        assert!(debug.contains("project"));
        assert!(!debug.contains("very-secret"));
        assert_eq!(signer.algorithm(), SigningAlgorithm::Md5);
        assert_eq!(signer.algorithm().to_string(), "md5");
    }
}
