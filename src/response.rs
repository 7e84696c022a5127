//! Decoding of admin API responses.

use crate::Error;
use serde_json::{Map, Value};

/// Key under which the HTTP status is recorded in [`Reply::fields`].
pub const STATUS_KEY: &str = "status";

/// Successful admin API response.
///
/// The server answers either with a JSON object or with a list of per-command objects; in the
/// latter case the first entry describes the command that was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: u16,
    body: String,
    fields: Map<String, Value>,
}

impl Reply {
    /// Decode the body of a `200 OK` response.
    pub fn decode<S: Into<String>>(status: u16, body: S) -> Result<Reply, Error> {
        let body = body.into();
        let value: Value = serde_json::from_str(&body).map_err(Error::MalformedResponse)?;
        let mut fields = match value {
            Value::Object(fields) => fields,
            Value::Array(mut entries) => {
                if entries.is_empty() {
                    return Err(Error::unexpected_response_shape("empty list"));
                }
                match entries.swap_remove(0) {
                    Value::Object(fields) => fields,
                    other => {
                        return Err(Error::unexpected_response_shape(format!(
                            "list entry is {}, expected an object",
                            json_kind(&other)
                        )));
                    }
                }
            }
            other => {
                return Err(Error::unexpected_response_shape(format!("{}, expected an object or list", json_kind(&other))));
            }
        };
        fields.insert(STATUS_KEY.to_string(), Value::from(status));

        Ok(Reply { status, body, fields })
    }

    /// Return the HTTP status.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Return the raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Return the decoded response including the `status` entry.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a single decoded field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Return the error reported by the server for the command, if it reported one.
    pub fn error(&self) -> Option<&Value> {
        self.fields.get("error").filter(|error| !error.is_null())
    }

    /// Consume the `Reply` returning the decoded mapping.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::Reply;
    use crate::Error;
    use serde_json::json;

    #[test]
    fn object_body_gets_status() {
        let reply = Reply::decode(200, r#"{"result":true}"#).unwrap();
        assert_eq!(reply.status(), 200);
        assert_eq!(reply.get("result"), Some(&json!(true)));
        assert_eq!(reply.get("status"), Some(&json!(200)));
        assert!(reply.error().is_none());
    }

    #[test]
    fn list_body_uses_first_entry() {
        let body = r#"[{"method":"publish","error":null,"body":null},{"method":"history"}]"#;
        let reply = Reply::decode(200, body).unwrap();
        assert_eq!(reply.get("method"), Some(&json!("publish")));
        assert_eq!(reply.body(), body);
        assert_eq!(reply.into_map().get("status"), Some(&json!(200)));
    }

    #[test]
    fn remote_error_is_exposed() {
        let reply = Reply::decode(200, r#"[{"method":"publish","error":"namespace not found"}]"#).unwrap();
        assert_eq!(reply.error(), Some(&json!("namespace not found")));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let result = Reply::decode(200, "<html>oops</html>");
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn unexpected_shapes_are_rejected() {
        assert!(matches!(Reply::decode(200, "[]"), Err(Error::UnexpectedResponseShape(_))));
        assert!(matches!(Reply::decode(200, "[1, 2]"), Err(Error::UnexpectedResponseShape(_))));
        assert!(matches!(Reply::decode(200, r#""ok""#), Err(Error::UnexpectedResponseShape(_))));
        assert!(matches!(Reply::decode(200, "null"), Err(Error::UnexpectedResponseShape(_))));
    }
}
