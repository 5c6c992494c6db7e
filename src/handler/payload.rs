//! Request input decoding
//!
//! Query strings and request bodies, decoded the way a browser form or a
//! JSON client would expect. Decoding is permissive: a field that is not
//! supplied is reported as absent, never as an error.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading or decoding a request body
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("failed to read request body: {0}")]
    Read(String),

    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON payload must be an object or an array")]
    UnexpectedJson,
}

/// Read the whole body, failing once it grows past `limit` bytes
pub async fn read_body<B>(body: B, limit: u64) -> Result<Bytes, PayloadError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let max = usize::try_from(limit).unwrap_or(usize::MAX);
    match Limited::new(body, max).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(PayloadError::TooLarge { limit })
        }
        Err(e) => Err(PayloadError::Read(e.to_string())),
    }
}

/// Decoded `application/x-www-form-urlencoded` pairs, in input order
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// Value of `key`; repeated keys are joined with `,`
    pub fn get(&self, key: &str) -> Option<String> {
        let values: Vec<&str> = self
            .pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(","))
        }
    }

    /// Key/value object, used for trace logging
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (key, _) in &self.pairs {
            if !object.contains_key(key) {
                if let Some(value) = self.get(key) {
                    object.insert(key.clone(), Value::String(value));
                }
            }
        }
        Value::Object(object)
    }
}

/// How a body should be decoded, from its `Content-Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Ignored,
}

impl BodyKind {
    fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return Self::Ignored;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime == "application/json" {
            Self::Json
        } else if mime == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Ignored
        }
    }
}

/// Decoded request body
#[derive(Debug, Clone)]
pub struct Payload {
    value: Value,
}

impl Payload {
    pub fn empty() -> Self {
        Self {
            value: Value::Object(Map::new()),
        }
    }

    /// Decode a body according to its content type
    ///
    /// Only `application/json` is read as JSON; other types, including
    /// `+json` suffixes, decode to an empty payload. An empty JSON body is
    /// an empty object.
    pub fn decode(content_type: Option<&str>, body: &[u8]) -> Result<Self, PayloadError> {
        match BodyKind::from_content_type(content_type) {
            BodyKind::Json => {
                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self::empty());
                }
                let value: Value = serde_json::from_slice(body)?;
                if value.is_object() || value.is_array() {
                    Ok(Self { value })
                } else {
                    Err(PayloadError::UnexpectedJson)
                }
            }
            BodyKind::Form => {
                let query = String::from_utf8_lossy(body);
                Ok(Self {
                    value: QueryParams::parse(Some(&query)).to_json(),
                })
            }
            BodyKind::Ignored => Ok(Self::empty()),
        }
    }

    /// Field `key` exactly as sent, `null` when it was not supplied
    ///
    /// Fields of an array body are never present.
    pub fn field(&self, key: &str) -> Value {
        self.value.get(key).cloned().unwrap_or(Value::Null)
    }

    pub const fn as_json(&self) -> &Value {
        &self.value
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    #[test]
    fn test_query_decoding() {
        let query = QueryParams::parse(Some("firstName=Timmy&lastName=Turner%20Jr&nick=a+b"));
        assert_eq!(query.get("firstName").as_deref(), Some("Timmy"));
        assert_eq!(query.get("lastName").as_deref(), Some("Turner Jr"));
        assert_eq!(query.get("nick").as_deref(), Some("a b"));
        assert_eq!(query.get("missing"), None);
    }

    #[test]
    fn test_query_empty_and_repeated() {
        let query = QueryParams::parse(Some("firstName=&lastName=a&lastName=b"));
        assert_eq!(query.get("firstName").as_deref(), Some(""));
        assert_eq!(query.get("lastName").as_deref(), Some("a,b"));
        assert_eq!(
            query.to_json(),
            serde_json::json!({ "firstName": "", "lastName": "a,b" })
        );
    }

    #[test]
    fn test_query_absent() {
        let query = QueryParams::parse(None);
        assert_eq!(query.get("firstName"), None);
        assert_eq!(query.to_json(), serde_json::json!({}));
    }

    #[test]
    fn test_decode_json_fields_kept_as_sent() {
        let payload = Payload::decode(
            Some("application/json; charset=utf-8"),
            br#"{"title":"Inception","year":2010,"seen":null}"#,
        )
        .unwrap();
        assert_eq!(payload.field("title"), Value::from("Inception"));
        assert_eq!(payload.field("year"), Value::from(2010));
        assert_eq!(payload.field("seen"), Value::Null);
        assert_eq!(payload.field("missing"), Value::Null);
    }

    #[test]
    fn test_decode_json_array_has_no_fields() {
        let payload = Payload::decode(Some("application/json"), b"[\"Inception\"]").unwrap();
        assert!(payload.as_json().is_array());
        assert_eq!(payload.field("title"), Value::Null);
    }

    #[test]
    fn test_decode_empty_json_body() {
        let payload = Payload::decode(Some("application/json"), b"  ").unwrap();
        assert_eq!(payload.as_json(), &serde_json::json!({}));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = Payload::decode(Some("application/json"), b"{title:").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidJson(_)));

        let err = Payload::decode(Some("application/json"), b"\"Inception\"").unwrap_err();
        assert!(matches!(err, PayloadError::UnexpectedJson));
    }

    #[test]
    fn test_decode_form_body() {
        let payload = Payload::decode(
            Some("application/x-www-form-urlencoded"),
            b"title=The+Matrix&newTitle=The%20Matrix%20Reloaded",
        )
        .unwrap();
        assert_eq!(payload.field("title"), Value::from("The Matrix"));
        assert_eq!(payload.field("newTitle"), Value::from("The Matrix Reloaded"));
    }

    #[test]
    fn test_decode_other_content_types_ignored() {
        let payload = Payload::decode(Some("text/plain"), br#"{"title":"Up"}"#).unwrap();
        assert_eq!(payload.field("title"), Value::Null);

        let payload = Payload::decode(None, br#"{"title":"Up"}"#).unwrap();
        assert_eq!(payload.field("title"), Value::Null);

        // Structured-syntax suffixes are not plain JSON
        let payload = Payload::decode(Some("application/vnd.api+json"), br#"{"title":"Up"}"#).unwrap();
        assert_eq!(payload.field("title"), Value::Null);
    }

    #[tokio::test]
    async fn test_read_body_within_limit() {
        let bytes = read_body(Full::new(Bytes::from("hello")), 5).await.unwrap();
        assert_eq!(bytes, Bytes::from("hello"));
    }

    #[tokio::test]
    async fn test_read_body_over_limit() {
        let err = read_body(Full::new(Bytes::from("hello!")), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, PayloadError::TooLarge { limit: 5 }));
        assert_eq!(err.to_string(), "request body exceeds 5 bytes");
    }
}
