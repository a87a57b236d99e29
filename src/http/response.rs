//! Raw transport response and body parsing

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde_json::Value;

/// A received transport response: status, headers, and the raw body bytes.
///
/// This is the committed final attempt's response, before adaptation. It is
/// internal to the pipeline — interceptors and callers only ever see the
/// [`Envelope`](crate::Envelope) produced from it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    /// Create a raw response from transport parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the status code as the wire integer.
    pub fn status_u16(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether the response is a protocol-level success (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    fn declares_json(&self) -> bool {
        self.content_type().is_some_and(|ct| {
            let essence = ct.split(';').next().unwrap_or(ct).trim();
            essence == "application/json" || essence.ends_with("+json")
        })
    }

    fn has_no_content(&self) -> bool {
        self.status == StatusCode::NO_CONTENT
            || self.status == StatusCode::RESET_CONTENT
            || self.status == StatusCode::NOT_MODIFIED
            || self.body.is_empty()
    }

    /// Parse the body by its declared content type.
    ///
    /// Structured (`application/json` or any `+json` media type) bodies parse
    /// to a JSON value; everything else is treated as opaque text. Parsing is
    /// skipped entirely for no-content statuses and empty bodies. A body that
    /// declares JSON but fails to parse falls back to the opaque-text path.
    pub fn parse_body(&self) -> Value {
        if self.has_no_content() {
            return Value::Null;
        }
        if self.declares_json() {
            match serde_json::from_slice(&self.body) {
                Ok(value) => return value,
                Err(err) => {
                    tracing::debug!(error = %err, "declared-JSON body failed to parse, treating as text");
                }
            }
        }
        Value::String(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );
        headers
    }

    #[test]
    fn test_parse_json_body() {
        let raw = RawResponse::new(
            StatusCode::OK,
            json_headers(),
            Bytes::from_static(br#"{"id": 1}"#),
        );
        assert_eq!(raw.parse_body(), json!({"id": 1}));
    }

    #[test]
    fn test_parse_json_suffix_media_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            "application/problem+json; charset=utf-8".parse().unwrap(),
        );
        let raw = RawResponse::new(
            StatusCode::NOT_FOUND,
            headers,
            Bytes::from_static(br#"{"message": "gone"}"#),
        );
        assert_eq!(raw.parse_body(), json!({"message": "gone"}));
    }

    #[test]
    fn test_parse_text_body() {
        let raw = RawResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from_static(b"plain payload"),
        );
        assert_eq!(raw.parse_body(), Value::String("plain payload".into()));
    }

    #[test]
    fn test_malformed_json_falls_back_to_text() {
        let raw = RawResponse::new(
            StatusCode::OK,
            json_headers(),
            Bytes::from_static(b"{broken"),
        );
        assert_eq!(raw.parse_body(), Value::String("{broken".into()));
    }

    #[test]
    fn test_no_content_skips_parsing() {
        let raw = RawResponse::new(StatusCode::NO_CONTENT, json_headers(), Bytes::new());
        assert_eq!(raw.parse_body(), Value::Null);

        let empty = RawResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::new());
        assert_eq!(empty.parse_body(), Value::Null);
    }
}
