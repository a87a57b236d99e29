//! Adapters: pure mappings from a raw response + parsed body to an envelope
//!
//! The client has to interoperate both with an envelope-aware backend (which
//! wraps payloads in `{data, error, isSuccess, notifications}`) and with
//! arbitrary third-party endpoints that return bare payloads. The adapters
//! normalize both into the same [`Envelope`] without per-call configuration.

use serde_json::Value;

use super::envelope::{Envelope, ErrorInfo, Notification};
use super::response::RawResponse;

/// Which adapter normalizes the response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdapterKind {
    /// Expect the backend's structured `{data, error, isSuccess, ...}` envelope.
    Standard,
    /// Treat the entire body as the payload.
    Raw,
    /// Inspect the body shape and dispatch to Standard or Raw.
    #[default]
    Smart,
}

/// Candidate body shapes, computed once and matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyShape {
    /// A JSON array. Third-party endpoints returning sequences land here.
    Sequence,
    /// An object carrying the backend envelope's `isSuccess` discriminator.
    Enveloped,
    /// Anything else, including protocol failures with unknown bodies.
    Opaque,
}

impl BodyShape {
    fn of(body: &Value) -> Self {
        match body {
            Value::Array(_) => Self::Sequence,
            Value::Object(map) if map.contains_key("isSuccess") => Self::Enveloped,
            _ => Self::Opaque,
        }
    }
}

impl AdapterKind {
    /// Run this adapter. Pure and synchronous; no I/O.
    pub fn adapt(self, raw: &RawResponse, body: Value) -> Envelope {
        match self {
            Self::Standard => adapt_standard(raw, body),
            Self::Raw => adapt_raw(raw, body),
            Self::Smart => match BodyShape::of(&body) {
                BodyShape::Sequence => adapt_raw(raw, body),
                BodyShape::Enveloped => adapt_standard(raw, body),
                BodyShape::Opaque => adapt_raw(raw, body),
            },
        }
    }
}

fn status_message(raw: &RawResponse) -> String {
    raw.status()
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

/// Map the backend's structured envelope onto ours.
fn adapt_standard(raw: &RawResponse, body: Value) -> Envelope {
    let obj = body.as_object();

    let data = obj
        .and_then(|o| o.get("data"))
        .filter(|v| !v.is_null())
        .cloned();

    let is_success = obj
        .and_then(|o| o.get("isSuccess"))
        .and_then(Value::as_bool)
        .unwrap_or_else(|| raw.is_success());

    let error = match obj.and_then(|o| o.get("error")).filter(|v| !v.is_null()) {
        Some(reported) => Some(error_from_reported(reported, raw)),
        None if !raw.is_success() => {
            Some(ErrorInfo::new(raw.status_u16().to_string(), status_message(raw)))
        }
        None => None,
    };

    let notifications = obj
        .and_then(|o| o.get("notifications"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value::<Notification>(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    Envelope::new(
        data,
        error,
        is_success,
        raw.status_u16(),
        raw.headers().clone(),
        notifications,
    )
}

fn error_from_reported(reported: &Value, raw: &RawResponse) -> ErrorInfo {
    match reported {
        Value::Object(map) => {
            let code = match map.get("code") {
                Some(Value::String(code)) => code.clone(),
                Some(Value::Number(code)) => code.to_string(),
                _ => raw.status_u16().to_string(),
            };
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status_message(raw));
            let mut error = ErrorInfo::new(code, message);
            if let Some(details) = map.get("details").filter(|v| !v.is_null()) {
                error = error.with_details(details.clone());
            }
            error
        }
        Value::String(message) => ErrorInfo::new(raw.status_u16().to_string(), message.clone()),
        other => ErrorInfo::new(raw.status_u16().to_string(), status_message(raw))
            .with_details(other.clone()),
    }
}

/// Treat the whole body as the payload, or synthesize an error from the status.
fn adapt_raw(raw: &RawResponse, body: Value) -> Envelope {
    if raw.is_success() {
        let data = if body.is_null() { None } else { Some(body) };
        return Envelope::success(data, raw.status_u16(), raw.headers().clone(), Vec::new());
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| status_message(raw));

    let mut error = ErrorInfo::new(raw.status_u16().to_string(), message);
    if !body.is_null() {
        error = error.with_details(body);
    }

    Envelope::failure(error, raw.status_u16(), raw.headers().clone(), Vec::new())
}
