//! The uniform response envelope every request resolves to
//!
//! Regardless of transport outcome — success, server error, network failure,
//! or cancellation — a request produces exactly one [`Envelope`]. Callers
//! branch on [`Envelope::is_success`] and [`ErrorInfo::code`] instead of
//! catching exceptions.

use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The uniform result shape every request resolves to.
///
/// An envelope is immutable once produced: response interceptors receive it
/// by value and return a (possibly new) envelope rather than mutating shared
/// state. Two invariants hold for every envelope this crate constructs:
///
/// - `is_success == true` implies `error == None`
/// - `status == 0` (no response was ever received) implies `is_success == false`
///
/// [`Envelope::new`] normalizes its inputs so the invariants cannot be
/// violated by adapter or interceptor code.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T = Value> {
    /// Decoded payload on success, `None` otherwise.
    pub data: Option<T>,
    /// Present iff the call is not considered successful.
    pub error: Option<ErrorInfo>,
    /// Single source of truth for success.
    pub is_success: bool,
    /// Protocol status code; `0` when no response was ever received.
    pub status: u16,
    /// Response metadata; empty when no response was received.
    pub headers: HeaderMap,
    /// Server-declared side messages, independent of `is_success`.
    pub notifications: Vec<Notification>,
}

/// Error details carried by a non-success envelope.
///
/// `code` is one of: a stringified protocol status code (server-reported
/// failure), [`ErrorInfo::NETWORK_ERROR`], or [`ErrorInfo::REQUEST_ABORTED`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable error code callers branch on.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Whatever error-shaped payload the server sent, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorInfo {
    /// The transport failed before any response existed.
    pub const NETWORK_ERROR: &'static str = "NETWORK_ERROR";

    /// The cancellation signal fired.
    pub const REQUEST_ABORTED: &'static str = "REQUEST_ABORTED";

    /// Create an error with a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach the server's error payload.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Whether this error represents a fired cancellation signal.
    pub fn is_aborted(&self) -> bool {
        self.code == Self::REQUEST_ABORTED
    }
}

/// A server-declared side message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity/category declared by the server.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Message text to surface.
    pub message: String,
    /// Optional machine-readable code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Notification severity, matching the sink's `notify(kind, message)` surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Positive confirmation.
    Success,
    /// Failure the user should see.
    Error,
    /// Neutral information.
    Info,
    /// Non-fatal problem.
    Warning,
}

impl<T> Envelope<T> {
    /// Assemble an envelope, normalizing the inputs so the invariants hold.
    ///
    /// A successful envelope never carries an error, and a `status` of `0`
    /// never reports success.
    pub fn new(
        data: Option<T>,
        error: Option<ErrorInfo>,
        is_success: bool,
        status: u16,
        headers: HeaderMap,
        notifications: Vec<Notification>,
    ) -> Self {
        let is_success = is_success && status != 0;
        let error = if is_success { None } else { error };
        Self {
            data,
            error,
            is_success,
            status,
            headers,
            notifications,
        }
    }

    /// A successful envelope carrying a payload.
    pub fn success(
        data: Option<T>,
        status: u16,
        headers: HeaderMap,
        notifications: Vec<Notification>,
    ) -> Self {
        Self::new(data, None, true, status, headers, notifications)
    }

    /// A failed envelope for a received, non-success response.
    pub fn failure(
        error: ErrorInfo,
        status: u16,
        headers: HeaderMap,
        notifications: Vec<Notification>,
    ) -> Self {
        Self::new(None, Some(error), false, status, headers, notifications)
    }

    /// The transport failed before a response existed. `status` is `0`.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::new(
            None,
            Some(ErrorInfo::new(ErrorInfo::NETWORK_ERROR, message)),
            false,
            0,
            HeaderMap::new(),
            Vec::new(),
        )
    }

    /// The cancellation signal fired. `status` is `0`.
    pub fn aborted() -> Self {
        Self::new(
            None,
            Some(ErrorInfo::new(
                ErrorInfo::REQUEST_ABORTED,
                "request was aborted",
            )),
            false,
            0,
            HeaderMap::new(),
            Vec::new(),
        )
    }

    /// The error code, if the envelope carries an error.
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }

    /// Whether this envelope reports a fired cancellation signal.
    pub fn is_aborted(&self) -> bool {
        self.error.as_ref().is_some_and(ErrorInfo::is_aborted)
    }
}

impl Envelope<Value> {
    /// Decode the payload into a concrete type.
    ///
    /// A payload that does not match `T` yields `data == None` with a warning
    /// log; the success flags and error field are left untouched, so the
    /// error taxonomy is not extended by decode mismatches.
    pub fn into_typed<T: DeserializeOwned>(self) -> Envelope<T> {
        let data = match self.data {
            Some(value) => match serde_json::from_value::<T>(value) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    tracing::warn!(error = %err, "response payload did not match the requested type");
                    None
                }
            },
            None => None,
        };
        Envelope {
            data,
            error: self.error,
            is_success: self.is_success,
            status: self.status,
            headers: self.headers,
            notifications: self.notifications,
        }
    }
}
