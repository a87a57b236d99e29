//! Client and per-request configuration

use std::time::Duration;

use http::{HeaderMap, Method};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::http::{AdapterKind, RequestBody};

/// Configuration for constructing an [`HttpClient`](crate::HttpClient).
///
/// Everything here is a default that per-request configuration can override.
/// The client holds no other state, so one configured instance serves the
/// whole process.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that relative endpoints are resolved against.
    pub base_url: Option<String>,

    /// Headers included with every request.
    pub default_headers: HeaderMap,

    /// Adapter used when a request does not select one.
    pub default_adapter: AdapterKind,

    /// Additional attempts beyond the first, when a request does not override.
    pub default_retries: u32,

    /// Delay before the first retry, when a request does not override.
    pub default_retry_delay: Duration,

    /// Whether retry delays grow exponentially, when a request does not override.
    pub default_retry_backoff: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            default_adapter: AdapterKind::Smart,
            default_retries: 2,
            default_retry_delay: Duration::from_millis(500),
            default_retry_backoff: true,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with a base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }
}

/// Per-call request configuration.
///
/// Constructed fresh for every call, merged over the client defaults during
/// request building, and consumed by that call; never reused.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// HTTP method; the convenience wrappers set this.
    pub method: Option<Method>,

    /// Headers layered over the client defaults. A call-site header replaces
    /// the default values for that name; repeated call-site names append.
    pub headers: Vec<(String, String)>,

    /// Query parameters. Null values are omitted from the query string.
    pub params: Vec<(String, Value)>,

    /// Request body.
    pub body: Option<RequestBody>,

    /// Surface errors and server notifications through the notification sink.
    pub notify_on_error: bool,

    /// Override the client's retry count.
    pub retries: Option<u32>,

    /// Override the client's base retry delay.
    pub retry_delay: Option<Duration>,

    /// Override the client's backoff flag.
    pub retry_backoff: Option<bool>,

    /// Override the client's default adapter.
    pub adapter: Option<AdapterKind>,

    /// Cancellation signal observed at the transport boundary.
    pub signal: Option<CancellationToken>,

    /// Per-attempt transport timeout.
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter. Null values are omitted at build time.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Opt into error notification for this call.
    pub fn notify_on_error(mut self, notify: bool) -> Self {
        self.notify_on_error = notify;
        self
    }

    /// Override the retry count.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Override the base retry delay.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Override the backoff flag.
    pub fn retry_backoff(mut self, backoff: bool) -> Self {
        self.retry_backoff = Some(backoff);
        self
    }

    /// Select the adapter for this call.
    pub fn adapter(mut self, adapter: AdapterKind) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Attach a cancellation signal.
    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Set a per-attempt transport timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
