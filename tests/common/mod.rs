//! Common test utilities and fixtures
//!
//! - wiremock for HTTP mocking (isolated, parallel-safe)
//! - capturing doubles for the notifier and interceptor collaborators

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use uplink::async_trait;
use uplink::{
    Envelope, Notification, NotificationKind, Notifier, RequestContext, RequestInterceptor,
    ResponseInterceptor, Result,
};

/// Install a tracing subscriber so failing tests can be rerun with
/// `RUST_LOG=uplink=debug` for the retry/cancellation traces.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A structured success body the envelope-aware backend would return.
pub fn enveloped_body(data: Value) -> Value {
    json!({
        "data": data,
        "error": null,
        "isSuccess": true,
        "notifications": []
    })
}

/// A structured failure body with a reported error.
pub fn enveloped_error_body(code: &str, message: &str) -> Value {
    json!({
        "data": null,
        "error": {"code": code, "message": message},
        "isSuccess": false,
        "notifications": []
    })
}

/// Notifier double that records every notification it receives.
#[derive(Default)]
pub struct CapturingNotifier {
    captured: Mutex<Vec<(NotificationKind, String)>>,
}

impl CapturingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn captured(&self) -> Vec<(NotificationKind, String)> {
        self.captured.lock().unwrap().clone()
    }
}

impl Notifier for CapturingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.captured.lock().unwrap().push((kind, message.to_string()));
    }
}

/// Request interceptor that appends its tag to the `x-order` header, so chain
/// order is observable on the wire.
pub struct TagRequest(pub &'static str);

#[async_trait]
impl RequestInterceptor for TagRequest {
    async fn intercept(&self, ctx: RequestContext) -> Result<RequestContext> {
        let prev = ctx
            .headers()
            .get("x-order")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        ctx.with_header("x-order", format!("{prev}{}", self.0))
    }
}

/// Response interceptor that appends a tagged notification, so chain order is
/// observable on the envelope.
pub struct TagResponse(pub &'static str);

#[async_trait]
impl ResponseInterceptor for TagResponse {
    async fn intercept(&self, mut envelope: Envelope) -> Result<Envelope> {
        envelope.notifications.push(Notification {
            kind: NotificationKind::Info,
            message: self.0.to_string(),
            code: None,
        });
        Ok(envelope)
    }
}
