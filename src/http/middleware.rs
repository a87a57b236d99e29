//! Interceptor pipeline for request/response processing
//!
//! Interceptors are registered once at setup and applied strictly in
//! registration order on every request: each stage receives the previous
//! stage's output. They operate only on the typed [`RequestContext`] and
//! [`Envelope`] — never on raw transport objects — keeping cross-cutting
//! concerns decoupled from transport and adapter internals.

use std::sync::Arc;

use async_trait::async_trait;

use super::envelope::Envelope;
use super::request::RequestContext;
use crate::error::Result;
use crate::store::CredentialStore;

/// Hook applied to the request configuration before dispatch.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Transform the context; the returned context feeds the next stage.
    async fn intercept(&self, ctx: RequestContext) -> Result<RequestContext>;
}

/// Hook applied to the envelope after adaptation.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    /// Transform the envelope; the returned envelope feeds the next stage.
    async fn intercept(&self, envelope: Envelope) -> Result<Envelope>;
}

/// Request interceptor that injects a bearer credential on internal endpoints.
///
/// The credential is read from the store on every request, so rotation takes
/// effect without rebuilding the client. Third-party endpoints never receive
/// the credential.
pub struct BearerAuth {
    store: Arc<dyn CredentialStore>,
    key: String,
}

impl BearerAuth {
    /// Create an interceptor reading the credential under `key`.
    pub fn new(store: Arc<dyn CredentialStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl RequestInterceptor for BearerAuth {
    async fn intercept(&self, ctx: RequestContext) -> Result<RequestContext> {
        if !ctx.is_internal() {
            return Ok(ctx);
        }
        match self.store.read(&self.key) {
            Some(token) => {
                ctx.with_header(http::header::AUTHORIZATION.as_str(), format!("Bearer {token}"))
            }
            None => Ok(ctx),
        }
    }
}

/// Interceptor pair that logs request dispatch and response outcomes.
pub struct LoggingInterceptor;

#[async_trait]
impl RequestInterceptor for LoggingInterceptor {
    async fn intercept(&self, ctx: RequestContext) -> Result<RequestContext> {
        tracing::debug!(method = %ctx.method(), url = %ctx.url(), "sending request");
        Ok(ctx)
    }
}

#[async_trait]
impl ResponseInterceptor for LoggingInterceptor {
    async fn intercept(&self, envelope: Envelope) -> Result<Envelope> {
        tracing::debug!(
            status = envelope.status,
            success = envelope.is_success,
            "received response"
        );
        Ok(envelope)
    }
}
