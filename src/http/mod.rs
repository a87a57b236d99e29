//! HTTP client internals: envelope, adapters, retry policy, interceptors
//!
//! This module holds the pieces [`HttpClient`](crate::HttpClient)
//! orchestrates: the uniform response envelope, the adapters that normalize
//! heterogeneous backend bodies into it, the retry policy, request
//! construction, and the interceptor pipeline.

pub use adapter::AdapterKind;
pub use envelope::{Envelope, ErrorInfo, Notification, NotificationKind};
pub use middleware::{BearerAuth, LoggingInterceptor, RequestInterceptor, ResponseInterceptor};
pub use request::{MultipartField, MultipartValue, RequestBody, RequestContext};
pub use response::RawResponse;
pub use retry::RetryPolicy;

mod adapter;
mod envelope;
pub mod middleware;
pub mod request;
mod response;
pub mod retry;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
