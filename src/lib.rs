//! # uplink
//!
//! A resilient HTTP client layer: every request resolves to a uniform
//! [`Envelope`] regardless of transport outcome, transient failures are
//! retried with exponential backoff, in-flight calls can be cooperatively
//! cancelled, and cross-cutting concerns (credential injection, error
//! surfacing) compose through interceptor pipelines without coupling to each
//! other.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use uplink::{HttpClient, RequestConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::builder()
//!         .base_url("https://api.example.com")
//!         .build()?;
//!
//!     let user = client
//!         .get::<serde_json::Value>("/users/1", RequestConfig::new().notify_on_error(true))
//!         .await?;
//!
//!     match (&user.data, &user.error) {
//!         (Some(data), _) => println!("{data}"),
//!         (None, Some(error)) => eprintln!("{}: {}", error.code, error.message),
//!         _ => {}
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::{HttpClient, HttpClientBuilder};
pub use config::{ClientConfig, RequestConfig};
pub use error::{Error, Result};
pub use self::http::{
    AdapterKind, BearerAuth, Envelope, ErrorInfo, LoggingInterceptor, MultipartField,
    MultipartValue, Notification, NotificationKind, RequestBody, RequestContext,
    RequestInterceptor, ResponseInterceptor, RetryPolicy,
};
pub use notify::{NoopNotifier, Notifier, TracingNotifier};
pub use store::{CredentialStore, InMemoryStore};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod store;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use serde_json::Value as JsonValue;
pub use tokio_util::sync::CancellationToken;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use uplink::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AdapterKind, CancellationToken, Envelope, Error, ErrorInfo, HttpClient, Notification,
        NotificationKind, Notifier, RequestConfig, RequestInterceptor, ResponseInterceptor,
        Result,
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
