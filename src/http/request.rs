//! Request construction
//!
//! Building a request resolves the endpoint against the configured base URL,
//! serializes query parameters, normalizes headers, and produces a
//! [`RequestContext`] — the typed configuration that request interceptors see
//! and that the attempt loop rebuilds a transport request from on every
//! attempt.

use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{Error, Result};
use crate::http::adapter::AdapterKind;
use crate::http::retry::RetryPolicy;

/// A request body.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// A JSON payload, serialized at dispatch.
    Json(Value),
    /// An opaque text payload.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// A multipart form. The transport sets the boundary-bearing
    /// content-type itself; any explicit content-type header is stripped
    /// during request building.
    Multipart(Vec<MultipartField>),
}

/// One field of a multipart form.
#[derive(Debug, Clone)]
pub struct MultipartField {
    /// Form field name.
    pub name: String,
    /// Field payload.
    pub value: MultipartValue,
}

impl MultipartField {
    /// A plain text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: MultipartValue::Text(value.into()),
        }
    }

    /// A file field.
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: MultipartValue::File {
                bytes,
                file_name: file_name.into(),
                content_type,
            },
        }
    }
}

/// Payload of a multipart field.
#[derive(Debug, Clone)]
pub enum MultipartValue {
    /// Text value.
    Text(String),
    /// File contents with metadata.
    File {
        /// File bytes.
        bytes: Vec<u8>,
        /// File name reported to the server.
        file_name: String,
        /// Media type of the file, if known.
        content_type: Option<String>,
    },
}

/// The fully built configuration for one request.
///
/// Constructed fresh per call from client defaults merged with call-site
/// overrides, threaded through the request interceptor chain (each stage
/// receives the previous stage's output and returns a new context), then
/// consumed by the attempt loop. Interceptors never see transport objects —
/// this is the only request-side type they touch.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<RequestBody>,
    pub(crate) internal: bool,
    pub(crate) notify_on_error: bool,
    pub(crate) adapter: AdapterKind,
    pub(crate) policy: RetryPolicy,
    pub(crate) signal: Option<CancellationToken>,
    pub(crate) timeout: Option<Duration>,
}

impl RequestContext {
    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the resolved absolute URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether the endpoint belongs to the configured backend: a relative
    /// endpoint, or an absolute URL whose host matches the base URL's host.
    ///
    /// Credential-injecting interceptors must only attach credentials when
    /// this is `true`.
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    /// Whether the caller opted into error notification.
    pub fn notify_on_error(&self) -> bool {
        self.notify_on_error
    }

    /// Return a new context with a header set, replacing existing values.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Return a new context without the named header.
    pub fn without_header(mut self, name: impl AsRef<str>) -> Self {
        if let Ok(name) = name.as_ref().parse::<HeaderName>() {
            self.headers.remove(name);
        }
        self
    }

    /// Build the transport request for one attempt.
    ///
    /// Multipart bodies cannot be reused across attempts, so the request is
    /// rebuilt from these parts before every dispatch.
    pub(crate) fn to_reqwest(&self, client: &reqwest::Client) -> Result<reqwest::Request> {
        let mut builder = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        match &self.body {
            None => {}
            Some(RequestBody::Json(value)) => {
                builder = builder.body(serde_json::to_vec(value)?);
            }
            Some(RequestBody::Text(text)) => {
                builder = builder.body(text.clone());
            }
            Some(RequestBody::Bytes(bytes)) => {
                builder = builder.body(bytes.clone());
            }
            Some(RequestBody::Multipart(fields)) => {
                let mut form = reqwest::multipart::Form::new();
                for field in fields {
                    form = match &field.value {
                        MultipartValue::Text(text) => {
                            form.text(field.name.clone(), text.clone())
                        }
                        MultipartValue::File {
                            bytes,
                            file_name,
                            content_type,
                        } => {
                            let mut part = reqwest::multipart::Part::bytes(bytes.clone())
                                .file_name(file_name.clone());
                            if let Some(media_type) = content_type {
                                part = part.mime_str(media_type).map_err(|err| {
                                    Error::InvalidRequest(format!(
                                        "invalid content type for part '{}': {err}",
                                        field.name
                                    ))
                                })?;
                            }
                            form.part(field.name.clone(), part)
                        }
                    };
                }
                builder = builder.multipart(form);
            }
        }

        builder
            .build()
            .map_err(|err| Error::HttpClient(err.to_string()))
    }
}

/// Resolve an endpoint against the base URL.
///
/// Absolute endpoints pass through; relative endpoints are prefixed with the
/// base. Returns the resolved URL and whether the endpoint is internal
/// (relative, or absolute with the base's host).
pub(crate) fn resolve_url(base: Option<&Url>, endpoint: &str) -> Result<(Url, bool)> {
    match Url::parse(endpoint) {
        Ok(url) => {
            let internal = base.is_some_and(|base| {
                base.host_str() == url.host_str()
                    && base.port_or_known_default() == url.port_or_known_default()
            });
            Ok((url, internal))
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| {
                Error::InvalidUrl(format!(
                    "relative endpoint '{endpoint}' requires a configured base URL"
                ))
            })?;
            let joined = format!(
                "{}/{}",
                base.as_str().trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            );
            let url = joined
                .parse()
                .map_err(|err| Error::InvalidUrl(format!("{err}: {joined}")))?;
            Ok((url, true))
        }
        Err(err) => Err(Error::InvalidUrl(format!("{err}: {endpoint}"))),
    }
}

/// Append query parameters, skipping null values.
///
/// `Url::query_pairs_mut` appends with `?`/`&` correctly even when the base
/// URL already carries a query string.
pub(crate) fn append_query(url: &mut Url, params: &[(String, Value)]) {
    if params.iter().all(|(_, value)| value.is_null()) {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (key, value) in params {
        let scalar = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        };
        pairs.append_pair(key, &scalar);
    }
}

/// Coerce string pairs into a validated header map, preserving repeats.
pub(crate) fn coerce_headers(pairs: &[(String, String)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let (name, value) = parse_header(name, value)?;
        headers.append(name, value);
    }
    Ok(headers)
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = name
        .parse::<HeaderName>()
        .map_err(|_| Error::InvalidHeader(format!("invalid header name '{name}'")))?;
    let value = value
        .parse::<HeaderValue>()
        .map_err(|_| Error::InvalidHeader(format!("invalid value for header '{name}'")))?;
    Ok((name, value))
}
