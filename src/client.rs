//! The HTTP client: request orchestration under retry, interceptors, and
//! cancellation
//!
//! A request moves through a fixed sequence: build the context, run the
//! request interceptor chain, execute attempts under the retry policy, parse
//! the committed response's body, adapt it into an envelope, run the response
//! interceptor chain, fire notifications, and return. No transport failure
//! ever escapes [`HttpClient::request`] — every such path resolves to an
//! [`Envelope`] with a populated error. The `Err` side of the returned
//! `Result` is reserved for request-construction and interceptor failures.

use std::sync::Arc;

use http::{HeaderMap, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{ClientConfig, RequestConfig};
use crate::error::{Error, Result};
use crate::http::request::{append_query, coerce_headers, resolve_url};
use crate::http::{
    AdapterKind, Envelope, NotificationKind, RawResponse, RequestBody, RequestContext,
    RequestInterceptor, ResponseInterceptor, RetryPolicy,
};
use crate::notify::Notifier;

/// Resilient HTTP client.
///
/// Holds only immutable-after-construction configuration and append-only
/// interceptor lists, so a single instance is safe for unbounded concurrent
/// use without locking. Construct one at application start and pass it to
/// whatever needs it; cloning is cheap.
///
/// # Example
///
/// ```rust,no_run
/// use uplink::{HttpClient, RequestConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::builder()
///     .base_url("https://api.example.com")
///     .build()?;
///
/// let users = client
///     .get::<serde_json::Value>("/users", RequestConfig::new())
///     .await?;
///
/// if users.is_success {
///     println!("{:?}", users.data);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Option<Url>,
    default_headers: HeaderMap,
    default_adapter: AdapterKind,
    default_policy: RetryPolicy,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl HttpClient {
    /// Create a client builder.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let base_url = match config.base_url {
            Some(raw) => {
                if raw.trim().is_empty() {
                    return Err(Error::InvalidUrl("base URL cannot be empty".to_string()));
                }
                let url: Url = raw
                    .parse()
                    .map_err(|err| Error::InvalidUrl(format!("{err}: {raw}")))?;
                match url.scheme() {
                    "http" | "https" => {}
                    scheme => {
                        return Err(Error::InvalidUrl(format!(
                            "unsupported URL scheme '{scheme}'"
                        )));
                    }
                }
                Some(url)
            }
            None => None,
        };

        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| Error::HttpClient(err.to_string()))?;

        Ok(Self {
            http,
            base_url,
            default_headers: config.default_headers,
            default_adapter: config.default_adapter,
            default_policy: RetryPolicy {
                retries: config.default_retries,
                base_delay: config.default_retry_delay,
                backoff: config.default_retry_backoff,
            },
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            notifier: None,
        })
    }

    /// Append a request interceptor. Interceptors run in registration order
    /// on every request; there is no removal API.
    pub fn use_request_interceptor(&mut self, interceptor: impl RequestInterceptor + 'static) {
        self.request_interceptors.push(Arc::new(interceptor));
    }

    /// Append a response interceptor. Interceptors run in registration order
    /// on every response; there is no removal API.
    pub fn use_response_interceptor(&mut self, interceptor: impl ResponseInterceptor + 'static) {
        self.response_interceptors.push(Arc::new(interceptor));
    }

    /// Execute a request and resolve it to an envelope.
    ///
    /// Transport failures — network errors, non-success statuses after
    /// retries are exhausted, cancellation — are captured in the envelope's
    /// `error` field. `Err` is returned only when the request cannot be
    /// constructed or an interceptor fails.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Envelope<T>> {
        let mut ctx = self.build_context(endpoint, config)?;
        for interceptor in &self.request_interceptors {
            ctx = interceptor.intercept(ctx).await?;
        }
        let notify_requested = ctx.notify_on_error;

        let mut envelope = self.execute(&ctx).await?;
        for interceptor in &self.response_interceptors {
            envelope = interceptor.intercept(envelope).await?;
        }

        self.dispatch_notifications(&envelope, notify_requested);
        Ok(envelope.into_typed())
    }

    /// GET convenience wrapper.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Envelope<T>> {
        self.request(endpoint, config.method(Method::GET)).await
    }

    /// POST convenience wrapper; serializes `body` as the JSON payload.
    pub async fn post<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        config: RequestConfig,
    ) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(
            endpoint,
            config.method(Method::POST).body(RequestBody::Json(body)),
        )
        .await
    }

    /// PUT convenience wrapper; serializes `body` as the JSON payload.
    pub async fn put<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        config: RequestConfig,
    ) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(
            endpoint,
            config.method(Method::PUT).body(RequestBody::Json(body)),
        )
        .await
    }

    /// DELETE convenience wrapper.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Envelope<T>> {
        self.request(endpoint, config.method(Method::DELETE)).await
    }

    /// Building phase: resolve the URL, serialize query parameters, merge
    /// headers over the client defaults, and normalize the body.
    fn build_context(&self, endpoint: &str, config: RequestConfig) -> Result<RequestContext> {
        let (mut url, internal) = resolve_url(self.base_url.as_ref(), endpoint)?;
        append_query(&mut url, &config.params);

        let mut headers = self.default_headers.clone();
        let call_headers = coerce_headers(&config.headers)?;
        for name in call_headers.keys() {
            headers.remove(name);
        }
        for (name, value) in call_headers.iter() {
            headers.append(name.clone(), value.clone());
        }

        match &config.body {
            Some(RequestBody::Multipart(_)) => {
                // The transport must set the boundary-bearing content-type.
                headers.remove(http::header::CONTENT_TYPE);
            }
            Some(RequestBody::Json(_)) => {
                if !headers.contains_key(http::header::CONTENT_TYPE) {
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        http::HeaderValue::from_static("application/json"),
                    );
                }
            }
            _ => {}
        }

        Ok(RequestContext {
            method: config.method.unwrap_or(Method::GET),
            url,
            headers,
            body: config.body,
            internal,
            notify_on_error: config.notify_on_error,
            adapter: config.adapter.unwrap_or(self.default_adapter),
            policy: RetryPolicy {
                retries: config.retries.unwrap_or(self.default_policy.retries),
                base_delay: config
                    .retry_delay
                    .unwrap_or(self.default_policy.base_delay),
                backoff: config
                    .retry_backoff
                    .unwrap_or(self.default_policy.backoff),
            },
            signal: config.signal,
            timeout: config.timeout,
        })
    }

    /// Attempt loop. Retry eligibility is decided before the body is read, so
    /// only the final committed response is parsed. The cancellation signal
    /// is checked before each dispatch and raced against the in-flight
    /// transport call; it is not consulted during backoff sleeps.
    async fn execute(&self, ctx: &RequestContext) -> Result<Envelope> {
        let policy = &ctx.policy;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            if let Some(signal) = &ctx.signal {
                if signal.is_cancelled() {
                    tracing::debug!(url = %ctx.url, "request aborted before dispatch");
                    return Ok(Envelope::aborted());
                }
            }

            let request = ctx.to_reqwest(&self.http)?;
            tracing::debug!(method = %ctx.method, url = %ctx.url, attempt, "dispatching request");

            let outcome = match &ctx.signal {
                Some(signal) => {
                    tokio::select! {
                        _ = signal.cancelled() => {
                            tracing::debug!(url = %ctx.url, "request aborted in flight");
                            return Ok(Envelope::aborted());
                        }
                        outcome = self.http.execute(request) => outcome,
                    }
                }
                None => self.http.execute(request).await,
            };

            let more_attempts = attempt < policy.total_attempts();
            match outcome {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success()
                        && RetryPolicy::is_retryable_status(status)
                        && more_attempts
                    {
                        let delay = policy.delay(attempt);
                        tracing::debug!(
                            status = status.as_u16(),
                            delay_ms = delay.as_millis() as u64,
                            "transient status, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    let headers = response.headers().clone();
                    match response.bytes().await {
                        Ok(body) => {
                            let raw = RawResponse::new(status, headers, body);
                            let parsed = raw.parse_body();
                            return Ok(ctx.adapter.adapt(&raw, parsed));
                        }
                        Err(err) if more_attempts => {
                            let delay = policy.delay(attempt);
                            tracing::debug!(
                                error = %err,
                                delay_ms = delay.as_millis() as u64,
                                "response body read failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "response body read failed, retries exhausted");
                            return Ok(Envelope::network_error(err.to_string()));
                        }
                    }
                }
                Err(err) if more_attempts => {
                    let delay = policy.delay(attempt);
                    tracing::debug!(
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "network error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "network error, retries exhausted");
                    return Ok(Envelope::network_error(err.to_string()));
                }
            }
        }
    }

    /// Notifying phase: surface the error (unless it is a cancellation) and
    /// forward server-declared notifications, iff the caller opted in.
    fn dispatch_notifications(&self, envelope: &Envelope, notify_requested: bool) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        if !notify_requested {
            return;
        }

        if !envelope.is_success {
            if let Some(error) = &envelope.error {
                if !error.is_aborted() {
                    notifier.notify(NotificationKind::Error, &error.message);
                }
            }
        }

        for notification in &envelope.notifications {
            notifier.notify(notification.kind, &notification.message);
        }
    }
}

/// Builder for creating a configured [`HttpClient`].
#[derive(Default)]
pub struct HttpClientBuilder {
    config: ClientConfig,
    notifier: Option<Arc<dyn Notifier>>,
}

impl HttpClientBuilder {
    /// Set the base URL that relative endpoints resolve against.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Add a header sent with every request.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self> {
        let name = name
            .as_ref()
            .parse::<http::HeaderName>()
            .map_err(|_| Error::InvalidHeader(format!("invalid header name '{}'", name.as_ref())))?;
        let value = value
            .as_ref()
            .parse::<http::HeaderValue>()
            .map_err(|_| Error::InvalidHeader(format!("invalid value for header '{name}'")))?;
        self.config.default_headers.append(name, value);
        Ok(self)
    }

    /// Set the default adapter.
    pub fn default_adapter(mut self, adapter: AdapterKind) -> Self {
        self.config.default_adapter = adapter;
        self
    }

    /// Set the default retry count (additional attempts beyond the first).
    pub fn default_retries(mut self, retries: u32) -> Self {
        self.config.default_retries = retries;
        self
    }

    /// Set the default base retry delay.
    pub fn default_retry_delay(mut self, delay: std::time::Duration) -> Self {
        self.config.default_retry_delay = delay;
        self
    }

    /// Set whether retry delays grow exponentially by default.
    pub fn default_retry_backoff(mut self, backoff: bool) -> Self {
        self.config.default_retry_backoff = backoff;
        self
    }

    /// Attach the notification sink.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<HttpClient> {
        let mut client = HttpClient::from_config(self.config)?;
        client.notifier = self.notifier;
        Ok(client)
    }
}
