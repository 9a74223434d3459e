//! The client surface: configuration plus the invocation pipeline.
//!
//! # Design
//! [`ApiClient`] holds the configuration shared by every call: base URL,
//! transport, optional hooks, optional read timeout. It is
//! cheap to clone and safe to share across threads; every call is an
//! independent, synchronous exchange with no cross-call state.
//!
//! Each response kind gets three call shapes: a plain typed call, a call
//! with caller-supplied extra headers, and a `*_full` call returning the
//! whole [`Invocation`] (status + headers + value) instead of just the
//! value.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::download::DownloadedFile;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::response;

/// Hook invoked with the nearly-final request, last in the assembly order.
/// Free to mutate anything: auth headers, tracing headers, URL rewrites.
pub type RequestInterceptor = Arc<dyn Fn(&mut HttpRequest) + Send + Sync>;

/// Hook invoked with status and headers as soon as a response arrives,
/// before the body is consumed and regardless of outcome.
pub type ResponseObserver = Arc<dyn Fn(u16, &[(String, String)]) + Send + Sync>;

/// The full outcome of one successful call.
#[derive(Debug)]
pub struct Invocation<T> {
    pub status: u16,
    /// Response headers in arrival order, repeated names allowed.
    pub headers: Vec<(String, String)>,
    pub value: T,
}

/// Synchronous REST client: one logical call maps to exactly one transport
/// exchange, with no retries and no queueing.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    request_interceptor: Option<RequestInterceptor>,
    response_observer: Option<ResponseObserver>,
    read_timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: impl HttpTransport + 'static) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport: Arc::new(transport),
            request_interceptor: None,
            response_observer: None,
            read_timeout: None,
        }
    }

    /// Install the global pre-send hook. It runs after all default and
    /// caller-supplied headers, so whatever it sets wins.
    pub fn with_request_interceptor(
        mut self,
        hook: impl Fn(&mut HttpRequest) + Send + Sync + 'static,
    ) -> Self {
        self.request_interceptor = Some(Arc::new(hook));
        self
    }

    /// Install the response-observed hook, called on every response before
    /// body consumption.
    pub fn with_response_observer(
        mut self,
        hook: impl Fn(u16, &[(String, String)]) + Send + Sync + 'static,
    ) -> Self {
        self.response_observer = Some(Arc::new(hook));
        self
    }

    /// Read timeout applied to every request. Absent means the transport
    /// default applies.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Assemble the wire request. Order matters: method defaults first,
    /// endpoint headers, caller extras, interceptor last — customization
    /// always wins over defaults.
    fn build_request(&self, endpoint: &Endpoint, extra_headers: &[(&str, &str)]) -> HttpRequest {
        let mut request = HttpRequest {
            method: endpoint.method(),
            url: format!("{}{}", self.base_url, endpoint.path_and_query()),
            headers: Vec::new(),
            body: endpoint.body().map(<[u8]>::to_vec),
            timeout: self.read_timeout,
        };
        request.add_header("Accept", "application/json");
        if request.body.is_some() {
            request.add_header("Content-Type", "application/json");
        }
        for (name, value) in endpoint.headers() {
            request.add_header(name.clone(), value.clone());
        }
        for (name, value) in extra_headers {
            request.add_header(*name, *value);
        }
        if let Some(hook) = &self.request_interceptor {
            hook(&mut request);
        }
        request
    }

    /// Build, send, and observe one exchange.
    fn send(
        &self,
        endpoint: &Endpoint,
        extra_headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(endpoint, extra_headers);
        debug!(
            operation = endpoint.operation_id(),
            method = %request.method,
            url = %request.url,
            "sending request"
        );
        let response = self
            .transport
            .execute(&request)
            .map_err(ApiError::transport)?;
        debug!(
            operation = endpoint.operation_id(),
            status = response.status,
            "response received"
        );
        if let Some(hook) = &self.response_observer {
            hook(response.status, &response.headers);
        }
        Ok(response)
    }

    /// Call an endpoint whose success body is JSON of type `T`.
    ///
    /// A blank 2xx body yields `Ok(None)`.
    pub fn invoke<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Option<T>, ApiError> {
        Ok(self.invoke_full(endpoint)?.value)
    }

    /// [`invoke`](Self::invoke) with caller-supplied extra headers.
    pub fn invoke_with_headers<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        headers: &[(&str, &str)],
    ) -> Result<Option<T>, ApiError> {
        let response = self.send(&endpoint, headers)?;
        Ok(response::read_json(endpoint.operation_id(), response)?.value)
    }

    /// [`invoke`](Self::invoke), returning the full invocation outcome.
    pub fn invoke_full<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
    ) -> Result<Invocation<Option<T>>, ApiError> {
        let response = self.send(&endpoint, &[])?;
        response::read_json(endpoint.operation_id(), response)
    }

    /// Call a pure side-effect endpoint; the response body is discarded.
    pub fn execute(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        self.execute_full(endpoint).map(|_| ())
    }

    /// [`execute`](Self::execute) with caller-supplied extra headers.
    pub fn execute_with_headers(
        &self,
        endpoint: Endpoint,
        headers: &[(&str, &str)],
    ) -> Result<(), ApiError> {
        let response = self.send(&endpoint, headers)?;
        response::read_unit(endpoint.operation_id(), response).map(|_| ())
    }

    /// [`execute`](Self::execute), returning status and headers.
    pub fn execute_full(&self, endpoint: Endpoint) -> Result<Invocation<()>, ApiError> {
        let response = self.send(&endpoint, &[])?;
        response::read_unit(endpoint.operation_id(), response)
    }

    /// Call an endpoint whose success body is a binary download. The
    /// returned file is complete and closed; the caller owns it.
    pub fn download(&self, endpoint: Endpoint) -> Result<DownloadedFile, ApiError> {
        Ok(self.download_full(endpoint)?.value)
    }

    /// [`download`](Self::download) with caller-supplied extra headers.
    pub fn download_with_headers(
        &self,
        endpoint: Endpoint,
        headers: &[(&str, &str)],
    ) -> Result<DownloadedFile, ApiError> {
        let response = self.send(&endpoint, headers)?;
        Ok(response::read_download(endpoint.operation_id(), response)?.value)
    }

    /// [`download`](Self::download), returning the full invocation outcome.
    pub fn download_full(
        &self,
        endpoint: Endpoint,
    ) -> Result<Invocation<DownloadedFile>, ApiError> {
        let response = self.send(&endpoint, &[])?;
        response::read_download(endpoint.operation_id(), response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}
