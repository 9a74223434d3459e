//! HTTP transport types for the invocation pipeline.
//!
//! # Design
//! Requests and responses are described as plain data so the pipeline stages
//! (build, send, map) stay decoupled from any concrete HTTP library. The
//! [`HttpTransport`] trait is the injection seam: the core builds an
//! [`HttpRequest`], the transport performs exactly one blocking exchange and
//! hands back an [`HttpResponse`]. Response bodies are call-local streams,
//! consumed exactly once; dropping the body on any exit path releases the
//! underlying stream.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use crate::error::BoxError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL, query string included.
    pub url: String,
    /// Header pairs in assembly order; repeated names allowed.
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Per-request read timeout override. `None` leaves the transport
    /// default in place.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// First header value with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Append a header. Existing entries with the same name are kept;
    /// layering order decides which one the transport writes last.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }
}

/// A response as produced by the transport: status, headers, and a body
/// stream that has not been consumed yet.
pub struct HttpResponse {
    pub status: u16,
    /// Header pairs in arrival order; repeated names allowed.
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<ResponseBody>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// First header value with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// An unconsumed response body stream.
///
/// Owned by exactly one call; reading consumes it, dropping it releases the
/// stream. Constructed from raw bytes in tests and from live connection
/// readers by real transports.
pub struct ResponseBody(Box<dyn Read>);

impl ResponseBody {
    pub fn empty() -> Self {
        ResponseBody(Box::new(std::io::empty()))
    }

    pub fn from_reader(reader: impl Read + 'static) -> Self {
        ResponseBody(Box::new(reader))
    }

    /// Consume the stream into text.
    pub fn read_to_string(self) -> std::io::Result<String> {
        let mut reader = self.0;
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(text)
    }

    /// Consume the stream, discarding its contents.
    pub fn drain(self) -> std::io::Result<u64> {
        let mut reader = self.0;
        std::io::copy(&mut reader, &mut std::io::sink())
    }

    pub(crate) fn into_reader(self) -> Box<dyn Read> {
        self.0
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseBody(..)")
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(bytes: Vec<u8>) -> Self {
        ResponseBody(Box::new(std::io::Cursor::new(bytes)))
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        ResponseBody(Box::new(std::io::Cursor::new(text.into_bytes())))
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        ResponseBody::from(text.to_string())
    }
}

/// One blocking request/response exchange.
///
/// Implementations perform exactly one exchange per call: no retries, no
/// backoff, no pooling policy beyond what the underlying library does by
/// default. Shared read-only across concurrent calls.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        (**self).execute(request)
    }
}
