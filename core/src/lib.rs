//! Generic REST invocation core.
//!
//! # Overview
//! One reusable pipeline behind any number of thin per-endpoint wrappers:
//! caller parameters flow through the parameter codec into an [`Endpoint`]
//! descriptor, the client builds and sends one blocking request through an
//! injected [`HttpTransport`], and the response mapper turns the exchange
//! into a typed value, a downloaded file, or a structured [`ApiError`].
//!
//! # Design
//! - [`ApiClient`] holds only shared read-only configuration (base URL,
//!   transport, hooks, timeout); every call is independent and synchronous.
//! - Each endpoint is a fresh [`Endpoint`] value: method, path template
//!   substitutions, ordered query pairs, headers, optional JSON body.
//! - Errors are a four-way taxonomy (validation, transport, protocol,
//!   decoding) callers can match on without parsing messages.
//! - Response bodies are call-local streams, consumed or dropped within
//!   the call that opened them.
//!
//! # Example
//! ```no_run
//! use rest_core::{ApiClient, Endpoint, HttpMethod, UreqTransport};
//!
//! # fn main() -> Result<(), rest_core::ApiError> {
//! let client = ApiClient::new("http://media.local:8096", UreqTransport::new());
//! let pong: Option<String> =
//!     client.invoke(Endpoint::new("ping", HttpMethod::Get, "/System/Ping"))?;
//! assert_eq!(pong.as_deref(), Some("pong"));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod download;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod param;
pub mod response;
pub mod transport;

pub use client::{ApiClient, Invocation, RequestInterceptor, ResponseObserver};
pub use download::DownloadedFile;
pub use endpoint::{required_param, Endpoint};
pub use error::{ApiError, BoxError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ResponseBody};
pub use transport::UreqTransport;
