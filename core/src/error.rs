//! Error types for the REST invocation core.
//!
//! # Design
//! Every failure a call can produce lands in one of four variants, so callers
//! can match on the failure kind instead of parsing messages. `Validation`
//! never reaches the network and carries a synthetic 400. `Protocol` carries
//! the real status, headers, and raw body of a non-2xx response. `Transport`
//! and `Decoding` wrap the underlying cause.

/// Boxed error cause preserved on transport and decoding failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by [`crate::ApiClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required parameter was missing. Raised before any network I/O.
    #[error("{message}")]
    Validation {
        /// Names the parameter and the operation being called.
        message: String,
    },

    /// The transport failed to complete the exchange: connection refused,
    /// I/O failure mid-stream, or an interrupted blocking read.
    #[error("transport error: {source}")]
    Transport {
        #[source]
        source: BoxError,
    },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Protocol {
        /// `<operation> call failed with: <status> - <body>`.
        message: String,
        /// The real HTTP status code.
        status: u16,
        /// Response headers in arrival order, repeated names allowed.
        headers: Vec<(String, String)>,
        /// Raw body text, or `[no body]` when the body was empty.
        body: String,
    },

    /// A 2xx response body could not be turned into the declared result:
    /// JSON deserialization failed, the request body could not be
    /// serialized, or a download could not be written to disk.
    #[error("{message}")]
    Decoding {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl ApiError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation { message: message.into() }
    }

    pub(crate) fn transport(source: impl Into<BoxError>) -> Self {
        ApiError::Transport { source: source.into() }
    }

    pub(crate) fn decoding(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ApiError::Decoding {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The HTTP-status-like code associated with this error, if any.
    ///
    /// Validation errors report the synthetic 400 they were raised with;
    /// protocol errors report the real status. Transport and decoding
    /// failures have no status to report.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { .. } => Some(400),
            ApiError::Protocol { status, .. } => Some(*status),
            ApiError::Transport { .. } | ApiError::Decoding { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_reports_synthetic_400() {
        let err =
            ApiError::validation("Missing the required parameter 'id' when calling getDeviceInfo");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn protocol_reports_real_status() {
        let err = ApiError::Protocol {
            message: "getDeviceInfo call failed with: 404 - [no body]".to_string(),
            status: 404,
            headers: Vec::new(),
            body: "[no body]".to_string(),
        };
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn transport_has_no_status() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::transport(io);
        assert_eq!(err.status(), None);
    }
}
