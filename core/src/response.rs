//! Response mapper: classify a received response and produce either a
//! typed success value or a protocol error.
//!
//! # Design
//! Every mapping function consumes the [`HttpResponse`] whole, so the body
//! stream is read or dropped on every exit path — nothing leaks past a
//! call. Non-2xx handling is shared: the body is read as text (`[no body]`
//! when empty) and folded into a protocol error that keeps the status,
//! headers, and raw body for programmatic inspection.

use serde::de::DeserializeOwned;

use crate::client::Invocation;
use crate::download::DownloadedFile;
use crate::error::ApiError;
use crate::http::HttpResponse;

/// Success means the hundreds digit of the status is 2.
pub fn is_success(status: u16) -> bool {
    status / 100 == 2
}

/// Build the failure outcome for a non-2xx response.
fn protocol_error(
    operation_id: &str,
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
) -> ApiError {
    let body = if body.is_empty() {
        "[no body]".to_string()
    } else {
        body
    };
    ApiError::Protocol {
        message: format!("{operation_id} call failed with: {status} - {body}"),
        status,
        headers,
        body,
    }
}

/// Read the body as text, mapping mid-stream I/O failures to transport
/// errors.
fn body_text(response: HttpResponse) -> Result<(u16, Vec<(String, String)>, String), ApiError> {
    let HttpResponse {
        status,
        headers,
        body,
    } = response;
    let text = body.read_to_string().map_err(ApiError::transport)?;
    Ok((status, headers, text))
}

/// Map a response whose success body is JSON of type `T`.
///
/// A blank 2xx body yields an absent value rather than a decoding error,
/// matching how void-ish JSON endpoints behave in the wild.
pub fn read_json<T: DeserializeOwned>(
    operation_id: &str,
    response: HttpResponse,
) -> Result<Invocation<Option<T>>, ApiError> {
    let (status, headers, text) = body_text(response)?;
    if !is_success(status) {
        return Err(protocol_error(operation_id, status, headers, text));
    }
    if text.trim().is_empty() {
        return Ok(Invocation {
            status,
            headers,
            value: None,
        });
    }
    let value = serde_json::from_str(&text).map_err(|e| {
        ApiError::decoding(
            format!("could not deserialize response body for {operation_id}: {e}"),
            e,
        )
    })?;
    Ok(Invocation {
        status,
        headers,
        value: Some(value),
    })
}

/// Map a response for a pure side-effect operation: drain and discard the
/// body, keep the status and headers.
pub fn read_unit(
    operation_id: &str,
    response: HttpResponse,
) -> Result<Invocation<()>, ApiError> {
    if !is_success(response.status) {
        let (status, headers, text) = body_text(response)?;
        return Err(protocol_error(operation_id, status, headers, text));
    }
    let HttpResponse {
        status,
        headers,
        body,
    } = response;
    body.drain().map_err(ApiError::transport)?;
    Ok(Invocation {
        status,
        headers,
        value: (),
    })
}

/// Map a response whose success body is a binary download.
pub fn read_download(
    operation_id: &str,
    response: HttpResponse,
) -> Result<Invocation<DownloadedFile>, ApiError> {
    if !is_success(response.status) {
        let (status, headers, text) = body_text(response)?;
        return Err(protocol_error(operation_id, status, headers, text));
    }
    let disposition = response.header("Content-Disposition").map(str::to_string);
    let HttpResponse {
        status,
        headers,
        body,
    } = response;
    let file = DownloadedFile::write(operation_id, disposition.as_deref(), body.into_reader())?;
    Ok(Invocation {
        status,
        headers,
        value: file,
    })
}
