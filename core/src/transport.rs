//! Default [`HttpTransport`] implementation over ureq.
//!
//! ureq's status-as-error behavior is disabled so 4xx/5xx responses come
//! back as data; status interpretation belongs to the response mapper, not
//! the transport.

use ureq::Agent;

use crate::error::BoxError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ResponseBody};

/// Blocking transport backed by a shared ureq agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply headers and the per-request timeout override to a builder of
/// either body flavor.
fn prepared<Any>(
    mut builder: ureq::RequestBuilder<Any>,
    request: &HttpRequest,
) -> ureq::RequestBuilder<Any> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(timeout) = request.timeout {
        builder = builder.config().timeout_global(Some(timeout)).build();
    }
    builder
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        let url = &request.url;
        let body = request.body.as_deref();
        let response = match (request.method, body) {
            (HttpMethod::Get, _) => prepared(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => prepared(self.agent.delete(url), request).call(),
            (HttpMethod::Head, _) => prepared(self.agent.head(url), request).call(),
            (HttpMethod::Post, Some(bytes)) => prepared(self.agent.post(url), request).send(bytes),
            (HttpMethod::Post, None) => prepared(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(bytes)) => prepared(self.agent.put(url), request).send(bytes),
            (HttpMethod::Put, None) => prepared(self.agent.put(url), request).send_empty(),
            (HttpMethod::Patch, Some(bytes)) => {
                prepared(self.agent.patch(url), request).send(bytes)
            }
            (HttpMethod::Patch, None) => prepared(self.agent.patch(url), request).send_empty(),
        }?;

        let status = response.status().as_u16();
        let mut headers = Vec::with_capacity(response.headers().len());
        for (name, value) in response.headers() {
            headers.push((
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            ));
        }
        let reader = response.into_body().into_reader();
        Ok(HttpResponse {
            status,
            headers,
            body: ResponseBody::from_reader(reader),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_refused_surfaces_as_an_error() {
        let transport = UreqTransport::new();
        let request = HttpRequest {
            method: HttpMethod::Get,
            // Reserved port on localhost; nothing is listening.
            url: "http://127.0.0.1:1/System/Ping".to_string(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        };
        assert!(transport.execute(&request).is_err());
    }
}
