//! Executes `HttpRequest` values over the network.
//!
//! `BookerClient` is generic over `Transport` so request sequencing (auth
//! before every mutation) can be tested against a recording fake, while the
//! real client uses a blocking ureq agent.

use std::fmt;

use ureq::http::{HeaderName, HeaderValue};
use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};

pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a shared ureq agent.
///
/// 4xx/5xx statuses are returned as data rather than `Err`; the scenarios
/// assert on them directly.
#[derive(Clone)]
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

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            url,
            query,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => decorate(self.agent.get(&url), &query, &headers).call(),
            HttpMethod::Delete => decorate(self.agent.delete(&url), &query, &headers).call(),
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                let builder = match method {
                    HttpMethod::Post => self.agent.post(&url),
                    HttpMethod::Put => self.agent.put(&url),
                    _ => self.agent.patch(&url),
                };
                let builder = decorate(builder, &query, &headers);
                match body {
                    Some(RequestBody::Json(json)) => builder.send(json.as_bytes()),
                    Some(RequestBody::Form(fields)) => {
                        builder.send_form(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    }
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| header_pair(name, value))
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn decorate<B>(
    mut builder: RequestBuilder<B>,
    query: &[(String, String)],
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (key, value) in query {
        builder = builder.query(key, value);
    }
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Non-UTF-8 bytes in a value are replaced, not dropped.
fn header_pair(name: &HeaderName, value: &HeaderValue) -> (String, String) {
    (
        name.as_str().to_string(),
        String::from_utf8_lossy(value.as_bytes()).into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_pair_keeps_ascii_values() {
        let name = HeaderName::from_static("x-request-id");
        let value = HeaderValue::from_static("abc123");
        assert_eq!(
            header_pair(&name, &value),
            ("x-request-id".to_string(), "abc123".to_string())
        );
    }

    #[test]
    fn header_pair_keeps_non_utf8_values() {
        let name = HeaderName::from_static("x-guest");
        let value = HeaderValue::from_bytes(b"caf\xe9").unwrap();
        let (_, decoded) = header_pair(&name, &value);
        assert_eq!(decoded, "caf\u{fffd}");
    }
}
