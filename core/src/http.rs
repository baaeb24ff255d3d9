//! HTTP request/response values exchanged with a `Transport`.
//!
//! # Design
//! Requests are plain data built by `BookerClient::build_*` methods, so the
//! exact wire shape of every operation can be asserted without a network.
//! Responses are returned to callers verbatim: the status code is never
//! translated into an error, because the scenarios assert on it directly.

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Encoded request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Serialized JSON document.
    Json(String),
    /// `application/x-www-form-urlencoded` fields, encoded by the transport.
    Form(Vec<(String, String)>),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub(crate) fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Decode the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Decode the body as an untyped JSON document.
    pub fn json_value(&self) -> Result<serde_json::Value, ApiError> {
        self.json()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Fail with `UnexpectedStatus` unless the response carries `expected`.
    pub fn ensure_status(&self, expected: u16) -> Result<&Self, ApiError> {
        if self.status == expected {
            return Ok(self);
        }
        Err(ApiError::UnexpectedStatus {
            expected,
            status: self.status,
            body: self.body.clone(),
        })
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = response(200, "{}");
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("x-missing"), None);
    }

    #[test]
    fn json_value_decodes_body() {
        let resp = response(200, r#"{"reason":"Bad credentials"}"#);
        let value = resp.json_value().unwrap();
        assert_eq!(value["reason"], "Bad credentials");
    }

    #[test]
    fn json_reports_bad_body() {
        let resp = response(500, "Internal Server Error");
        let err = resp.json_value().unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn ensure_status_mismatch_keeps_body() {
        let resp = response(405, "Method Not Allowed");
        assert!(resp.ensure_status(405).is_ok());
        let err = resp.ensure_status(201).unwrap_err();
        match err {
            ApiError::UnexpectedStatus { expected, status, body } => {
                assert_eq!(expected, 201);
                assert_eq!(status, 405);
                assert_eq!(body, "Method Not Allowed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
