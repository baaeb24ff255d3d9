//! Booking API client.
//!
//! # Design
//! Every operation is split into a pure `build_*` method that produces an
//! `HttpRequest` and an executing method that sends it through the client's
//! `Transport` and hands back the raw `HttpResponse`. Nothing is translated:
//! a 405 from the server is an `Ok` response with `status == 405`.
//!
//! Mutating operations (`update_booking`, `partial_update_booking`,
//! `delete_booking`) fetch a fresh token with the configured credentials
//! before each call and send it as the `token` cookie. Tokens are never
//! reused between calls.

use serde::Serialize;
use tracing::debug;

use crate::config::BookerConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::transport::{Transport, UreqTransport};
use crate::types::{AuthReply, BookingFilter, BookingId};

/// Synchronous client for the booking API.
#[derive(Debug, Clone)]
pub struct BookerClient<T = UreqTransport> {
    config: BookerConfig,
    transport: T,
}

impl BookerClient<UreqTransport> {
    pub fn new(config: BookerConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Client for `base_url` with the default admin credentials.
    pub fn for_base_url(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::new(BookerConfig::with_base_url(base_url)?))
    }
}

impl<T: Transport> BookerClient<T> {
    pub fn with_transport(mut config: BookerConfig, transport: T) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config, transport }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &BookerConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_ping(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, format!("{}/ping", self.config.base_url))
    }

    pub fn build_list_booking_ids(&self, filter: &BookingFilter) -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Get, format!("{}/booking", self.config.base_url));
        req.query = filter.query_pairs();
        req
    }

    pub fn build_get_booking(&self, id: BookingId) -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Get, self.booking_url(id));
        req.headers.push(("accept".to_string(), "application/json".to_string()));
        req
    }

    pub fn build_create_booking<B>(&self, fields: &B) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let req = HttpRequest::new(HttpMethod::Post, format!("{}/booking", self.config.base_url));
        with_json_body(req, fields)
    }

    pub fn build_authenticate(&self, username: &str, password: &str) -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Post, format!("{}/auth", self.config.base_url));
        req.body = Some(RequestBody::Form(vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]));
        req
    }

    pub fn build_update_booking<B>(
        &self,
        id: BookingId,
        fields: &B,
        token: &str,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let req = with_token(HttpRequest::new(HttpMethod::Put, self.booking_url(id)), token);
        with_json_body(req, fields)
    }

    pub fn build_partial_update_booking<B>(
        &self,
        id: BookingId,
        fields: &B,
        token: &str,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let req = with_token(HttpRequest::new(HttpMethod::Patch, self.booking_url(id)), token);
        with_json_body(req, fields)
    }

    pub fn build_delete_booking(&self, id: BookingId, token: &str) -> HttpRequest {
        with_token(HttpRequest::new(HttpMethod::Delete, self.booking_url(id)), token)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// `GET /ping`. The live service answers 201.
    pub fn ping(&self) -> Result<HttpResponse, ApiError> {
        self.send(self.build_ping())
    }

    pub fn list_booking_ids(&self, filter: &BookingFilter) -> Result<HttpResponse, ApiError> {
        self.send(self.build_list_booking_ids(filter))
    }

    pub fn get_booking(&self, id: BookingId) -> Result<HttpResponse, ApiError> {
        self.send(self.build_get_booking(id))
    }

    pub fn create_booking<B>(&self, fields: &B) -> Result<HttpResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.build_create_booking(fields)?)
    }

    /// `POST /auth`. Bad credentials still come back as 200, with a
    /// `{"reason": "Bad credentials"}` body instead of a token.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.build_authenticate(username, password))
    }

    pub fn update_booking<B>(&self, id: BookingId, fields: &B) -> Result<HttpResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let token = self.fresh_token()?;
        self.send(self.build_update_booking(id, fields, &token)?)
    }

    /// `PATCH /booking/{id}`. Payload values are sent as given; the service
    /// does not type-check them either.
    pub fn partial_update_booking<B>(
        &self,
        id: BookingId,
        fields: &B,
    ) -> Result<HttpResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let token = self.fresh_token()?;
        self.send(self.build_partial_update_booking(id, fields, &token)?)
    }

    pub fn delete_booking(&self, id: BookingId) -> Result<HttpResponse, ApiError> {
        let token = self.fresh_token()?;
        self.send(self.build_delete_booking(id, &token))
    }

    /// Authenticate with the configured credentials and extract the token.
    pub fn fresh_token(&self) -> Result<String, ApiError> {
        let response = self.authenticate(&self.config.username, &self.config.password)?;
        response.ensure_status(200)?;
        match response.json::<AuthReply>()? {
            AuthReply::Token { token } => Ok(token),
            AuthReply::Refused { reason } => Err(ApiError::Unauthenticated { reason }),
        }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    fn booking_url(&self, id: BookingId) -> String {
        format!("{}/booking/{id}", self.config.base_url)
    }
}

fn with_json_body<B>(mut req: HttpRequest, fields: &B) -> Result<HttpRequest, ApiError>
where
    B: Serialize + ?Sized,
{
    let body = serde_json::to_string(fields).map_err(|e| ApiError::Serialization(e.to_string()))?;
    req.headers.push(("content-type".to_string(), "application/json".to_string()));
    req.headers.push(("accept".to_string(), "application/json".to_string()));
    req.body = Some(RequestBody::Json(body));
    Ok(req)
}

fn with_token(mut req: HttpRequest, token: &str) -> HttpRequest {
    req.headers.push(("cookie".to_string(), format!("token={token}")));
    req
}
