//! Synchronous client for the restful-booker booking API.
//!
//! # Overview
//! Thin wrappers that map each API action (ping, list, get, create,
//! authenticate, update, partial update, delete) to one HTTP request and
//! return the raw response, plus a guard that scopes a created booking to a
//! test scenario.
//!
//! # Design
//! - `BookerClient` holds only configuration and a `Transport`.
//! - Each operation has a pure `build_*` counterpart so request shapes are
//!   testable without a network.
//! - Responses are never interpreted; status codes are for the caller to
//!   assert on.
//! - DTOs are defined independently from the mock-server crate; the scenario
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod fixture;
pub mod http;
pub mod transport;
pub mod types;

pub use client::BookerClient;
pub use config::BookerConfig;
pub use error::ApiError;
pub use fixture::BookingGuard;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use transport::{Transport, UreqTransport};
pub use types::{AuthReply, Booking, BookingDates, BookingFilter, BookingId, BookingRef, CreatedBooking};
