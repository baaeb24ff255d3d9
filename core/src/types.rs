//! Wire DTOs for the booking API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the scenario tests catch schema drift between the two crates. Client
//! operations take any `Serialize` payload, so these types are the
//! well-typed path, not the only one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Server-assigned booking identifier.
pub type BookingId = u64;

/// A booking as sent to and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i64,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingDates {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

/// Response body of `POST /booking`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedBooking {
    pub bookingid: BookingId,
    pub booking: Booking,
}

/// One element of the `GET /booking` listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRef {
    pub bookingid: BookingId,
}

/// Body of `POST /auth`. The service answers 200 for both outcomes, so the
/// reply is told apart by shape, not by status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AuthReply {
    Token { token: String },
    Refused { reason: String },
}

/// Optional filters for the booking id listing.
///
/// Each field maps to the query parameter of the same name. `None` and empty
/// strings are both left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
}

impl BookingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn firstname(mut self, value: impl Into<String>) -> Self {
        self.firstname = Some(value.into());
        self
    }

    pub fn lastname(mut self, value: impl Into<String>) -> Self {
        self.lastname = Some(value.into());
        self
    }

    pub fn checkin(mut self, value: impl Into<String>) -> Self {
        self.checkin = Some(value.into());
        self
    }

    pub fn checkout(mut self, value: impl Into<String>) -> Self {
        self.checkout = Some(value.into());
        self
    }

    /// Query pairs in fixed parameter order, keyed by field.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        [
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("checkin", &self.checkin),
            ("checkout", &self.checkout),
        ]
        .into_iter()
        .filter_map(|(key, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((key.to_string(), v.to_string())),
            _ => None,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_filter_sends_nothing() {
        assert!(BookingFilter::new().query_pairs().is_empty());
    }

    #[test]
    fn empty_strings_are_omitted() {
        let filter = BookingFilter::new().firstname("").checkin("");
        assert!(filter.query_pairs().is_empty());
    }

    #[test]
    fn identical_values_keep_their_own_keys() {
        let filter = BookingFilter::new().firstname("Jordan").lastname("Jordan");
        assert_eq!(
            filter.query_pairs(),
            pairs(&[("firstname", "Jordan"), ("lastname", "Jordan")])
        );
    }

    #[test]
    fn identical_dates_keep_their_own_keys() {
        let filter = BookingFilter::new().checkout("2022-01-01").checkin("2022-01-01");
        assert_eq!(
            filter.query_pairs(),
            pairs(&[("checkin", "2022-01-01"), ("checkout", "2022-01-01")])
        );
    }

    #[test]
    fn booking_without_needs_omits_the_key() {
        let booking = Booking {
            firstname: "Janusz".to_string(),
            lastname: "Kowalski".to_string(),
            totalprice: 212,
            depositpaid: true,
            bookingdates: BookingDates {
                checkin: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                checkout: NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(),
            },
            additionalneeds: None,
        };
        let json = serde_json::to_value(&booking).unwrap();
        assert!(json.get("additionalneeds").is_none());
        assert_eq!(json["bookingdates"]["checkin"], "2022-01-01");
    }

    #[test]
    fn auth_reply_is_told_apart_by_shape() {
        let ok: AuthReply = serde_json::from_str(r#"{"token":"abc123"}"#).unwrap();
        assert_eq!(ok, AuthReply::Token { token: "abc123".to_string() });

        let refused: AuthReply = serde_json::from_str(r#"{"reason":"Bad credentials"}"#).unwrap();
        assert_eq!(
            refused,
            AuthReply::Refused { reason: "Bad credentials".to_string() }
        );
    }
}
