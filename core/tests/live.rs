//! Scenarios against the configured public service.
//!
//! Ignored by default since they need network access and mutate shared
//! remote state. Run with `cargo test -p booker-core --test live -- --ignored`;
//! point them elsewhere with `BOOKER_BASE_URL`.

use booker_core::{Booking, BookingDates, BookingFilter, BookingGuard, BookingRef, BookerClient, BookerConfig};
use chrono::NaiveDate;
use serde_json::json;

fn client() -> BookerClient {
    BookerClient::new(BookerConfig::load().unwrap())
}

fn booking(firstname: &str) -> Booking {
    Booking {
        firstname: firstname.to_string(),
        lastname: "Kowalski".to_string(),
        totalprice: 212,
        depositpaid: true,
        bookingdates: BookingDates {
            checkin: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            checkout: NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(),
        },
        additionalneeds: Some("dinner".to_string()),
    }
}

#[test]
#[ignore = "hits the public booking service"]
fn live_ping() {
    assert_eq!(client().ping().unwrap().status, 201);
}

#[test]
#[ignore = "hits the public booking service"]
fn live_bad_credentials_are_200() {
    let resp = client().authenticate("admi", "assword123").unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json_value().unwrap(), json!({"reason": "Bad credentials"}));
}

#[test]
#[ignore = "hits the public booking service"]
fn live_filter_by_firstname_finds_new_booking() {
    let client = client();
    let guard = BookingGuard::create(&client, &booking("Januszek")).unwrap();
    let resp = client
        .list_booking_ids(&BookingFilter::new().firstname("Januszek"))
        .unwrap();
    assert_eq!(resp.status, 200);
    let refs: Vec<BookingRef> = resp.json().unwrap();
    assert!(refs.iter().any(|r| r.bookingid == guard.id()));
}

#[test]
#[ignore = "hits the public booking service"]
fn live_create_read_delete_lifecycle() {
    let client = client();
    let id = BookingGuard::create(&client, &booking("Jan")).unwrap().into_id();

    let resp = client.get_booking(id).unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json::<Booking>().unwrap(), booking("Jan"));

    assert_eq!(client.delete_booking(id).unwrap().status, 201);
    assert_eq!(client.get_booking(id).unwrap().status, 404);
}
