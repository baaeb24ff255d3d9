use std::{
    collections::{BTreeMap, VecDeque},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password123";

/// Live tokens kept by the mock; the oldest is dropped once this is reached.
pub const MAX_TOKENS: usize = 256;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i64,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingDates {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedBooking {
    pub bookingid: u64,
    pub booking: Booking,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRef {
    pub bookingid: u64,
}

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
}

/// Bookings are stored as raw JSON: `PATCH` merges fields without checking
/// their types, and later reads must return whatever was merged.
#[derive(Default)]
pub struct Store {
    next_id: u64,
    bookings: BTreeMap<u64, Value>,
    tokens: VecDeque<String>,
}

impl Store {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        cookie_tokens(headers).any(|token| self.tokens.iter().any(|live| live == token))
    }

    fn issue_token(&mut self) -> String {
        let mut token = Uuid::new_v4().simple().to_string();
        token.truncate(15);
        if self.tokens.len() >= MAX_TOKENS {
            self.tokens.pop_front();
        }
        self.tokens.push_back(token.clone());
        token
    }

    fn existing_id(&self, raw: &str) -> Option<u64> {
        raw.parse().ok().filter(|id| self.bookings.contains_key(id))
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::default();
    Router::new()
        .route("/ping", get(ping))
        .route("/auth", post(create_token))
        .route("/booking", get(list_bookings).post(create_booking))
        .route(
            "/booking/{id}",
            get(get_booking)
                .put(update_booking)
                .patch(partial_update_booking)
                .delete(delete_booking),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn status(code: StatusCode) -> Response {
    (code, code.canonical_reason().unwrap_or_default()).into_response()
}

async fn ping() -> Response {
    status(StatusCode::CREATED)
}

// Bad credentials are a 200 with a reason body, as on the public service.
async fn create_token(State(db): State<Db>, Form(creds): Form<Credentials>) -> Json<Value> {
    if creds.username != ADMIN_USERNAME || creds.password != ADMIN_PASSWORD {
        return Json(json!({ "reason": "Bad credentials" }));
    }
    let token = db.write().await.issue_token();
    Json(json!({ "token": token }))
}

async fn list_bookings(State(db): State<Db>, Query(query): Query<ListQuery>) -> Response {
    let (Ok(checkin), Ok(checkout)) = (
        parse_filter_date(query.checkin.as_deref()),
        parse_filter_date(query.checkout.as_deref()),
    ) else {
        return status(StatusCode::INTERNAL_SERVER_ERROR);
    };
    let firstname = query.firstname.as_deref().filter(|v| !v.is_empty());
    let lastname = query.lastname.as_deref().filter(|v| !v.is_empty());

    let store = db.read().await;
    let ids: Vec<BookingRef> = store
        .bookings
        .iter()
        .filter(|(_, booking)| {
            text_matches(booking, "firstname", firstname)
                && text_matches(booking, "lastname", lastname)
                && checkin.is_none_or(|from| stored_date(booking, "checkin").is_some_and(|d| d >= from))
                && checkout.is_none_or(|to| stored_date(booking, "checkout").is_some_and(|d| d <= to))
        })
        .map(|(id, _)| BookingRef { bookingid: *id })
        .collect();
    Json(ids).into_response()
}

async fn get_booking(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let store = db.read().await;
    match store.existing_id(&id).and_then(|id| store.bookings.get(&id)) {
        Some(booking) => Json(booking.clone()).into_response(),
        None => status(StatusCode::NOT_FOUND),
    }
}

async fn create_booking(State(db): State<Db>, body: Bytes) -> Response {
    let Ok(booking) = serde_json::from_slice::<Booking>(&body) else {
        return status(StatusCode::INTERNAL_SERVER_ERROR);
    };
    let Ok(stored) = serde_json::to_value(&booking) else {
        return status(StatusCode::INTERNAL_SERVER_ERROR);
    };
    let mut store = db.write().await;
    store.next_id += 1;
    let bookingid = store.next_id;
    store.bookings.insert(bookingid, stored);
    debug!(bookingid, "booking created");
    Json(CreatedBooking { bookingid, booking }).into_response()
}

async fn update_booking(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut store = db.write().await;
    if !store.authorized(&headers) {
        return status(StatusCode::FORBIDDEN);
    }
    let Some(id) = store.existing_id(&id) else {
        return status(StatusCode::METHOD_NOT_ALLOWED);
    };
    let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
        return status(StatusCode::BAD_REQUEST);
    };
    if !has_required_fields(&payload) {
        return status(StatusCode::BAD_REQUEST);
    }
    let Ok(booking) = serde_json::from_value::<Booking>(payload) else {
        return status(StatusCode::INTERNAL_SERVER_ERROR);
    };
    let Ok(stored) = serde_json::to_value(&booking) else {
        return status(StatusCode::INTERNAL_SERVER_ERROR);
    };
    store.bookings.insert(id, stored);
    Json(booking).into_response()
}

async fn partial_update_booking(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut store = db.write().await;
    if !store.authorized(&headers) {
        return status(StatusCode::FORBIDDEN);
    }
    let Some(id) = store.existing_id(&id) else {
        return status(StatusCode::METHOD_NOT_ALLOWED);
    };
    let Ok(Value::Object(patch)) = serde_json::from_slice::<Value>(&body) else {
        return status(StatusCode::BAD_REQUEST);
    };
    let Some(Value::Object(booking)) = store.bookings.get_mut(&id) else {
        return status(StatusCode::INTERNAL_SERVER_ERROR);
    };
    for (key, value) in patch {
        match value {
            Value::Object(partial) if key == "bookingdates" => match booking.get_mut(&key) {
                Some(Value::Object(dates)) => dates.extend(partial),
                _ => {
                    booking.insert(key, Value::Object(partial));
                }
            },
            value => {
                booking.insert(key, value);
            }
        }
    }
    Json(Value::Object(booking.clone())).into_response()
}

async fn delete_booking(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut store = db.write().await;
    if !store.authorized(&headers) {
        return status(StatusCode::FORBIDDEN);
    }
    let Some(id) = store.existing_id(&id) else {
        return status(StatusCode::METHOD_NOT_ALLOWED);
    };
    store.bookings.remove(&id);
    debug!(bookingid = id, "booking deleted");
    status(StatusCode::CREATED)
}

fn cookie_tokens(headers: &HeaderMap) -> impl Iterator<Item = &str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix("token="))
}

fn has_required_fields(payload: &Value) -> bool {
    let present = |value: &Value, key: &str| value.get(key).is_some_and(|v| !v.is_null());
    ["firstname", "lastname", "totalprice", "depositpaid", "bookingdates"]
        .iter()
        .all(|key| present(payload, key))
        && ["checkin", "checkout"]
            .iter()
            .all(|key| present(&payload["bookingdates"], key))
}

/// Accepts a full date, a year-month or a bare year. Empty means no filter.
fn parse_filter_date(value: Option<&str>) -> Result<Option<NaiveDate>, ()> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(Some(date));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}-01"), DATE_FORMAT) {
        return Ok(Some(date));
    }
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        let year = value.parse().map_err(|_| ())?;
        return NaiveDate::from_ymd_opt(year, 1, 1).map(Some).ok_or(());
    }
    Err(())
}

fn text_matches(booking: &Value, key: &str, wanted: Option<&str>) -> bool {
    wanted.is_none_or(|wanted| booking[key].as_str() == Some(wanted))
}

fn stored_date(booking: &Value, key: &str) -> Option<NaiveDate> {
    booking["bookingdates"][key]
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}
