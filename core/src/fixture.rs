//! Create-then-delete scoping for bookings.
//!
//! The service keeps every booking until someone deletes it. A
//! `BookingGuard` owns one booking for the length of a scenario and deletes
//! it when dropped, so a failed assertion does not leave records behind.

use serde::Serialize;
use tracing::warn;

use crate::client::BookerClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Booking, BookingId, CreatedBooking};

pub struct BookingGuard<'a, T: Transport> {
    client: &'a BookerClient<T>,
    created: CreatedBooking,
    armed: bool,
}

impl<'a, T: Transport> BookingGuard<'a, T> {
    /// Create `booking` and take ownership of the resulting id.
    pub fn create(client: &'a BookerClient<T>, booking: &Booking) -> Result<Self, ApiError> {
        let response = client.create_booking(booking)?;
        response.ensure_status(200)?;
        let created: CreatedBooking = response.json()?;
        Ok(Self {
            client,
            created,
            armed: true,
        })
    }

    pub fn id(&self) -> BookingId {
        self.created.bookingid
    }

    /// The booking as echoed back by the create call.
    pub fn booking(&self) -> &Booking {
        &self.created.booking
    }

    /// Give up ownership without deleting, for scenarios that delete the
    /// booking themselves.
    pub fn into_id(mut self) -> BookingId {
        self.armed = false;
        self.created.bookingid
    }
}

impl<T: Transport> Drop for BookingGuard<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let id = self.created.bookingid;
        match self.client.delete_booking(id) {
            Ok(resp) if resp.status == 201 => {}
            Ok(resp) => warn!(id, status = resp.status, "booking cleanup rejected"),
            Err(e) => warn!(id, error = %e, "booking cleanup failed"),
        }
    }
}
