//! Reservation records.

use serde::{Deserialize, Serialize};

use super::restaurant::TableType;
use super::{generate_id, now_timestamp};

/// Lifecycle state of a reservation. Cancelled records stay in the store;
/// nothing is ever physically deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Confirmed => f.write_str("confirmed"),
            ReservationStatus::Pending => f.write_str("pending"),
            ReservationStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A reservation record as stored in the reservation file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Time-based unique id, `res` prefix.
    pub id: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub customer_name: String,
    pub party_size: u32,
    /// `YYYY-MM-DD`.
    pub reservation_date: String,
    /// `HH:MM`, 24-hour.
    pub reservation_time: String,
    pub table_type: TableType,
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Reservation {
    /// Build a fresh confirmed reservation with generated id and timestamps.
    pub fn new(
        restaurant_id: impl Into<String>,
        restaurant_name: impl Into<String>,
        customer_name: impl Into<String>,
        party_size: u32,
        reservation_date: impl Into<String>,
        reservation_time: impl Into<String>,
        table_type: TableType,
    ) -> Self {
        let now = now_timestamp();
        Self {
            id: generate_id("res"),
            restaurant_id: restaurant_id.into(),
            restaurant_name: restaurant_name.into(),
            customer_name: customer_name.into(),
            party_size,
            reservation_date: reservation_date.into(),
            reservation_time: reservation_time.into(),
            table_type,
            status: ReservationStatus::Confirmed,
            customer_email: None,
            customer_phone: None,
            special_requests: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Refresh the last-updated timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_timestamp();
    }
}
