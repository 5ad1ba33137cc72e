//! JSON-file-backed restaurant and reservation stores.
//!
//! The restaurant file is read-only at runtime and produced by the `seed`
//! command. The reservation file is rewritten wholesale on every mutation;
//! there is no locking, so concurrent writers can lose updates. That is an
//! accepted limitation for single-user use.

mod reservation;
mod restaurant;

pub use reservation::{Reservation, ReservationStatus};
pub use restaurant::{Hours, Restaurant, TableInventory, TableType, Tables};

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::StoreError;

/// Handle to the two backing files.
///
/// Holds paths only; every load re-reads the file so each domain operation
/// sees the latest on-disk state.
#[derive(Debug, Clone)]
pub struct Datastore {
    restaurants_path: PathBuf,
    reservations_path: PathBuf,
}

impl Datastore {
    pub fn new(restaurants_path: impl Into<PathBuf>, reservations_path: impl Into<PathBuf>) -> Self {
        Self {
            restaurants_path: restaurants_path.into(),
            reservations_path: reservations_path.into(),
        }
    }

    pub fn restaurants_path(&self) -> &Path {
        &self.restaurants_path
    }

    pub fn load_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        load_json(&self.restaurants_path)
    }

    /// Load all reservations. A missing file reads as an empty list so the
    /// first reservation can be created without any setup.
    pub fn load_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        if !self.reservations_path.exists() {
            return Ok(Vec::new());
        }
        load_json(&self.reservations_path)
    }

    /// Rewrite the full reservation list.
    pub fn save_reservations(&self, reservations: &[Reservation]) -> Result<(), StoreError> {
        if let Some(parent) = self.reservations_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.reservations_path.clone(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(reservations).map_err(|source| {
            StoreError::Parse {
                path: self.reservations_path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.reservations_path, json).map_err(|source| StoreError::Write {
            path: self.reservations_path.clone(),
            source,
        })
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let data = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Generate a time-based identifier, e.g. `res20260830143015123456`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}{}", prefix, Local::now().format("%Y%m%d%H%M%S%6f"))
}

/// Current local time as an ISO-8601 string, used for reservation timestamps.
pub fn now_timestamp() -> String {
    Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_reservation_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = Datastore::new(
            dir.path().join("restaurants.json"),
            dir.path().join("reservations.json"),
        );
        assert!(store.load_reservations().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = Datastore::new(
            dir.path().join("restaurants.json"),
            dir.path().join("reservations.json"),
        );

        let reservation = Reservation::new(
            "rest001",
            "Blue Trattoria",
            "Alex Smith",
            2,
            "2026-09-01",
            "19:00",
            TableType::Small,
        );
        store.save_reservations(&[reservation.clone()]).unwrap();

        let loaded = store.load_reservations().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, reservation.id);
        assert_eq!(loaded[0].status, ReservationStatus::Confirmed);
    }

    #[test]
    fn generated_ids_carry_prefix() {
        let id = generate_id("res");
        assert!(id.starts_with("res"));
        assert!(id.len() > "res".len() + 14);
    }
}
