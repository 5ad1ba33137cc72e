//! Domain operations over the restaurant and reservation stores.
//!
//! Every function here is stateless: it re-reads the backing file, applies a
//! single-pass filter or mutation, and (for writes) rewrites the whole file.
//! Validation failures are reported inline in the outcome structs rather than
//! as Rust errors, so the orchestrator can forward them to the model verbatim;
//! only I/O and JSON problems surface as [`StoreError`].

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::StoreError;
use crate::store::{Datastore, Reservation, ReservationStatus, Restaurant, TableType};

/// Check `YYYY-MM-DD`.
pub fn is_valid_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Check `HH:MM`, 24-hour.
pub fn is_valid_time(time: &str) -> bool {
    NaiveTime::parse_from_str(time, "%H:%M").is_ok()
}

/// Filters for a restaurant search. All optional; provided filters AND
/// together, and an absent filter matches everything.
#[derive(Debug, Default, Clone)]
pub struct SearchFilters {
    pub location: Option<String>,
    pub cuisine: Option<String>,
    pub min_capacity: Option<u32>,
    /// Comma-separated feature list; a match must have every one.
    pub features: Option<String>,
    pub price_range: Option<String>,
}

/// Single-pass filter over the restaurant file.
pub fn search_restaurants(
    store: &Datastore,
    filters: &SearchFilters,
) -> Result<Vec<Restaurant>, StoreError> {
    let restaurants = store.load_restaurants()?;

    let wanted_features: Vec<String> = filters
        .features
        .as_deref()
        .map(|f| {
            f.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(restaurants
        .into_iter()
        .filter(|r| {
            let location_ok = filters
                .location
                .as_deref()
                .is_none_or(|l| r.location.eq_ignore_ascii_case(l));
            let cuisine_ok = filters
                .cuisine
                .as_deref()
                .is_none_or(|c| r.cuisine.eq_ignore_ascii_case(c));
            let capacity_ok = filters.min_capacity.is_none_or(|min| r.capacity >= min);
            let price_ok = filters
                .price_range
                .as_deref()
                .is_none_or(|p| r.price_range == p);
            let features_ok = wanted_features.is_empty()
                || r.has_features(wanted_features.iter().map(String::as_str));

            location_ok && cuisine_ok && capacity_ok && price_ok && features_ok
        })
        .collect())
}

/// All distinct cuisine types, sorted.
pub fn get_cuisines(store: &Datastore) -> Result<Vec<String>, StoreError> {
    let mut cuisines: Vec<String> = store
        .load_restaurants()?
        .into_iter()
        .map(|r| r.cuisine)
        .collect();
    cuisines.sort();
    cuisines.dedup();
    Ok(cuisines)
}

/// All distinct locations, sorted.
pub fn get_locations(store: &Datastore) -> Result<Vec<String>, StoreError> {
    let mut locations: Vec<String> = store
        .load_restaurants()?
        .into_iter()
        .map(|r| r.location)
        .collect();
    locations.sort();
    locations.dedup();
    Ok(locations)
}

/// All distinct feature tags, sorted.
pub fn get_features(store: &Datastore) -> Result<Vec<String>, StoreError> {
    let mut features: Vec<String> = store
        .load_restaurants()?
        .into_iter()
        .flat_map(|r| r.features)
        .collect();
    features.sort();
    features.dedup();
    Ok(features)
}

/// Result of an availability check.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityOutcome {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_type: Option<TableType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl AvailabilityOutcome {
    fn unavailable(error: impl Into<String>) -> Self {
        Self {
            available: false,
            error: Some(error.into()),
            restaurant_name: None,
            table_type: None,
            party_size: None,
            date: None,
            time: None,
        }
    }
}

/// Static capacity check: is the restaurant open at `time`, and does the
/// table class for `party_size` have any tables at all?
///
/// Deliberately not a conflict check; existing reservations are ignored.
/// Time bounds compare lexically, which is correct because both sides are
/// zero-padded `HH:MM`.
pub fn check_availability(
    store: &Datastore,
    restaurant_id: &str,
    date: &str,
    time: &str,
    party_size: u32,
) -> Result<AvailabilityOutcome, StoreError> {
    if !is_valid_date(date) {
        return Ok(AvailabilityOutcome::unavailable(
            "Invalid date format. Use YYYY-MM-DD.",
        ));
    }
    if !is_valid_time(time) {
        return Ok(AvailabilityOutcome::unavailable(
            "Invalid time format. Use HH:MM in 24-hour format.",
        ));
    }

    let restaurants = store.load_restaurants()?;
    let Some(restaurant) = restaurants.iter().find(|r| r.id == restaurant_id) else {
        return Ok(AvailabilityOutcome::unavailable(format!(
            "Restaurant with ID {restaurant_id} not found."
        )));
    };

    if !restaurant.open_at(time) {
        return Ok(AvailabilityOutcome::unavailable(format!(
            "Restaurant is not open at {time}. Hours: {} - {}",
            restaurant.hours.open, restaurant.hours.close
        )));
    }

    let Some(table_type) = TableType::for_party(party_size) else {
        return Ok(AvailabilityOutcome::unavailable(
            "Party size exceeds maximum table capacity.",
        ));
    };

    if restaurant.tables.get(table_type).count == 0 {
        return Ok(AvailabilityOutcome::unavailable(
            "No tables available for this party size.",
        ));
    }

    Ok(AvailabilityOutcome {
        available: true,
        error: None,
        restaurant_name: Some(restaurant.name.clone()),
        table_type: Some(table_type),
        party_size: Some(party_size),
        date: Some(date.to_string()),
        time: Some(time.to_string()),
    })
}

/// A recommendation query: search filters plus the optional booking slot used
/// for availability filtering.
#[derive(Debug, Clone)]
pub struct RecommendQuery {
    pub party_size: Option<u32>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub cuisine: Option<String>,
    pub price_range: Option<String>,
    pub features: Option<String>,
    pub limit: Option<u32>,
    pub fallback_search: bool,
}

impl Default for RecommendQuery {
    fn default() -> Self {
        Self {
            party_size: None,
            date: None,
            time: None,
            location: None,
            cuisine: None,
            price_range: None,
            features: None,
            limit: None,
            fallback_search: true,
        }
    }
}

/// Echo of the original query, always serialized in full (nulls included) so
/// the model can see which filters were in play.
#[derive(Debug, Clone, Serialize)]
pub struct QueryEcho {
    pub location: Option<String>,
    pub cuisine: Option<String>,
    pub party_size: Option<u32>,
    pub features: Option<String>,
    pub price_range: Option<String>,
}

/// Result of a recommendation, with fallback and availability metadata.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendOutcome {
    pub restaurants: Vec<Restaurant>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_matches: Option<usize>,
    pub original_query: QueryEcho,
    pub fallback_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_message: Option<String>,
    pub filtered_by_availability: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

const DEFAULT_RECOMMEND_LIMIT: usize = 5;

/// Search with relaxation fallbacks, optional availability filtering, and
/// rating-ranked truncation.
///
/// Fallbacks fire only when the strict query is empty: first the feature
/// filter is dropped, then the cuisine filter. When date, time, and party
/// size are all present, the result set is narrowed to available restaurants,
/// but only when that subset is non-empty. An all-unavailable set is left
/// unfiltered so the model still has options to talk about; `available_count`
/// exposes the zero either way.
pub fn recommend_restaurants(
    store: &Datastore,
    query: &RecommendQuery,
) -> Result<RecommendOutcome, StoreError> {
    let strict = SearchFilters {
        location: query.location.clone(),
        cuisine: query.cuisine.clone(),
        min_capacity: query.party_size,
        features: query.features.clone(),
        price_range: query.price_range.clone(),
    };
    let mut results = search_restaurants(store, &strict)?;

    let echo = QueryEcho {
        location: query.location.clone(),
        cuisine: query.cuisine.clone(),
        party_size: query.party_size,
        features: query.features.clone(),
        price_range: query.price_range.clone(),
    };

    let mut fallback_applied = false;
    let mut fallback_message = None;

    if results.is_empty() && query.fallback_search {
        if query.features.is_some() {
            let relaxed = search_restaurants(
                store,
                &SearchFilters {
                    features: None,
                    ..strict.clone()
                },
            )?;
            if !relaxed.is_empty() {
                tracing::debug!("recommend fallback: dropped feature filter");
                fallback_applied = true;
                fallback_message = Some(format!(
                    "No restaurants found in {} with {} features. Showing results without features.",
                    query.location.as_deref().unwrap_or("any area"),
                    query.features.as_deref().unwrap_or_default(),
                ));
                results = relaxed;
            }
        }

        if results.is_empty() && query.cuisine.is_some() {
            let relaxed = search_restaurants(
                store,
                &SearchFilters {
                    cuisine: None,
                    ..strict.clone()
                },
            )?;
            if !relaxed.is_empty() {
                tracing::debug!("recommend fallback: dropped cuisine filter");
                fallback_applied = true;
                fallback_message = Some(format!(
                    "No {} cuisine restaurants found. Showing all cuisines in {}.",
                    query.cuisine.as_deref().unwrap_or_default(),
                    query.location.as_deref().unwrap_or("all locations"),
                ));
                results = relaxed;
            }
        }
    }

    if results.is_empty() {
        return Ok(RecommendOutcome {
            restaurants: Vec::new(),
            count: 0,
            total_matches: None,
            original_query: echo,
            fallback_applied: false,
            fallback_message: None,
            filtered_by_availability: false,
            available_count: None,
            message: Some("No restaurants found matching your criteria.".to_string()),
        });
    }

    let mut filtered_by_availability = false;
    let mut available_count = None;
    if let (Some(date), Some(time), Some(party_size)) =
        (query.date.as_deref(), query.time.as_deref(), query.party_size)
    {
        filtered_by_availability = true;
        let mut available = Vec::new();
        for restaurant in &results {
            let outcome = check_availability(store, &restaurant.id, date, time, party_size)?;
            if outcome.available {
                available.push(restaurant.clone());
            }
        }
        available_count = Some(available.len());
        if !available.is_empty() {
            results = available;
        }
    }

    results.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let total_matches = results.len();
    let limit = query
        .limit
        .map(|l| l as usize)
        .unwrap_or(DEFAULT_RECOMMEND_LIMIT);
    results.truncate(limit);

    Ok(RecommendOutcome {
        count: results.len(),
        restaurants: results,
        total_matches: Some(total_matches),
        original_query: echo,
        fallback_applied,
        fallback_message,
        filtered_by_availability,
        available_count,
        message: None,
    })
}

/// Arguments for creating a reservation.
#[derive(Debug, Clone, Default)]
pub struct CreateReservationRequest {
    pub restaurant_id: String,
    pub customer_name: String,
    pub party_size: u32,
    pub reservation_date: String,
    pub reservation_time: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub special_requests: Option<String>,
}

/// Result of a reservation mutation or lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
}

impl ReservationOutcome {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            message: None,
            reservation: None,
        }
    }

    fn ok(reservation: Reservation) -> Self {
        Self {
            success: true,
            error: None,
            message: None,
            reservation: Some(reservation),
        }
    }
}

/// Re-check availability, then append the record and rewrite the file.
pub fn create_reservation(
    store: &Datastore,
    req: &CreateReservationRequest,
) -> Result<ReservationOutcome, StoreError> {
    let availability = check_availability(
        store,
        &req.restaurant_id,
        &req.reservation_date,
        &req.reservation_time,
        req.party_size,
    )?;
    if !availability.available {
        return Ok(ReservationOutcome::failure(
            availability
                .error
                .unwrap_or_else(|| "No availability".to_string()),
        ));
    }

    // The availability check vouched for the party size fitting a table.
    let Some(table_type) = TableType::for_party(req.party_size) else {
        return Ok(ReservationOutcome::failure(
            "Party size exceeds maximum table capacity.",
        ));
    };

    let restaurant_name = availability.restaurant_name.unwrap_or_default();

    let mut reservation = Reservation::new(
        req.restaurant_id.clone(),
        restaurant_name,
        req.customer_name.clone(),
        req.party_size,
        req.reservation_date.clone(),
        req.reservation_time.clone(),
        table_type,
    );
    reservation.customer_email = req.customer_email.clone();
    reservation.customer_phone = req.customer_phone.clone();
    reservation.special_requests = req.special_requests.clone();

    let mut reservations = store.load_reservations()?;
    reservations.push(reservation.clone());
    store.save_reservations(&reservations)?;

    tracing::info!(id = %reservation.id, restaurant = %reservation.restaurant_name, "reservation created");
    Ok(ReservationOutcome::ok(reservation))
}

/// Linear scan for a reservation by id.
pub fn get_reservation(store: &Datastore, reservation_id: &str) -> Result<ReservationOutcome, StoreError> {
    let reservations = store.load_reservations()?;
    if reservations.is_empty() {
        return Ok(ReservationOutcome::failure("No reservations found."));
    }

    match reservations.into_iter().find(|r| r.id == reservation_id) {
        Some(reservation) => Ok(ReservationOutcome::ok(reservation)),
        None => Ok(ReservationOutcome::failure(format!(
            "Reservation {reservation_id} not found."
        ))),
    }
}

/// Cancel by delegating to [`modify_reservation`] with a status change.
pub fn cancel_reservation(
    store: &Datastore,
    reservation_id: &str,
) -> Result<ReservationOutcome, StoreError> {
    let changes = ModifyReservationRequest {
        status: Some(ReservationStatus::Cancelled),
        ..Default::default()
    };
    let mut outcome = modify_reservation(store, reservation_id, &changes)?;
    if outcome.success {
        outcome.message = Some(format!("Reservation {reservation_id} has been cancelled."));
    }
    Ok(outcome)
}

/// Fields to change on an existing reservation. `None` leaves a field
/// untouched; `special_requests: Some("")` clears the text.
#[derive(Debug, Clone, Default)]
pub struct ModifyReservationRequest {
    pub party_size: Option<u32>,
    pub reservation_date: Option<String>,
    pub reservation_time: Option<String>,
    pub special_requests: Option<String>,
    pub status: Option<ReservationStatus>,
}

/// Apply provided fields to a reservation and rewrite the file.
///
/// Changing the slot (party size, date, or time) on a non-cancelled
/// reservation re-validates availability against the merged old/new
/// parameters before anything is committed.
pub fn modify_reservation(
    store: &Datastore,
    reservation_id: &str,
    changes: &ModifyReservationRequest,
) -> Result<ReservationOutcome, StoreError> {
    if let Some(date) = changes.reservation_date.as_deref() {
        if !is_valid_date(date) {
            return Ok(ReservationOutcome::failure(
                "Invalid date format. Use YYYY-MM-DD.",
            ));
        }
    }
    if let Some(time) = changes.reservation_time.as_deref() {
        if !is_valid_time(time) {
            return Ok(ReservationOutcome::failure(
                "Invalid time format. Use HH:MM in 24-hour format.",
            ));
        }
    }

    let mut reservations = store.load_reservations()?;
    if reservations.is_empty() {
        return Ok(ReservationOutcome::failure("No reservations found."));
    }

    let Some(index) = reservations.iter().position(|r| r.id == reservation_id) else {
        return Ok(ReservationOutcome::failure(format!(
            "Reservation {reservation_id} not found."
        )));
    };

    let slot_changed = changes.party_size.is_some()
        || changes.reservation_date.is_some()
        || changes.reservation_time.is_some();

    if slot_changed && reservations[index].status != ReservationStatus::Cancelled {
        let current = &reservations[index];
        let date = changes
            .reservation_date
            .as_deref()
            .unwrap_or(&current.reservation_date);
        let time = changes
            .reservation_time
            .as_deref()
            .unwrap_or(&current.reservation_time);
        let party_size = changes.party_size.unwrap_or(current.party_size);

        let availability =
            check_availability(store, &current.restaurant_id, date, time, party_size)?;
        if !availability.available {
            return Ok(ReservationOutcome::failure(availability.error.unwrap_or_else(
                || "No availability for the requested changes.".to_string(),
            )));
        }
    }

    let reservation = &mut reservations[index];
    if let Some(party_size) = changes.party_size {
        reservation.party_size = party_size;
        // Oversize parties only reach here on already-cancelled records, where
        // the availability check is skipped; they pin to the largest class.
        reservation.table_type =
            TableType::for_party(party_size).unwrap_or(TableType::Large);
    }
    if let Some(date) = changes.reservation_date.clone() {
        reservation.reservation_date = date;
    }
    if let Some(time) = changes.reservation_time.clone() {
        reservation.reservation_time = time;
    }
    if let Some(special_requests) = changes.special_requests.clone() {
        reservation.special_requests = Some(special_requests);
    }
    if let Some(status) = changes.status {
        reservation.status = status;
    }
    reservation.touch();

    let updated = reservation.clone();
    store.save_reservations(&reservations)?;

    tracing::info!(id = %reservation_id, "reservation updated");
    Ok(ReservationOutcome::ok(updated))
}
