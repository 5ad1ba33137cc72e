//! Restaurant records and table classes.

use serde::{Deserialize, Serialize};

/// Coarse table-size buckets used instead of per-seat tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    Small,
    Medium,
    Large,
}

impl TableType {
    /// Map a party size to its table class.
    ///
    /// Total and deterministic: up to 2 seats small, up to 4 medium, up to 8
    /// large. Larger parties don't fit any table and get `None`.
    pub fn for_party(party_size: u32) -> Option<Self> {
        match party_size {
            0..=2 => Some(TableType::Small),
            3..=4 => Some(TableType::Medium),
            5..=8 => Some(TableType::Large),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Small => "small",
            TableType::Medium => "medium",
            TableType::Large => "large",
        }
    }
}

impl std::fmt::Display for TableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One size class of a restaurant's table inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInventory {
    /// Seats per table of this class.
    pub capacity: u32,
    /// How many tables of this class exist.
    pub count: u32,
}

/// The full table inventory, one entry per size class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tables {
    pub small: TableInventory,
    pub medium: TableInventory,
    pub large: TableInventory,
}

impl Tables {
    pub fn get(&self, table_type: TableType) -> &TableInventory {
        match table_type {
            TableType::Small => &self.small,
            TableType::Medium => &self.medium,
            TableType::Large => &self.large,
        }
    }
}

/// Opening hours as zero-padded `HH:MM` strings.
///
/// Kept as strings on purpose: both bounds are zero-padded, so lexical
/// comparison orders them correctly and matches the on-disk format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hours {
    pub open: String,
    pub close: String,
}

/// A restaurant record. Immutable for the duration of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub location: String,
    pub cuisine: String,
    /// Total seating capacity across all tables.
    pub capacity: u32,
    pub tables: Tables,
    pub hours: Hours,
    pub price_range: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub rating: f64,
}

impl Restaurant {
    /// Whether the restaurant is open at `time` (inclusive at both bounds).
    pub fn open_at(&self, time: &str) -> bool {
        time >= self.hours.open.as_str() && time <= self.hours.close.as_str()
    }

    /// Case-insensitive check that every requested feature is present.
    pub fn has_features<'a>(&self, wanted: impl IntoIterator<Item = &'a str>) -> bool {
        let owned: Vec<String> = self.features.iter().map(|f| f.to_lowercase()).collect();
        wanted
            .into_iter()
            .all(|f| owned.iter().any(|have| have == &f.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_size_maps_to_table_type() {
        assert_eq!(TableType::for_party(1), Some(TableType::Small));
        assert_eq!(TableType::for_party(2), Some(TableType::Small));
        assert_eq!(TableType::for_party(3), Some(TableType::Medium));
        assert_eq!(TableType::for_party(4), Some(TableType::Medium));
        assert_eq!(TableType::for_party(5), Some(TableType::Large));
        assert_eq!(TableType::for_party(8), Some(TableType::Large));
        assert_eq!(TableType::for_party(9), None);
        assert_eq!(TableType::for_party(20), None);
    }

    #[test]
    fn table_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TableType::Medium).unwrap(),
            "\"medium\""
        );
    }

    #[test]
    fn restaurant_json_roundtrip() {
        let json = serde_json::json!({
            "id": "rest001",
            "name": "Blue Trattoria",
            "location": "Downtown",
            "cuisine": "Italian",
            "capacity": 58,
            "tables": {
                "small": {"capacity": 2, "count": 5},
                "medium": {"capacity": 4, "count": 8},
                "large": {"capacity": 8, "count": 2}
            },
            "hours": {"open": "11:00", "close": "22:00"},
            "price_range": "$$",
            "features": ["outdoor seating", "bar"],
            "description": "A $$ italian restaurant located in Downtown.",
            "rating": 4.4
        });

        let restaurant: Restaurant = serde_json::from_value(json).unwrap();
        assert_eq!(restaurant.tables.get(TableType::Medium).count, 8);
        assert!(restaurant.open_at("11:00"));
        assert!(restaurant.open_at("22:00"));
        assert!(!restaurant.open_at("22:30"));
        assert!(restaurant.has_features(["BAR"]));
        assert!(!restaurant.has_features(["bar", "live music"]));
    }
}
