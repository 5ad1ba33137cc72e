//! Availability tool.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use super::{require_str, require_u32};
use crate::store::Datastore;
use crate::tools::tool::{Tool, ToolError, ToolOutput};

pub struct CheckAvailabilityTool {
    store: Arc<Datastore>,
}

impl CheckAvailabilityTool {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CheckAvailabilityTool {
    fn name(&self) -> &str {
        "check_availability"
    }

    fn description(&self) -> &str {
        "Check if a restaurant has availability for a specific date, time, and party size"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "restaurant_id": {
                    "type": "string",
                    "description": "Unique identifier of the restaurant"
                },
                "date": {
                    "type": "string",
                    "description": "Date for reservation (YYYY-MM-DD format)"
                },
                "time": {
                    "type": "string",
                    "description": "Time for reservation (HH:MM format, 24-hour)"
                },
                "party_size": {
                    "type": "integer",
                    "description": "Number of people in the party"
                }
            },
            "required": ["restaurant_id", "date", "time", "party_size"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let restaurant_id = require_str(&params, "restaurant_id")?;
        let date = require_str(&params, "date")?;
        let time = require_str(&params, "time")?;
        let party_size = require_u32(&params, "party_size")?;

        let outcome =
            crate::ops::check_availability(&self.store, restaurant_id, date, time, party_size)?;
        let result = serde_json::to_value(&outcome)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        Ok(ToolOutput::success(result, start.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Hours, Restaurant, TableInventory, Tables};
    use tempfile::TempDir;

    fn store() -> (TempDir, Arc<Datastore>) {
        let dir = TempDir::new().unwrap();
        let restaurants = vec![Restaurant {
            id: "rest001".to_string(),
            name: "Blue Trattoria".to_string(),
            location: "Downtown".to_string(),
            cuisine: "Italian".to_string(),
            capacity: 40,
            tables: Tables {
                small: TableInventory { capacity: 2, count: 4 },
                medium: TableInventory { capacity: 4, count: 4 },
                large: TableInventory { capacity: 8, count: 2 },
            },
            hours: Hours {
                open: "11:00".to_string(),
                close: "22:00".to_string(),
            },
            price_range: "$$".to_string(),
            features: vec![],
            description: String::new(),
            rating: 4.4,
        }];
        let path = dir.path().join("restaurants.json");
        std::fs::write(&path, serde_json::to_string(&restaurants).unwrap()).unwrap();
        let store = Arc::new(Datastore::new(path, dir.path().join("reservations.json")));
        (dir, store)
    }

    #[tokio::test]
    async fn reports_availability_as_json() {
        let (_dir, store) = store();
        let tool = CheckAvailabilityTool::new(store);

        let output = tool
            .execute(json!({
                "restaurant_id": "rest001",
                "date": "2026-09-01",
                "time": "19:00",
                "party_size": 2
            }))
            .await
            .unwrap();

        assert_eq!(output.result["available"], true);
        assert_eq!(output.result["table_type"], "small");
    }

    #[tokio::test]
    async fn party_size_as_string_is_coerced() {
        let (_dir, store) = store();
        let tool = CheckAvailabilityTool::new(store);

        let output = tool
            .execute(json!({
                "restaurant_id": "rest001",
                "date": "2026-09-01",
                "time": "19:00",
                "party_size": "6"
            }))
            .await
            .unwrap();

        assert_eq!(output.result["available"], true);
        assert_eq!(output.result["table_type"], "large");
    }

    #[tokio::test]
    async fn missing_parameter_is_rejected() {
        let (_dir, store) = store();
        let tool = CheckAvailabilityTool::new(store);

        let err = tool
            .execute(json!({"restaurant_id": "rest001", "date": "2026-09-01", "time": "19:00"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }
}
