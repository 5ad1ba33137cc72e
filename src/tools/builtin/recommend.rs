//! Recommendation tool.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use super::{opt_str, opt_u32, opt_u32_lenient};
use crate::ops::RecommendQuery;
use crate::store::Datastore;
use crate::tools::tool::{Tool, ToolError, ToolOutput};

pub struct RecommendRestaurantsTool {
    store: Arc<Datastore>,
}

impl RecommendRestaurantsTool {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for RecommendRestaurantsTool {
    fn name(&self) -> &str {
        "recommend_restaurants"
    }

    fn description(&self) -> &str {
        "Search for and recommend restaurants based on user preferences with fallback options if initial search yields no results"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "party_size": {
                    "type": "integer",
                    "description": "Number of people in the party"
                },
                "date": {
                    "type": "string",
                    "description": "Date for the reservation (YYYY-MM-DD format)"
                },
                "time": {
                    "type": "string",
                    "description": "Time for the reservation (HH:MM format, 24-hour)"
                },
                "location": {
                    "type": "string",
                    "description": "Preferred area or neighborhood"
                },
                "cuisine": {
                    "type": "string",
                    "description": "Type of cuisine preferred"
                },
                "price_range": {
                    "type": "string",
                    "description": "Price range ($ for budget, $$ for mid-range, $$$ for high-end)"
                },
                "features": {
                    "type": "string",
                    "description": "Comma-separated list of desired features (e.g., 'outdoor seating, kid-friendly')"
                },
                "limit": {
                    "type": "integer",
                    "description": "Number of top restaurants to return based on rating (default: 5)"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let query = RecommendQuery {
            party_size: opt_u32(&params, "party_size")?,
            date: opt_str(&params, "date"),
            time: opt_str(&params, "time"),
            location: opt_str(&params, "location"),
            cuisine: opt_str(&params, "cuisine"),
            price_range: opt_str(&params, "price_range"),
            features: opt_str(&params, "features"),
            // A garbled limit silently falls back to the default.
            limit: opt_u32_lenient(&params, "limit"),
            fallback_search: true,
        };

        let outcome = crate::ops::recommend_restaurants(&self.store, &query)?;
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
        let restaurant = |id: &str, cuisine: &str, rating: f64| Restaurant {
            id: id.to_string(),
            name: format!("{cuisine} Place"),
            location: "Downtown".to_string(),
            cuisine: cuisine.to_string(),
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
            rating,
        };
        let restaurants = vec![
            restaurant("rest001", "Italian", 4.4),
            restaurant("rest002", "Japanese", 4.7),
        ];
        let path = dir.path().join("restaurants.json");
        std::fs::write(&path, serde_json::to_string(&restaurants).unwrap()).unwrap();
        let store = Arc::new(Datastore::new(path, dir.path().join("reservations.json")));
        (dir, store)
    }

    #[tokio::test]
    async fn no_parameters_recommends_by_rating() {
        let (_dir, store) = store();
        let tool = RecommendRestaurantsTool::new(store);

        let output = tool.execute(json!({})).await.unwrap();
        assert_eq!(output.result["count"], 2);
        assert_eq!(output.result["restaurants"][0]["id"], "rest002");
    }

    #[tokio::test]
    async fn invalid_limit_falls_back_to_default() {
        let (_dir, store) = store();
        let tool = RecommendRestaurantsTool::new(store);

        let output = tool
            .execute(json!({"limit": "a few"}))
            .await
            .unwrap();
        assert_eq!(output.result["count"], 2);
    }

    #[tokio::test]
    async fn cuisine_fallback_is_reported() {
        let (_dir, store) = store();
        let tool = RecommendRestaurantsTool::new(store);

        let output = tool.execute(json!({"cuisine": "Mexican"})).await.unwrap();
        assert_eq!(output.result["fallback_applied"], true);
        assert_eq!(output.result["count"], 2);
    }
}
