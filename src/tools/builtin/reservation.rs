//! Reservation lifecycle tools: create, look up, modify, cancel.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use super::{opt_str, opt_u32, require_str, require_u32};
use crate::ops::{CreateReservationRequest, ModifyReservationRequest};
use crate::store::{Datastore, ReservationStatus};
use crate::tools::tool::{Tool, ToolError, ToolOutput};

fn to_output(
    outcome: &impl serde::Serialize,
    start: Instant,
) -> Result<ToolOutput, ToolError> {
    let result =
        serde_json::to_value(outcome).map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
    Ok(ToolOutput::success(result, start.elapsed()))
}

pub struct CreateReservationTool {
    store: Arc<Datastore>,
}

impl CreateReservationTool {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CreateReservationTool {
    fn name(&self) -> &str {
        "create_reservation"
    }

    fn description(&self) -> &str {
        "Create a new restaurant reservation"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "restaurant_id": {
                    "type": "string",
                    "description": "Unique identifier of the restaurant"
                },
                "customer_name": {
                    "type": "string",
                    "description": "Full name of the customer"
                },
                "party_size": {
                    "type": "integer",
                    "description": "Number of people in the party"
                },
                "reservation_date": {
                    "type": "string",
                    "description": "Date of reservation (YYYY-MM-DD format)"
                },
                "reservation_time": {
                    "type": "string",
                    "description": "Time of reservation (HH:MM format, 24-hour)"
                },
                "customer_email": {
                    "type": "string",
                    "description": "Email address of the customer (optional)"
                },
                "customer_phone": {
                    "type": "string",
                    "description": "Phone number of the customer (optional)"
                },
                "special_requests": {
                    "type": "string",
                    "description": "Any special requests or notes for the reservation (optional)"
                }
            },
            "required": [
                "restaurant_id",
                "customer_name",
                "party_size",
                "reservation_date",
                "reservation_time"
            ]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let req = CreateReservationRequest {
            restaurant_id: require_str(&params, "restaurant_id")?.to_string(),
            customer_name: require_str(&params, "customer_name")?.to_string(),
            party_size: require_u32(&params, "party_size")?,
            reservation_date: require_str(&params, "reservation_date")?.to_string(),
            reservation_time: require_str(&params, "reservation_time")?.to_string(),
            customer_email: opt_str(&params, "customer_email"),
            customer_phone: opt_str(&params, "customer_phone"),
            special_requests: opt_str(&params, "special_requests"),
        };

        let outcome = crate::ops::create_reservation(&self.store, &req)?;
        to_output(&outcome, start)
    }
}

pub struct GetReservationTool {
    store: Arc<Datastore>,
}

impl GetReservationTool {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetReservationTool {
    fn name(&self) -> &str {
        "get_reservation"
    }

    fn description(&self) -> &str {
        "Get information about a specific reservation by ID"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "reservation_id": {
                    "type": "string",
                    "description": "Unique identifier of the reservation"
                }
            },
            "required": ["reservation_id"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let reservation_id = require_str(&params, "reservation_id")?;
        let outcome = crate::ops::get_reservation(&self.store, reservation_id)?;
        to_output(&outcome, start)
    }
}

pub struct CancelReservationTool {
    store: Arc<Datastore>,
}

impl CancelReservationTool {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CancelReservationTool {
    fn name(&self) -> &str {
        "cancel_reservation"
    }

    fn description(&self) -> &str {
        "Cancel an existing restaurant reservation"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "reservation_id": {
                    "type": "string",
                    "description": "Unique identifier of the reservation"
                }
            },
            "required": ["reservation_id"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let reservation_id = require_str(&params, "reservation_id")?;
        let outcome = crate::ops::cancel_reservation(&self.store, reservation_id)?;
        to_output(&outcome, start)
    }
}

pub struct ModifyReservationTool {
    store: Arc<Datastore>,
}

impl ModifyReservationTool {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ModifyReservationTool {
    fn name(&self) -> &str {
        "modify_reservation"
    }

    fn description(&self) -> &str {
        "Modify an existing restaurant reservation"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "reservation_id": {
                    "type": "string",
                    "description": "Unique identifier of the reservation"
                },
                "party_size": {
                    "type": "integer",
                    "description": "New number of people in the party (optional)"
                },
                "reservation_date": {
                    "type": "string",
                    "description": "New date of reservation (YYYY-MM-DD format) (optional)"
                },
                "reservation_time": {
                    "type": "string",
                    "description": "New time of reservation (HH:MM format, 24-hour) (optional)"
                },
                "special_requests": {
                    "type": "string",
                    "description": "New special requests or notes for the reservation (optional)"
                },
                "status": {
                    "type": "string",
                    "description": "New status for the reservation (confirmed, pending, cancelled) (optional)"
                }
            },
            "required": ["reservation_id"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let reservation_id = require_str(&params, "reservation_id")?;
        let status = match opt_str(&params, "status") {
            Some(s) => Some(parse_status(&s)?),
            None => None,
        };
        let changes = ModifyReservationRequest {
            party_size: opt_u32(&params, "party_size")?,
            reservation_date: opt_str(&params, "reservation_date"),
            reservation_time: opt_str(&params, "reservation_time"),
            special_requests: opt_str(&params, "special_requests"),
            status,
        };

        let outcome = crate::ops::modify_reservation(&self.store, reservation_id, &changes)?;
        to_output(&outcome, start)
    }
}

fn parse_status(value: &str) -> Result<ReservationStatus, ToolError> {
    match value.to_lowercase().as_str() {
        "confirmed" => Ok(ReservationStatus::Confirmed),
        "pending" => Ok(ReservationStatus::Pending),
        "cancelled" => Ok(ReservationStatus::Cancelled),
        other => Err(ToolError::InvalidParameters(format!(
            "unknown status '{other}', expected confirmed, pending, or cancelled"
        ))),
    }
}
