//! Catalog tools: the distinct cuisines, locations, and feature tags in the
//! restaurant file. They take no parameters and exist so the model can ground
//! its suggestions in values that actually occur in the data.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use crate::store::Datastore;
use crate::tools::tool::{Tool, ToolError, ToolOutput};

fn empty_schema() -> serde_json::Value {
    json!({"type": "object", "properties": {}, "required": []})
}

pub struct GetCuisinesTool {
    store: Arc<Datastore>,
}

impl GetCuisinesTool {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetCuisinesTool {
    fn name(&self) -> &str {
        "get_cuisines"
    }

    fn description(&self) -> &str {
        "Get a list of all available cuisine types"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        empty_schema()
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let cuisines = crate::ops::get_cuisines(&self.store)?;
        Ok(ToolOutput::success(
            json!({"cuisines": cuisines}),
            start.elapsed(),
        ))
    }
}

pub struct GetLocationsTool {
    store: Arc<Datastore>,
}

impl GetLocationsTool {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetLocationsTool {
    fn name(&self) -> &str {
        "get_locations"
    }

    fn description(&self) -> &str {
        "Get a list of all available restaurant locations"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        empty_schema()
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let locations = crate::ops::get_locations(&self.store)?;
        Ok(ToolOutput::success(
            json!({"locations": locations}),
            start.elapsed(),
        ))
    }
}

pub struct GetFeaturesTool {
    store: Arc<Datastore>,
}

impl GetFeaturesTool {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetFeaturesTool {
    fn name(&self) -> &str {
        "get_features"
    }

    fn description(&self) -> &str {
        "Get a list of all available restaurant features"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        empty_schema()
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let features = crate::ops::get_features(&self.store)?;
        Ok(ToolOutput::success(
            json!({"features": features}),
            start.elapsed(),
        ))
    }
}
