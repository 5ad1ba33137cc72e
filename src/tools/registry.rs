//! Tool registry: name-keyed lookup and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::llm::ToolDefinition;
use crate::store::Datastore;

use super::builtin::{
    CancelReservationTool, CheckAvailabilityTool, CreateReservationTool, GetCuisinesTool,
    GetFeaturesTool, GetLocationsTool, GetReservationTool, ModifyReservationTool,
    RecommendRestaurantsTool,
};
use super::tool::{Tool, ToolError, ToolOutput};

/// Holds every tool the assistant can call.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in restaurant tools, backed by the given store.
    pub fn builtin(store: Arc<Datastore>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GetCuisinesTool::new(store.clone())));
        registry.register(Arc::new(GetLocationsTool::new(store.clone())));
        registry.register(Arc::new(GetFeaturesTool::new(store.clone())));
        registry.register(Arc::new(CheckAvailabilityTool::new(store.clone())));
        registry.register(Arc::new(RecommendRestaurantsTool::new(store.clone())));
        registry.register(Arc::new(CreateReservationTool::new(store.clone())));
        registry.register(Arc::new(GetReservationTool::new(store.clone())));
        registry.register(Arc::new(ModifyReservationTool::new(store.clone())));
        registry.register(Arc::new(CancelReservationTool::new(store)));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function-calling definitions for every registered tool, sorted by name
    /// so the model sees a stable ordering.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| {
                let schema = tool.schema();
                ToolDefinition {
                    name: schema.name,
                    description: schema.description,
                    parameters: schema.parameters,
                }
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Dispatch a call by name.
    pub async fn execute(
        &self,
        name: &str,
        params: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        tracing::debug!(tool = name, "executing tool");
        tool.execute(params).await
    }
}
