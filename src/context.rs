//! Per-session conversation context.
//!
//! Tracks the currently selected restaurant and what earlier searches turned
//! up, so follow-up turns ("book it for 7pm") can be grounded without the
//! model repeating identifiers. One instance per chat session, owned by the
//! orchestrator; reset on an explicit new conversation.

use std::collections::HashMap;

use crate::store::Restaurant;

#[derive(Debug, Default)]
pub struct ConversationContext {
    selected_id: Option<String>,
    selected_name: Option<String>,
    last_results: Vec<Restaurant>,
    /// Lowercased name -> id, merged from every search this session.
    /// Only grows; a restaurant seen once stays resolvable.
    name_to_id: HashMap<String, String>,
    pending_tool_call: Option<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the current restaurant selection.
    pub fn update_selection(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let name = name.into();
        tracing::debug!(%id, %name, "restaurant selected");
        self.selected_id = Some(id);
        self.selected_name = Some(name);
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected_name.as_deref()
    }

    /// Replace the last-results list and merge the names into the id map.
    pub fn store_search_results(&mut self, restaurants: Vec<Restaurant>) {
        for restaurant in &restaurants {
            self.name_to_id
                .insert(restaurant.name.to_lowercase(), restaurant.id.clone());
        }
        self.last_results = restaurants;
    }

    pub fn last_results(&self) -> &[Restaurant] {
        &self.last_results
    }

    pub fn id_for_name(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Record a tool call we are still gathering parameters for.
    pub fn set_pending_tool_call(&mut self, tool_name: impl Into<String>) {
        self.pending_tool_call = Some(tool_name.into());
    }

    pub fn pending_tool_call(&self) -> Option<&str> {
        self.pending_tool_call.as_deref()
    }

    /// Restore everything to the initial state, for a fresh conversation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Hours, TableInventory, Tables};

    fn restaurant(id: &str, name: &str) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: name.to_string(),
            location: "Midtown".to_string(),
            cuisine: "Japanese".to_string(),
            capacity: 30,
            tables: Tables {
                small: TableInventory { capacity: 2, count: 3 },
                medium: TableInventory { capacity: 4, count: 3 },
                large: TableInventory { capacity: 8, count: 1 },
            },
            hours: Hours {
                open: "12:00".to_string(),
                close: "21:00".to_string(),
            },
            price_range: "$$".to_string(),
            features: vec![],
            description: String::new(),
            rating: 4.1,
        }
    }

    #[test]
    fn selection_overwrites() {
        let mut ctx = ConversationContext::new();
        assert!(ctx.selected_id().is_none());

        ctx.update_selection("rest001", "Blue Trattoria");
        ctx.update_selection("rest002", "Silver Bistro");
        assert_eq!(ctx.selected_id(), Some("rest002"));
        assert_eq!(ctx.selected_name(), Some("Silver Bistro"));
    }

    #[test]
    fn name_map_grows_across_searches() {
        let mut ctx = ConversationContext::new();
        ctx.store_search_results(vec![restaurant("rest001", "Blue Trattoria")]);
        ctx.store_search_results(vec![restaurant("rest002", "Silver Bistro")]);

        // The results list is replaced but the name map keeps both.
        assert_eq!(ctx.last_results().len(), 1);
        assert_eq!(ctx.id_for_name("Blue Trattoria"), Some("rest001"));
        assert_eq!(ctx.id_for_name("silver bistro"), Some("rest002"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut ctx = ConversationContext::new();
        ctx.update_selection("rest001", "Blue Trattoria");
        ctx.store_search_results(vec![restaurant("rest001", "Blue Trattoria")]);
        ctx.set_pending_tool_call("check_availability");

        ctx.reset();
        assert!(ctx.selected_id().is_none());
        assert!(ctx.last_results().is_empty());
        assert!(ctx.id_for_name("blue trattoria").is_none());
        assert!(ctx.pending_tool_call().is_none());
    }
}
