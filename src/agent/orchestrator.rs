//! The conversation orchestrator.
//!
//! One instance per chat session. Each turn runs the two-phase tool-calling
//! loop: a completion with tools offered, dispatch of any requested calls,
//! then a completion without tools to phrase the final reply. Restaurant
//! mentions in the user's text and model-supplied restaurant ids are resolved
//! against the store before tools run, so the model can be sloppy about ids
//! without breaking the domain layer.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::context::ConversationContext;
use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider, ToolCall};
use crate::resolver::RestaurantResolver;
use crate::store::Restaurant;
use crate::tools::ToolRegistry;

/// Cap on the reply-phrasing completion.
const FINAL_RESPONSE_MAX_TOKENS: u32 = 1024;

/// Shown to the user when a turn fails outright.
const TURN_FAILED_REPLY: &str =
    "Sorry, I'm having trouble reaching the reservation service right now. Please try again.";

/// Tools whose `restaurant_id` argument gets resolver/context fixup.
const RESTAURANT_ID_TOOLS: [&str; 2] = ["check_availability", "create_reservation"];

/// One executed tool call, kept for debugging output.
#[derive(Debug, Clone)]
pub struct ToolTrace {
    pub name: String,
    pub arguments: Value,
    pub result: Value,
}

/// The result of one user turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub tool_traces: Vec<ToolTrace>,
    pub error: bool,
}

pub struct Orchestrator {
    provider: Arc<dyn LlmProvider>,
    registry: ToolRegistry,
    resolver: RestaurantResolver,
    context: ConversationContext,
    history: Vec<ChatMessage>,
    system_prompt: String,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        registry: ToolRegistry,
        resolver: RestaurantResolver,
        system_prompt: String,
    ) -> Self {
        Self {
            provider,
            registry,
            resolver,
            context: ConversationContext::new(),
            history: Vec::new(),
            system_prompt,
        }
    }

    /// Run one user turn end to end.
    ///
    /// On provider failure the user message stays in the history (so the next
    /// turn still sees it) but no assistant message is recorded, and a
    /// generic apology is returned.
    pub async fn handle_turn(&mut self, user_query: &str) -> TurnOutcome {
        if let Some((id, name)) = self.resolver.resolve_from_query(user_query) {
            tracing::info!(%id, %name, "resolved restaurant mention in query");
            self.context.update_selection(id, name);
        }

        self.history.push(ChatMessage::user(user_query));

        match self.run_turn().await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(%error, "turn failed");
                TurnOutcome {
                    reply: TURN_FAILED_REPLY.to_string(),
                    tool_traces: Vec::new(),
                    error: true,
                }
            }
        }
    }

    async fn run_turn(&mut self) -> Result<TurnOutcome, LlmError> {
        let request = CompletionRequest::new(self.messages_with_system())
            .with_tools(self.registry.definitions());
        let response = self.provider.complete(request).await?;

        if !response.has_tool_calls() {
            let reply = response.content.unwrap_or_default();
            self.history.push(ChatMessage::assistant(reply.clone()));
            return Ok(TurnOutcome {
                reply,
                tool_traces: Vec::new(),
                error: false,
            });
        }

        let mut tool_traces = Vec::new();
        for call in response.tool_calls {
            let trace = self.dispatch_tool_call(call).await;
            tool_traces.push(trace);
        }

        // Second phase: no tools offered, just phrase the reply.
        let request = CompletionRequest::new(self.messages_with_system())
            .with_max_tokens(FINAL_RESPONSE_MAX_TOKENS);
        let response = self.provider.complete(request).await?;

        let reply = response.content.unwrap_or_default();
        self.history.push(ChatMessage::assistant(reply.clone()));

        Ok(TurnOutcome {
            reply,
            tool_traces,
            error: false,
        })
    }

    /// Execute one tool call and append the exchange to the history.
    async fn dispatch_tool_call(&mut self, call: ToolCall) -> ToolTrace {
        let arguments = self.preprocess_args(&call.name, call.arguments.clone());

        tracing::info!(tool = %call.name, %arguments, "dispatching tool call");

        let result = match self.registry.execute(&call.name, arguments.clone()).await {
            Ok(output) => output.result,
            Err(error) => {
                tracing::warn!(tool = %call.name, %error, "tool call failed");
                json!({"error": format!("Error executing {}: {error}", call.name)})
            }
        };

        self.history.push(ChatMessage::assistant_with_tool_calls(
            "",
            vec![ToolCall {
                id: call.id.clone(),
                name: call.name.clone(),
                arguments: arguments.clone(),
            }],
        ));
        self.history.push(ChatMessage::tool_result(
            call.id,
            call.name.clone(),
            result.to_string(),
        ));

        if call.name == "recommend_restaurants" {
            self.remember_recommendations(&result);
        }

        ToolTrace {
            name: call.name,
            arguments,
            result,
        }
    }

    /// Fix up model-supplied restaurant ids before dispatch.
    ///
    /// The model regularly passes a restaurant name where an id belongs, or
    /// omits the id entirely when the user already picked a restaurant. An id
    /// that doesn't look canonical is resolved as a name (resolver first,
    /// then this session's search results); a missing id falls back to the
    /// context selection.
    fn preprocess_args(&self, tool_name: &str, mut args: Value) -> Value {
        if !RESTAURANT_ID_TOOLS.contains(&tool_name) {
            return args;
        }
        let Some(map) = args.as_object_mut() else {
            return args;
        };

        match map.get("restaurant_id").and_then(Value::as_str) {
            Some(id) if !id.starts_with("rest") => {
                let resolved = self
                    .resolver
                    .resolve_id_from_name(id)
                    .or_else(|| self.context.id_for_name(id).map(str::to_string))
                    .or_else(|| self.context.selected_id().map(str::to_string));
                if let Some(resolved) = resolved {
                    tracing::info!(name = id, %resolved, "replaced restaurant name with id");
                    map.insert("restaurant_id".to_string(), Value::String(resolved));
                }
            }
            Some(_) => {}
            None => {
                if let Some(selected) = self.context.selected_id() {
                    tracing::info!(%selected, "using restaurant id from context");
                    map.insert(
                        "restaurant_id".to_string(),
                        Value::String(selected.to_string()),
                    );
                }
            }
        }

        args
    }

    /// Keep non-empty recommendation results so later turns can refer to
    /// "the first one" or a restaurant by name.
    fn remember_recommendations(&mut self, result: &Value) {
        let Some(list) = result.get("restaurants").and_then(Value::as_array) else {
            return;
        };
        if list.is_empty() {
            return;
        }

        let restaurants: Vec<Restaurant> = list
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect();
        if !restaurants.is_empty() {
            self.context.store_search_results(restaurants);
        }
    }

    fn messages_with_system(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend(self.history.iter().cloned());
        messages
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Start a fresh conversation: history and context are dropped.
    pub fn reset(&mut self) {
        self.history.clear();
        self.context.reset();
        tracing::info!("conversation reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, Role};
    use crate::store::{Datastore, Hours, TableInventory, Tables};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Plays back scripted responses and records every request it sees.
    struct ScriptedProvider {
        script: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<CompletionResponse, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(req);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("scripted provider ran out of responses"))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn text(content: &str) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: Some(content.to_string()),
            tool_calls: vec![],
        })
    }

    fn tool_call(name: &str, arguments: Value) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: name.to_string(),
                arguments,
            }],
        })
    }

    fn restaurant(id: &str, name: &str, rating: f64) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: name.to_string(),
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
            rating,
        }
    }

    fn orchestrator(
        provider: Arc<ScriptedProvider>,
    ) -> (TempDir, Orchestrator) {
        let dir = TempDir::new().unwrap();
        let restaurants = vec![
            restaurant("rest001", "Blue Trattoria", 4.4),
            restaurant("rest002", "Silver Bistro", 4.6),
        ];
        let path = dir.path().join("restaurants.json");
        std::fs::write(&path, serde_json::to_string(&restaurants).unwrap()).unwrap();
        let store = Arc::new(Datastore::new(path, dir.path().join("reservations.json")));

        let resolver = RestaurantResolver::new(&restaurants);
        let registry = ToolRegistry::builtin(store);
        let orchestrator = Orchestrator::new(
            provider,
            registry,
            resolver,
            "You are a reservation assistant.".to_string(),
        );
        (dir, orchestrator)
    }

    #[tokio::test]
    async fn plain_text_turn_needs_one_completion() {
        let provider = ScriptedProvider::new(vec![text("Hello! How can I help?")]);
        let (_dir, mut orch) = orchestrator(provider.clone());

        let outcome = orch.handle_turn("hi").await;
        assert_eq!(outcome.reply, "Hello! How can I help?");
        assert!(!outcome.error);
        assert!(outcome.tool_traces.is_empty());

        // user + assistant in history.
        assert_eq!(orch.history_len(), 2);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tools.len(), 9);
        assert_eq!(requests[0].tool_choice.as_deref(), Some("auto"));
    }

    #[tokio::test]
    async fn tool_turn_runs_two_phases_and_stores_results() {
        let provider = ScriptedProvider::new(vec![
            tool_call("recommend_restaurants", json!({"cuisine": "Italian"})),
            text("I found two great options."),
        ]);
        let (_dir, mut orch) = orchestrator(provider.clone());

        let outcome = orch.handle_turn("any italian places?").await;
        assert_eq!(outcome.reply, "I found two great options.");
        assert_eq!(outcome.tool_traces.len(), 1);
        assert_eq!(outcome.tool_traces[0].name, "recommend_restaurants");
        assert_eq!(outcome.tool_traces[0].result["count"], 2);

        // Results were remembered for later turns.
        assert_eq!(orch.context().last_results().len(), 2);
        assert_eq!(orch.context().id_for_name("silver bistro"), Some("rest002"));

        // user, assistant tool call, tool result, final assistant.
        assert_eq!(orch.history_len(), 4);

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        // The phrasing call offers no tools and is token-capped.
        assert!(requests[1].tools.is_empty());
        assert_eq!(requests[1].max_tokens, Some(FINAL_RESPONSE_MAX_TOKENS));

        // The tool exchange round-trips through the history.
        let tool_msg = &requests[1].messages[3];
        assert_eq!(tool_msg.role, Role::Tool);
        assert_eq!(tool_msg.name.as_deref(), Some("recommend_restaurants"));
    }

    #[tokio::test]
    async fn restaurant_name_passed_as_id_is_resolved() {
        let provider = ScriptedProvider::new(vec![
            tool_call(
                "check_availability",
                json!({
                    "restaurant_id": "Silver Bistro",
                    "date": "2026-09-01",
                    "time": "19:00",
                    "party_size": 2
                }),
            ),
            text("They have a table."),
        ]);
        let (_dir, mut orch) = orchestrator(provider);

        let outcome = orch.handle_turn("can they fit us?").await;
        assert_eq!(outcome.tool_traces[0].arguments["restaurant_id"], "rest002");
        assert_eq!(outcome.tool_traces[0].result["available"], true);
    }

    #[tokio::test]
    async fn unresolvable_restaurant_id_falls_back_to_context_selection() {
        let provider = ScriptedProvider::new(vec![
            tool_call(
                "check_availability",
                json!({
                    "restaurant_id": "Chez Nowhere",
                    "date": "2026-09-01",
                    "time": "19:00",
                    "party_size": 2
                }),
            ),
            text("They have a table."),
        ]);
        let (_dir, mut orch) = orchestrator(provider);

        // The mention sets the selection; the model then passes a name that
        // matches nothing in the store or this session's results.
        let outcome = orch.handle_turn("check Blue Trattoria for us").await;
        assert_eq!(outcome.tool_traces[0].arguments["restaurant_id"], "rest001");
        assert_eq!(outcome.tool_traces[0].result["available"], true);
    }

    #[tokio::test]
    async fn missing_restaurant_id_falls_back_to_context_selection() {
        let provider = ScriptedProvider::new(vec![
            tool_call(
                "check_availability",
                json!({"date": "2026-09-01", "time": "19:00", "party_size": 2}),
            ),
            text("Blue Trattoria has space."),
        ]);
        let (_dir, mut orch) = orchestrator(provider);

        // The mention in the query sets the context selection.
        let outcome = orch.handle_turn("book Blue Trattoria tomorrow at 7pm for 2").await;
        assert_eq!(outcome.tool_traces[0].arguments["restaurant_id"], "rest001");
    }

    #[tokio::test]
    async fn unknown_tool_reports_inline_error() {
        let provider = ScriptedProvider::new(vec![
            tool_call("book_flight", json!({})),
            text("Sorry, I can't do that."),
        ]);
        let (_dir, mut orch) = orchestrator(provider);

        let outcome = orch.handle_turn("fly me to the moon").await;
        assert!(!outcome.error);
        assert!(outcome.tool_traces[0].result["error"]
            .as_str()
            .unwrap()
            .contains("book_flight"));
    }

    #[tokio::test]
    async fn provider_failure_keeps_user_message_only() {
        let provider = ScriptedProvider::new(vec![Err(LlmError::RetriesExhausted {
            attempts: 9,
            reason: "rate limited".to_string(),
        })]);
        let (_dir, mut orch) = orchestrator(provider);

        let outcome = orch.handle_turn("hello?").await;
        assert!(outcome.error);
        assert_eq!(outcome.reply, TURN_FAILED_REPLY);
        // The user message is kept so the next turn has it; no assistant
        // message was recorded.
        assert_eq!(orch.history_len(), 1);
    }

    #[tokio::test]
    async fn reset_clears_history_and_context() {
        let provider = ScriptedProvider::new(vec![text("hi"), text("hi again")]);
        let (_dir, mut orch) = orchestrator(provider);

        orch.handle_turn("book Blue Trattoria").await;
        assert!(orch.context().selected_id().is_some());

        orch.reset();
        assert_eq!(orch.history_len(), 0);
        assert!(orch.context().selected_id().is_none());
    }
}
