//! Groq Chat Completions API provider.
//!
//! Speaks the standard OpenAI-compatible chat completions protocol with API
//! key authentication. Holds a pool of keys and rotates through them on rate
//! limits; backoff and rotation policy live in [`RetryState`].

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::llm::provider::{
    ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role, ToolCall,
};
use crate::llm::retry::{RetryAction, RetryState};

const PROVIDER: &str = "groq";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Groq chat-completions provider with key rotation.
pub struct GroqProvider {
    client: Client,
    config: LlmConfig,
    /// Index of the key currently in use; advanced on rate limits.
    key_index: AtomicUsize,
}

/// One attempt's failure, classified for the retry policy.
enum AttemptError {
    RateLimited { key_index: usize },
    Other(String),
}

impl GroqProvider {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_keys.is_empty() {
            return Err(LlmError::MissingApiKeys);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            client,
            config,
            key_index: AtomicUsize::new(0),
        })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn current_key(&self) -> (usize, String) {
        let index = self.key_index.load(Ordering::Relaxed) % self.config.api_keys.len();
        (index, self.config.api_keys[index].expose_secret().to_string())
    }

    fn rotate_key(&self) {
        let next = (self.key_index.load(Ordering::Relaxed) + 1) % self.config.api_keys.len();
        self.key_index.store(next, Ordering::Relaxed);
        tracing::debug!(key_index = next, "switched API key");
    }

    /// One request, no retries. Failures are classified for the policy.
    async fn attempt(&self, request: &ChatCompletionRequest) -> Result<CompletionResponse, AttemptError> {
        let (key_index, key) = self.current_key();
        let url = self.api_url();

        tracing::debug!(%url, key_index, model = %request.model, "sending chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {key}"))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| AttemptError::Other(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            return Err(AttemptError::RateLimited { key_index });
        }
        if !status.is_success() {
            return Err(AttemptError::Other(format!("HTTP {status}: {body}")));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AttemptError::Other(format!("JSON parse error: {e}")))?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion received"
            );
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AttemptError::Other("no choices in response".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| {
                // Arguments arrive as a JSON string; malformed ones degrade to
                // an empty object rather than failing the whole turn.
                let arguments = serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(serde_json::Value::Object(Default::default()));
                ToolCall {
                    id: tc.id,
                    name: tc.function.name,
                    arguments,
                }
            })
            .collect();

        Ok(CompletionResponse {
            content: choice.message.content,
            tool_calls,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let request = ChatCompletionRequest::build(&self.config.model, req);

        let mut retry = RetryState::new(
            self.config.max_retries,
            self.config.api_keys.len(),
            self.config.retry_base_secs,
            self.config.retry_jitter_secs,
        );

        loop {
            retry.begin_attempt();
            let error = match self.attempt(&request).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            let (action, reason) = match error {
                AttemptError::RateLimited { key_index } => {
                    (retry.on_rate_limited(key_index), "rate limited".to_string())
                }
                AttemptError::Other(reason) => {
                    tracing::warn!(%reason, "chat completion attempt failed");
                    (retry.on_transport_error(), reason)
                }
            };

            match action {
                RetryAction::RotateKey => self.rotate_key(),
                RetryAction::Backoff(delay) => {
                    tracing::info!(delay_secs = delay.as_secs_f64(), "backing off before retry");
                    tokio::time::sleep(delay).await;
                }
                RetryAction::GiveUp => {
                    return Err(LlmError::RetriesExhausted {
                        attempts: retry.attempts(),
                        reason,
                    });
                }
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// OpenAI-compatible chat completions wire types.

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ChatCompletionTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

impl ChatCompletionRequest {
    fn build(model: &str, req: CompletionRequest) -> Self {
        let messages = req.messages.into_iter().map(Into::into).collect();
        let tools: Vec<ChatCompletionTool> = req
            .tools
            .into_iter()
            .map(|t| ChatCompletionTool {
                tool_type: "function".to_string(),
                function: ChatCompletionFunction {
                    name: t.name,
                    description: Some(t.description),
                    parameters: Some(t.parameters),
                },
            })
            .collect();

        Self {
            model: model.to_string(),
            messages,
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            tools: if tools.is_empty() { None } else { Some(tools) },
            tool_choice: req.tool_choice,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatCompletionMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ChatCompletionToolCall>>,
}

impl From<ChatMessage> for ChatCompletionMessage {
    fn from(msg: ChatMessage) -> Self {
        let role = match msg.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        let tool_calls = msg.tool_calls.map(|calls| {
            calls
                .into_iter()
                .map(|tc| ChatCompletionToolCall {
                    id: tc.id,
                    call_type: "function".to_string(),
                    function: ChatCompletionToolCallFunction {
                        name: tc.name,
                        arguments: tc.arguments.to_string(),
                    },
                })
                .collect()
        });
        Self {
            role: role.to_string(),
            content: Some(msg.content),
            tool_call_id: msg.tool_call_id,
            name: msg.name,
            tool_calls,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: ChatCompletionFunction,
}

#[derive(Debug, Serialize)]
struct ChatCompletionFunction {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
    usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ChatCompletionToolCall>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatCompletionToolCall {
    id: String,
    #[serde(rename = "type")]
    #[allow(dead_code)]
    call_type: String,
    function: ChatCompletionToolCallFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatCompletionToolCallFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
