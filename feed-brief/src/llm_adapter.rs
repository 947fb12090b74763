use crate::config::Settings;
use crate::response_parser::is_blank;
use crate::types::{BriefError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

pub const PROVIDER_TIMEOUT_SECONDS: u64 = 30;

/// A completion backend that turns a prompt into raw text.
///
/// Every failure mode (transport, status, body shape, empty output) is an
/// `Err`; callers decide whether to move on to the next provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn provider_name(&self) -> String;

    async fn complete(&self, prompt: &str) -> Result<String>;
}

fn build_client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECONDS))
        .build()?)
}

/// Any chat-style HTTP endpoint accepting
/// `{model, <message_key>: [{role, content}]}`.
pub struct CustomEndpointProvider {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    message_key: String,
}

impl CustomEndpointProvider {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        message_key: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            api_url: api_url.into(),
            api_key,
            model: model.into(),
            message_key: message_key.into(),
        })
    }

    pub fn payload(&self, prompt: &str) -> Value {
        let mut payload = serde_json::Map::new();
        payload.insert("model".to_string(), Value::String(self.model.clone()));
        payload.insert(
            self.message_key.clone(),
            json!([{ "role": "user", "content": prompt }]),
        );
        Value::Object(payload)
    }
}

#[async_trait]
impl LlmProvider for CustomEndpointProvider {
    fn provider_name(&self) -> String {
        format!("custom endpoint ({})", self.model)
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut request = self.client.post(&self.api_url).json(&self.payload(prompt));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BriefError::provider(self.provider_name(), format!("HTTP {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BriefError::provider(self.provider_name(), format!("non-JSON body: {}", e)))?;

        extract_completion_text(&body)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| BriefError::provider(self.provider_name(), "no assistant text in response"))
    }
}

/// Pull the assistant text out of a generic chat-completion body.
///
/// Tried in order: `output_text`, each `choices[*]` (`message`/`delta`
/// content as a string or list of text parts, then `text`), `result`.
pub fn extract_completion_text(body: &Value) -> Option<String> {
    let object = body.as_object()?;

    if let Some(text) = object.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    if let Some(choices) = object.get("choices").and_then(Value::as_array) {
        if let Some(text) = choices.iter().find_map(text_from_choice) {
            return Some(text);
        }
    }

    object
        .get("result")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn text_from_choice(choice: &Value) -> Option<String> {
    let choice = choice.as_object()?;

    let message = choice
        .get("message")
        .filter(|m| !is_blank(m))
        .or_else(|| choice.get("delta"));

    if let Some(content) = message.and_then(|m| m.get("content")) {
        match content {
            Value::String(text) => return Some(text.clone()),
            Value::Array(parts) => {
                let joined: String = parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect();
                if !joined.is_empty() {
                    return Some(joined);
                }
            }
            _ => {}
        }
    }

    choice.get("text").and_then(Value::as_str).map(str::to_string)
}

/// The default provider: OpenAI's Responses API.
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn provider_name(&self) -> String {
        format!("openai ({})", self.model)
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "input": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BriefError::provider(self.provider_name(), format!("HTTP {}", status)));
        }

        let body: Value = response.json().await?;
        let text = extract_output_text(&body).trim().to_string();
        if text.is_empty() {
            return Err(BriefError::provider(self.provider_name(), "empty completion"));
        }
        Ok(text)
    }
}

/// `output_text` when the body carries it, else the concatenated
/// `output_text` parts of every output message.
pub fn extract_output_text(body: &Value) -> String {
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        return text.to_string();
    }

    body.get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect()
}

/// Ordered list of providers tried by the summarizer.
pub struct LlmAdapterRegistry {
    providers: Vec<Box<dyn LlmProvider>>,
}

impl LlmAdapterRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Custom endpoint first when configured, then the default provider
    /// when it has a key.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut registry = Self::new();

        if let Some(url) = &settings.custom_api_url {
            registry.register(Box::new(CustomEndpointProvider::new(
                url.clone(),
                settings.custom_api_key.clone(),
                settings.custom_model_name(),
                settings.custom_message_key.clone(),
            )?));
        }

        if let Some(key) = &settings.openai_api_key {
            registry.register(Box::new(OpenAiProvider::new(
                settings.openai_base_url.clone(),
                key.clone(),
                settings.openai_model.clone(),
            )?));
        }

        if registry.is_empty() {
            info!("No LLM provider configured, summaries will use the heuristic fallback");
        }
        Ok(registry)
    }

    pub fn register(&mut self, provider: Box<dyn LlmProvider>) {
        debug!("Registering LLM provider: {}", provider.provider_name());
        self.providers.push(provider);
    }

    pub fn providers(&self) -> impl Iterator<Item = &dyn LlmProvider> {
        self.providers.iter().map(|provider| provider.as_ref())
    }

    pub fn list_providers(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for LlmAdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
