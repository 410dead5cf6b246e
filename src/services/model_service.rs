use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::Client;
use base64::Engine;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Thin gateway around the chat completion API. Built once at startup and
/// shared by every request; the inner client is just a stateless HTTP
/// wrapper.
#[derive(Clone)]
pub struct ModelService {
    client: Client<OpenAIConfig>,
    model: String,
    timeout_secs: u64,
}

impl ModelService {
    pub fn from_config(config: &Config) -> Self {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.model_api_key.expose_secret());
        if let Some(base) = &config.model_api_base {
            openai_config = openai_config.with_api_base(base);
        }

        ModelService {
            client: Client::with_config(openai_config),
            model: config.model_name.clone(),
            timeout_secs: config.model_timeout_secs,
        }
    }

    /// Completion constrained to a single JSON object. The constraint is a
    /// soft contract; callers still run the output through the extractor.
    pub async fn complete_json(&self, system: &str, user: &str) -> AppResult<String> {
        self.send(chat_body(&self.model, text_messages(system, user), true))
            .await
    }

    /// JSON completion with an inline image attached to the user turn.
    pub async fn complete_json_with_image(
        &self,
        system: &str,
        user: &str,
        image_data_url: &str,
    ) -> AppResult<String> {
        let messages = json!([
            {"role": "system", "content": system},
            {"role": "user", "content": [
                {"type": "text", "text": user},
                {"type": "image_url", "image_url": {"url": image_data_url}}
            ]}
        ]);
        self.send(chat_body(&self.model, messages, true)).await
    }

    /// Free-form completion, used for prose reports.
    pub async fn complete_text(&self, system: &str, user: &str) -> AppResult<String> {
        self.send(chat_body(&self.model, text_messages(system, user), false))
            .await
    }

    async fn send(&self, body: Value) -> AppResult<String> {
        let chat = self.client.chat();
        let request = chat.create_byot(body);
        let response: Value = tokio::time::timeout(Duration::from_secs(self.timeout_secs), request)
            .await
            .map_err(|_| AppError::UpstreamTimeout(self.timeout_secs))?
            .map_err(map_upstream_error)?;

        first_choice_text(&response)
    }
}

fn text_messages(system: &str, user: &str) -> Value {
    json!([
        {"role": "system", "content": system},
        {"role": "user", "content": user}
    ])
}

fn chat_body(model: &str, messages: Value, json_mode: bool) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages,
    });
    if json_mode {
        body["response_format"] = json!({"type": "json_object"});
    }
    body
}

fn map_upstream_error(err: OpenAIError) -> AppError {
    match err {
        OpenAIError::ApiError(api) => {
            let reason = api.message;
            let lowered = reason.to_lowercase();
            if lowered.contains("content policy") || lowered.contains("safety system") {
                AppError::SafetyRejected(reason)
            } else {
                AppError::UpstreamUnavailable(reason)
            }
        }
        other => AppError::UpstreamUnavailable(other.to_string()),
    }
}

/// Pulls the assistant text out of a raw chat completion response, surfacing
/// safety blocks and empty replies as their own failures.
fn first_choice_text(response: &Value) -> AppResult<String> {
    let Some(choice) = response["choices"].get(0) else {
        return Err(AppError::UpstreamEmpty);
    };

    if let Some(refusal) = choice["message"]["refusal"].as_str().filter(|r| !r.is_empty()) {
        return Err(AppError::SafetyRejected(refusal.to_string()));
    }
    if let Some(reason) = choice["finish_reason"].as_str() {
        if reason == "content_filter" {
            return Err(AppError::SafetyRejected(format!(
                "The model blocked this request: {reason}"
            )));
        }
    }

    let content = choice["message"]["content"].as_str().unwrap_or("").trim();
    if content.is_empty() {
        return Err(AppError::UpstreamEmpty);
    }
    Ok(content.to_string())
}

/// Builds the `data:` URL the image endpoint sends upstream.
///
/// Accepts either an existing `data:` URL or bare base64, with whitespace
/// tolerated in the latter. Bare input is decoded once to catch broken
/// uploads before they cost a model call.
pub fn image_data_url(image: &str, mime_type: &str) -> AppResult<String> {
    let trimmed = image.trim();
    if trimmed.starts_with("data:") {
        return Ok(trimmed.to_string());
    }

    let compact: String = trimmed.split_whitespace().collect();
    if compact.is_empty() {
        return Err(AppError::ValidationError(
            "image must not be empty".to_string(),
        ));
    }
    base64::engine::general_purpose::STANDARD
        .decode(&compact)
        .map_err(|_| AppError::ValidationError("image is not valid base64".to_string()))?;

    Ok(format!("data:{mime_type};base64,{compact}"))
}
