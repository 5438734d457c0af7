//! OpenAI ChatProvider implementation.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::chat::{ChatProvider, ChatRequest, ChatResponse, ChatResult, StopReason};
use crate::error::LlmError;
use crate::message::Message;

use super::client::OpenAI;
use super::types::OpenAIChatResponse;

impl OpenAI {
    /// Parse the wire response into a [`ChatResponse`].
    ///
    /// Only the first choice is used.
    pub(crate) fn parse_response(response: OpenAIChatResponse) -> ChatResult<ChatResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::response_format("at least one choice", "empty choices"))?;

        let stop_reason = match choice.finish_reason.as_deref() {
            Some("length") => StopReason::Length,
            Some("content_filter") => StopReason::ContentFilter,
            _ => StopReason::Stop,
        };

        let text = match (choice.message.content, choice.message.refusal) {
            (Some(content), _) => content,
            (None, Some(refusal)) => {
                return Err(LlmError::provider_code("openai", "refusal", refusal));
            }
            (None, None) => {
                return Err(LlmError::response_format("message content", "null content"));
            }
        };

        Ok(ChatResponse {
            message: Message::assistant(text),
            stop_reason,
            usage: response.usage,
            model: response.model,
            id: response.id,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    #[instrument(skip_all, fields(model = %request.model, messages = request.messages.len()))]
    async fn chat(&self, request: &ChatRequest) -> ChatResult<ChatResponse> {
        let url = self.chat_url();
        let body = self.build_body(request);

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text));
        }

        let response_text = response.text().await?;
        let parsed: OpenAIChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::response_format(
                "valid OpenAI response",
                format!("parse error: {e}, response: {response_text}"),
            )
        })?;

        let response = Self::parse_response(parsed)?;
        debug!(
            id = response.id.as_deref().unwrap_or_default(),
            stop_reason = ?response.stop_reason,
            usage = ?response.usage,
            "chat completion received"
        );
        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &str {
        self.model()
    }
}
