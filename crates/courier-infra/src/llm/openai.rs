//! OpenAI-compatible completion client.
//!
//! Implements `CompletionClient` from `courier-core` against any service
//! speaking the OpenAI chat completions protocol, via a configurable base
//! URL. Unlike a single-tenant deployment there is no process-wide API
//! key: every call authenticates with the calling user's own credential,
//! so the underlying [`async_openai::Client`] is built per call.
//!
//! Every upstream call is bounded by the configured timeout; elapsed time
//! maps to [`UpstreamError::Timeout`] and the turn fails without touching
//! history.

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use courier_core::llm::CompletionClient;
use courier_types::error::UpstreamError;
use courier_types::llm::{CompletionRequest, CompletionResponse, MessageRole, Usage};
use courier_types::secret::Redacted;

/// Per-user-credential client for an OpenAI-compatible completion service.
///
/// # Credential hygiene
///
/// Does NOT derive Debug: the per-call clients hold the user's API key,
/// and nothing here may end up formatted into logs or errors.
pub struct OpenAiCompletionClient {
    base_url: String,
    timeout: Duration,
}

impl OpenAiCompletionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Build a client authenticated as one user.
    fn client_for(&self, credential: &Redacted) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_key(credential.expose().to_string())
            .with_api_base(&self.base_url);
        Client::with_config(config)
    }
}

/// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
fn build_request(request: &CompletionRequest) -> CreateChatCompletionRequest {
    let messages: Vec<ChatCompletionRequestMessage> = request
        .messages
        .iter()
        .map(|msg| match msg.role {
            MessageRole::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::User => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::Assistant => {
                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    )),
                    refusal: None,
                    name: None,
                    audio: None,
                    tool_calls: None,
                    function_call: None,
                })
            }
        })
        .collect();

    CreateChatCompletionRequest {
        model: request.model.clone(),
        messages,
        max_completion_tokens: Some(request.max_tokens),
        temperature: Some(request.temperature as f32),
        top_p: Some(request.top_p as f32),
        frequency_penalty: Some(request.frequency_penalty as f32),
        presence_penalty: Some(request.presence_penalty as f32),
        ..Default::default()
    }
}

impl CompletionClient for OpenAiCompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
        credential: &Redacted,
    ) -> Result<CompletionResponse, UpstreamError> {
        let oai_request = build_request(request);
        let client = self.client_for(credential);

        let response = tokio::time::timeout(self.timeout, client.chat().create(oai_request))
            .await
            .map_err(|_| UpstreamError::Timeout)?
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: response.model,
            usage,
        })
    }

    async fn probe(&self, credential: &Redacted) -> Result<(), UpstreamError> {
        let client = self.client_for(credential);

        tokio::time::timeout(self.timeout, client.models().list())
            .await
            .map_err(|_| UpstreamError::Timeout)?
            .map_err(map_openai_error)?;

        Ok(())
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`UpstreamError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> UpstreamError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                UpstreamError::Auth
            } else if code == "rate_limit_exceeded"
                || error_type == "rate_limit_error"
                || error_type == "insufficient_quota"
            {
                UpstreamError::RateLimited
            } else {
                UpstreamError::Other(api_err.message.clone())
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if reqwest_err.is_timeout() {
                UpstreamError::Timeout
            } else if let Some(status) = reqwest_err.status() {
                match status.as_u16() {
                    401 | 403 => UpstreamError::Auth,
                    429 => UpstreamError::RateLimited,
                    _ => UpstreamError::Other(err.to_string()),
                }
            } else {
                UpstreamError::Other(err.to_string())
            }
        }
        _ => UpstreamError::Other(err.to_string()),
    }
}
