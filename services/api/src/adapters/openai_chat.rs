//! services/api/src/adapters/openai_chat.rs
//!
//! This module contains the adapter for a hosted chat-completion API.
//! It implements the `CompletionProvider` port from the `core` crate.

use admission_core::domain::{ChatRole, ChatTurn};
use admission_core::ports::{CompletionProvider, PortError, PortResult};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionProvider` using an OpenAI-compatible
/// chat-completion API.
#[derive(Clone)]
pub struct OpenAiChatProvider {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChatProvider {
    /// Creates a new `OpenAiChatProvider`.
    pub fn new(
        client: Client<OpenAIConfig>,
        model: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            model,
            temperature,
            max_tokens,
        }
    }
}

//=========================================================================================
// `CompletionProvider` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionProvider for OpenAiChatProvider {
    /// Answers one user turn given the session's recent history and the
    /// college-information context.
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_text: &str,
        knowledge: Option<&str>,
    ) -> PortResult<String> {
        // The knowledge blob rides inside the system message so it never
        // competes with the user's own turns.
        let system_content = match knowledge {
            Some(data) => format!("{system_prompt}\n\nCOLLEGE INFORMATION:\n{data}"),
            None => system_prompt.to_string(),
        };

        let mut messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestSystemMessageArgs::default()
                .content(system_content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into()];

        for turn in history {
            let message = match turn.role {
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.content.clone())
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
                    .into(),
                ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.content.clone())
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
                    .into(),
            };
            messages.push(message);
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_text.to_string())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unavailable(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(PortError::Unavailable(
                    "Chat completion response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unavailable(
                "Chat completion returned no choices in its response.".to_string(),
            ))
        }
    }
}
