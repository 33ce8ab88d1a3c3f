//! services/api/src/adapters/ollama.rs
//!
//! This module contains the adapter for a local self-hosted generation
//! endpoint (Ollama's `/api/generate` contract). It implements the
//! `CompletionProvider` port from the `core` crate.
//!
//! The endpoint takes one flat prompt string, so the knowledge blob and the
//! recent transcript are inlined into the prompt text.

use std::time::Duration;

use admission_core::domain::{ChatRole, ChatTurn};
use admission_core::ports::{CompletionProvider, PortError, PortResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionProvider` against an Ollama-style
/// generation endpoint.
pub struct OllamaProvider {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Creates a new `OllamaProvider`. The timeout applies to the whole
    /// request; the gateway enforces its own bound on top.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn build_prompt(
        system_prompt: &str,
        history: &[ChatTurn],
        user_text: &str,
        knowledge: Option<&str>,
    ) -> String {
        let mut prompt = String::new();
        prompt.push_str(system_prompt);
        prompt.push('\n');

        if let Some(data) = knowledge {
            prompt.push_str("\nDATA:\n");
            prompt.push_str(data);
            prompt.push('\n');
        }

        if !history.is_empty() {
            prompt.push_str("\nConversation so far:\n");
            for turn in history {
                let speaker = match turn.role {
                    ChatRole::User => "Student",
                    ChatRole::Assistant => "Assistant",
                };
                prompt.push_str(speaker);
                prompt.push_str(": ");
                prompt.push_str(&turn.content);
                prompt.push('\n');
            }
        }

        prompt.push_str("\nQuestion:\n");
        prompt.push_str(user_text);
        prompt.push_str("\n\nAnswer:\n");
        prompt
    }
}

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

//=========================================================================================
// `CompletionProvider` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionProvider for OllamaProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_text: &str,
        knowledge: Option<&str>,
    ) -> PortResult<String> {
        let prompt = Self::build_prompt(system_prompt, history, user_text, knowledge);
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt: &prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| PortError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unavailable(format!(
                "generation endpoint returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unavailable(e.to_string()))?;

        body.response
            .ok_or_else(|| PortError::Unavailable("response field missing from reply".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str) -> OllamaProvider {
        OllamaProvider::new(base_url, "mistral", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn successful_generation_returns_the_response_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "mistral",
                "response": "BCA costs 45000 per year.",
                "done": true
            })))
            .mount(&server)
            .await;

        let reply = provider(&server.uri())
            .complete("You are the assistant.", &[], "BCA fees?", Some("BCA: 45000"))
            .await
            .unwrap();
        assert_eq!(reply, "BCA costs 45000 per year.");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = provider(&server.uri())
            .complete("You are the assistant.", &[], "BCA fees?", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Unavailable(_)));
    }

    #[tokio::test]
    async fn missing_response_field_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "mistral",
                "done": true
            })))
            .mount(&server)
            .await;

        let err = provider(&server.uri())
            .complete("You are the assistant.", &[], "BCA fees?", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Unavailable(_)));
    }

    #[test]
    fn prompt_includes_data_transcript_and_question() {
        let history = [
            ChatTurn::user("Do you offer MBA?"),
            ChatTurn::assistant("Yes, MBA is offered."),
        ];
        let prompt = OllamaProvider::build_prompt(
            "You are the assistant.",
            &history,
            "What are the fees?",
            Some("MBA: 70000"),
        );

        assert!(prompt.starts_with("You are the assistant."));
        assert!(prompt.contains("DATA:\nMBA: 70000"));
        assert!(prompt.contains("Student: Do you offer MBA?"));
        assert!(prompt.contains("Assistant: Yes, MBA is offered."));
        assert!(prompt.trim_end().ends_with("Answer:"));
    }
}
