//! services/api/src/web/gateway.rs
//!
//! The chat gateway: turns one user message into one assistant reply.
//!
//! It assembles the provider call (persona, knowledge blob, the session's
//! recent turns), runs it under a timeout, and degrades to a fixed reply on
//! any failure — callers always receive text, never an error. Successful
//! exchanges are appended to the session's bounded history.

use std::sync::Arc;
use std::time::Duration;

use admission_core::ports::{CompletionProvider, KnowledgeStore};
use tracing::{error, warn};

use crate::web::session::SessionStore;

/// The assistant persona and scope, shared by every provider.
pub const SYSTEM_PROMPT: &str = "You are the Admission Assistant of Baba Farid Group of \
    Institutions. Answer clearly about courses, fees, eligibility, hostel facilities, \
    scholarships, placements and the admission process. Use ONLY the college information \
    provided.";

/// What the student sees when the provider is down, slow, or broken.
pub const FALLBACK_REPLY: &str = "AI service is currently unavailable.";

pub struct ChatGateway {
    provider: Arc<dyn CompletionProvider>,
    knowledge: Arc<dyn KnowledgeStore>,
    sessions: Arc<SessionStore>,
    timeout: Duration,
    window: usize,
}

impl ChatGateway {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        knowledge: Arc<dyn KnowledgeStore>,
        sessions: Arc<SessionStore>,
        timeout: Duration,
        window: usize,
    ) -> Self {
        Self {
            provider,
            knowledge,
            sessions,
            timeout,
            window,
        }
    }

    /// Produces the assistant's reply for `user_text` within the session's
    /// conversation.
    ///
    /// No session or store lock is held across the provider call; the
    /// history is snapshotted before and appended after.
    pub async fn ask(&self, session_id: &str, user_text: &str) -> String {
        let history = self.sessions.history(session_id);

        // A missing knowledge blob degrades to an uncontextualized answer,
        // not a failed chat.
        let knowledge = match self.knowledge.load().await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Could not load college information: {e}");
                None
            }
        };

        let call = self
            .provider
            .complete(SYSTEM_PROMPT, &history, user_text, knowledge.as_deref());

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(reply)) => {
                self.sessions
                    .append_exchange(session_id, user_text, &reply, self.window);
                reply
            }
            Ok(Err(e)) => {
                error!("Completion provider failed: {e}");
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                error!("Completion provider timed out after {:?}", self.timeout);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admission_core::domain::{ChatTurn, Role};
    use admission_core::ports::{PortError, PortResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: PortResult<String>,
        delay: Option<Duration>,
        seen_history_lens: Mutex<Vec<usize>>,
    }

    impl ScriptedProvider {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                delay: None,
                seen_history_lens: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(PortError::Unavailable("connection refused".to_string())),
                delay: None,
                seen_history_lens: Mutex::new(Vec::new()),
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                reply: Ok("too late".to_string()),
                delay: Some(delay),
                seen_history_lens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl admission_core::ports::CompletionProvider for ScriptedProvider {
        async fn complete(
            &self,
            _system_prompt: &str,
            history: &[ChatTurn],
            _user_text: &str,
            _knowledge: Option<&str>,
        ) -> PortResult<String> {
            self.seen_history_lens.lock().unwrap().push(history.len());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(PortError::Unavailable(e.to_string())),
            }
        }
    }

    struct StaticKnowledge;

    #[async_trait]
    impl KnowledgeStore for StaticKnowledge {
        async fn load(&self) -> PortResult<String> {
            Ok("BCA: 45000".to_string())
        }
    }

    fn gateway_with(
        provider: Arc<ScriptedProvider>,
        timeout: Duration,
    ) -> (ChatGateway, Arc<SessionStore>, String) {
        let sessions = Arc::new(SessionStore::new(chrono::Duration::hours(1)));
        let session = sessions.create("alice", Role::Student);
        let gateway = ChatGateway::new(
            provider,
            Arc::new(StaticKnowledge),
            sessions.clone(),
            timeout,
            6,
        );
        (gateway, sessions, session.id)
    }

    #[tokio::test]
    async fn successful_ask_replies_and_records_the_exchange() {
        let provider = Arc::new(ScriptedProvider::ok("BCA costs 45000."));
        let (gateway, sessions, sid) = gateway_with(provider, Duration::from_secs(5));

        let reply = gateway.ask(&sid, "BCA fees?").await;
        assert_eq!(reply, "BCA costs 45000.");

        let history = sessions.history(&sid);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "BCA fees?");
        assert_eq!(history[1].content, "BCA costs 45000.");
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_the_fallback_without_touching_history() {
        let provider = Arc::new(ScriptedProvider::failing());
        let (gateway, sessions, sid) = gateway_with(provider, Duration::from_secs(5));

        let reply = gateway.ask(&sid, "BCA fees?").await;
        assert_eq!(reply, FALLBACK_REPLY);
        assert!(sessions.history(&sid).is_empty());
    }

    #[tokio::test]
    async fn slow_provider_is_cut_off_at_the_timeout() {
        let provider = Arc::new(ScriptedProvider::slow(Duration::from_secs(60)));
        let (gateway, sessions, sid) = gateway_with(provider, Duration::from_millis(50));

        let started = std::time::Instant::now();
        let reply = gateway.ask(&sid, "BCA fees?").await;
        assert_eq!(reply, FALLBACK_REPLY);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(sessions.history(&sid).is_empty());
    }

    #[tokio::test]
    async fn history_passed_to_the_provider_never_exceeds_the_window() {
        let provider = Arc::new(ScriptedProvider::ok("noted"));
        let (gateway, _sessions, sid) = gateway_with(provider.clone(), Duration::from_secs(5));

        for i in 0..10 {
            gateway.ask(&sid, &format!("question {i}")).await;
        }

        let lens = provider.seen_history_lens.lock().unwrap();
        assert_eq!(*lens.iter().max().unwrap(), 6);
    }
}
