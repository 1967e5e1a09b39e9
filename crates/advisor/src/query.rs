//! Query orchestration — the ask-and-log pipeline.
//!
//! Ordering is strict: validate input, assemble context, call the
//! completion provider (one attempt, no retry), then append the exchange
//! to the interaction log. A failed completion leaves the log untouched,
//! so history never contains answers that were never produced.

use crate::context::{AssembledPrompt, ContextAssembler};
use profileos_core::completion::{CompletionProvider, CompletionRequest};
use profileos_core::error::{Error, Result};
use profileos_core::store::InteractionLog;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// The result of a successful ask.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub answer: String,
    pub interaction_id: String,
    pub user_id: String,
}

/// Runs personalized queries end to end.
pub struct QueryEngine {
    assembler: ContextAssembler,
    interactions: Arc<dyn InteractionLog>,
    provider: Arc<dyn CompletionProvider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl QueryEngine {
    pub fn new(
        assembler: ContextAssembler,
        interactions: Arc<dyn InteractionLog>,
        provider: Arc<dyn CompletionProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            assembler,
            interactions,
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Answer a question on behalf of a user and log the exchange.
    pub async fn ask(&self, user_id: &str, question: &str) -> Result<QueryOutcome> {
        // Input validation happens before any store access.
        if user_id.trim().is_empty() || question.trim().is_empty() {
            return Err(Error::invalid_input("user_id and question are required"));
        }

        let prompt: AssembledPrompt = self.assembler.assemble(user_id, question).await?;

        debug!(user_id, model = %self.model, "Dispatching completion request");

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: prompt.into_messages(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let answer = self.provider.complete(request).await?;

        // Logged only after the provider produced an answer.
        let interaction = self.interactions.append(user_id, question, &answer).await?;

        info!(
            user_id,
            interaction_id = %interaction.id,
            "Answered investor query"
        );

        Ok(QueryOutcome {
            answer,
            interaction_id: interaction.id,
            user_id: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use profileos_core::error::CompletionError;
    use profileos_core::message::ChatRole;
    use profileos_core::profile::NewProfile;
    use profileos_core::store::ProfileStore;
    use profileos_store::MemoryStore;
    use std::sync::Mutex;

    /// Records every request and replies with a canned answer.
    struct StubProvider {
        reply: &'static str,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl StubProvider {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<String, CompletionError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.reply.to_string())
        }
    }

    /// Always fails, to prove nothing gets logged on failure.
    struct FailingProvider;

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> std::result::Result<String, CompletionError> {
            Err(CompletionError::EmptyCompletion)
        }
    }

    fn engine(store: &Arc<MemoryStore>, provider: Arc<dyn CompletionProvider>) -> QueryEngine {
        QueryEngine::new(
            ContextAssembler::new(store.clone(), store.clone()),
            store.clone(),
            provider,
            "gpt-4o-mini",
        )
    }

    #[tokio::test]
    async fn blank_input_is_rejected_before_store_access() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store, Arc::new(StubProvider::new("x")));

        let err = engine.ask("  ", "question").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));

        let err = engine.ask("u1", "\t\n").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store, Arc::new(StubProvider::new("x")));

        let err = engine.ask("ghost", "hello?").await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn ask_sends_two_messages_and_logs_exchange() {
        let store = Arc::new(MemoryStore::new());
        let provider = Arc::new(StubProvider::new("Yes, given your style."));
        let engine = engine(&store, provider.clone());

        let user = store.create(NewProfile::default()).await.unwrap();
        let outcome = engine.ask(&user.id, "Should I buy AAPL?").await.unwrap();

        assert_eq!(outcome.answer, "Yes, given your style.");
        assert_eq!(outcome.user_id, user.id);

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].messages.len(), 2);
        assert_eq!(seen[0].messages[0].role, ChatRole::System);
        assert_eq!(seen[0].messages[1].role, ChatRole::User);
        assert_eq!(seen[0].messages[1].content, "Should I buy AAPL?");
        drop(seen);

        let logged = store.recent(&user.id, 5).await.unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].id, outcome.interaction_id);
        assert_eq!(logged[0].question, "Should I buy AAPL?");
        assert_eq!(logged[0].answer, "Yes, given your style.");
    }

    #[tokio::test]
    async fn failed_completion_leaves_log_untouched() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store, Arc::new(FailingProvider));

        let user = store.create(NewProfile::default()).await.unwrap();
        let err = engine.ask(&user.id, "anything").await.unwrap_err();
        assert!(matches!(err, Error::Completion(_)));

        assert!(store.recent(&user.id, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn follow_up_question_sees_prior_exchange_in_context() {
        let store = Arc::new(MemoryStore::new());
        let provider = Arc::new(StubProvider::new("ok"));
        let engine = engine(&store, provider.clone());

        let user = store.create(NewProfile::default()).await.unwrap();
        engine.ask(&user.id, "first question").await.unwrap();
        engine.ask(&user.id, "second question").await.unwrap();

        let seen = provider.seen.lock().unwrap();
        let second_system = &seen[1].messages[0].content;
        assert!(second_system.contains("Q: first question"));
        assert!(second_system.contains("A: ok"));
    }
}
