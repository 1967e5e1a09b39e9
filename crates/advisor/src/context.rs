//! Context assembly — builds the personalized system prompt.
//!
//! The assembled prompt is a pure function of the profile, the recent
//! history, and the question: same store state in, byte-identical
//! messages out. All nondeterminism (ids, timestamps) stays out of the
//! rendered text.

use profileos_core::error::{Error, Result};
use profileos_core::interaction::Interaction;
use profileos_core::message::ChatMessage;
use profileos_core::profile::Profile;
use profileos_core::store::{InteractionLog, ProfileStore};
use std::sync::Arc;
use tracing::debug;

/// How many past interactions are folded into the prompt.
pub const HISTORY_WINDOW: usize = 5;

/// A fully assembled two-message prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub system_context: String,
    pub user_question: String,
}

impl AssembledPrompt {
    /// The exact message sequence sent to the completion service:
    /// system context first, then the user question. Nothing else.
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_context),
            ChatMessage::user(self.user_question),
        ]
    }
}

/// Assembles prompts from profile + interaction history.
pub struct ContextAssembler {
    profiles: Arc<dyn ProfileStore>,
    interactions: Arc<dyn InteractionLog>,
    history_window: usize,
}

impl ContextAssembler {
    pub fn new(profiles: Arc<dyn ProfileStore>, interactions: Arc<dyn InteractionLog>) -> Self {
        Self {
            profiles,
            interactions,
            history_window: HISTORY_WINDOW,
        }
    }

    /// Override the history window (primarily for configuration).
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Build the prompt for one question.
    ///
    /// Fails with `UserNotFound` when the profile does not exist. A user
    /// with no history gets a prompt without any history block.
    pub async fn assemble(&self, user_id: &str, question: &str) -> Result<AssembledPrompt> {
        let profile = self
            .profiles
            .get(user_id)
            .await?
            .ok_or_else(|| Error::UserNotFound {
                user_id: user_id.to_string(),
            })?;

        // Newest-first from the store, oldest-first in the prompt.
        let mut history = self
            .interactions
            .recent(user_id, self.history_window)
            .await?;
        history.reverse();

        debug!(user_id, history_len = history.len(), "Assembled context");

        Ok(AssembledPrompt {
            system_context: render_system_context(&profile, &history),
            user_question: question.to_string(),
        })
    }
}

/// Render the system context. Pure: no clocks, no ids.
fn render_system_context(profile: &Profile, history: &[Interaction]) -> String {
    let mut context = format!(
        "You are ProfileOS - a personal investing brain for this user.\n\
         You know their profile and help them make decisions based on THEIR history and style, not generic advice.\n\
         \n\
         User Profile:\n\
         - Risk tolerance: {}\n\
         - Time horizon: {}\n\
         - Style: {}\n\
         \n\
         Guidelines:\n\
         - Be personal and direct\n\
         - Reference their style when relevant\n\
         - Answer in the same language as the question\n\
         - If they ask about a trade, consider their risk profile",
        profile
            .risk_profile
            .map(|r| r.to_string())
            .unwrap_or_else(|| "not set".into()),
        profile
            .time_horizon
            .map(|h| h.to_string())
            .unwrap_or_else(|| "not set".into()),
        profile.style.as_deref().unwrap_or("not set"),
    );

    if !history.is_empty() {
        context.push_str("\n\nRecent conversation history (oldest first):");
        for entry in history {
            context.push_str(&format!("\nQ: {}\nA: {}", entry.question, entry.answer));
        }
    }

    context
}
