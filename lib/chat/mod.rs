mod provider;
mod store;
#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use provider::CompletionProvider;
pub use store::{ConversationStore, PgConversationStore, StoreError};

use log::{error, warn};

use crate::server::monitoring::CHAT_METRICS;

/// Outcome of one chat exchange. `resposta` is always present; `persisted`
/// records whether the best-effort write landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub resposta: String,
    pub persisted: bool,
}

/// Orchestrates one exchange: completion first, then persistence, and always
/// produces a reply.
pub struct ChatService<C, S> {
    completion: C,
    store: S,
}

impl<C, S> ChatService<C, S>
where
    C: CompletionProvider,
    S: ConversationStore,
{
    pub fn new(completion: C, store: S) -> Self {
        Self { completion, store }
    }

    /// Runs the full per-request path.
    ///
    /// A completion failure is recovered into a visible error string used as
    /// the response text, so the persistence step still runs. A persistence
    /// failure is logged and swallowed; it never changes the reply. Every
    /// path through this function responds.
    pub async fn handle_message(&self, user_id: &str, message: &str) -> ChatReply {
        if let Some(metrics) = CHAT_METRICS.get() {
            metrics.requests_total.inc();
        }

        let resposta = match self.completion.complete(message).await {
            Ok(text) => text,
            Err(err) => {
                warn!("completion call failed for user {user_id}: {err}");
                if let Some(metrics) = CHAT_METRICS.get() {
                    metrics.completion_failures_total.inc();
                }
                format!("error contacting the completion API: {err}")
            }
        };

        let persisted = match self
            .store
            .record_exchange(user_id, message, &resposta)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                error!("failed to persist conversation for user {user_id}: {err}");
                if let Some(metrics) = CHAT_METRICS.get() {
                    metrics.persistence_failures_total.inc();
                }
                false
            }
        };

        ChatReply { resposta, persisted }
    }
}
