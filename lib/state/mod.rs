use std::sync::Arc;

use prometheus_client::registry::Registry;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::chat::{ChatService, CompletionProvider, ConversationStore};

/// Chat service over the dynamic provider/store handles wired at startup.
pub type DynChatService = ChatService<Arc<dyn CompletionProvider>, Arc<dyn ConversationStore>>;

pub struct AppState {
    pub chat: DynChatService,
    pub shutdown_token: CancellationToken,
    pub registry: RwLock<Registry>,
}

impl AppState {
    pub fn new(chat: DynChatService, shutdown_token: CancellationToken) -> Self {
        Self {
            chat,
            shutdown_token,
            registry: RwLock::new(<Registry>::default()),
        }
    }
}
