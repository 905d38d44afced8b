use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;
use tokio::sync::OnceCell;

#[derive(Clone)]
pub struct ChatMetrics {
    /// Requests received on the chat endpoint.
    pub requests_total: Counter,
    /// Completion calls that failed with transport or HTTP errors.
    pub completion_failures_total: Counter,
    /// Conversation rows that could not be written.
    pub persistence_failures_total: Counter,
}

impl ChatMetrics {
    fn init() -> Self {
        Self {
            requests_total: Counter::default(),
            completion_failures_total: Counter::default(),
            persistence_failures_total: Counter::default(),
        }
    }

    pub fn register(registry: &mut Registry, prefix: &str) -> Self {
        let metrics = Self::init();
        let sub_registry = registry.sub_registry_with_prefix(prefix);
        sub_registry.register(
            "requests",
            "Total chat requests received",
            metrics.requests_total.clone(),
        );
        sub_registry.register(
            "completion_failures",
            "Total completion API calls that failed",
            metrics.completion_failures_total.clone(),
        );
        sub_registry.register(
            "persistence_failures",
            "Total conversation rows that failed to persist",
            metrics.persistence_failures_total.clone(),
        );
        metrics
    }
}

pub static CHAT_METRICS: OnceCell<ChatMetrics> = OnceCell::const_new();
