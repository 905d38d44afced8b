use std::collections::VecDeque;
use std::sync::Mutex;

use futures::future::BoxFuture;

use super::store::{ConversationStore, StoreError};
use super::CompletionProvider;
use crate::completion::CompletionError;

pub(crate) struct MockCompletion {
    outcomes: Mutex<VecDeque<Result<String, CompletionError>>>,
}

impl MockCompletion {
    pub(crate) fn with_outcomes(outcomes: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
        }
    }
}

impl CompletionProvider for MockCompletion {
    fn complete<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, CompletionError>> {
        Box::pin(async move {
            self.outcomes
                .lock()
                .expect("outcomes mutex poisoned")
                .pop_front()
                .unwrap_or_else(|| Ok("scripted responses exhausted".to_string()))
        })
    }
}

#[derive(Default)]
pub(crate) struct MockStore {
    outcomes: Mutex<VecDeque<Result<(), StoreError>>>,
    calls: Mutex<u32>,
    recorded: Mutex<Vec<(String, String, String)>>,
}

impl MockStore {
    pub(crate) fn with_outcomes(outcomes: Vec<Result<(), StoreError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(0),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        *self.calls.lock().expect("calls mutex poisoned")
    }

    pub(crate) fn recorded(&self) -> Vec<(String, String, String)> {
        self.recorded
            .lock()
            .expect("recorded mutex poisoned")
            .clone()
    }
}

impl ConversationStore for MockStore {
    fn record_exchange<'a>(
        &'a self,
        user_id: &'a str,
        message: &'a str,
        response: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            *self.calls.lock().expect("calls mutex poisoned") += 1;

            let next = self
                .outcomes
                .lock()
                .expect("outcomes mutex poisoned")
                .pop_front()
                .unwrap_or(Ok(()));

            if next.is_ok() {
                self.recorded
                    .lock()
                    .expect("recorded mutex poisoned")
                    .push((
                        user_id.to_string(),
                        message.to_string(),
                        response.to_string(),
                    ));
            }

            next
        })
    }
}
