use std::sync::Arc;

use futures::future::BoxFuture;

use crate::completion::{CompletionClient, CompletionError};

/// Produces one completion for raw user text.
///
/// This trait exists so the chat service can be unit-tested against scripted
/// outcomes without live network access.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, CompletionError>>;
}

impl<T> CompletionProvider for Arc<T>
where
    T: CompletionProvider + ?Sized,
{
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, CompletionError>> {
        (**self).complete(prompt)
    }
}

impl CompletionProvider for CompletionClient {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, CompletionError>> {
        Box::pin(self.get_completion(prompt))
    }
}
