use std::sync::Arc;

use super::test_support::{MockCompletion, MockStore};
use super::{ChatService, StoreError};
use crate::completion::{CompletionError, NO_RESPONSE_PLACEHOLDER};

#[tokio::test]
async fn successful_exchange_records_one_matching_row() {
    let store = Arc::new(MockStore::default());
    let service = ChatService::new(
        MockCompletion::with_outcomes(vec![Ok("stay focused".to_string())]),
        store.clone(),
    );

    let reply = service.handle_message("user-1", "help me focus").await;

    assert_eq!(reply.resposta, "stay focused");
    assert!(reply.persisted);
    assert_eq!(
        store.recorded(),
        vec![(
            "user-1".to_string(),
            "help me focus".to_string(),
            "stay focused".to_string()
        )]
    );
}

#[tokio::test]
async fn completion_failure_degrades_to_error_text_and_still_records() {
    let store = Arc::new(MockStore::default());
    let service = ChatService::new(
        MockCompletion::with_outcomes(vec![Err(CompletionError::UnexpectedStatus {
            status: 503,
        })]),
        store.clone(),
    );

    let reply = service.handle_message("user-2", "hello").await;

    assert!(reply
        .resposta
        .contains("error contacting the completion API"));
    assert!(reply.resposta.contains("503"));
    assert!(reply.persisted);

    let recorded = store.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].2, reply.resposta);
}

#[tokio::test]
async fn placeholder_response_is_recorded_like_any_other() {
    let store = Arc::new(MockStore::default());
    let service = ChatService::new(
        MockCompletion::with_outcomes(vec![Ok(NO_RESPONSE_PLACEHOLDER.to_string())]),
        store.clone(),
    );

    let reply = service.handle_message("user-3", "anyone there?").await;

    assert_eq!(reply.resposta, NO_RESPONSE_PLACEHOLDER);
    assert!(reply.persisted);
    assert_eq!(store.recorded()[0].2, NO_RESPONSE_PLACEHOLDER);
}

#[tokio::test]
async fn store_failure_never_affects_the_reply() {
    let store = Arc::new(MockStore::with_outcomes(vec![Err(StoreError::Query(
        diesel::result::Error::NotFound,
    ))]));
    let service = ChatService::new(
        MockCompletion::with_outcomes(vec![Ok("all good".to_string())]),
        store.clone(),
    );

    let reply = service.handle_message("user-4", "ping").await;

    assert_eq!(reply.resposta, "all good");
    assert!(!reply.persisted);
    assert_eq!(store.calls(), 1);
    assert!(store.recorded().is_empty());
}
