use std::sync::Arc;

use diesel::insert_into;
use diesel_async::pooled_connection::deadpool::{Pool, PoolError};
use diesel_async::RunQueryDsl;
use futures::future::BoxFuture;
use thiserror::Error;

use crate::db::models::NewConversation;
use crate::db::schema::conversations;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to acquire a database connection: {0}")]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Query(#[from] diesel::result::Error),
}

/// Writes one chat exchange as an append-only row.
///
/// Abstracted so the swallow-and-log persistence policy can be tested
/// without a Postgres instance. The explicit `Result` keeps the best-effort
/// contract visible at the call site.
pub trait ConversationStore: Send + Sync {
    fn record_exchange<'a>(
        &'a self,
        user_id: &'a str,
        message: &'a str,
        response: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>>;
}

impl<T> ConversationStore for Arc<T>
where
    T: ConversationStore + ?Sized,
{
    fn record_exchange<'a>(
        &'a self,
        user_id: &'a str,
        message: &'a str,
        response: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        (**self).record_exchange(user_id, message, response)
    }
}

/// Postgres-backed store used by the production runtime.
///
/// Acquire failures propagate to the caller unretried; release happens on
/// every exit path when the pooled object drops.
pub struct PgConversationStore {
    pool: Pool<diesel_async::AsyncPgConnection>,
}

impl PgConversationStore {
    pub fn new(pool: Pool<diesel_async::AsyncPgConnection>) -> Self {
        Self { pool }
    }
}

impl ConversationStore for PgConversationStore {
    fn record_exchange<'a>(
        &'a self,
        user_id: &'a str,
        message: &'a str,
        response: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            insert_into(conversations::table)
                .values(&NewConversation {
                    user_id,
                    message,
                    response,
                })
                .execute(&mut conn)
                .await?;
            Ok(())
        })
    }
}
