pub mod models;
pub mod schema;

use std::future::Future;
use std::time::Duration;

use diesel_async::{
    pg::AsyncPgConnection,
    pooled_connection::{
        deadpool::{BuildError, Pool},
        AsyncDieselConnectionManager,
    },
};
use log::{info, warn};
use thiserror::Error;
use tokio::time::{sleep, timeout};

use crate::config::DbConfig;

/// Total connection attempts before pool initialization fails fatally.
pub const MAX_RETRIES: u32 = 3;
/// Wait between failed connection attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);
/// Per-attempt bound so a single attempt cannot hang on an unreachable host.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum PoolInitError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("database unreachable after {attempts} connection attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// Builds the shared connection pool and verifies the database is reachable.
///
/// Deadpool opens connections lazily, so construction alone proves nothing.
/// Initialization therefore checks out `min_size` connections under
/// `CONNECT_TIMEOUT` and returns them, which both validates connectivity and
/// warms the pool to its floor. The check runs under a bounded retry loop;
/// if every attempt fails the process must not start serving requests.
pub async fn build_db_pool(config: &DbConfig) -> Result<Pool<AsyncPgConnection>, PoolInitError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url());
    let pool = Pool::builder(manager).max_size(config.max_size).build()?;

    let min_size = config.min_size;
    let attempts = init_with_retry(MAX_RETRIES, RETRY_DELAY, || warm_pool(&pool, min_size))
        .await
        .map_err(|terminal| PoolInitError::Exhausted {
            attempts: terminal.attempts,
            last_error: terminal.last_error,
        })?;

    if attempts > 1 {
        info!("database pool established after {attempts} attempts");
    }
    Ok(pool)
}

/// Checks out `min_size` connections, forcing deadpool to establish them,
/// then drops the lot back into the pool.
async fn warm_pool(pool: &Pool<AsyncPgConnection>, min_size: usize) -> Result<(), String> {
    let mut checked_out = Vec::with_capacity(min_size);
    for _ in 0..min_size.max(1) {
        let conn = timeout(CONNECT_TIMEOUT, pool.get())
            .await
            .map_err(|_| {
                format!(
                    "connection attempt timed out after {}s",
                    CONNECT_TIMEOUT.as_secs()
                )
            })?
            .map_err(|err| err.to_string())?;
        checked_out.push(conn);
    }
    Ok(())
}

#[derive(Debug)]
struct RetryTerminal {
    attempts: u32,
    last_error: String,
}

/// Plain bounded retry loop with a fixed delay between attempts.
///
/// Returns the attempt number that succeeded so callers can log slow starts.
async fn init_with_retry<F, Fut>(
    max_retries: u32,
    delay: Duration,
    mut op: F,
) -> Result<u32, RetryTerminal>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    let max_retries = max_retries.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_retries {
        match op().await {
            Ok(()) => return Ok(attempt),
            Err(err) => {
                warn!("database connection attempt {attempt}/{max_retries} failed: {err}");
                last_error = err;
                if attempt < max_retries && !delay.is_zero() {
                    sleep(delay).await;
                }
            }
        }
    }

    Err(RetryTerminal {
        attempts: max_retries,
        last_error,
    })
}
