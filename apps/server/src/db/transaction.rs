//! Scoped transaction helper

use crate::{Error, Result};
use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

/// Runs `work` inside a single database transaction.
///
/// Commits when `work` returns `Ok`. On `Err` the transaction is rolled back
/// and the original error is returned unchanged. If the returned future is
/// dropped before completion, the sqlx transaction guard rolls back when it
/// goes out of scope, before the connection returns to the pool.
///
/// ```rust,ignore
/// let id = with_transaction(&pool, move |conn| {
///     Box::pin(async move {
///         sqlx::query_scalar("INSERT INTO ... RETURNING id")
///             .fetch_one(&mut *conn)
///             .await
///             .map_err(Error::Database)
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<T, F>(pool: &PgPool, work: F) -> Result<T>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T>> + Send,
{
    let mut tx = pool.begin().await.map_err(Error::Database)?;

    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await.map_err(Error::Database)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}
