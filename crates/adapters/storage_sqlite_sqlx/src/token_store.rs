//! `SQLite` implementation of [`TokenManager`].

use std::future::Future;

use sqlx::SqlitePool;

use servicehub_app::ports::TokenManager;
use servicehub_domain::error::ServiceHubError;
use servicehub_domain::id::ThingId;

use crate::error::StorageError;

const DELETE_BY_THING_ID: &str = "DELETE FROM thing_tokens WHERE thing_id = ?";

/// Thing tokens kept in the `thing_tokens` table.
pub struct SqliteTokenStore {
    pool: SqlitePool,
}

impl SqliteTokenStore {
    /// Create a new token store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TokenManager for SqliteTokenStore {
    fn delete_token_by_thing_id(
        &self,
        thing_id: ThingId,
    ) -> impl Future<Output = Result<(), ServiceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_THING_ID)
                .bind(thing_id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            tracing::debug!(%thing_id, revoked = result.rows_affected(), "thing token deleted");
            Ok(())
        }
    }
}
