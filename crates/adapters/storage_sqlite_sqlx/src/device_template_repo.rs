//! `SQLite` implementation of [`DeviceTemplateRepository`].

use std::future::Future;

use sqlx::SqlitePool;

use servicehub_app::ports::DeviceTemplateRepository;
use servicehub_domain::error::ServiceHubError;
use servicehub_domain::id::ServiceId;

use crate::error::StorageError;

const DELETE_LINKS_TO_SERVICE: &str =
    "DELETE FROM device_template_linked_services WHERE service_id = ?";

/// `SQLite`-backed device template repository.
pub struct SqliteDeviceTemplateRepository {
    pool: SqlitePool,
}

impl SqliteDeviceTemplateRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceTemplateRepository for SqliteDeviceTemplateRepository {
    fn unlink_service(
        &self,
        service_id: ServiceId,
    ) -> impl Future<Output = Result<u64, ServiceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_LINKS_TO_SERVICE)
                .bind(service_id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected())
        }
    }
}
