//! `SQLite` implementation of [`DeviceRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use servicehub_app::ports::DeviceRepository;
use servicehub_domain::device::{Device, LinkStatus, LinkedService, Location, PubSub};
use servicehub_domain::error::ServiceHubError;
use servicehub_domain::id::{DeviceId, LocationId, ServiceId, UserId};
use servicehub_domain::user::Owner;

use crate::error::{StorageError, decode_error};

/// Wrapper for converting a device row joined with its first matching link
/// into domain [`Device`].
struct Wrapper(Device);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let owner_id: Option<String> = row.try_get("owner_id")?;
        let owner_name: Option<String> = row.try_get("owner_name")?;
        let owner_email: Option<String> = row.try_get("owner_email")?;
        let location_id: Option<String> = row.try_get("location_id")?;
        let location_name: Option<String> = row.try_get("location_name")?;
        let service_id: String = row.try_get("service_id")?;
        let config: String = row.try_get("config")?;

        // A reference whose record is gone populates to nothing.
        let owner = match (owner_id, owner_name, owner_email) {
            (Some(id), Some(name), Some(email)) => Some(Owner {
                id: UserId::from_str(&id).map_err(decode_error)?,
                name,
                email,
            }),
            _ => None,
        };
        let location = match (location_id, location_name) {
            (Some(id), Some(name)) => Some(Location {
                id: LocationId::from_str(&id).map_err(decode_error)?,
                name,
            }),
            _ => None,
        };

        Ok(Self(Device {
            id: DeviceId::from_str(&id).map_err(decode_error)?,
            name: row.try_get("name")?,
            owner,
            pubsub: PubSub {
                protocol: row.try_get("pubsub_protocol")?,
                endpoint: row.try_get("pubsub_endpoint")?,
            },
            location,
            linked_services: vec![LinkedService {
                service_id: ServiceId::from_str(&service_id).map_err(decode_error)?,
                config: serde_json::from_str(&config).map_err(decode_error)?,
                status: LinkStatus {
                    message: row.try_get("status_message")?,
                },
            }],
        }))
    }
}

const SELECT_LINKED_TO_SERVICE: &str = "\
SELECT d.id, d.name, d.owner_id, u.name AS owner_name, u.email AS owner_email, \
       d.pubsub_protocol, d.pubsub_endpoint, d.location_id, l.name AS location_name, \
       link.service_id, link.config, link.status_message \
FROM devices d \
JOIN device_linked_services link ON link.device_id = d.id AND link.position = ( \
    SELECT MIN(position) FROM device_linked_services \
    WHERE device_id = d.id AND service_id = ?) \
LEFT JOIN users u ON u.id = d.owner_id \
LEFT JOIN locations l ON l.id = d.location_id \
ORDER BY d.rowid";
const DELETE_LINKS_TO_SERVICE: &str = "DELETE FROM device_linked_services WHERE service_id = ?";

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn find_linked_to_service(
        &self,
        service_id: ServiceId,
    ) -> impl Future<Output = Result<Vec<Device>, ServiceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_LINKED_TO_SERVICE)
                .bind(service_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

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
