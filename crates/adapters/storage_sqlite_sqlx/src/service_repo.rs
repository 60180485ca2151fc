//! `SQLite` implementation of [`ServiceRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqlitePool};

use servicehub_app::ports::ServiceRepository;
use servicehub_domain::error::{NotFoundError, ServiceHubError};
use servicehub_domain::id::{ServiceId, UserId};
use servicehub_domain::service::{Service, ServiceDetails};
use servicehub_domain::user::Owner;

use crate::error::{StorageError, decode_error};

fn json_column<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: serde::de::DeserializeOwned,
{
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(decode_error)
}

/// Wrapper for converting database rows into domain [`Service`].
struct Wrapper(Service);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Service> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let owner_id: String = row.try_get("owner_id")?;

        Ok(Self(Service {
            id: ServiceId::from_str(&id).map_err(decode_error)?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            config_required: json_column(row, "config_required")?,
            device_permission: json_column(row, "device_permission")?,
            properties: json_column(row, "properties")?,
            owner: UserId::from_str(&owner_id).map_err(decode_error)?,
            status: row.try_get("status")?,
        }))
    }
}

/// Wrapper for rows of a services/users join.
struct DetailsWrapper(ServiceDetails);

impl<'r> FromRow<'r, SqliteRow> for DetailsWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Wrapper(service) = Wrapper::from_row(row)?;
        let owner_name: Option<String> = row.try_get("owner_name")?;
        let owner_email: Option<String> = row.try_get("owner_email")?;

        let owner = match (owner_name, owner_email) {
            (Some(name), Some(email)) => Some(Owner {
                id: service.owner,
                name,
                email,
            }),
            _ => None,
        };

        Ok(Self(ServiceDetails::new(service, owner)))
    }
}

const INSERT: &str = "INSERT INTO services (id, name, description, config_required, device_permission, properties, owner_id, status) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM services WHERE id = ?";
const SELECT_DETAILS_BY_ID: &str = "SELECT s.*, u.name AS owner_name, u.email AS owner_email FROM services s LEFT JOIN users u ON u.id = s.owner_id WHERE s.id = ?";
const SELECT_ALL_DETAILS: &str = "SELECT s.*, u.name AS owner_name, u.email AS owner_email FROM services s LEFT JOIN users u ON u.id = s.owner_id ORDER BY s.rowid";
const UPDATE: &str = "UPDATE services SET name = ?, description = ?, config_required = ?, device_permission = ?, properties = ? WHERE id = ? RETURNING *";
const UPDATE_STATUS: &str = "UPDATE services SET status = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM services WHERE id = ?";

/// Turn a free-text query into `LIKE` patterns, one per whitespace-separated term.
fn like_patterns(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|term| {
            let escaped = term
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
        .collect()
}

/// JSON-encoded document columns of a service, in table order.
struct EncodedDocuments {
    config_required: String,
    device_permission: String,
    properties: String,
}

impl EncodedDocuments {
    fn encode(service: &Service) -> Result<Self, StorageError> {
        Ok(Self {
            config_required: serde_json::to_string(&service.config_required)?,
            device_permission: serde_json::to_string(&service.device_permission)?,
            properties: serde_json::to_string(&service.properties)?,
        })
    }
}

/// `SQLite`-backed service repository.
pub struct SqliteServiceRepository {
    pool: SqlitePool,
}

impl SqliteServiceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ServiceRepository for SqliteServiceRepository {
    fn create(
        &self,
        service: Service,
    ) -> impl Future<Output = Result<Service, ServiceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let docs = EncodedDocuments::encode(&service)?;
            sqlx::query(INSERT)
                .bind(service.id.to_string())
                .bind(&service.name)
                .bind(&service.description)
                .bind(docs.config_required)
                .bind(docs.device_permission)
                .bind(docs.properties)
                .bind(service.owner.to_string())
                .bind(&service.status)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(service)
        }
    }

    fn get_details(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<ServiceDetails>, ServiceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<DetailsWrapper> = sqlx::query_as(SELECT_DETAILS_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn get_all_details(
        &self,
    ) -> impl Future<Output = Result<Vec<ServiceDetails>, ServiceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<DetailsWrapper> = sqlx::query_as(SELECT_ALL_DETAILS)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn find_by_owner(
        &self,
        owner: UserId,
        text: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Service>, ServiceHubError>> + Send {
        let pool = self.pool.clone();
        let patterns = text.map(like_patterns).unwrap_or_default();
        async move {
            let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM services WHERE owner_id = ");
            query.push_bind(owner.to_string());

            if !patterns.is_empty() {
                query.push(" AND (");
                for (index, pattern) in patterns.into_iter().enumerate() {
                    if index > 0 {
                        query.push(" OR ");
                    }
                    query
                        .push("name LIKE ")
                        .push_bind(pattern.clone())
                        .push(" ESCAPE '\\' OR description LIKE ")
                        .push_bind(pattern)
                        .push(" ESCAPE '\\'");
                }
                query.push(")");
            }
            query.push(" ORDER BY rowid");

            let rows: Vec<Wrapper> = query
                .build_query_as::<Wrapper>()
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        service: Service,
    ) -> impl Future<Output = Result<Service, ServiceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let docs = EncodedDocuments::encode(&service)?;
            let row = sqlx::query_as::<_, Wrapper>(UPDATE)
                .bind(&service.name)
                .bind(&service.description)
                .bind(docs.config_required)
                .bind(docs.device_permission)
                .bind(docs.properties)
                .bind(service.id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Wrapper::maybe(row).ok_or_else(|| {
                ServiceHubError::from(NotFoundError {
                    entity: "service",
                    id: service.id.to_string(),
                })
            })
        }
    }

    fn set_status(
        &self,
        id: ServiceId,
        status: String,
    ) -> impl Future<Output = Result<Option<Service>, ServiceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            let previous: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if previous.is_some() {
                sqlx::query(UPDATE_STATUS)
                    .bind(&status)
                    .bind(id.to_string())
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
            }

            tx.commit().await.map_err(StorageError::from)?;

            Ok(Wrapper::maybe(previous))
        }
    }

    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<(), ServiceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
