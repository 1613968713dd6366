use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{Driver, DriverFilter};
use crate::database::store::{DriverStore, StoreResult};
use crate::database::utils::sql;

const DRIVER_COLUMNS: &str = "id, name, email, license, blocked, created_at";

#[async_trait]
impl DriverStore for PgStore {
    async fn find_driver(&self, id: Uuid) -> StoreResult<Option<Driver>> {
        sqlx::query_as::<_, Driver>(&sql(&format!(
            "SELECT {DRIVER_COLUMNS} FROM drivers WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_drivers(&self, filter: &DriverFilter) -> StoreResult<Vec<Driver>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {DRIVER_COLUMNS} FROM drivers WHERE TRUE"
        ));
        if let Some(name) = &filter.name {
            query.push(" AND name ILIKE ").push_bind(format!("%{name}%"));
        }
        if let Some(email) = &filter.email {
            query.push(" AND email ILIKE ").push_bind(format!("%{email}%"));
        }
        if let Some(license) = filter.license {
            query.push(" AND license = ").push_bind(license);
        }
        query.push(" ORDER BY name");

        query.build_query_as::<Driver>().fetch_all(&self.pool).await
    }

    async fn update_driver(&self, driver: &Driver) -> StoreResult<bool> {
        let result = sqlx::query(&sql("UPDATE drivers SET name = ?, license = ? WHERE id = ?"))
            .bind(&driver.name)
            .bind(driver.license)
            .bind(driver.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_driver_blocked(&self, id: Uuid, blocked: bool) -> StoreResult<bool> {
        let result = sqlx::query(&sql("UPDATE drivers SET blocked = ? WHERE id = ?"))
            .bind(blocked)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
