use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{Bike, BikeFilter};
use crate::database::store::{BikeStore, StoreResult};
use crate::database::utils::sql;

pub(crate) const BIKE_COLUMNS: &str = r#"
    id, garage_id, registration, bike_number, vin, engine_size, available,
    archived, archived_reason, archived_by, created_at, created_by
"#;

#[async_trait]
impl BikeStore for PgStore {
    async fn find_bikes(&self, filter: &BikeFilter) -> StoreResult<Vec<Bike>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {BIKE_COLUMNS} FROM bikes WHERE archived = FALSE"
        ));

        if let Some(garage_id) = filter.garage_id {
            query.push(" AND garage_id = ").push_bind(garage_id);
        }
        if filter.only_available {
            query.push(" AND available = TRUE");
        }
        if filter.max_engine_cc > 0 {
            query
                .push(" AND engine_size <= ")
                .push_bind(filter.max_engine_cc);
        }
        query.push(" ORDER BY bike_number ASC");

        query.build_query_as::<Bike>().fetch_all(&self.pool).await
    }

    async fn find_bike(&self, id: Uuid) -> StoreResult<Option<Bike>> {
        sqlx::query_as::<_, Bike>(&sql(&format!(
            "SELECT {BIKE_COLUMNS} FROM bikes WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_bike(&self, bike: &Bike) -> StoreResult<()> {
        sqlx::query(&sql(r#"
            INSERT INTO bikes (
                id, garage_id, registration, bike_number, vin, engine_size, available,
                archived, archived_reason, archived_by, created_at, created_by
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#))
        .bind(bike.id)
        .bind(bike.garage_id)
        .bind(&bike.registration)
        .bind(bike.bike_number)
        .bind(&bike.vin)
        .bind(bike.engine_size)
        .bind(bike.available)
        .bind(bike.archived)
        .bind(&bike.archived_reason)
        .bind(bike.archived_by)
        .bind(bike.created_at)
        .bind(bike.created_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_bike(&self, bike: &Bike) -> StoreResult<bool> {
        let result = sqlx::query(&sql(r#"
            UPDATE bikes
            SET garage_id = ?, registration = ?, bike_number = ?, vin = ?, engine_size = ?,
                available = ?, archived = ?, archived_reason = ?, archived_by = ?
            WHERE id = ?
        "#))
        .bind(bike.garage_id)
        .bind(&bike.registration)
        .bind(bike.bike_number)
        .bind(&bike.vin)
        .bind(bike.engine_size)
        .bind(bike.available)
        .bind(bike.archived)
        .bind(&bike.archived_reason)
        .bind(bike.archived_by)
        .bind(bike.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
