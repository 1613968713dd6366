use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::models::Garage;
use crate::database::store::{GarageStore, StoreResult};
use crate::database::utils::sql;

const GARAGE_COLUMNS: &str = "id, name, lat, lng, capacity";

#[async_trait]
impl GarageStore for PgStore {
    async fn list_garages(&self) -> StoreResult<Vec<Garage>> {
        sqlx::query_as::<_, Garage>(&format!(
            "SELECT {GARAGE_COLUMNS} FROM garages ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_garage(&self, id: Uuid) -> StoreResult<Option<Garage>> {
        sqlx::query_as::<_, Garage>(&sql(&format!(
            "SELECT {GARAGE_COLUMNS} FROM garages WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_garage(&self, garage: &Garage) -> StoreResult<()> {
        sqlx::query(&sql(r#"
            INSERT INTO garages (id, name, lat, lng, capacity)
            VALUES (?, ?, ?, ?, ?)
        "#))
        .bind(garage.id)
        .bind(&garage.name)
        .bind(garage.lat)
        .bind(garage.lng)
        .bind(garage.capacity)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_garage(&self, garage: &Garage) -> StoreResult<bool> {
        let result = sqlx::query(&sql(r#"
            UPDATE garages
            SET name = ?, lat = ?, lng = ?, capacity = ?
            WHERE id = ?
        "#))
        .bind(&garage.name)
        .bind(garage.lat)
        .bind(garage.lng)
        .bind(garage.capacity)
        .bind(garage.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_garage(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(&sql("DELETE FROM garages WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn garage_in_use(&self, id: Uuid) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(&sql(r#"
            SELECT EXISTS (SELECT 1 FROM bikes WHERE garage_id = ?)
                OR EXISTS (SELECT 1 FROM shifts WHERE garage_id = ?)
        "#))
        .bind(id)
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }
}
