use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{MaintenanceLog, OperatorReport};
use crate::database::store::{MaintenanceStore, StoreResult};
use crate::database::utils::sql;

const LOG_COLUMNS: &str = "id, bike_id, notes, mechanic_required, checked_by, checked_at";

const REPORT_COLUMNS: &str = r#"
    id, bike_id, shift_id, checked_by, checked_at, condition, notes, fuel_level,
    locked_up, clothes_returned, key_returned, mechanic_required, mechanic_alert_reason
"#;

#[async_trait]
impl MaintenanceStore for PgStore {
    async fn maintenance_logs(&self, bike_id: Uuid) -> StoreResult<Vec<MaintenanceLog>> {
        sqlx::query_as::<_, MaintenanceLog>(&sql(&format!(
            "SELECT {LOG_COLUMNS} FROM maintenance_logs WHERE bike_id = ? ORDER BY checked_at DESC"
        )))
        .bind(bike_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_maintenance_log(&self, id: Uuid) -> StoreResult<Option<MaintenanceLog>> {
        sqlx::query_as::<_, MaintenanceLog>(&sql(&format!(
            "SELECT {LOG_COLUMNS} FROM maintenance_logs WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_maintenance_log(&self, log: &MaintenanceLog) -> StoreResult<()> {
        sqlx::query(&sql(r#"
            INSERT INTO maintenance_logs (id, bike_id, notes, mechanic_required, checked_by, checked_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#))
        .bind(log.id)
        .bind(log.bike_id)
        .bind(&log.notes)
        .bind(log.mechanic_required)
        .bind(log.checked_by)
        .bind(log.checked_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_maintenance_log(&self, log: &MaintenanceLog) -> StoreResult<bool> {
        let result = sqlx::query(&sql(r#"
            UPDATE maintenance_logs
            SET notes = ?, mechanic_required = ?, checked_by = ?, checked_at = ?
            WHERE id = ? AND bike_id = ?
        "#))
        .bind(&log.notes)
        .bind(log.mechanic_required)
        .bind(log.checked_by)
        .bind(log.checked_at)
        .bind(log.id)
        .bind(log.bike_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_maintenance_log(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(&sql("DELETE FROM maintenance_logs WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn operator_report_for_shift(
        &self,
        shift_id: Uuid,
    ) -> StoreResult<Option<OperatorReport>> {
        sqlx::query_as::<_, OperatorReport>(&sql(&format!(
            "SELECT {REPORT_COLUMNS} FROM operator_reports WHERE shift_id = ?"
        )))
        .bind(shift_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_operator_report(&self, report: &OperatorReport) -> StoreResult<OperatorReport> {
        sqlx::query_as::<_, OperatorReport>(&sql(&format!(
            r#"
            INSERT INTO operator_reports (
                id, bike_id, shift_id, checked_by, checked_at, condition, notes, fuel_level,
                locked_up, clothes_returned, key_returned, mechanic_required, mechanic_alert_reason
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (shift_id) DO UPDATE SET
                bike_id = EXCLUDED.bike_id,
                checked_by = EXCLUDED.checked_by,
                checked_at = EXCLUDED.checked_at,
                condition = EXCLUDED.condition,
                notes = EXCLUDED.notes,
                fuel_level = EXCLUDED.fuel_level,
                locked_up = EXCLUDED.locked_up,
                clothes_returned = EXCLUDED.clothes_returned,
                key_returned = EXCLUDED.key_returned,
                mechanic_required = EXCLUDED.mechanic_required,
                mechanic_alert_reason = EXCLUDED.mechanic_alert_reason
            RETURNING {REPORT_COLUMNS}
            "#
        )))
        .bind(report.id)
        .bind(report.bike_id)
        .bind(report.shift_id)
        .bind(report.checked_by)
        .bind(report.checked_at)
        .bind(&report.condition)
        .bind(&report.notes)
        .bind(report.fuel_level)
        .bind(report.locked_up)
        .bind(report.clothes_returned)
        .bind(report.key_returned)
        .bind(report.mechanic_required)
        .bind(&report.mechanic_alert_reason)
        .fetch_one(&self.pool)
        .await
    }

    async fn operator_reports_for_bike(&self, bike_id: Uuid) -> StoreResult<Vec<OperatorReport>> {
        sqlx::query_as::<_, OperatorReport>(&sql(
            r#"
            SELECT r.id, r.bike_id, r.shift_id, r.checked_by, r.checked_at, r.condition, r.notes,
                   r.fuel_level, r.locked_up, r.clothes_returned, r.key_returned,
                   r.mechanic_required, r.mechanic_alert_reason
            FROM operator_reports r
            INNER JOIN shifts s ON s.id = r.shift_id
            WHERE r.bike_id = ?
            ORDER BY s.date DESC
            "#,
        ))
        .bind(bike_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn bikes_needing_mechanic(&self) -> StoreResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT bike_id FROM maintenance_logs WHERE mechanic_required = TRUE
            UNION
            SELECT bike_id FROM operator_reports WHERE mechanic_required = TRUE
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
