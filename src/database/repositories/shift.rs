use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{BikeDay, Deletion, Shift, ShiftPatch, ShiftStatus};
use crate::database::store::{ShiftStore, StoreResult};
use crate::database::utils::sql;

const SHIFT_COLUMNS: &str = r#"
    id, garage_id, bike_id, driver_id, date, status,
    check_in, check_in_operator, check_out, check_out_operator, notes,
    paid, paid_amount, paid_by, paid_at,
    added_at, added_by, deleted, deleted_reason, deleted_at, deleted_by
"#;

#[async_trait]
impl ShiftStore for PgStore {
    async fn find_shift(&self, id: Uuid) -> StoreResult<Option<Shift>> {
        sqlx::query_as::<_, Shift>(&sql(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn count_shifts(&self, slot: &BikeDay, status: ShiftStatus) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>(&sql(r#"
            SELECT COUNT(*)
            FROM shifts
            WHERE garage_id = ?
              AND bike_id = ?
              AND date >= ?
              AND date < ?
              AND deleted = FALSE
              AND status = ?
        "#))
        .bind(slot.garage_id)
        .bind(slot.bike_id)
        .bind(slot.from)
        .bind(slot.until)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_shift(&self, shift: &Shift) -> StoreResult<()> {
        sqlx::query(&sql(r#"
            INSERT INTO shifts (
                id, garage_id, bike_id, driver_id, date, status, notes,
                paid, added_at, added_by, deleted
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#))
        .bind(shift.id)
        .bind(shift.garage_id)
        .bind(shift.bike_id)
        .bind(shift.driver_id)
        .bind(shift.date)
        .bind(shift.status)
        .bind(&shift.notes)
        .bind(shift.paid)
        .bind(shift.added_at)
        .bind(shift.added_by)
        .bind(shift.deleted)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_shift(&self, id: Uuid, patch: &ShiftPatch) -> StoreResult<Option<Shift>> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE shifts SET ");
        let mut set = query.separated(", ");
        // keeps the statement valid for an empty patch
        set.push("id = id");

        if let Some(status) = patch.status {
            set.push("status = ").push_bind_unseparated(status);
        }
        if let Some(bike_id) = patch.bike_id {
            set.push("bike_id = ").push_bind_unseparated(bike_id);
        }
        if let Some(check_in) = patch.check_in {
            set.push("check_in = ").push_bind_unseparated(check_in);
        }
        if let Some(operator) = patch.check_in_operator {
            set.push("check_in_operator = ").push_bind_unseparated(operator);
        }
        if let Some(check_out) = patch.check_out {
            set.push("check_out = ").push_bind_unseparated(check_out);
        }
        if let Some(operator) = patch.check_out_operator {
            set.push("check_out_operator = ").push_bind_unseparated(operator);
        }
        if let Some(notes) = &patch.notes {
            set.push("notes = ").push_bind_unseparated(notes.clone());
        }
        match &patch.deletion {
            Some(Some(deletion)) => {
                set.push("deleted = TRUE");
                set.push("deleted_reason = ")
                    .push_bind_unseparated(deletion.reason.clone());
                set.push("deleted_by = ").push_bind_unseparated(deletion.by);
                set.push("deleted_at = ").push_bind_unseparated(deletion.at);
            }
            Some(None) => {
                set.push("deleted = FALSE");
            }
            None => {}
        }
        if let Some(payment) = &patch.payment {
            set.push("paid = TRUE");
            set.push("paid_amount = ")
                .push_bind_unseparated(payment.amount.clone());
            set.push("paid_by = ").push_bind_unseparated(payment.by);
            set.push("paid_at = ").push_bind_unseparated(payment.at);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(SHIFT_COLUMNS);

        query
            .build_query_as::<Shift>()
            .fetch_optional(&self.pool)
            .await
    }

    async fn remove_shift(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(&sql("DELETE FROM shifts WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn cancel_shifts(
        &self,
        slot: &BikeDay,
        status: ShiftStatus,
        exclude: Uuid,
        deletion: &Deletion,
    ) -> StoreResult<u64> {
        let result = sqlx::query(&sql(r#"
            UPDATE shifts
            SET status = ?, deleted = TRUE, deleted_reason = ?, deleted_by = ?, deleted_at = ?
            WHERE garage_id = ?
              AND bike_id = ?
              AND date >= ?
              AND date < ?
              AND status = ?
              AND id <> ?
        "#))
        .bind(ShiftStatus::Cancelled)
        .bind(&deletion.reason)
        .bind(deletion.by)
        .bind(deletion.at)
        .bind(slot.garage_id)
        .bind(slot.bike_id)
        .bind(slot.from)
        .bind(slot.until)
        .bind(status)
        .bind(exclude)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn driver_shifts(
        &self,
        driver_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<Vec<Shift>> {
        sqlx::query_as::<_, Shift>(&sql(&format!(
            r#"
            SELECT {SHIFT_COLUMNS}
            FROM shifts
            WHERE deleted = FALSE AND driver_id = ? AND date >= ? AND date < ?
            ORDER BY date ASC
            "#
        )))
        .bind(driver_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await
    }

    async fn driver_history(&self, driver_id: Uuid, only_paid: bool) -> StoreResult<Vec<Shift>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE deleted = FALSE AND driver_id = "
        ));
        query
            .push_bind(driver_id)
            .push(" AND status = ")
            .push_bind(ShiftStatus::Complete);
        if only_paid {
            query.push(" AND paid = TRUE");
        }
        query.push(" ORDER BY date DESC");

        query.build_query_as::<Shift>().fetch_all(&self.pool).await
    }

    async fn shifts_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<Vec<Shift>> {
        sqlx::query_as::<_, Shift>(&sql(&format!(
            r#"
            SELECT {SHIFT_COLUMNS}
            FROM shifts
            WHERE deleted = FALSE AND date >= ? AND date < ?
            ORDER BY date ASC
            "#
        )))
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await
    }

    async fn unpaid_complete_shifts(&self) -> StoreResult<Vec<Shift>> {
        sqlx::query_as::<_, Shift>(&sql(&format!(
            r#"
            SELECT {SHIFT_COLUMNS}
            FROM shifts
            WHERE paid = FALSE AND status = ?
            ORDER BY date ASC
            "#
        )))
        .bind(ShiftStatus::Complete)
        .fetch_all(&self.pool)
        .await
    }
}
