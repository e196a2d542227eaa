//! Extra charges repository for database operations

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::extra::{CreateExtraCharge, ExtraCharge},
};

#[derive(Clone)]
pub struct ExtrasRepository {
    pool: Pool<Postgres>,
}

impl ExtrasRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Extras for one student, optionally restricted to one calendar day
    pub async fn list_for_student(
        &self,
        student_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<ExtraCharge>> {
        let rows = if let Some(day) = date {
            sqlx::query_as::<_, ExtraCharge>(
                r#"
                SELECT * FROM student_extras
                WHERE student_id = $1 AND (created_at AT TIME ZONE 'UTC')::date = $2
                ORDER BY created_at DESC
                "#,
            )
            .bind(student_id)
            .bind(day)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, ExtraCharge>(
                "SELECT * FROM student_extras WHERE student_id = $1 ORDER BY created_at DESC",
            )
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?
        };
        Ok(rows)
    }

    /// Create a new extra charge
    pub async fn create(
        &self,
        student_id: Uuid,
        data: &CreateExtraCharge,
    ) -> AppResult<ExtraCharge> {
        let row = sqlx::query_as::<_, ExtraCharge>(
            r#"
            INSERT INTO student_extras (id, student_id, title, price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(&data.title)
        .bind(data.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Delete an extra charge
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM student_extras WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Extra charge {} not found", id)));
        }
        Ok(())
    }

    /// Unpaid extras for one student
    pub async fn list_unpaid(&self, student_id: Uuid) -> AppResult<Vec<ExtraCharge>> {
        let rows = sqlx::query_as::<_, ExtraCharge>(
            "SELECT * FROM student_extras WHERE student_id = $1 AND is_paid = false ORDER BY created_at",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Mark a student's unpaid extras paid, up to and including a calendar
    /// day. Returns the number of settled charges.
    pub async fn mark_paid(
        &self,
        student_id: Uuid,
        through: NaiveDate,
        paid_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE student_extras SET is_paid = true, payment_date = $3
            WHERE student_id = $1
              AND is_paid = false
              AND (created_at AT TIME ZONE 'UTC')::date <= $2
            "#,
        )
        .bind(student_id)
        .bind(through)
        .bind(paid_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Total of extras settled within a payment-date range
    pub async fn sum_paid_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(price), 0)
            FROM student_extras
            WHERE is_paid = true AND payment_date >= $1 AND payment_date <= $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
