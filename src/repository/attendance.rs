//! Attendance records repository for database operations

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::attendance::{AttendanceRecord, NewAttendanceRecord},
    models::enums::AttendanceStatus,
};

/// Status codes of the chargeable class, for SQL filters
fn chargeable_codes() -> Vec<i16> {
    vec![
        AttendanceStatus::Verified.code(),
        AttendanceStatus::AutoSubscribed.code(),
    ]
}

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: Pool<Postgres>,
}

impl AttendanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get attendance record by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<AttendanceRecord> {
        sqlx::query_as::<_, AttendanceRecord>("SELECT * FROM meal_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", id)))
    }

    /// Records for one student, newest first, optionally filtered by date
    /// range (inclusive, on the record's calendar day) and meal type.
    pub async fn list_for_student(
        &self,
        student_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        meal_type: Option<i16>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let mut conditions = vec!["student_id = $1".to_string()];
        let mut idx = 2;

        if from.is_some() {
            conditions.push(format!("(served_at AT TIME ZONE 'UTC')::date >= ${}", idx));
            idx += 1;
        }
        if to.is_some() {
            conditions.push(format!("(served_at AT TIME ZONE 'UTC')::date <= ${}", idx));
            idx += 1;
        }
        if meal_type.is_some() {
            conditions.push(format!("meal_type = ${}", idx));
        }

        let sql = format!(
            "SELECT * FROM meal_logs WHERE {} ORDER BY served_at DESC",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, AttendanceRecord>(&sql).bind(student_id);
        if let Some(d) = from {
            builder = builder.bind(d);
        }
        if let Some(d) = to {
            builder = builder.bind(d);
        }
        if let Some(m) = meal_type {
            builder = builder.bind(m);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Records for a set of students from a given calendar day onwards.
    /// This is the read feeding the sync pass.
    pub async fn list_window(
        &self,
        student_ids: &[Uuid],
        since: NaiveDate,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM meal_logs
            WHERE student_id = ANY($1) AND (served_at AT TIME ZONE 'UTC')::date >= $2
            ORDER BY served_at
            "#,
        )
        .bind(student_ids)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// All records of one service day, across students
    pub async fn list_for_day(&self, day: NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM meal_logs
            WHERE (served_at AT TIME ZONE 'UTC')::date = $1
            ORDER BY served_at
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert one explicitly registered record. A second record for the same
    /// (student, meal, day) is rejected by the store's uniqueness constraint.
    pub async fn insert(&self, new: &NewAttendanceRecord) -> AppResult<AttendanceRecord> {
        let row = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO meal_logs (id, student_id, meal_type, status, served_at, has_extra, extra_notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.student_id)
        .bind(new.meal_type.code())
        .bind(new.status.code())
        .bind(new.served_at)
        .bind(new.has_extra)
        .bind(&new.extra_notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict("Meal already registered for this student today".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row)
    }

    /// Batch-insert synthesized records in one statement. Rows colliding with
    /// an existing (student, meal, day) entry are dropped by the store
    /// (`ON CONFLICT DO NOTHING`), so a concurrent sync pass from another
    /// terminal cannot produce duplicates; only the rows actually inserted
    /// are returned.
    pub async fn insert_batch(
        &self,
        batch: &[NewAttendanceRecord],
    ) -> AppResult<Vec<AttendanceRecord>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = batch.iter().map(|_| Uuid::new_v4()).collect();
        let student_ids: Vec<Uuid> = batch.iter().map(|r| r.student_id).collect();
        let meal_types: Vec<i16> = batch.iter().map(|r| r.meal_type.code()).collect();
        let statuses: Vec<i16> = batch.iter().map(|r| r.status.code()).collect();
        let served_at: Vec<DateTime<Utc>> = batch.iter().map(|r| r.served_at).collect();

        let rows = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO meal_logs (id, student_id, meal_type, status, served_at)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::smallint[], $4::smallint[], $5::timestamptz[])
            ON CONFLICT DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&ids)
        .bind(&student_ids)
        .bind(&meal_types)
        .bind(&statuses)
        .bind(&served_at)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Change a record's status (annul / restore / correct)
    pub async fn set_status(&self, id: Uuid, status: i16) -> AppResult<AttendanceRecord> {
        sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE meal_logs SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", id)))
    }

    /// Hard-delete a record
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM meal_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Attendance record {} not found", id)));
        }
        Ok(())
    }

    /// Unpaid records for one student (any status; the billing engine
    /// decides which of them are worth money)
    pub async fn list_unpaid(&self, student_id: Uuid) -> AppResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM meal_logs WHERE student_id = $1 AND is_paid = false ORDER BY served_at",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Mark a student's unpaid chargeable records paid, up to and including
    /// a calendar day. Returns the number of settled records.
    pub async fn mark_paid(
        &self,
        student_id: Uuid,
        through: NaiveDate,
        paid_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE meal_logs SET is_paid = true, payment_date = $3
            WHERE student_id = $1
              AND is_paid = false
              AND status = ANY($4)
              AND (served_at AT TIME ZONE 'UTC')::date <= $2
            "#,
        )
        .bind(student_id)
        .bind(through)
        .bind(paid_at)
        .bind(chargeable_codes())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Records settled within a payment-date range (dashboard collections)
    pub async fn list_paid_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM meal_logs
            WHERE is_paid = true AND payment_date >= $1 AND payment_date <= $2
            ORDER BY student_id, served_at
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Per-meal count of verified records for one service day
    pub async fn count_verified_by_meal(&self, day: NaiveDate) -> AppResult<Vec<(i16, i64)>> {
        let rows: Vec<(i16, i64)> = sqlx::query_as(
            r#"
            SELECT meal_type, COUNT(*) FROM meal_logs
            WHERE (served_at AT TIME ZONE 'UTC')::date = $1 AND status = $2
            GROUP BY meal_type
            "#,
        )
        .bind(day)
        .bind(AttendanceStatus::Verified.code())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
