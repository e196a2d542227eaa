//! Students repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::student::{CreateStudent, Student, StudentQuery, UpdateStudent},
};

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Student> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// Get student by enrollment code
    pub async fn get_by_code(&self, code: &str) -> AppResult<Student> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with code {} not found", code)))
    }

    /// List students, optionally filtered by search term and active flag
    pub async fn list(&self, query: &StudentQuery) -> AppResult<Vec<Student>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.search.is_some() {
            conditions.push(format!(
                "(first_name ILIKE ${i} OR last_name ILIKE ${i} OR code ILIKE ${i} OR dni ILIKE ${i})",
                i = idx
            ));
            idx += 1;
        }
        if query.active.is_some() {
            conditions.push(format!("active = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT * FROM students {} ORDER BY first_name ASC, last_name ASC",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, Student>(&sql);
        if let Some(ref term) = query.search {
            builder = builder.bind(format!("%{}%", term));
        }
        if let Some(active) = query.active {
            builder = builder.bind(active);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// List all active students (the population covered by the sync pass)
    pub async fn list_active(&self) -> AppResult<Vec<Student>> {
        let rows = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE active = true ORDER BY first_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a new student
    pub async fn create(&self, data: &CreateStudent) -> AppResult<Student> {
        let meal_codes: Vec<i16> = data.subscribed_meals.iter().map(|m| m.code()).collect();

        let row = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (
                id, first_name, last_name, code, dni, email, phone, parent_phone,
                address, birth_date, career, joined_date, subscribed_meals,
                notes, avatar_url, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.code)
        .bind(&data.dni)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.parent_phone)
        .bind(&data.address)
        .bind(data.birth_date)
        .bind(&data.career)
        .bind(data.joined_date)
        .bind(&meal_codes)
        .bind(&data.notes)
        .bind(&data.avatar_url)
        .bind(data.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict(format!("Enrollment code {} already exists", data.code))
            }
            _ => AppError::Database(e),
        })?;

        Ok(row)
    }

    /// Update a student (partial update, untouched fields keep their value)
    pub async fn update(&self, id: Uuid, data: &UpdateStudent) -> AppResult<Student> {
        let meal_codes: Option<Vec<i16>> = data
            .subscribed_meals
            .as_ref()
            .map(|meals| meals.iter().map(|m| m.code()).collect());

        let row = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                dni = COALESCE($4, dni),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                parent_phone = COALESCE($7, parent_phone),
                address = COALESCE($8, address),
                birth_date = COALESCE($9, birth_date),
                career = COALESCE($10, career),
                subscribed_meals = COALESCE($11, subscribed_meals),
                notes = COALESCE($12, notes),
                avatar_url = COALESCE($13, avatar_url),
                active = COALESCE($14, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.dni)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.parent_phone)
        .bind(&data.address)
        .bind(data.birth_date)
        .bind(&data.career)
        .bind(&meal_codes)
        .bind(&data.notes)
        .bind(&data.avatar_url)
        .bind(data.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))?;

        Ok(row)
    }

    /// Delete a student
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Student with id {} not found", id)));
        }
        Ok(())
    }

    /// Count active students
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE active = true")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
