//! Repository layer for database operations

pub mod attendance;
pub mod extras;
pub mod students;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub students: students::StudentsRepository,
    pub attendance: attendance::AttendanceRepository,
    pub extras: extras::ExtrasRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            students: students::StudentsRepository::new(pool.clone()),
            attendance: attendance::AttendanceRepository::new(pool.clone()),
            extras: extras::ExtrasRepository::new(pool.clone()),
            pool,
        }
    }
}
