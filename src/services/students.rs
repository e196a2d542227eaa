//! Student management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::student::{CreateStudent, Student, StudentQuery, UpdateStudent},
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &StudentQuery) -> AppResult<Vec<Student>> {
        self.repository.students.list(query).await
    }

    pub async fn list_active(&self) -> AppResult<Vec<Student>> {
        self.repository.students.list_active().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Student> {
        self.repository.students.get_by_id(id).await
    }

    pub async fn get_by_code(&self, code: &str) -> AppResult<Student> {
        self.repository.students.get_by_code(code).await
    }

    pub async fn create(&self, data: &CreateStudent) -> AppResult<Student> {
        data.validate()?;
        self.repository.students.create(data).await
    }

    pub async fn update(&self, id: Uuid, data: &UpdateStudent) -> AppResult<Student> {
        data.validate()?;
        self.repository.students.update(id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.students.delete(id).await
    }
}
