//! Extra charges service

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::extra::{CreateExtraCharge, ExtraCharge},
    repository::Repository,
};

#[derive(Clone)]
pub struct ExtrasService {
    repository: Repository,
}

impl ExtrasService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Extras for one student, optionally for one calendar day.
    pub async fn list(
        &self,
        student_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<ExtraCharge>> {
        self.repository.students.get_by_id(student_id).await?;
        self.repository.extras.list_for_student(student_id, date).await
    }

    /// Register an ad-hoc charge. Extras are independent of the meal
    /// schedule and stay available on the non-service weekday.
    pub async fn create(
        &self,
        student_id: Uuid,
        data: &CreateExtraCharge,
    ) -> AppResult<ExtraCharge> {
        data.validate()?;
        self.repository.students.get_by_id(student_id).await?;
        self.repository.extras.create(student_id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.extras.delete(id).await
    }
}
