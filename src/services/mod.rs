//! Business logic services

pub mod attendance;
pub mod billing;
pub mod extras;
pub mod stats;
pub mod students;
pub mod sync;

use sqlx::{Pool, Postgres};

use crate::{config::MealServiceConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub students: students::StudentsService,
    pub attendance: attendance::AttendanceService,
    pub extras: extras::ExtrasService,
    pub billing: billing::BillingService,
    pub sync: sync::SyncService,
    pub stats: stats::StatsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, meal_service: MealServiceConfig) -> Self {
        Self {
            students: students::StudentsService::new(repository.clone()),
            attendance: attendance::AttendanceService::new(
                repository.clone(),
                meal_service.clone(),
            ),
            extras: extras::ExtrasService::new(repository.clone()),
            billing: billing::BillingService::new(repository.clone()),
            sync: sync::SyncService::new(repository.clone(), meal_service),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }

    /// Database pool, for readiness probes
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.repository.pool
    }
}
