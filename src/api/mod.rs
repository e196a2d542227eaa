//! API handlers for Comedor REST endpoints

pub mod attendance;
pub mod billing;
pub mod extras;
pub mod health;
pub mod openapi;
pub mod stats;
pub mod students;
