//! API handlers for the Rescate REST endpoints

pub mod health;
pub mod openapi;
pub mod recovery;
