//! Data models and API request/response types

pub mod recovery;
pub mod reset_record;
