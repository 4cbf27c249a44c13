pub mod auth;
pub mod cli;
pub mod core;
pub mod database;
pub mod environment;
pub mod error;
pub mod types;
pub mod web;

pub use crate::core::{filter_jobs, sql_for_partial_update, FieldNameMap, FilterCriteria, HasEquity};
pub use database::{DatabaseConfig, JobRepository};
pub use error::{JobsError, JobsResult};
pub use types::{JobRecord, JobUpdate, NewJob};
pub use web::{build_rocket, start_web_server};
