// src/core/mod.rs
//! Pure building blocks shared by the jobs resource

pub mod job_filter;
pub mod sql;

pub use job_filter::{filter_jobs, FilterCriteria, HasEquity, SalaryFloor};
pub use sql::{sql_for_partial_update, ColumnMapping, FieldNameMap, UpdateClause};
