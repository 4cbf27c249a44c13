pub mod job;

pub use job::{job_field_map, JobRecord, JobUpdate, NewJob};
