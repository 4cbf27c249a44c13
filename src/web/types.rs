// src/web/types.rs

use rocket::form::FromForm;
use rocket::serde::{Deserialize, Serialize};

use crate::core::FilterCriteria;
use crate::types::job::JobRecord;

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

// ===== Job Payloads =====

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct JobData {
    pub job: JobRecord,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct JobsData {
    pub jobs: Vec<JobRecord>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct DeletedData {
    pub deleted: i64,
}

/// Listing query string. Values stay raw so malformed input filters instead of failing.
/// A repeated key keeps its last value.
#[derive(FromForm, Debug, Default)]
pub struct JobQuery {
    pub title: Vec<String>,
    #[field(name = "minSalary")]
    pub min_salary: Vec<String>,
    #[field(name = "hasEquity")]
    pub has_equity: Vec<String>,
}

impl From<JobQuery> for FilterCriteria {
    fn from(query: JobQuery) -> Self {
        let titles = query.title.iter().map(|value| ("title", value.as_str()));
        let salaries = query.min_salary.iter().map(|value| ("minSalary", value.as_str()));
        let equities = query.has_equity.iter().map(|value| ("hasEquity", value.as_str()));

        FilterCriteria::from_pairs(titles.chain(salaries).chain(equities))
    }
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}
