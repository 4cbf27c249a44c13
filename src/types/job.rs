// src/types/job.rs
//! Job records and the validated payloads accepted by the jobs endpoints

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::core::sql::FieldNameMap;
use crate::error::{JobsError, JobsResult};

// ===== Stored Record =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobRecord {
    pub id: i64,
    pub title: String,
    pub salary: Option<i64>,
    /// Fixed-point decimal kept as text, e.g. `"0.05"`
    pub equity: Option<String>,
    pub company_handle: String,
}

impl JobRecord {
    pub fn equity_decimal(&self) -> Option<Decimal> {
        self.equity.as_deref().and_then(parse_decimal_str)
    }
}

/// Fields a job update may touch. Every job column is stored under its own name.
pub fn job_field_map() -> FieldNameMap {
    FieldNameMap::new()
        .field("title")
        .field("salary")
        .field("equity")
        .field("company_handle")
}

// ===== Create Payload =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<String>,
    pub company_handle: String,
}

impl NewJob {
    pub fn new(title: &str, salary: Option<i64>, equity: Option<&str>, company_handle: &str) -> Self {
        Self {
            title: title.to_string(),
            salary,
            equity: equity.map(str::to_string),
            company_handle: company_handle.to_string(),
        }
    }

    /// Validate a raw JSON body, collecting one message per problem.
    pub fn from_json(body: &Value) -> JobsResult<Self> {
        let fields = body
            .as_object()
            .ok_or_else(|| JobsError::bad_request("instance is not of a type(s) object"))?;

        let mut errors = Vec::new();
        let allowed = job_field_map();

        for key in fields.keys() {
            if !allowed.allows(key) {
                errors.push(format!("instance is not allowed to have the additional property \"{}\"", key));
            }
        }

        let title = required(fields, "title", &mut errors).and_then(|v| collect(validate_text("title", v), &mut errors));
        let company_handle = required(fields, "company_handle", &mut errors)
            .and_then(|v| collect(validate_text("company_handle", v), &mut errors));
        let salary = fields
            .get("salary")
            .and_then(|v| collect(validate_salary(v), &mut errors))
            .flatten();
        let equity = fields
            .get("equity")
            .and_then(|v| collect(validate_equity(v), &mut errors))
            .flatten();

        if !errors.is_empty() {
            return Err(JobsError::BadRequest(errors));
        }

        match (title, company_handle) {
            (Some(title), Some(company_handle)) => Ok(Self {
                title,
                salary,
                equity,
                company_handle,
            }),
            _ => Err(JobsError::bad_request("instance is missing required fields")),
        }
    }
}

// ===== Update Payload =====

/// Sparse set of job fields to change, validated and normalized, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct JobUpdate {
    fields: Map<String, Value>,
}

impl JobUpdate {
    /// An empty object is accepted here; the update builder rejects it.
    pub fn from_json(body: &Value) -> JobsResult<Self> {
        let raw = body
            .as_object()
            .ok_or_else(|| JobsError::bad_request("instance is not of a type(s) object"))?;

        let allowed = job_field_map();
        let mut errors = Vec::new();
        let mut fields = Map::with_capacity(raw.len());

        for (key, value) in raw {
            if !allowed.allows(key) {
                errors.push(format!("instance is not allowed to have the additional property \"{}\"", key));
                continue;
            }

            let normalized = match key.as_str() {
                "title" | "company_handle" => validate_text(key, value).map(Value::String),
                "salary" => validate_salary(value).map(|s| s.map(Value::from).unwrap_or(Value::Null)),
                "equity" => validate_equity(value).map(|e| e.map(Value::String).unwrap_or(Value::Null)),
                _ => Ok(value.clone()),
            };

            match normalized {
                Ok(value) => {
                    fields.insert(key.clone(), value);
                }
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(JobsError::BadRequest(errors));
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

}

// ===== Field Validation =====

fn required<'a>(fields: &'a Map<String, Value>, key: &str, errors: &mut Vec<String>) -> Option<&'a Value> {
    let value = fields.get(key);
    if value.is_none() {
        errors.push(format!("instance requires property \"{}\"", key));
    }
    value
}

fn collect<T>(result: Result<T, String>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn validate_text(key: &str, value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::String(_) => Err(format!("instance.{} does not meet minimum length of 1", key)),
        _ => Err(format!("instance.{} is not of a type(s) string", key)),
    }
}

fn validate_salary(value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => match integral(n) {
            Some(salary) if salary >= 0 => Ok(Some(salary)),
            Some(_) => Err("instance.salary must be greater than or equal to 0".to_string()),
            None => Err("instance.salary is not of a type(s) integer".to_string()),
        },
        _ => Err("instance.salary is not of a type(s) integer".to_string()),
    }
}

/// `1.0` counts as an integer, `1.5` does not
fn integral(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Accepts a JSON number or numeric string in `[0, 1]` and returns its canonical text.
fn validate_equity(value: &Value) -> Result<Option<String>, String> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(s),
        _ => None,
    };

    match parsed {
        Some(equity) if equity >= Decimal::ZERO && equity <= Decimal::ONE => {
            Ok(Some(equity.normalize().to_string()))
        }
        Some(_) => Err("instance.equity must be between 0 and 1".to_string()),
        None => Err("instance.equity is not a decimal number".to_string()),
    }
}

/// Parses plain or scientific decimal text without going through floats.
pub fn parse_decimal_str(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_job_from_json() {
        let job = NewJob::from_json(&json!({
            "title": "new",
            "salary": 99999,
            "equity": 0.05,
            "company_handle": "c1"
        }))
        .unwrap();

        assert_eq!(job, NewJob::new("new", Some(99999), Some("0.05"), "c1"));
    }

    #[test]
    fn test_new_job_optional_fields() {
        let job = NewJob::from_json(&json!({"title": "t", "company_handle": "c1", "equity": null})).unwrap();
        assert_eq!(job.salary, None);
        assert_eq!(job.equity, None);
    }

    #[test]
    fn test_new_job_missing_fields() {
        let err = NewJob::from_json(&json!({"title": "new", "salary": 10000})).unwrap_err();
        match err {
            JobsError::BadRequest(messages) => {
                assert_eq!(messages, vec!["instance requires property \"company_handle\""]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_new_job_invalid_types() {
        let err = NewJob::from_json(&json!({
            "title": 1,
            "salary": -5,
            "equity": 1.5,
            "company_handle": "c1",
            "id": 3
        }))
        .unwrap_err();

        match err {
            JobsError::BadRequest(messages) => assert_eq!(messages.len(), 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_equity_normalization() {
        assert_eq!(validate_equity(&json!("0.50")).unwrap(), Some("0.5".to_string()));
        assert_eq!(validate_equity(&json!(0)).unwrap(), Some("0".to_string()));
        assert_eq!(validate_equity(&json!("1")).unwrap(), Some("1".to_string()));
        assert_eq!(validate_equity(&json!(1e-2)).unwrap(), Some("0.01".to_string()));
        assert!(validate_equity(&json!("abc")).is_err());
        assert!(validate_equity(&json!(true)).is_err());
    }

    #[test]
    fn test_update_keeps_request_order_and_normalizes() {
        let update = JobUpdate::from_json(&json!({
            "salary": null,
            "title": "j4",
            "equity": 0
        }))
        .unwrap();

        let keys: Vec<_> = update.fields().keys().cloned().collect();
        assert_eq!(keys, vec!["salary", "title", "equity"]);
        assert_eq!(update.fields()["equity"], json!("0"));
        assert_eq!(update.fields()["salary"], Value::Null);
    }

    #[test]
    fn test_update_rejects_id_and_unknown_fields() {
        let err = JobUpdate::from_json(&json!({"id": 5, "title": "x", "bogus": 1})).unwrap_err();
        match err {
            JobsError::BadRequest(messages) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_update_rejects_null_title() {
        assert!(JobUpdate::from_json(&json!({"title": null})).is_err());
    }

    #[test]
    fn test_salary_accepts_integral_floats() {
        assert_eq!(validate_salary(&json!(1.0)), Ok(Some(1)));
        assert_eq!(validate_salary(&json!(50000.0)), Ok(Some(50000)));
        assert!(validate_salary(&json!(1.5)).is_err());
        assert!(validate_salary(&json!(-1.0)).is_err());
    }

    #[test]
    fn test_update_allows_empty_object() {
        assert!(JobUpdate::from_json(&json!({})).unwrap().fields().is_empty());
        assert!(JobUpdate::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_record_equity_decimal() {
        let record = JobRecord {
            id: 1,
            title: "j2".to_string(),
            salary: Some(75000),
            equity: Some("0.5".to_string()),
            company_handle: "c2".to_string(),
        };
        assert_eq!(record.equity_decimal(), Decimal::from_str("0.5").ok());
    }
}
