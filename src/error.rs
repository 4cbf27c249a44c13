// src/error.rs
//! Error taxonomy shared by the resource layer and the HTTP handlers

use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use thiserror::Error;
use tracing::error;

use crate::web::types::StandardErrorResponse;

pub type JobsResult<T> = Result<T, JobsError>;

#[derive(Debug, Error)]
pub enum JobsError {
    /// Input rejected before touching storage
    #[error("Bad request: {}", .0.join("; "))]
    BadRequest(Vec<String>),

    /// Lookup, update or delete matched no row
    #[error("{0}")]
    NotFound(String),

    /// Missing, invalid or insufficient credentials
    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl JobsError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(vec![message.into()])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn status(&self) -> Status {
        match self {
            JobsError::BadRequest(_) => Status::BadRequest,
            JobsError::NotFound(_) => Status::NotFound,
            JobsError::Unauthorized(_) => Status::Unauthorized,
            JobsError::Database(_) | JobsError::Internal(_) => Status::InternalServerError,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            JobsError::BadRequest(_) => "BAD_REQUEST",
            JobsError::NotFound(_) => "NOT_FOUND",
            JobsError::Unauthorized(_) => "UNAUTHORIZED",
            JobsError::Database(_) => "DATABASE_ERROR",
            JobsError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            JobsError::BadRequest(messages) => messages.clone(),
            JobsError::NotFound(_) => vec!["Check the job id".to_string()],
            JobsError::Unauthorized(_) => vec![
                "Login is required".to_string(),
                "Mutating jobs requires an admin account".to_string(),
            ],
            JobsError::Database(_) | JobsError::Internal(_) => vec![
                "Try again in a few moments".to_string(),
                "Contact support if the problem persists".to_string(),
            ],
        }
    }

    pub fn to_response(&self) -> StandardErrorResponse {
        // Internal details stay in the logs
        let message = match self {
            JobsError::Database(_) | JobsError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        StandardErrorResponse::new(message, self.error_code().to_string(), self.suggestions())
    }
}

impl<'r> Responder<'r, 'static> for JobsError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("{} {} failed: {}", req.method(), req.uri(), self);
        }

        (status, Json(self.to_response())).respond_to(req)
    }
}
