// src/web/handlers/job_handlers.rs

use crate::auth::AdminUser;
use crate::core::FilterCriteria;
use crate::database::{DatabaseConfig, JobRepository};
use crate::error::JobsResult;
use crate::types::job::{JobUpdate, NewJob};
use crate::web::types::{DataResponse, DeletedData, JobData, JobQuery, JobsData};

use rocket::http::Status;
use rocket::serde::json::{Json, Value};
use rocket::State;
use tracing::info;

pub async fn create_job_handler(
    body: Json<Value>,
    admin: AdminUser,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<(Status, Json<DataResponse<JobData>>)> {
    let new_job = NewJob::from_json(&body)?;
    let repo = JobRepository::new(db_config.pool()?);

    let job = repo.create(&new_job).await?;
    info!("Job {} created by {}", job.id, admin.username());

    Ok((
        Status::Created,
        Json(DataResponse::success(
            format!("Job '{}' created", job.title),
            JobData { job },
        )),
    ))
}

pub async fn list_jobs_handler(
    query: JobQuery,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<Json<DataResponse<JobsData>>> {
    let criteria = FilterCriteria::from(query);
    let repo = JobRepository::new(db_config.pool()?);

    let jobs = repo.find_all(Some(&criteria)).await?;

    Ok(Json(DataResponse::success(
        format!("{} job(s) found", jobs.len()),
        JobsData { jobs },
    )))
}

pub async fn get_job_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<Json<DataResponse<JobData>>> {
    let repo = JobRepository::new(db_config.pool()?);
    let job = repo.get(id).await?;

    Ok(Json(DataResponse::success(
        format!("Job {}", job.id),
        JobData { job },
    )))
}

pub async fn update_job_handler(
    id: i64,
    body: Json<Value>,
    admin: AdminUser,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<Json<DataResponse<JobData>>> {
    let update = JobUpdate::from_json(&body)?;
    let repo = JobRepository::new(db_config.pool()?);

    let job = repo.update(id, &update).await?;
    info!("Job {} updated by {}", job.id, admin.username());

    Ok(Json(DataResponse::success(
        format!("Job {} updated", job.id),
        JobData { job },
    )))
}

pub async fn delete_job_handler(
    id: i64,
    admin: AdminUser,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<Json<DataResponse<DeletedData>>> {
    let repo = JobRepository::new(db_config.pool()?);
    repo.remove(id).await?;
    info!("Job {} deleted by {}", id, admin.username());

    Ok(Json(DataResponse::success(
        format!("Job {} deleted", id),
        DeletedData { deleted: id },
    )))
}
