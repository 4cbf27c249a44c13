// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::auth::{AdminUser, AuthConfig, AuthFailure, OptionalAuth};
use crate::database::DatabaseConfig;
use crate::environment::EnvironmentConfig;
use crate::error::{JobsError, JobsResult};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::{Json, Value};
use rocket::{catchers, delete, get, options, patch, post, routes, Build, Request, Response, Rocket, State};
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PATCH, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// Jobs routes

#[post("/", data = "<body>")]
pub async fn create_job(
    body: Json<Value>,
    admin: AdminUser,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<(Status, Json<DataResponse<JobData>>)> {
    handlers::create_job_handler(body, admin, db_config).await
}

#[get("/?<query..>")]
pub async fn list_jobs(
    query: JobQuery,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<Json<DataResponse<JobsData>>> {
    handlers::list_jobs_handler(query, db_config).await
}

#[get("/<id>")]
pub async fn get_job(
    id: &str,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<Json<DataResponse<JobData>>> {
    handlers::get_job_handler(parse_job_id(id)?, db_config).await
}

#[patch("/<id>", data = "<body>")]
pub async fn update_job(
    id: &str,
    body: Json<Value>,
    admin: AdminUser,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<Json<DataResponse<JobData>>> {
    handlers::update_job_handler(parse_job_id(id)?, body, admin, db_config).await
}

#[delete("/<id>")]
pub async fn delete_job(
    id: &str,
    admin: AdminUser,
    db_config: &State<DatabaseConfig>,
) -> JobsResult<Json<DataResponse<DeletedData>>> {
    handlers::delete_job_handler(parse_job_id(id)?, admin, db_config).await
}

fn parse_job_id(id: &str) -> JobsResult<i64> {
    id.parse()
        .map_err(|_| JobsError::bad_request(format!("Job id must be an integer, got '{}'", id)))
}

#[get("/health")]
pub async fn health(auth: OptionalAuth) -> Json<TextResponse> {
    handlers::health_handler(auth).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(401)]
pub fn unauthorized(req: &Request) -> Json<StandardErrorResponse> {
    let reason = req.local_cache(|| AuthFailure(None)).0.unwrap_or("Unauthorized");
    Json(JobsError::unauthorized(reason).to_response())
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

// Guard failures surface as plain bad input
#[rocket::catch(422)]
pub fn unprocessable() -> (Status, Json<StandardErrorResponse>) {
    (
        Status::BadRequest,
        Json(StandardErrorResponse::new(
            "Request could not be processed".to_string(),
            "BAD_REQUEST".to_string(),
            vec!["Check the request parameters and body".to_string()],
        )),
    )
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the application around an initialized database and auth config
pub fn build_rocket(db_config: DatabaseConfig, auth_config: AuthConfig) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(auth_config)
        .manage(db_config)
        .register(
            "/",
            catchers![bad_request, unauthorized, not_found, unprocessable, internal_error],
        )
        .mount("/", routes![health, options])
        .mount("/jobs", routes![create_job, list_jobs, get_job, update_job, delete_job])
}

// Main server start function
pub async fn start_web_server(config: EnvironmentConfig) -> Result<()> {
    let mut db_config = DatabaseConfig::new(config.database_path.clone());

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {}", e);
        return Err(e);
    }

    let auth_config = AuthConfig::new(config.secret_key.clone(), config.token_ttl_hours);

    info!("Starting Jobly API server");
    info!("Database: {}", db_config.database_path.display());
    info!("Server: http://0.0.0.0:{}", config.port);

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", config.port));

    if let Err(e) = build_rocket(db_config, auth_config)
        .configure(figment)
        .launch()
        .await
    {
        error!("Server stopped with error: {}", e);
        anyhow::bail!("Server stopped with error: {}", e);
    }

    Ok(())
}
