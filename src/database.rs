// src/database.rs
use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::path::PathBuf;
use tracing::info;

use crate::core::{filter_jobs, sql_for_partial_update, FilterCriteria};
use crate::error::{JobsError, JobsResult};
use crate::types::job::{job_field_map, JobRecord, JobUpdate, NewJob};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Wrap an already connected pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            pool: Some(pool),
        }
    }

    /// Single-connection in-memory database, migrated and ready to use
    pub async fn in_memory() -> Result<Self> {
        // The database lives only as long as its one connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory SQLite database")?;

        let db_config = Self::from_pool(pool);
        db_config.migrate().await?;
        Ok(db_config)
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        info!("Opening database at: {}", self.database_path.display());

        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;

        // AUTOINCREMENT keeps deleted ids from being handed out again
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                salary INTEGER CHECK (salary >= 0),
                equity TEXT,
                company_handle TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create jobs table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_company_handle ON jobs(company_handle);")
            .execute(pool)
            .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

// ===== Job Repository =====

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a job and return it with its assigned id
    pub async fn create(&self, job: &NewJob) -> JobsResult<JobRecord> {
        let created = sqlx::query_as::<_, JobRecord>(&format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES (?, ?, ?, ?) RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(&job.title)
        .bind(job.salary)
        .bind(&job.equity)
        .bind(&job.company_handle)
        .fetch_one(self.pool)
        .await?;

        info!("Created job {} ({}) for {}", created.id, created.title, created.company_handle);
        Ok(created)
    }

    /// All jobs in id order, narrowed by `criteria` when given
    pub async fn find_all(&self, criteria: Option<&FilterCriteria>) -> JobsResult<Vec<JobRecord>> {
        let jobs = sqlx::query_as::<_, JobRecord>(&format!("SELECT {} FROM jobs ORDER BY id", JOB_COLUMNS))
            .fetch_all(self.pool)
            .await?;

        Ok(filter_jobs(jobs, criteria))
    }

    pub async fn get(&self, id: i64) -> JobsResult<JobRecord> {
        sqlx::query_as::<_, JobRecord>(&format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| JobsError::not_found(format!("No job: {}", id)))
    }

    /// Partial update in a single round trip; only the given fields change.
    pub async fn update(&self, id: i64, update: &JobUpdate) -> JobsResult<JobRecord> {
        let clause = sql_for_partial_update(update.fields(), &job_field_map())?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            clause.set_cols,
            clause.next_index(),
            JOB_COLUMNS
        );

        let mut query = sqlx::query_as::<_, JobRecord>(&sql);
        for value in &clause.values {
            query = bind_json(query, value);
        }

        let updated = query
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| JobsError::not_found(format!("No job: {}", id)))?;

        info!("Updated job {} ({})", id, clause.set_cols);
        Ok(updated)
    }

    pub async fn remove(&self, id: i64) -> JobsResult<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(JobsError::not_found(format!("No job: {}", id)));
        }

        info!("Deleted job {}", id);
        Ok(())
    }
}

fn bind_json<'q, O>(
    query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    value: &Value,
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(flag) => query.bind(*flag),
        Value::Number(n) => match n.as_i64() {
            Some(int) => query.bind(int),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.to_string()),
    }
}
