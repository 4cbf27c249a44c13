// src/cli.rs
use crate::auth::AuthConfig;
use crate::database::{DatabaseConfig, JobRepository};
use crate::environment::EnvironmentConfig;
use crate::types::job::NewJob;
use crate::web::start_web_server;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "jobly")]
#[command(about = "Jobs API for the Jobly job board")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the jobs table if missing
    Migrate,
    /// Print a signed bearer token
    Token {
        username: String,
        #[arg(long)]
        admin: bool,
    },
    /// Insert a few sample jobs
    Seed,
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = EnvironmentConfig::load_from(&cli.config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_web_server(config).await,

        Command::Migrate => {
            open_database(&config).await?;
            info!("Database ready at {}", config.database_path.display());
            Ok(())
        }

        Command::Token { username, admin } => {
            let auth_config = AuthConfig::new(config.secret_key.clone(), config.token_ttl_hours);
            let token = auth_config.create_token(&username, admin)?;
            println!("{}", token);
            Ok(())
        }

        Command::Seed => {
            let db_config = open_database(&config).await?;
            let repo = JobRepository::new(db_config.pool()?);

            let samples = [
                NewJob::new("Software Engineer", Some(120000), Some("0.01"), "anderson-arias"),
                NewJob::new("Accountant", Some(65000), None, "ayala-buchanan"),
                NewJob::new("Product Designer", Some(95000), Some("0"), "bauer-gallagher"),
            ];

            for job in &samples {
                match repo.create(job).await {
                    Ok(created) => info!("Seeded job {}: {}", created.id, created.title),
                    Err(e) => error!("Failed to seed job {}: {}", job.title, e),
                }
            }
            Ok(())
        }
    }
}

async fn open_database(config: &EnvironmentConfig) -> Result<DatabaseConfig> {
    let mut db_config = DatabaseConfig::new(config.database_path.clone());
    db_config.init_pool().await?;
    db_config.migrate().await?;
    Ok(db_config)
}
