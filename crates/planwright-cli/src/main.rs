mod config;
mod generate_cmd;
mod plans_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::PgPool;

use planwright_core::plan::{PlanService, PlanStore};
use planwright_db::pool;

use config::ServerConfig;
use serve_cmd::AllowedOrigin;

#[derive(Parser)]
#[command(name = "planwright", about = "Turn a goal into an LLM-generated task plan")]
struct Cli {
    /// Database URL (overrides DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Dotenv file loaded before reading configuration (missing file is fine)
    #[arg(long, global = true, default_value = config::DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        /// Port to listen on (overrides PORT env var; default 3000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a plan for a goal and print it as JSON
    Generate {
        /// The goal to break down into tasks
        goal: String,
        /// Do not save the plan even if a database is configured
        #[arg(long)]
        no_save: bool,
    },
    /// List saved plans, newest first
    Plans {
        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Send a greeting to the completion service to check the API key
    Ping,
    /// Create the database if needed and apply migrations
    DbInit,
}

/// Connect to the plan store if one is configured.
///
/// Connection or migration failure is logged and disables persistence.
async fn connect_store(config: &ServerConfig) -> Option<PgPool> {
    let Some(db_config) = &config.db_config else {
        tracing::warn!("DATABASE_URL not set; plans will not be saved");
        return None;
    };
    match pool::connect_and_migrate(db_config).await {
        Ok(db_pool) => {
            tracing::info!(url = %db_config.redacted_url(), "database connected");
            Some(db_pool)
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "database connection error; plans will not be saved");
            None
        }
    }
}

fn build_service(config: &ServerConfig, db_pool: Option<&PgPool>) -> Arc<PlanService> {
    let store = db_pool.map(|p| Arc::new(p.clone()) as Arc<dyn PlanStore>);
    Arc::new(PlanService::new(Arc::new(config.completion_client()), store))
}

fn log_api_key_status(config: &ServerConfig) {
    if config.openai_api_key.is_some() {
        tracing::info!(model = %config.openai_model, "OPENAI_API_KEY loaded");
    } else {
        tracing::warn!("OPENAI_API_KEY missing; plan generation will fail");
    }
}

/// Execute the `planwright db-init` command: create database and run migrations.
async fn cmd_db_init(config: &ServerConfig) -> anyhow::Result<()> {
    let db_config = config
        .db_config
        .as_ref()
        .context("no database configured; set DATABASE_URL or pass --database-url")?;

    println!("Initializing planwright database...");
    pool::ensure_database_exists(db_config).await?;
    let db_pool = pool::connect_and_migrate(db_config).await?;
    db_pool.close().await;
    println!("planwright db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load before the subscriber so RUST_LOG from the file applies.
    let env_file_result = config::load_env_file(&cli.env_file);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if env_file_result? {
        tracing::debug!(path = %cli.env_file.display(), "loaded env file");
    }

    match cli.command {
        Commands::Serve { bind, port } => {
            let port = config::resolve_port(port)?;
            let config = ServerConfig::resolve(cli.database_url.as_deref());
            log_api_key_status(&config);
            let allowed_origin = AllowedOrigin::parse(config.allowed_origin.as_deref())?;
            if config.allowed_origin.is_none() {
                tracing::warn!("FRONTEND_URL not set; all cross-origin requests will be rejected");
            }

            let db_pool = connect_store(&config).await;
            let service = build_service(&config, db_pool.as_ref());
            let result = serve_cmd::run_serve(service, allowed_origin, &bind, port).await;
            if let Some(p) = db_pool {
                p.close().await;
            }
            result?;
        }
        Commands::Generate { goal, no_save } => {
            let config = ServerConfig::resolve(cli.database_url.as_deref());
            log_api_key_status(&config);
            let db_pool = if no_save {
                None
            } else {
                connect_store(&config).await
            };
            let service = build_service(&config, db_pool.as_ref());
            let result = generate_cmd::run_generate(&service, &goal).await;
            if let Some(p) = db_pool {
                p.close().await;
            }
            result?;
        }
        Commands::Plans { json } => {
            let config = ServerConfig::resolve(cli.database_url.as_deref());
            let db_config = config
                .db_config
                .as_ref()
                .context("no database configured; set DATABASE_URL or pass --database-url")?;
            let db_pool = pool::connect_and_migrate(db_config).await?;
            let service = build_service(&config, Some(&db_pool));
            let result = plans_cmd::run_plans(&service, json).await;
            db_pool.close().await;
            result?;
        }
        Commands::Ping => {
            let config = ServerConfig::resolve(cli.database_url.as_deref());
            log_api_key_status(&config);
            generate_cmd::run_ping(&config.completion_client()).await?;
        }
        Commands::DbInit => {
            let config = ServerConfig::resolve(cli.database_url.as_deref());
            cmd_db_init(&config).await?;
        }
    }

    Ok(())
}
