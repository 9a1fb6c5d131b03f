//! Paydesk main entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use paydesk_api::start_server;
use paydesk_config::Config;
use paydesk_core::{BatchLoader, Database, SeedStep, SqlRepository};
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "paydesk")]
#[command(author = "Paydesk Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Client, transaction and bill management API with CSV seeding", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API and the management page (default)
    Serve,
    /// Load the CSV import files into the database
    Seed {
        /// Comma-separated subset of steps; always run in foreign-key order
        #[arg(long, value_delimiter = ',', default_values_t = SeedStep::ALL)]
        only: Vec<SeedStep>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match Config::load_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
            log::error!("Configuration error: {}", e.to_details());
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to load configuration from {}", args.config.display())));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level)).init();
    log::info!(
        "Config loaded: database={}, data dir={}",
        config.database.url,
        config.seed.data_dir.display()
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = Database::connect(&config.database)
            .await
            .with_context(|| format!("Failed to connect to {}", config.database.url))?;
        let repo = SqlRepository::new(db.clone()).into_ref();

        let result = match args.command.unwrap_or(Command::Serve) {
            Command::Serve => match db.ping().await {
                Ok(()) => start_server(config.clone(), repo).await,
                Err(e) => {
                    log::error!("Database check failed: {}", e.to_details());
                    Err(anyhow::Error::new(e).context("Database is not reachable"))
                }
            },
            Command::Seed { only } => {
                let loader = BatchLoader::new(repo, config.seed.missing_amount);
                match loader.seed(&config, &only).await {
                    Ok(reports) => {
                        for (step, report) in &reports {
                            log::info!(
                                "{}: {} inserted, {} skipped, {} pending",
                                step,
                                report.inserted,
                                report.skipped.len(),
                                report.pending
                            );
                        }
                        Ok(())
                    }
                    Err(e) => {
                        log::error!("Seeding failed: {}", e.to_details());
                        Err(anyhow::Error::new(e).context("Seeding failed"))
                    }
                }
            }
        };

        db.close().await;
        result
    })
}
