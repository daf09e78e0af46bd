#![forbid(unsafe_code)]

mod config;
mod seed;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use stride_core::model::UserId;
use stride_services::{DashboardResponse, DashboardService, IdSequence};
use stride_storage::{InMemoryRepository, Snapshot, Storage};
use tracing::{debug, info};

use config::{AppConfig, Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_cli(&cli);
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Stats {
            data,
            user,
            seed_days,
        } => {
            let user_id = UserId::new(user);
            let repo = match data {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("read {}", path.display()))?;
                    let snapshot: Snapshot = serde_json::from_str(&raw)
                        .with_context(|| format!("parse {}", path.display()))?;
                    info!(path = %path.display(), "loaded data file");
                    InMemoryRepository::from_snapshot(snapshot)?
                }
                None => demo_repository(&config, user_id, seed_days).await?,
            };

            let storage = Storage::from_repository(repo);
            let dashboard = DashboardService::new(config.clock, storage.courses, storage.lessons)
                .with_calculator(config.calculator);
            let stats = dashboard.get_stats(user_id).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&DashboardResponse::from(stats))?
            );
        }
        Command::Seed { out, user, days } => {
            let repo = demo_repository(&config, UserId::new(user), days).await?;
            let json = serde_json::to_string_pretty(&repo.snapshot()?)?;
            std::fs::write(&out, json).with_context(|| format!("write {}", out.display()))?;
            info!(path = %out.display(), "demo data written");
        }
        Command::Streak { today, dates } => {
            let today = today.unwrap_or_else(|| config.clock.today(config.calculator.offset()));
            let streak = stride_core::calculate_streak(dates, today);
            println!("{streak}");
        }
    }

    Ok(())
}

async fn demo_repository(
    config: &AppConfig,
    user_id: UserId,
    days: u32,
) -> Result<InMemoryRepository> {
    let repo = InMemoryRepository::new();
    let ids = Arc::new(IdSequence::default());
    let storage = Storage::from_repository(repo.clone());
    seed::seed_demo(&storage, &ids, user_id, config.clock.now(), days).await?;
    Ok(repo)
}
