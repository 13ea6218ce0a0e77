use anyhow::{Context, Result};
use clap::Parser;
use lodestone_core::{apply_update, ProfileStore, UpdateReport};
use lodestone_models::{ReleaseStatus, UpdateUserRequest, User, UserFlags};
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_warnings) = config::Config::load(&args.config)?;

    init_tracing(&config.logging);
    report_config_warnings(&config_warnings);
    if !Path::new(&args.config).exists() {
        tracing::info!("Config file not found at '{}', using defaults", args.config);
    }

    let pool = lodestone_db::create_pool(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("connecting to {}", config.database.url))?;

    match args.command {
        Command::Migrate => {
            lodestone_db::run_migrations(&pool).await?;
        }
        Command::ShowUser { user } => {
            let user = load_user(&pool, &user).await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::UpdateProfile {
            user,
            request,
            dry_run,
        } => {
            let req = read_request(&request)?;
            let (user, report) = if dry_run {
                let mut user = load_user(&pool, &user).await?;
                let report = apply_update(&pool, &mut user, &req).await;
                (user, report)
            } else {
                lodestone_core::update_profile(&pool, &user, &req)
                    .await
                    .with_context(|| format!("updating user {user}"))?
            };
            let persisted = !dry_run && report.changed();
            println!(
                "{}",
                serde_json::to_string_pretty(&report_json(&user, &report, persisted))?
            );
        }
        Command::CreateWorld {
            name,
            author,
            public,
        } => {
            load_user(&pool, &author).await?;
            let release_status = if public {
                ReleaseStatus::Public
            } else {
                ReleaseStatus::Private
            };
            let world = lodestone_db::worlds::create_world(
                &pool,
                &lodestone_util::ids::new_world_id(),
                &name,
                &author,
                release_status,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&world)?);
        }
        Command::SetStaff { user, revoke } => {
            let mut flags = load_user(&pool, &user).await?.flags;
            flags.set(UserFlags::STAFF, !revoke);
            lodestone_db::users::update_user_flags(&pool, &user, flags).await?;
            tracing::info!(user_id = %user, staff = !revoke, "staff flag updated");
        }
    }

    Ok(())
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn report_config_warnings(warnings: &[String]) {
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
}

async fn load_user(pool: &lodestone_db::DbPool, user_id: &str) -> Result<User> {
    pool.get_user(user_id)
        .await?
        .with_context(|| format!("user {user_id} not found"))
}

fn read_request(source: &str) -> Result<UpdateUserRequest> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {source}"))?
    };
    serde_json::from_str(&raw).context("decoding update request")
}

fn report_json(user: &User, report: &UpdateReport, persisted: bool) -> Value {
    let rejected: Vec<Value> = report
        .rejected
        .iter()
        .map(|r| {
            json!({
                "field": r.field,
                "error": r.error.to_string(),
            })
        })
        .collect();
    json!({
        "user": user,
        "applied": report.applied,
        "rejected": rejected,
        "persisted": persisted,
    })
}
