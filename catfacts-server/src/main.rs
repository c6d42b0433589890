use std::sync::Arc;

use catfacts_core::{CatFactsConfig, FactStore, PgFactStore};
use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use catfacts_server::http::{self, HttpState};
use catfacts_server::subsystems::seed;
use catfacts_server::SkillContext;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "catfacts.toml")]
    config: String,

    #[arg(long)]
    health: bool,

    /// Replace the fact table contents with one fact per line of FILE, then exit
    #[arg(long, value_name = "FILE")]
    seed: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Init logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Load config
    let config = match CatFactsConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Connect to DB
    let pool = match catfacts_core::db::create_pool(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &args.seed {
        match seed::seed_from_file(&pool, &config.database.table, path).await {
            Ok(n) => println!("✅ Seeded {} facts into {}", n, config.database.table),
            Err(e) => {
                println!("❌ Seeding failed: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let store = PgFactStore::new(pool.clone(), config.database.table.clone())?;

    if args.health {
        match catfacts_core::db::health_check(&pool).await {
            Ok(v) => println!("✅ PostgreSQL connected: {}", v),
            Err(e) => {
                println!("❌ PostgreSQL connection failed: {}", e);
                std::process::exit(1);
            }
        }

        match store.count().await {
            Ok(n) => println!("✅ Fact table {}: {} facts", store.table(), n),
            Err(e) => {
                println!("❌ Fact table {} unreadable: {}", store.table(), e);
                std::process::exit(1);
            }
        }

        println!("✅ Cat Facts health check passed");
        return Ok(());
    }

    // The fact count is required up front; no requests are served without it.
    let context = match SkillContext::initialize(Arc::new(store), config.skill.seed).await {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Failed to read fact count from {}: {}", config.database.table, e);
            std::process::exit(1);
        }
    };

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let state = Arc::new(HttpState { pool, context });
    http::start_http_server(state, &config, tx.subscribe()).await?;

    Ok(())
}
