//! Talents - points ledger and claim authorization service
//!
//! "Well done, good and faithful servant" - Matthew 25:21

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use talents::{
    catalog::{spawn_refresh_task, ActivityCatalog},
    chain::{spawn_reconcile_task, HttpChainRpc, Reconciler},
    claims::{generate_keypair, load_signing_key, ClaimAuthorizer},
    config::Args,
    db::MongoClient,
    ledger::PointsLedger,
    limiter::RateLimiter,
    server::{self, AppState},
    stores::{MongoAccountStore, MongoActivityLogStore, MongoActivityStore, MongoRateLimitStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("talents={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Talents - Points Ledger Service");
    info!("  \"Well done, good and faithful servant\"");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("MongoDB: {}", args.mongodb_uri);
    info!("Chain RPC: {}", args.chain_rpc_url);
    info!("Catalog refresh: every {}s", args.catalog_refresh_secs);
    info!("Reconcile cycle: every {}s", args.reconcile_interval_secs);
    info!("Rate-limit window: {}s", args.rate_limit_window_secs);
    info!("======================================");

    // Load the claim-signing key. Missing or corrupt key material is the one
    // startup-fatal condition: the service must not serve without it.
    let signing_key = match args.signing_key_path {
        Some(ref path) => match load_signing_key(path) {
            Ok(key) => key,
            Err(e) => {
                error!("Signing key unavailable: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            // validate() only allows this in dev mode
            warn!("No signing key configured, generating an ephemeral one (dev mode)");
            let (key, _) = generate_keypair();
            key
        }
    };
    let authorizer = Arc::new(ClaimAuthorizer::new(signing_key));
    info!("Claim-signing key loaded");

    // Connect to MongoDB
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => client,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    // Stores
    let accounts = Arc::new(MongoAccountStore::new(&mongo).await?);
    let activities = Arc::new(MongoActivityStore::new(&mongo).await?);
    let activity_logs = Arc::new(MongoActivityLogStore::new(&mongo).await?);
    let rate_limits = Arc::new(MongoRateLimitStore::new(&mongo).await?);

    // Activity catalog with its supervised refresh loop
    let catalog = Arc::new(ActivityCatalog::new(activities));
    let _catalog_task = spawn_refresh_task(
        Arc::clone(&catalog),
        Duration::from_secs(args.catalog_refresh_secs),
    );
    info!(
        "Catalog refresh task started (interval: {}s)",
        args.catalog_refresh_secs
    );

    // Ledger
    let limiter = RateLimiter::new(
        rate_limits,
        Duration::from_secs(args.rate_limit_window_secs),
    );
    let ledger = Arc::new(PointsLedger::new(
        Arc::clone(&accounts) as _,
        activity_logs,
        Arc::clone(&catalog),
        limiter,
        Arc::clone(&authorizer),
    ));

    // Chain reconciler with its supervised loop
    let rpc = Arc::new(HttpChainRpc::new(
        &args.chain_rpc_url,
        Duration::from_millis(args.chain_rpc_timeout_ms),
    )?);
    let reconciler = Reconciler::new(accounts, rpc, authorizer);
    let _reconcile_task = spawn_reconcile_task(
        reconciler,
        Duration::from_secs(args.reconcile_interval_secs),
    );
    info!(
        "Chain reconcile task started (interval: {}s)",
        args.reconcile_interval_secs
    );

    // Run the server
    let state = Arc::new(AppState { ledger });
    if let Err(e) = server::run(state, args.listen).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
