//! Configuration for Talents
//!
//! CLI arguments and environment variable handling using clap. The parsed
//! value is passed into each component's constructor; there is no global
//! config lookup anywhere in the crate.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Talents - points ledger and claim authorization service
///
/// "Well done, good and faithful servant" - Matthew 25:21
#[derive(Parser, Debug, Clone)]
#[command(name = "talents")]
#[command(about = "Points ledger and claim authorization service for the Elohim Protocol")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8090")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "talents")]
    pub mongodb_db: String,

    /// Path to the PEM-encoded Ed25519 private key used to sign claim tokens.
    /// Required outside dev mode; the process refuses to start without it.
    #[arg(long, env = "SIGNING_KEY_PATH")]
    pub signing_key_path: Option<PathBuf>,

    /// Chain JSON-RPC endpoint for reconciliation
    #[arg(long, env = "CHAIN_RPC_URL", default_value = "https://api.devnet.solana.com")]
    pub chain_rpc_url: String,

    /// Chain RPC request timeout in milliseconds
    #[arg(long, env = "CHAIN_RPC_TIMEOUT_MS", default_value = "30000")]
    pub chain_rpc_timeout_ms: u64,

    /// Activity catalog refresh interval in seconds
    #[arg(long, env = "CATALOG_REFRESH_SECS", default_value = "300")]
    pub catalog_refresh_secs: u64,

    /// Reconciliation cycle interval in seconds
    #[arg(long, env = "RECONCILE_INTERVAL_SECS", default_value = "86400")]
    pub reconcile_interval_secs: u64,

    /// Rate-limit window in seconds (play counters expire this long after the
    /// most recent play)
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value = "86400")]
    pub rate_limit_window_secs: u64,

    /// Enable development mode (ephemeral signing key if none configured)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode && self.signing_key_path.is_none() {
            return Err("SIGNING_KEY_PATH is required in production mode".to_string());
        }

        if self.catalog_refresh_secs == 0 {
            return Err("CATALOG_REFRESH_SECS must be greater than zero".to_string());
        }

        if self.reconcile_interval_secs == 0 {
            return Err("RECONCILE_INTERVAL_SECS must be greater than zero".to_string());
        }

        if self.rate_limit_window_secs == 0 {
            return Err("RATE_LIMIT_WINDOW_SECS must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["talents", "--signing-key-path", "/etc/talents/key.pem"])
    }

    #[test]
    fn test_defaults() {
        let args = base_args();
        assert_eq!(args.catalog_refresh_secs, 300);
        assert_eq!(args.reconcile_interval_secs, 86400);
        assert_eq!(args.rate_limit_window_secs, 86400);
        assert!(!args.dev_mode);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_signing_key_required_in_production() {
        let args = Args::parse_from(["talents"]);
        assert!(args.validate().is_err());

        let args = Args::parse_from(["talents", "--dev-mode"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let mut args = base_args();
        args.catalog_refresh_secs = 0;
        assert!(args.validate().is_err());

        let mut args = base_args();
        args.rate_limit_window_secs = 0;
        assert!(args.validate().is_err());
    }
}
