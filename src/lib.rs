//! Talents - points ledger and claim authorization service
//!
//! "Well done, good and faithful servant" - Matthew 25:21
//!
//! Talents tracks per-account points earned through gamified activities,
//! enforces a daily play limit per activity, and lets an account claim
//! accumulated points by receiving a signed authorization token redeemable
//! on the chain program. A background reconciler compares the off-chain
//! ledger with on-chain state and quarantines accounts whose claim evidence
//! does not verify.
//!
//! ## Services
//!
//! - **Catalog**: in-memory activity catalog, refreshed from the store
//! - **Limiter**: per-(activity, account) play counters with a 24h window
//! - **Ledger**: play/claim operations and the account query surface
//! - **Claims**: Ed25519 claim-token signing and verification
//! - **Reconciler**: periodic on-chain drift detection and quarantine

pub mod catalog;
pub mod chain;
pub mod claims;
pub mod config;
pub mod db;
pub mod ledger;
pub mod limiter;
pub mod server;
pub mod stores;
pub mod supervisor;
pub mod types;

pub use config::Args;
pub use types::{Result, TalentsError};
