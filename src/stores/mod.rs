//! Repository contracts consumed by the core
//!
//! The ledger, catalog, limiter, and reconciler talk to persistence only
//! through these traits. MongoDB-backed implementations live in this module;
//! tests substitute in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::types::Result;

mod accounts;
mod activities;
mod activity_logs;
mod rate_limits;

pub use accounts::MongoAccountStore;
pub use activities::MongoActivityStore;
pub use activity_logs::MongoActivityLogStore;
pub use rate_limits::MongoRateLimitStore;

/// Account lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    /// Set by the reconciler when on-chain claim evidence does not verify.
    /// Terminal: nothing in this service clears it.
    Quarantined,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Quarantined => "quarantined",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "quarantined" => Self::Quarantined,
            _ => Self::Active,
        }
    }
}

/// A points account as the ledger sees it
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: String,
    pub email: String,
    pub name: String,
    pub provider: String,
    pub avatar_url: String,
    /// Cumulative points ever credited
    pub earned: i64,
    /// Cumulative points authorized for withdrawal; `claimed <= earned` always
    pub claimed: i64,
    /// Counter included in signed claim tokens
    pub claim_count: u64,
    /// On-chain points account address; presence gates reconciliation
    pub chain_address: Option<String>,
    pub status: AccountStatus,
}

impl Account {
    /// A fresh account with zeroed accumulators
    pub fn new(account_id: String, email: String, name: String, provider: String, avatar_url: String) -> Self {
        Self {
            account_id,
            email,
            name,
            provider,
            avatar_url,
            earned: 0,
            claimed: 0,
            claim_count: 0,
            chain_address: None,
            status: AccountStatus::Active,
        }
    }
}

/// A playable activity as published in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDefinition {
    pub code: i32,
    pub name: String,
    /// Points credited per successful play
    pub reward_amount: i64,
    /// Maximum plays per rate-limit window
    pub daily_limit: i64,
}

/// One successful play, as recorded in the append-only log
#[derive(Debug, Clone)]
pub struct ActivityLogEntry {
    pub account_id: String,
    pub activity_code: i32,
    pub activity_name: String,
    pub reward_amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Account persistence contract
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch by account id
    async fn get(&self, account_id: &str) -> Result<Option<Account>>;

    /// Fetch by identity-provider pair (the first-authentication lookup)
    async fn get_by_identity(&self, email: &str, provider: &str) -> Result<Option<Account>>;

    /// Insert a new account row
    async fn save(&self, account: &Account) -> Result<()>;

    /// Credit points: `earned += delta`
    async fn increment_earned(&self, account_id: &str, delta: i64) -> Result<()>;

    /// Persist a claim: writes both the earned snapshot and the new claimed
    /// value, exactly as read/computed by the caller
    async fn set_claimed(&self, account_id: &str, earned_snapshot: i64, claimed: i64) -> Result<()>;

    /// Attach the on-chain points account address
    async fn set_chain_address(&self, account_id: &str, address: &str) -> Result<()>;

    /// Update the lifecycle status
    async fn set_status(&self, account_id: &str, status: AccountStatus) -> Result<()>;

    /// All non-quarantined accounts with a non-empty chain address
    async fn list_reconcilable(&self) -> Result<Vec<Account>>;
}

/// Activity catalog source contract
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<ActivityDefinition>>;
}

/// Append-only activity log contract
#[async_trait]
pub trait ActivityLogStore: Send + Sync {
    async fn append(&self, entry: &ActivityLogEntry) -> Result<()>;

    /// Newest-first page of an account's history plus the total entry count.
    /// Pages are 1-based.
    async fn query(
        &self,
        account_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<ActivityLogEntry>, u64)>;
}

/// Expiring key-value counter contract
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Read a counter; an absent or expired key is `None`, not an error
    async fn get(&self, key: &str) -> Result<Option<i64>>;

    /// Write a counter with its expiry reset to `ttl` from now
    async fn set_with_expiry(&self, key: &str, value: i64, ttl: Duration) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(AccountStatus::from_str("active"), AccountStatus::Active);
        assert_eq!(
            AccountStatus::from_str("quarantined"),
            AccountStatus::Quarantined
        );
        // Unknown strings read as active rather than poisoning the row
        assert_eq!(AccountStatus::from_str("???"), AccountStatus::Active);
        assert_eq!(AccountStatus::Quarantined.as_str(), "quarantined");
    }

    #[test]
    fn test_new_account_is_zeroed() {
        let account = Account::new(
            "u1".into(),
            "u1@example.com".into(),
            "u1".into(),
            "github".into(),
            String::new(),
        );
        assert_eq!(account.earned, 0);
        assert_eq!(account.claimed, 0);
        assert_eq!(account.claim_count, 0);
        assert_eq!(account.status, AccountStatus::Active);
        assert!(account.chain_address.is_none());
    }
}
