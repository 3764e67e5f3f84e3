//! Points ledger
//!
//! Foreground operations over the account stores: playing activities for
//! points, claiming accumulated points as signed authorization tokens, and
//! the query surface around them. One invariant holds at all times:
//! `claimed <= earned` for every account.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::ActivityCatalog;
use crate::claims::ClaimAuthorizer;
use crate::limiter::RateLimiter;
use crate::stores::{
    Account, AccountStore, ActivityDefinition, ActivityLogEntry, ActivityLogStore,
};
use crate::types::{Result, TalentsError};

/// Result of a successful play
#[derive(Debug, Clone)]
pub struct PlayReceipt {
    pub activity_code: i32,
    pub activity_name: String,
    pub reward_amount: i64,
}

/// Account registration request (create-on-first-authentication)
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub account_id: Option<String>,
    pub email: String,
    pub name: String,
    pub provider: String,
    pub avatar_url: String,
}

/// The points ledger service
pub struct PointsLedger {
    accounts: Arc<dyn AccountStore>,
    logs: Arc<dyn ActivityLogStore>,
    catalog: Arc<ActivityCatalog>,
    limiter: RateLimiter,
    authorizer: Arc<ClaimAuthorizer>,
}

impl PointsLedger {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        logs: Arc<dyn ActivityLogStore>,
        catalog: Arc<ActivityCatalog>,
        limiter: RateLimiter,
        authorizer: Arc<ClaimAuthorizer>,
    ) -> Self {
        Self {
            accounts,
            logs,
            catalog,
            limiter,
            authorizer,
        }
    }

    /// Play an activity: check the window counter, credit the reward, append
    /// a log entry, bump the counter.
    ///
    /// The credit, the log append, and the counter write are sequential
    /// store calls, not one transaction; a crash in between can leave the
    /// account credited without the counter moving. Two concurrent plays of
    /// the same pair can also both pass the limit check (the counter store
    /// has no compare-and-increment).
    pub async fn play(&self, activity_code: i32, account_id: &str) -> Result<PlayReceipt> {
        let activity = self
            .catalog
            .get(activity_code)
            .await
            .ok_or(TalentsError::ActivityNotFound(activity_code))?;

        let consumed = self.limiter.consumed(activity_code, account_id).await?;
        if consumed >= activity.daily_limit {
            info!(
                account = account_id,
                activity = %activity.name,
                consumed,
                "play rejected, window exhausted"
            );
            return Err(TalentsError::LimitReached);
        }

        self.accounts
            .increment_earned(account_id, activity.reward_amount)
            .await?;

        let entry = ActivityLogEntry {
            account_id: account_id.to_string(),
            activity_code: activity.code,
            activity_name: activity.name.clone(),
            reward_amount: activity.reward_amount,
            created_at: chrono::Utc::now(),
        };
        self.logs.append(&entry).await?;

        self.limiter
            .consume(activity_code, account_id, consumed + 1)
            .await?;

        Ok(PlayReceipt {
            activity_code: activity.code,
            activity_name: activity.name,
            reward_amount: activity.reward_amount,
        })
    }

    /// Whether the window for (activity, account) is already exhausted.
    ///
    /// Unknown activity codes report `false` rather than erroring; store
    /// failures are surfaced, not swallowed.
    pub async fn is_limited(&self, activity_code: i32, account_id: &str) -> Result<bool> {
        let Some(activity) = self.catalog.get(activity_code).await else {
            return Ok(false);
        };
        let consumed = self.limiter.consumed(activity_code, account_id).await?;
        Ok(consumed >= activity.daily_limit)
    }

    /// Claim `amount` points as a signed authorization token.
    ///
    /// With `commit` false this is a preview: the token is issued but
    /// nothing is persisted, so the call can be repeated freely. The token
    /// signs the account's current claim counter; the counter itself is not
    /// advanced by a claim (see `ClaimAuthorizer` for the open question
    /// around that).
    pub async fn claim(&self, account_id: &str, amount: i64, commit: bool) -> Result<String> {
        if amount <= 0 {
            return Err(TalentsError::BadRequest(
                "claim amount must be positive".into(),
            ));
        }

        let account = self
            .accounts
            .get(account_id)
            .await?
            .ok_or_else(|| TalentsError::AccountNotFound(account_id.to_string()))?;

        let projected = account.claimed + amount;
        if projected > account.earned {
            warn!(
                account = account_id,
                earned = account.earned,
                claimed = account.claimed,
                amount,
                "claim rejected, not enough points"
            );
            return Err(TalentsError::InsufficientPoints);
        }

        if commit {
            self.accounts
                .set_claimed(account_id, account.earned, projected)
                .await?;
            info!(
                account = account_id,
                claimed = projected,
                "claim committed"
            );
        }

        Ok(self.authorizer.sign(&account.account_id, account.claim_count))
    }

    /// Create the account row on first authentication, or return the
    /// existing one. Looks up by id first, then by (email, provider).
    pub async fn register(&self, request: RegisterRequest) -> Result<Account> {
        if let Some(ref id) = request.account_id {
            if let Some(existing) = self.accounts.get(id).await? {
                return Ok(existing);
            }
        }
        if !request.email.is_empty() {
            if let Some(existing) = self
                .accounts
                .get_by_identity(&request.email, &request.provider)
                .await?
            {
                return Ok(existing);
            }
        }

        let account_id = request
            .account_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let name = if request.name.is_empty() {
            account_id.chars().take(6).collect()
        } else {
            request.name
        };

        let account = Account::new(
            account_id,
            request.email,
            name,
            request.provider,
            request.avatar_url,
        );
        self.accounts.save(&account).await?;
        info!(account = %account.account_id, "account registered");
        Ok(account)
    }

    /// Fetch one account
    pub async fn account(&self, account_id: &str) -> Result<Account> {
        self.accounts
            .get(account_id)
            .await?
            .ok_or_else(|| TalentsError::AccountNotFound(account_id.to_string()))
    }

    /// Current catalog snapshot as a list
    pub async fn activities(&self) -> Vec<ActivityDefinition> {
        let mut activities: Vec<_> = self.catalog.snapshot_all().await.into_values().collect();
        activities.sort_by_key(|a| a.code);
        activities
    }

    /// Paginated play history for an account, newest first
    pub async fn activity_logs(
        &self,
        account_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<ActivityLogEntry>, u64)> {
        self.logs.query(account_id, page, page_size).await
    }

    /// Attach the on-chain points account address
    pub async fn set_chain_address(&self, account_id: &str, address: &str) -> Result<()> {
        let decoded = bs58::decode(address)
            .into_vec()
            .map_err(|_| TalentsError::BadRequest("invalid chain address".into()))?;
        if decoded.len() != 32 {
            return Err(TalentsError::BadRequest("invalid chain address".into()));
        }

        self.accounts.set_chain_address(account_id, address).await
    }
}
