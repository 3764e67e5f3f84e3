//! On-chain drift reconciliation
//!
//! Periodically compares the off-chain ledger with on-chain program state.
//! An account whose on-chain points disagree with the ledger is only a
//! problem when the claim evidence recorded on chain does not verify
//! against the key this service signs with: that means a withdrawal was
//! honored using a token this ledger never issued. Such accounts are
//! quarantined; quarantine is terminal and nothing here reverses it.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::chain::account::ChainPointsAccount;
use crate::chain::rpc::ChainRpcClient;
use crate::claims::ClaimAuthorizer;
use crate::stores::{Account, AccountStatus, AccountStore};
use crate::supervisor::spawn_supervised;
use crate::types::Result;

/// Outcome of reconciling a single account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// On-chain points match the ledger
    Consistent,
    /// Points drifted but the on-chain claim evidence verifies (a claim in
    /// flight); left alone
    DriftVerified,
    /// Claim evidence failed verification; the account was quarantined
    Quarantined,
}

/// Reconciles ledger state against the chain
#[derive(Clone)]
pub struct Reconciler {
    accounts: Arc<dyn AccountStore>,
    rpc: Arc<dyn ChainRpcClient>,
    authorizer: Arc<ClaimAuthorizer>,
}

impl Reconciler {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        rpc: Arc<dyn ChainRpcClient>,
        authorizer: Arc<ClaimAuthorizer>,
    ) -> Self {
        Self {
            accounts,
            rpc,
            authorizer,
        }
    }

    /// Run one full cycle over all reconcilable accounts.
    ///
    /// Accounts are processed concurrently; a failure or panic in one
    /// account's task is logged and never affects its siblings. Returns the
    /// number of accounts quarantined this cycle. An enumeration failure
    /// aborts the cycle before any per-account work.
    pub async fn run_cycle(&self) -> Result<usize> {
        let accounts = self.accounts.list_reconcilable().await?;
        debug!(accounts = accounts.len(), "reconciliation cycle starting");

        let mut handles = Vec::with_capacity(accounts.len());
        for account in accounts {
            let this = self.clone();
            handles.push(tokio::spawn(async move {
                let account_id = account.account_id.clone();
                (account_id, this.reconcile_account(account).await)
            }));
        }

        let mut quarantined = 0usize;
        for handle in handles {
            match handle.await {
                Ok((_, Ok(ReconcileOutcome::Quarantined))) => quarantined += 1,
                Ok((_, Ok(_))) => {}
                Ok((account_id, Err(e))) => {
                    warn!(account = %account_id, "reconcile skipped: {}", e);
                }
                Err(e) if e.is_panic() => {
                    error!("reconcile task panicked; account skipped this cycle");
                }
                Err(_) => {}
            }
        }

        Ok(quarantined)
    }

    async fn reconcile_account(&self, account: Account) -> Result<ReconcileOutcome> {
        // list_reconcilable only returns accounts with an address, but the
        // row may have changed since enumeration
        let Some(address) = account.chain_address.as_deref().filter(|a| !a.is_empty()) else {
            return Ok(ReconcileOutcome::Consistent);
        };

        let blob = self.rpc.fetch_account_blob(address).await?;
        let chain = ChainPointsAccount::decode(&blob)?;

        if chain.points as i64 == account.claimed {
            return Ok(ReconcileOutcome::Consistent);
        }

        if self
            .authorizer
            .verify(&account.account_id, chain.claim_count, &chain.last_signature)
        {
            debug!(
                account = %account.account_id,
                ledger_claimed = account.claimed,
                chain_points = chain.points,
                "points drifted but claim evidence verifies"
            );
            return Ok(ReconcileOutcome::DriftVerified);
        }

        warn!(
            account = %account.account_id,
            ledger_claimed = account.claimed,
            chain_points = chain.points,
            chain_claim_count = chain.claim_count,
            "on-chain claim evidence failed verification, quarantining"
        );
        self.accounts
            .set_status(&account.account_id, AccountStatus::Quarantined)
            .await?;

        Ok(ReconcileOutcome::Quarantined)
    }
}

/// Start the supervised reconciliation loop.
///
/// Runs a cycle immediately, then on every interval tick. A failed
/// enumeration skips the cycle; a panicking cycle restarts the loop.
pub fn spawn_reconcile_task(reconciler: Reconciler, interval: Duration) -> JoinHandle<()> {
    spawn_supervised("chain-reconcile", move || {
        let reconciler = reconciler.clone();
        async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match reconciler.run_cycle().await {
                    Ok(quarantined) => {
                        info!(quarantined, "reconciliation cycle completed");
                    }
                    Err(e) => warn!("reconciliation cycle skipped: {}", e),
                }
            }
        }
    })
}
