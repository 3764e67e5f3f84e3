//! In-memory store fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use talents::chain::ChainRpcClient;
use talents::stores::{
    Account, AccountStatus, AccountStore, ActivityDefinition, ActivityLogEntry, ActivityLogStore,
    ActivityStore, RateLimitStore,
};
use talents::types::{Result, TalentsError};

#[derive(Default)]
pub struct MemoryAccountStore {
    pub accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn with_account(self, account: Account) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.account_id.clone(), account);
        self
    }

    pub fn snapshot(&self, account_id: &str) -> Option<Account> {
        self.accounts.lock().unwrap().get(account_id).cloned()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get(&self, account_id: &str) -> Result<Option<Account>> {
        Ok(self.snapshot(account_id))
    }

    async fn get_by_identity(&self, email: &str, provider: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email && a.provider == provider)
            .cloned())
    }

    async fn save(&self, account: &Account) -> Result<()> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.account_id.clone(), account.clone());
        Ok(())
    }

    async fn increment_earned(&self, account_id: &str, delta: i64) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(account_id)
            .ok_or_else(|| TalentsError::AccountNotFound(account_id.to_string()))?;
        account.earned += delta;
        Ok(())
    }

    async fn set_claimed(&self, account_id: &str, earned_snapshot: i64, claimed: i64) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(account_id)
            .ok_or_else(|| TalentsError::AccountNotFound(account_id.to_string()))?;
        account.earned = earned_snapshot;
        account.claimed = claimed;
        Ok(())
    }

    async fn set_chain_address(&self, account_id: &str, address: &str) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(account_id)
            .ok_or_else(|| TalentsError::AccountNotFound(account_id.to_string()))?;
        account.chain_address = Some(address.to_string());
        Ok(())
    }

    async fn set_status(&self, account_id: &str, status: AccountStatus) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(account_id)
            .ok_or_else(|| TalentsError::AccountNotFound(account_id.to_string()))?;
        account.status = status;
        Ok(())
    }

    async fn list_reconcilable(&self) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .filter(|a| {
                a.status == AccountStatus::Active
                    && a.chain_address.as_deref().is_some_and(|addr| !addr.is_empty())
            })
            .cloned()
            .collect())
    }
}

/// Account store whose enumeration always fails (for cycle-skip tests)
pub struct FailingEnumerationStore;

#[async_trait]
impl AccountStore for FailingEnumerationStore {
    async fn get(&self, _: &str) -> Result<Option<Account>> {
        Ok(None)
    }
    async fn get_by_identity(&self, _: &str, _: &str) -> Result<Option<Account>> {
        Ok(None)
    }
    async fn save(&self, _: &Account) -> Result<()> {
        Ok(())
    }
    async fn increment_earned(&self, _: &str, _: i64) -> Result<()> {
        Ok(())
    }
    async fn set_claimed(&self, _: &str, _: i64, _: i64) -> Result<()> {
        Ok(())
    }
    async fn set_chain_address(&self, _: &str, _: &str) -> Result<()> {
        Ok(())
    }
    async fn set_status(&self, _: &str, _: AccountStatus) -> Result<()> {
        Ok(())
    }
    async fn list_reconcilable(&self) -> Result<Vec<Account>> {
        Err(TalentsError::Database("enumeration failed".into()))
    }
}

pub struct MemoryActivityStore {
    pub activities: Mutex<Vec<ActivityDefinition>>,
}

impl MemoryActivityStore {
    pub fn new(activities: Vec<ActivityDefinition>) -> Self {
        Self {
            activities: Mutex::new(activities),
        }
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn list_all(&self) -> Result<Vec<ActivityDefinition>> {
        Ok(self.activities.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryActivityLogStore {
    pub entries: Mutex<Vec<ActivityLogEntry>>,
}

impl MemoryActivityLogStore {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl ActivityLogStore for MemoryActivityLogStore {
    async fn append(&self, entry: &ActivityLogEntry) -> Result<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn query(
        &self,
        account_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<ActivityLogEntry>, u64)> {
        let entries = self.entries.lock().unwrap();
        let mut matching: Vec<_> = entries
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as u64;

        let page = page.max(1);
        let start = ((page - 1) * page_size) as usize;
        let page_entries = matching
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok((page_entries, total))
    }
}

#[derive(Default)]
pub struct MemoryRateLimitStore {
    pub entries: Mutex<HashMap<String, i64>>,
    pub fail: AtomicBool,
}

impl MemoryRateLimitStore {
    pub fn fail_next_ops(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn count(&self, key: &str) -> Option<i64> {
        self.entries.lock().unwrap().get(key).copied()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn get(&self, key: &str) -> Result<Option<i64>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TalentsError::Database("counter store down".into()));
        }
        Ok(self.count(key))
    }

    async fn set_with_expiry(&self, key: &str, value: i64, _ttl: Duration) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TalentsError::Database("counter store down".into()));
        }
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

/// Chain RPC fake: per-address blobs, failures, or panics
#[derive(Default)]
pub struct FakeChainRpc {
    pub blobs: Mutex<HashMap<String, Vec<u8>>>,
    pub failing: Mutex<HashSet<String>>,
    pub panicking: Mutex<HashSet<String>>,
}

impl FakeChainRpc {
    pub fn with_blob(self, address: &str, blob: Vec<u8>) -> Self {
        self.blobs.lock().unwrap().insert(address.to_string(), blob);
        self
    }

    pub fn with_failure(self, address: &str) -> Self {
        self.failing.lock().unwrap().insert(address.to_string());
        self
    }

    pub fn with_panic(self, address: &str) -> Self {
        self.panicking.lock().unwrap().insert(address.to_string());
        self
    }
}

#[async_trait]
impl ChainRpcClient for FakeChainRpc {
    async fn fetch_account_blob(&self, address: &str) -> Result<Vec<u8>> {
        let should_panic = self.panicking.lock().unwrap().contains(address);
        if should_panic {
            panic!("rpc blew up for {}", address);
        }
        if self.failing.lock().unwrap().contains(address) {
            return Err(TalentsError::Chain(format!("rpc timeout for {}", address)));
        }
        self.blobs
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| TalentsError::Chain(format!("no account on chain for {}", address)))
    }
}

/// Serialize a points account in the chain's fixed layout
pub fn encode_chain_account(
    authority: [u8; 32],
    points: u64,
    last_signature: [u8; 64],
    claim_count: u64,
) -> Vec<u8> {
    let mut data = Vec::with_capacity(112);
    data.extend_from_slice(&authority);
    data.extend_from_slice(&points.to_le_bytes());
    data.extend_from_slice(&last_signature);
    data.extend_from_slice(&claim_count.to_le_bytes());
    data
}

/// An account with points already on the books
pub fn funded_account(account_id: &str, earned: i64, claimed: i64) -> Account {
    let mut account = Account::new(
        account_id.to_string(),
        format!("{}@example.com", account_id),
        account_id.to_string(),
        "github".to_string(),
        String::new(),
    );
    account.earned = earned;
    account.claimed = claimed;
    account
}

pub fn chat_activity() -> ActivityDefinition {
    ActivityDefinition {
        code: 7,
        name: "chat".to_string(),
        reward_amount: 10,
        daily_limit: 2,
    }
}
