//! MongoDB-backed account store

use async_trait::async_trait;
use bson::{doc, DateTime};

use crate::db::schemas::{AccountDoc, ACCOUNT_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::stores::{Account, AccountStatus, AccountStore};
use crate::types::{Result, TalentsError};

/// Account store backed by MongoDB
pub struct MongoAccountStore {
    collection: MongoCollection<AccountDoc>,
}

impl MongoAccountStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        let collection = mongo.collection::<AccountDoc>(ACCOUNT_COLLECTION).await?;
        Ok(Self { collection })
    }
}

fn to_account(doc: AccountDoc) -> Account {
    Account {
        account_id: doc.account_id,
        email: doc.email,
        name: doc.name,
        provider: doc.provider,
        avatar_url: doc.avatar_url,
        earned: doc.earned,
        claimed: doc.claimed,
        claim_count: doc.claim_count.max(0) as u64,
        chain_address: doc.chain_address.filter(|a| !a.is_empty()),
        status: AccountStatus::from_str(&doc.status),
    }
}

#[async_trait]
impl AccountStore for MongoAccountStore {
    async fn get(&self, account_id: &str) -> Result<Option<Account>> {
        let doc = self
            .collection
            .find_one(doc! { "account_id": account_id })
            .await?;
        Ok(doc.map(to_account))
    }

    async fn get_by_identity(&self, email: &str, provider: &str) -> Result<Option<Account>> {
        let doc = self
            .collection
            .find_one(doc! { "email": email, "provider": provider })
            .await?;
        Ok(doc.map(to_account))
    }

    async fn save(&self, account: &Account) -> Result<()> {
        let mut doc = AccountDoc::new(
            account.account_id.clone(),
            account.email.clone(),
            account.name.clone(),
            account.provider.clone(),
            account.avatar_url.clone(),
        );
        doc.earned = account.earned;
        doc.claimed = account.claimed;
        doc.claim_count = account.claim_count as i64;
        doc.chain_address = account.chain_address.clone();
        doc.status = account.status.as_str().to_string();

        self.collection.insert_one(doc).await?;
        Ok(())
    }

    async fn increment_earned(&self, account_id: &str, delta: i64) -> Result<()> {
        let result = self
            .collection
            .update_one(
                doc! { "account_id": account_id },
                doc! {
                    "$inc": { "earned": delta },
                    "$set": { "metadata.updated_at": DateTime::now() },
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(TalentsError::AccountNotFound(account_id.to_string()));
        }
        Ok(())
    }

    async fn set_claimed(&self, account_id: &str, earned_snapshot: i64, claimed: i64) -> Result<()> {
        let result = self
            .collection
            .update_one(
                doc! { "account_id": account_id },
                doc! {
                    "$set": {
                        "earned": earned_snapshot,
                        "claimed": claimed,
                        "metadata.updated_at": DateTime::now(),
                    }
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(TalentsError::AccountNotFound(account_id.to_string()));
        }
        Ok(())
    }

    async fn set_chain_address(&self, account_id: &str, address: &str) -> Result<()> {
        let result = self
            .collection
            .update_one(
                doc! { "account_id": account_id },
                doc! {
                    "$set": {
                        "chain_address": address,
                        "metadata.updated_at": DateTime::now(),
                    }
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(TalentsError::AccountNotFound(account_id.to_string()));
        }
        Ok(())
    }

    async fn set_status(&self, account_id: &str, status: AccountStatus) -> Result<()> {
        let result = self
            .collection
            .update_one(
                doc! { "account_id": account_id },
                doc! {
                    "$set": {
                        "status": status.as_str(),
                        "metadata.updated_at": DateTime::now(),
                    }
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(TalentsError::AccountNotFound(account_id.to_string()));
        }
        Ok(())
    }

    async fn list_reconcilable(&self) -> Result<Vec<Account>> {
        let docs = self
            .collection
            .find_many(doc! {
                "status": "active",
                "chain_address": { "$type": "string", "$ne": "" },
            })
            .await?;
        Ok(docs.into_iter().map(to_account).collect())
    }
}
