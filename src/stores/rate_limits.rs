//! MongoDB-backed expiring counter store
//!
//! Counters live in a TTL-indexed collection. The TTL monitor only sweeps
//! every minute or so, so reads filter on `expires_at` themselves; an
//! expired-but-unswept row must read as absent.

use async_trait::async_trait;
use bson::{doc, DateTime};
use std::time::Duration;

use crate::db::schemas::{RateLimitDoc, RATE_LIMIT_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::stores::RateLimitStore;
use crate::types::{Result, TalentsError};

/// Rate-limit counter store backed by MongoDB
pub struct MongoRateLimitStore {
    collection: MongoCollection<RateLimitDoc>,
}

impl MongoRateLimitStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        let collection = mongo
            .collection::<RateLimitDoc>(RATE_LIMIT_COLLECTION)
            .await?;
        Ok(Self { collection })
    }
}

#[async_trait]
impl RateLimitStore for MongoRateLimitStore {
    async fn get(&self, key: &str) -> Result<Option<i64>> {
        let doc = self
            .collection
            .find_one(doc! {
                "key": key,
                "expires_at": { "$gt": DateTime::now() },
            })
            .await?;
        Ok(doc.map(|d| d.value))
    }

    async fn set_with_expiry(&self, key: &str, value: i64, ttl: Duration) -> Result<()> {
        let expires_at = DateTime::from_millis(
            DateTime::now().timestamp_millis()
                + i64::try_from(ttl.as_millis())
                    .map_err(|_| TalentsError::Internal("TTL out of range".into()))?,
        );

        self.collection
            .upsert_one(
                doc! { "key": key },
                doc! {
                    "$set": {
                        "value": value,
                        "expires_at": expires_at,
                        "metadata.updated_at": DateTime::now(),
                    },
                    "$setOnInsert": {
                        "metadata.created_at": DateTime::now(),
                    },
                },
            )
            .await?;
        Ok(())
    }
}
