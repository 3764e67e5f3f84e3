//! MongoDB-backed activity catalog source

use async_trait::async_trait;
use bson::doc;

use crate::db::schemas::{ActivityDoc, ACTIVITY_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::stores::{ActivityDefinition, ActivityStore};
use crate::types::Result;

/// Activity store backed by MongoDB
pub struct MongoActivityStore {
    collection: MongoCollection<ActivityDoc>,
}

impl MongoActivityStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        let collection = mongo.collection::<ActivityDoc>(ACTIVITY_COLLECTION).await?;
        Ok(Self { collection })
    }
}

#[async_trait]
impl ActivityStore for MongoActivityStore {
    async fn list_all(&self) -> Result<Vec<ActivityDefinition>> {
        let docs = self.collection.find_many(doc! {}).await?;
        Ok(docs
            .into_iter()
            .map(|d| ActivityDefinition {
                code: d.code,
                name: d.name,
                reward_amount: d.reward_amount,
                daily_limit: d.daily_limit,
            })
            .collect())
    }
}
