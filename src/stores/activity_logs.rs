//! MongoDB-backed activity log store

use async_trait::async_trait;
use bson::doc;
use chrono::Utc;

use crate::db::schemas::{ActivityLogDoc, Metadata, ACTIVITY_LOG_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::stores::{ActivityLogEntry, ActivityLogStore};
use crate::types::Result;

/// Activity log store backed by MongoDB
pub struct MongoActivityLogStore {
    collection: MongoCollection<ActivityLogDoc>,
}

impl MongoActivityLogStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        let collection = mongo
            .collection::<ActivityLogDoc>(ACTIVITY_LOG_COLLECTION)
            .await?;
        Ok(Self { collection })
    }
}

fn to_entry(doc: ActivityLogDoc) -> ActivityLogEntry {
    ActivityLogEntry {
        account_id: doc.account_id,
        activity_code: doc.activity_code,
        activity_name: doc.activity_name,
        reward_amount: doc.reward_amount,
        created_at: doc
            .metadata
            .created_at
            .map(|d| d.to_chrono())
            .unwrap_or_else(Utc::now),
    }
}

#[async_trait]
impl ActivityLogStore for MongoActivityLogStore {
    async fn append(&self, entry: &ActivityLogEntry) -> Result<()> {
        let doc = ActivityLogDoc {
            _id: None,
            metadata: Metadata::new(),
            account_id: entry.account_id.clone(),
            activity_code: entry.activity_code,
            activity_name: entry.activity_name.clone(),
            reward_amount: entry.reward_amount,
        };
        self.collection.insert_one(doc).await?;
        Ok(())
    }

    async fn query(
        &self,
        account_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<ActivityLogEntry>, u64)> {
        let page = page.max(1);
        let filter = doc! { "account_id": account_id };

        let docs = self
            .collection
            .find_page(
                filter.clone(),
                doc! { "metadata.created_at": -1 },
                (page - 1) * page_size,
                page_size as i64,
            )
            .await?;
        let total = self.collection.count(filter).await?;

        Ok((docs.into_iter().map(to_entry).collect(), total))
    }
}
