//! Rate-limit counter document schema
//!
//! Expiring key-value counters. MongoDB's TTL monitor removes expired rows
//! on a coarse schedule, so reads must additionally filter on `expires_at`.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for rate-limit counters
pub const RATE_LIMIT_COLLECTION: &str = "rate_limits";

/// Expiring counter stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RateLimitDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Counter key, one per (activity, account) pair
    pub key: String,

    /// Play count in the current window
    pub value: i64,

    /// Absolute expiry; refreshed to `now + window` on every write
    pub expires_at: bson::DateTime,
}

impl IntoIndexes for RateLimitDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "key": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("key_unique".to_string())
                        .build(),
                ),
            ),
            // TTL index; expireAfterSeconds=0 means "expire at expires_at"
            (
                doc! { "expires_at": 1 },
                Some(
                    IndexOptions::builder()
                        .expire_after(std::time::Duration::from_secs(0))
                        .name("expires_at_ttl".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for RateLimitDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
