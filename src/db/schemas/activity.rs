//! Activity definition document schema
//!
//! The catalog of playable activities. Rows are managed out-of-band; this
//! service only reads them into the in-memory catalog snapshot.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for activity definitions
pub const ACTIVITY_COLLECTION: &str = "activities";

/// Activity definition document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ActivityDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Unique activity code
    pub code: i32,

    /// Human-readable activity name
    pub name: String,

    /// Points credited per successful play
    pub reward_amount: i64,

    /// Maximum plays per rate-limit window
    pub daily_limit: i64,
}

impl IntoIndexes for ActivityDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "code": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("code_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ActivityDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
