//! Activity log document schema
//!
//! Append-only record of every successful play.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for activity logs
pub const ACTIVITY_LOG_COLLECTION: &str = "activity_logs";

/// Activity log entry stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ActivityLogDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Account the play was credited to
    pub account_id: String,

    /// Activity code at play time
    pub activity_code: i32,

    /// Activity name at play time (denormalized; catalog rows may change)
    pub activity_name: String,

    /// Points credited by this play
    pub reward_amount: i64,
}

impl IntoIndexes for ActivityLogDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "account_id": 1, "metadata.created_at": -1 },
            Some(
                IndexOptions::builder()
                    .name("account_history_index".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ActivityLogDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
