//! Account document schema
//!
//! One row per account: profile fields from authentication, the points
//! accumulators, and the reconciliation status flag.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for accounts
pub const ACCOUNT_COLLECTION: &str = "accounts";

/// Account document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AccountDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Account identifier (immutable once created)
    pub account_id: String,

    /// Email address from the identity provider (may be empty)
    #[serde(default)]
    pub email: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Identity provider the account authenticated with
    #[serde(default)]
    pub provider: String,

    /// Avatar URL from the identity provider
    #[serde(default)]
    pub avatar_url: String,

    /// Cumulative points ever credited
    #[serde(default)]
    pub earned: i64,

    /// Cumulative points authorized for withdrawal; `claimed <= earned` always
    #[serde(default)]
    pub claimed: i64,

    /// Claim counter included in signed claim tokens
    #[serde(default)]
    pub claim_count: i64,

    /// On-chain points account address; presence gates reconciliation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_address: Option<String>,

    /// "active" or "quarantined"; quarantine is terminal
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_string()
}

impl AccountDoc {
    /// Create a new active account document
    pub fn new(account_id: String, email: String, name: String, provider: String, avatar_url: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            account_id,
            email,
            name,
            provider,
            avatar_url,
            earned: 0,
            claimed: 0,
            claim_count: 0,
            chain_address: None,
            status: default_status(),
        }
    }
}

impl IntoIndexes for AccountDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Unique index on account_id
            (
                doc! { "account_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("account_id_unique".to_string())
                        .build(),
                ),
            ),
            // Compound index for identity-provider lookups
            (
                doc! { "email": 1, "provider": 1 },
                Some(
                    IndexOptions::builder()
                        .name("identity_index".to_string())
                        .build(),
                ),
            ),
            // Reconciliation scans filter on status + chain_address
            (
                doc! { "status": 1, "chain_address": 1 },
                Some(
                    IndexOptions::builder()
                        .name("reconcile_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for AccountDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
