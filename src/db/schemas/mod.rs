//! Database schemas for Talents
//!
//! Defines MongoDB document structures for accounts, activities, activity
//! logs, and rate-limit counters.

mod account;
mod activity;
mod activity_log;
mod metadata;
mod rate_limit;

pub use account::{AccountDoc, ACCOUNT_COLLECTION};
pub use activity::{ActivityDoc, ACTIVITY_COLLECTION};
pub use activity_log::{ActivityLogDoc, ACTIVITY_LOG_COLLECTION};
pub use metadata::Metadata;
pub use rate_limit::{RateLimitDoc, RATE_LIMIT_COLLECTION};
