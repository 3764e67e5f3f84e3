//! Chain integration
//!
//! RPC access to the chain program's points accounts and the reconciler
//! that cross-checks them against the ledger.

pub mod account;
pub mod rpc;
mod reconciler;

pub use account::{ChainPointsAccount, CHAIN_ACCOUNT_LEN};
pub use reconciler::{spawn_reconcile_task, ReconcileOutcome, Reconciler};
pub use rpc::{ChainRpcClient, HttpChainRpc};
