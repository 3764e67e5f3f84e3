//! Claim authorization
//!
//! Key custody plus the signing/verification protocol for claim tokens.

mod authorizer;
pub mod keys;

pub use authorizer::ClaimAuthorizer;
pub use keys::{generate_keypair, load_signing_key};
