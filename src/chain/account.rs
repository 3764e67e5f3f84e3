//! On-chain points account layout
//!
//! The chain program stores one points account per holder with a fixed
//! 112-byte layout:
//!
//! | offset | size | field          |
//! |--------|------|----------------|
//! | 0      | 32   | authority key  |
//! | 32     | 8    | points (u64 LE)|
//! | 40     | 64   | last signature |
//! | 104    | 8    | claim count (u64 LE) |

use crate::types::{Result, TalentsError};

/// Serialized size of a points account
pub const CHAIN_ACCOUNT_LEN: usize = 112;

/// Decoded on-chain points account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPointsAccount {
    /// Holder's on-chain public key
    pub authority: [u8; 32],
    /// Points the chain program has honored for withdrawal
    pub points: u64,
    /// Signature presented with the most recent on-chain claim
    pub last_signature: [u8; 64],
    /// Claim counter as recorded on chain
    pub claim_count: u64,
}

impl ChainPointsAccount {
    /// Decode from raw account data. Trailing bytes beyond the fixed layout
    /// are ignored.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < CHAIN_ACCOUNT_LEN {
            return Err(TalentsError::Chain(format!(
                "points account data too short: {} bytes, need {}",
                data.len(),
                CHAIN_ACCOUNT_LEN
            )));
        }

        let mut authority = [0u8; 32];
        authority.copy_from_slice(&data[0..32]);

        let points = u64::from_le_bytes(data[32..40].try_into().expect("8-byte slice"));

        let mut last_signature = [0u8; 64];
        last_signature.copy_from_slice(&data[40..104]);

        let claim_count = u64::from_le_bytes(data[104..112].try_into().expect("8-byte slice"));

        Ok(Self {
            authority,
            points,
            last_signature,
            claim_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(account: &ChainPointsAccount) -> Vec<u8> {
        let mut data = Vec::with_capacity(CHAIN_ACCOUNT_LEN);
        data.extend_from_slice(&account.authority);
        data.extend_from_slice(&account.points.to_le_bytes());
        data.extend_from_slice(&account.last_signature);
        data.extend_from_slice(&account.claim_count.to_le_bytes());
        data
    }

    #[test]
    fn test_decode_fixed_layout() {
        let original = ChainPointsAccount {
            authority: [7u8; 32],
            points: 20,
            last_signature: [9u8; 64],
            claim_count: 3,
        };

        let decoded = ChainPointsAccount::decode(&encode(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let original = ChainPointsAccount {
            authority: [1u8; 32],
            points: u64::MAX,
            last_signature: [0u8; 64],
            claim_count: 0,
        };

        let mut data = encode(&original);
        data.extend_from_slice(&[0xFF; 16]);

        assert_eq!(ChainPointsAccount::decode(&data).unwrap(), original);
    }

    #[test]
    fn test_decode_short_buffer_is_an_error() {
        let err = ChainPointsAccount::decode(&[0u8; 64]).unwrap_err();
        assert!(matches!(err, TalentsError::Chain(_)));
    }
}
