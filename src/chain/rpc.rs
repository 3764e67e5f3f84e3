//! Chain JSON-RPC client
//!
//! Fetches raw account data over the chain's JSON-RPC interface. The client
//! carries its own request timeout; a hung endpoint stalls only the caller's
//! task.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::types::{Result, TalentsError};

/// Contract for fetching on-chain account blobs
#[async_trait]
pub trait ChainRpcClient: Send + Sync {
    /// Raw account data for `address`, already base64-decoded
    async fn fetch_account_blob(&self, address: &str) -> Result<Vec<u8>>;
}

/// HTTP JSON-RPC implementation
pub struct HttpChainRpc {
    http: reqwest::Client,
    url: String,
}

impl HttpChainRpc {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TalentsError::Chain(format!("Failed to build RPC client: {}", e)))?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<RpcResult>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcResult {
    value: Option<AccountValue>,
}

#[derive(Deserialize)]
struct AccountValue {
    /// (payload, encoding) pair
    data: (String, String),
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[async_trait]
impl ChainRpcClient for HttpChainRpc {
    async fn fetch_account_blob(&self, address: &str) -> Result<Vec<u8>> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getAccountInfo",
            "params": [address, { "encoding": "base64" }],
        });

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| TalentsError::Chain(format!("getAccountInfo({}): {}", address, e)))?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(TalentsError::Chain(format!(
                "getAccountInfo({}): rpc error {}: {}",
                address, error.code, error.message
            )));
        }

        let value = response
            .result
            .and_then(|r| r.value)
            .ok_or_else(|| TalentsError::Chain(format!("no account on chain for {}", address)))?;

        if value.data.1 != "base64" {
            return Err(TalentsError::Chain(format!(
                "unexpected account encoding '{}' for {}",
                value.data.1, address
            )));
        }

        BASE64
            .decode(&value.data.0)
            .map_err(|e| TalentsError::Chain(format!("bad account data for {}: {}", address, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "context": { "slot": 1 },
                "value": {
                    "data": ["AQID", "base64"],
                    "lamports": 1000,
                    "owner": "11111111111111111111111111111111"
                }
            }
        }"#;

        let response: RpcResponse = serde_json::from_str(body).unwrap();
        let value = response.result.unwrap().value.unwrap();
        assert_eq!(value.data.0, "AQID");
        assert_eq!(value.data.1, "base64");
    }

    #[test]
    fn test_missing_account_parses_as_null_value() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":1},"value":null}}"#;
        let response: RpcResponse = serde_json::from_str(body).unwrap();
        assert!(response.result.unwrap().value.is_none());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_rpc_error_parses() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Invalid param"}}"#;
        let response: RpcResponse = serde_json::from_str(body).unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Invalid param");
    }
}
