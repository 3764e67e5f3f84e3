//! API route handlers
//!
//! Explicit request/response structs per operation. Callers see business
//! conditions verbatim; infrastructure failures are reported as a generic
//! internal error with the detail kept in the logs.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::ledger::RegisterRequest;
use crate::server::AppState;
use crate::stores::{Account, ActivityLogEntry};
use crate::types::TalentsError;

impl IntoResponse for TalentsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_business() {
            self.to_string()
        } else {
            error!("request failed: {}", self);
            "Internal error".to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Account fields exposed over the API
#[derive(Serialize)]
pub struct AccountView {
    pub account_id: String,
    pub email: String,
    pub name: String,
    pub provider: String,
    pub avatar_url: String,
    pub earned: i64,
    pub claimed: i64,
    pub claim_count: u64,
    pub chain_address: Option<String>,
    pub status: String,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.account_id,
            email: account.email,
            name: account.name,
            provider: account.provider,
            avatar_url: account.avatar_url,
            earned: account.earned,
            claimed: account.claimed,
            claim_count: account.claim_count,
            chain_address: account.chain_address,
            status: account.status.as_str().to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct PlayRequest {
    pub activity_code: i32,
    pub account: String,
}

#[derive(Serialize)]
pub struct PlayResponse {
    pub activity_code: i32,
    pub activity_name: String,
    pub reward_amount: i64,
}

/// POST /v1/activity
pub async fn play(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlayRequest>,
) -> Result<Json<PlayResponse>, TalentsError> {
    let receipt = state
        .ledger
        .play(request.activity_code, &request.account)
        .await?;
    Ok(Json(PlayResponse {
        activity_code: receipt.activity_code,
        activity_name: receipt.activity_name,
        reward_amount: receipt.reward_amount,
    }))
}

#[derive(Serialize)]
pub struct ActivityView {
    pub activity_code: i32,
    pub activity_name: String,
    pub reward_amount: i64,
    pub daily_limit: i64,
}

#[derive(Serialize)]
pub struct ActivitiesResponse {
    pub data: Vec<ActivityView>,
}

/// GET /v1/activity
pub async fn list_activities(State(state): State<Arc<AppState>>) -> Json<ActivitiesResponse> {
    let data = state
        .ledger
        .activities()
        .await
        .into_iter()
        .map(|a| ActivityView {
            activity_code: a.code,
            activity_name: a.name,
            reward_amount: a.reward_amount,
            daily_limit: a.daily_limit,
        })
        .collect();
    Json(ActivitiesResponse { data })
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub activity_code: i32,
    pub account: String,
}

#[derive(Serialize)]
pub struct LimitResponse {
    pub is_limit: bool,
}

/// GET /v1/activity/limit
pub async fn query_is_limit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<LimitResponse>, TalentsError> {
    let is_limit = state
        .ledger
        .is_limited(query.activity_code, &query.account)
        .await?;
    Ok(Json(LimitResponse { is_limit }))
}

#[derive(Deserialize)]
pub struct LogsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

#[derive(Serialize)]
pub struct ActivityLogView {
    pub account: String,
    pub activity_name: String,
    pub reward_amount: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ActivityLogEntry> for ActivityLogView {
    fn from(entry: ActivityLogEntry) -> Self {
        Self {
            account: entry.account_id,
            activity_name: entry.activity_name,
            reward_amount: entry.reward_amount,
            created_at: entry.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ActivityLogsResponse {
    pub data: Vec<ActivityLogView>,
    pub count: u64,
}

/// GET /v1/activity/log/:account
pub async fn query_activity_logs(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<ActivityLogsResponse>, TalentsError> {
    let (entries, count) = state
        .ledger
        .activity_logs(&account, query.page, query.limit)
        .await?;
    Ok(Json(ActivityLogsResponse {
        data: entries.into_iter().map(Into::into).collect(),
        count,
    }))
}

#[derive(Deserialize)]
pub struct RegisterBody {
    pub account_id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// POST /v1/account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<AccountView>, TalentsError> {
    let account = state
        .ledger
        .register(RegisterRequest {
            account_id: body.account_id.filter(|id| !id.is_empty()),
            email: body.email,
            name: body.name,
            provider: body.provider,
            avatar_url: body.avatar_url,
        })
        .await?;
    Ok(Json(account.into()))
}

/// GET /v1/account/:id
pub async fn query_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AccountView>, TalentsError> {
    let account = state.ledger.account(&id).await?;
    Ok(Json(account.into()))
}

#[derive(Deserialize)]
pub struct ClaimRequest {
    pub account_id: String,
    pub points: i64,
    /// When false this is a preview: the token is returned but nothing is
    /// persisted
    #[serde(default)]
    pub is_ok: bool,
}

#[derive(Serialize)]
pub struct ClaimResponse {
    pub token: String,
}

/// POST /v1/account/claim_points
pub async fn claim_points(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<ClaimResponse>, TalentsError> {
    let token = state
        .ledger
        .claim(&request.account_id, request.points, request.is_ok)
        .await?;
    Ok(Json(ClaimResponse { token }))
}

#[derive(Deserialize)]
pub struct SaveAddressRequest {
    pub addr: String,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub msg: &'static str,
}

/// POST /v1/account/:id/save_points_addr
pub async fn save_points_addr(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SaveAddressRequest>,
) -> Result<Json<OkResponse>, TalentsError> {
    state.ledger.set_chain_address(&id, &request.addr).await?;
    Ok(Json(OkResponse { msg: "ok" }))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
