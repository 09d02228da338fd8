use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Item, User, UserId},
    services::{
        recommendations::{self, RankedItem, RecommendationParams},
        StrategyKind,
    },
    store::StoreStats,
};

use super::AppState;

/// Query string of the recommendations endpoint; absent values fall back to config
#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    pub strategy: Option<String>,
    pub n: Option<usize>,
    pub k: Option<usize>,
    pub min_votes: Option<usize>,
}

impl RecommendQuery {
    fn into_params(self, state: &AppState) -> AppResult<RecommendationParams> {
        let strategy = match self.strategy.as_deref() {
            Some(raw) => raw.parse()?,
            None => StrategyKind::default(),
        };

        Ok(RecommendationParams {
            strategy,
            n: self.n.unwrap_or(state.config.default_n),
            k: self.k.unwrap_or(state.config.neighbors),
            min_votes: self.min_votes.unwrap_or(state.config.min_votes),
        })
    }
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Dataset counters
pub async fn get_stats(State(state): State<AppState>) -> Json<StoreStats> {
    Json(state.store.stats())
}

/// Get a single user
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<User>> {
    state
        .store
        .get_user(user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

/// Get a single item; numeric and textual ids are both accepted
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> AppResult<Json<Item>> {
    state
        .store
        .find_item(&item_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))
}

/// Top-n recommendations for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
    Query(query): Query<RecommendQuery>,
) -> AppResult<Json<Vec<RankedItem>>> {
    let params = query.into_params(&state)?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        strategy = ?params.strategy,
        n = params.n,
        "Processing recommendation request"
    );

    // Scoring is CPU-bound: keep it off the async workers
    let store = state.store.clone();
    let ranked = tokio::task::spawn_blocking(move || {
        recommendations::get_recommendations(&store, user_id, &params)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(ranked))
}
