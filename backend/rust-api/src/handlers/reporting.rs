use axum::{
    extract::{Extension, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    error::GameError,
    middlewares::auth::JwtClaims,
    models::reporting::LeaderboardQuery,
    services::{reporting_service::ReportingService, AppState},
};

pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, GameError> {
    let service = ReportingService::new(state.store.clone());
    let board = service
        .load_leaderboard(&query, state.config.game.leaderboard_limit)
        .await?;
    Ok(Json(board))
}

pub async fn get_my_stats(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<impl IntoResponse, GameError> {
    let service = ReportingService::new(state.store.clone());
    Ok(Json(service.load_user_stats(&claims.sub).await?))
}
