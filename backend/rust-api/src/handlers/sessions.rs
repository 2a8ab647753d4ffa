use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    error::GameError,
    extractors::AppJson,
    middlewares::auth::JwtClaims,
    models::{answer::SubmitAnswerRequest, lifeline::Lifeline, StartSessionRequest},
    services::{
        answer_service::AnswerService, lifeline_service::LifelineService,
        session_service::SessionService, AppState,
    },
};

pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    AppJson(req): AppJson<StartSessionRequest>,
) -> Result<impl IntoResponse, GameError> {
    tracing::info!(
        "Starting session for user_id={}, category_id={}",
        claims.sub,
        req.category_id
    );

    let service = SessionService::new(state.store.clone(), state.config.game.clone());
    let response = service.start(&claims.sub, &req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let service = SessionService::new(state.store.clone(), state.config.game.clone());
    let view = service.get(&claims.sub, &session_id).await?;
    Ok(Json(view))
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(session_id): Path<String>,
    AppJson(req): AppJson<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, GameError> {
    tracing::info!("Submitting answer for session: {}", session_id);

    let service = AnswerService::new(state.store.clone(), state.config.game.clone());
    let response = service.submit_answer(&claims.sub, &session_id, &req).await?;
    Ok(Json(response))
}

pub async fn use_lifeline(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path((session_id, lifeline)): Path<(String, Lifeline)>,
) -> Result<impl IntoResponse, GameError> {
    tracing::info!(
        "Using lifeline {} for session: {}",
        lifeline.as_str(),
        session_id
    );

    let service = LifelineService::new(state.store.clone(), state.config.game.clone());
    let response = service
        .use_lifeline(&claims.sub, &session_id, lifeline)
        .await?;
    Ok(Json(response))
}

pub async fn complete_session(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    tracing::info!("Completing session: {}", session_id);

    let service = SessionService::new(state.store.clone(), state.config.game.clone());
    let summary = service.complete(&claims.sub, &session_id).await?;
    Ok(Json(summary))
}
