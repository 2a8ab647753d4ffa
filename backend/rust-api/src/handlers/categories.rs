use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::{
    error::GameError,
    services::{category_service::CategoryService, AppState},
};

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, GameError> {
    let service = CategoryService::new(state.store.clone());
    Ok(Json(service.list_playable().await?))
}
