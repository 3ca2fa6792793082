use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{FeedbackEvent, PreferenceProfile, Reaction},
    routes::AppState,
    services::preferences,
};

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub outfit_id: Uuid,
    #[serde(alias = "feedback")]
    pub reaction: Reaction,
}

/// Records a like or dislike for one of the user's outfits
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<FeedbackRequest>,
) -> AppResult<(StatusCode, Json<FeedbackEvent>)> {
    let outfit = state
        .store
        .get_outfit(user_id, request.outfit_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Outfit {} not found", request.outfit_id)))?;

    let event = FeedbackEvent::new(user_id, outfit.id, request.reaction);
    let signal = preferences::record_feedback(&outfit, request.reaction);
    state.store.insert_feedback(&event, &signal).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        outfit_id = %outfit.id,
        reaction = %request.reaction,
        reward = signal.reward,
        "Feedback recorded"
    );

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<PreferenceProfile>> {
    let profile = preferences::aggregate(state.store.as_ref(), user_id).await?;
    Ok(Json(profile))
}
