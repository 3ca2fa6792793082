use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Outfit, OutfitDetails, SavedOutfit, WeatherReading},
    routes::AppState,
    services::preferences,
};

#[derive(Debug, Deserialize)]
pub struct GenerateOutfitRequest {
    pub occasion: String,
    /// Falls back to the current reading from the weather service
    #[serde(default)]
    pub weather: Option<WeatherReading>,
}

#[derive(Debug, Deserialize)]
pub struct SaveOutfitRequest {
    pub outfit_id: Uuid,
}

/// Generates, persists and returns a new outfit for the user
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<GenerateOutfitRequest>,
) -> AppResult<(StatusCode, Json<OutfitDetails>)> {
    let occasion = request.occasion.trim().to_lowercase();
    if occasion.is_empty() {
        return Err(AppError::InvalidInput("Occasion is required".to_string()));
    }

    // Client-supplied weather wins over the live lookup
    let weather = match request.weather {
        Some(weather) => weather,
        None => WeatherReading::from(&state.weather.current().await),
    };

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        occasion = %occasion,
        temperature = weather.temperature,
        condition = %weather.condition,
        "Generating outfit"
    );

    // Preferences are rebuilt from feedback on every request
    let wardrobe = state.store.list_items(user_id).await?;
    let profile = preferences::aggregate(state.store.as_ref(), user_id).await?;

    let mut rng = StdRng::from_entropy();
    let recommendation = state
        .recommender
        .generate_outfit(&wardrobe, &occasion, &weather, Some(&profile), &mut rng)
        .await?;

    // Persist before responding so the outfit id is valid for feedback
    let outfit = Outfit::from_recommendation(user_id, &recommendation, &occasion, &weather);
    state.store.insert_outfit(&outfit).await?;

    tracing::info!(
        request_id = %request_id,
        outfit_id = %outfit.id,
        top_id = ?outfit.top_item_id,
        bottom_id = ?outfit.bottom_item_id,
        "Outfit generated"
    );

    let selection = recommendation.selection;
    let details = OutfitDetails::new(
        outfit,
        selection.top().cloned(),
        selection.bottom().cloned(),
    );

    Ok((StatusCode::CREATED, Json(details)))
}

pub async fn get_outfit(
    State(state): State<Arc<AppState>>,
    Path((user_id, outfit_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<OutfitDetails>> {
    state
        .store
        .get_outfit(user_id, outfit_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Outfit {} not found", outfit_id)))
}

/// Adds an outfit to the user's saved list; saving again is a no-op
pub async fn save(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SaveOutfitRequest>,
) -> AppResult<Json<OutfitDetails>> {
    let outfit = state
        .store
        .get_outfit(user_id, request.outfit_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Outfit {} not found", request.outfit_id)))?;

    state.store.save_outfit(user_id, outfit.id).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        outfit_id = %outfit.id,
        "Outfit saved"
    );

    Ok(Json(outfit))
}

pub async fn list_saved(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<SavedOutfit>>> {
    let saved = state.store.list_saved(user_id).await?;
    Ok(Json(saved))
}
