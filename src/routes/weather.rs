use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{models::CurrentWeather, routes::AppState};

pub async fn current(State(state): State<Arc<AppState>>) -> Json<CurrentWeather> {
    Json(state.weather.current().await)
}
