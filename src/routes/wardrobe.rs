use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{ClothingItem, NewClothingItem},
    routes::AppState,
};

pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<ClothingItem>>> {
    let items = state.store.list_items(user_id).await?;
    Ok(Json(items))
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<NewClothingItem>,
) -> AppResult<(StatusCode, Json<ClothingItem>)> {
    let item = request.into_item(user_id);
    state.store.insert_item(&item).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        item_id = %item.id,
        category = %item.category,
        style = %item.style,
        "Added clothing item"
    );

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ClothingItem>> {
    state
        .store
        .get_item(user_id, item_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Clothing item {} not found", item_id)))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    if !state.store.delete_item(user_id, item_id).await? {
        return Err(AppError::NotFound(format!(
            "Clothing item {} not found",
            item_id
        )));
    }

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        item_id = %item_id,
        "Deleted clothing item"
    );

    Ok(StatusCode::NO_CONTENT)
}
