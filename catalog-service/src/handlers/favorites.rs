//! The shared favorites list. There is no id in the routes: the one favorites
//! document is found by its `type` discriminator.

use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

use super::{rejected, store_failed, JsonBody};
use crate::dtos::{CheckedRequest, FavoritesResponse, SongRefRequest, SuccessResponse};
use crate::models::SongRef;
use crate::services::{mutations, record_favorite_added, StoreOp};
use crate::startup::AppState;

/// Returns the favorites document, or `{"songs": []}` if it was never created.
/// Reading never creates it.
pub async fn get_favorites(
    State(state): State<AppState>,
) -> Result<Json<FavoritesResponse>, AppError> {
    let favorites = state
        .store
        .find_favorites()
        .await
        .map_err(store_failed(StoreOp::FindFavorites.as_str()))?;

    Ok(Json(FavoritesResponse::from(favorites)))
}

/// Adds a favorite unless one with the same `(artist_id, title)` exists.
/// A duplicate still reports success.
pub async fn add_favorite(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SongRefRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    request.check()?;
    let song = SongRef::from(request);

    let added = mutations::add_favorite(state.store.as_ref(), &song)
        .await
        .map_err(store_failed("add_favorite"))
        .map_err(rejected)?;

    record_favorite_added(!added);
    if added {
        tracing::info!(artist_id = %song.artist_id, title = %song.title, "Favorite added");
    } else {
        tracing::info!(
            artist_id = %song.artist_id,
            title = %song.title,
            "Favorite already present"
        );
    }

    Ok(Json(SuccessResponse::ok()))
}

/// Removes favorites matching `(artist_id, title)`. The title is the rest of
/// the path and may contain `/`; it is compared verbatim.
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((artist_id, title)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, AppError> {
    let outcome = state
        .store
        .pull_favorite(&artist_id, &title)
        .await
        .map_err(store_failed(StoreOp::PullFavorite.as_str()))?;

    if outcome.matched == 0 || outcome.modified == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Favorites not found")));
    }

    tracing::info!(artist_id = %artist_id, title = %title, "Favorite removed");
    Ok(Json(SuccessResponse::ok()))
}
