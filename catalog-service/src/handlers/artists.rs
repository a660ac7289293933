use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

use super::{
    index_out_of_range, parse_object_id, parse_song_index, rejected, store_failed, JsonBody,
};
use crate::dtos::{
    AddSongRequest, ArtistResponse, CheckedRequest, CreateArtistRequest, CreatedResponse,
    SuccessResponse,
};
use crate::services::{mutations, SongOwner, StoreOp};
use crate::startup::AppState;

fn artist_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Artist not found"))
}

pub async fn list_artists(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArtistResponse>>, AppError> {
    let artists = state
        .store
        .list_artists()
        .await
        .map_err(store_failed(StoreOp::ListArtists.as_str()))?;

    Ok(Json(artists.into_iter().map(ArtistResponse::from).collect()))
}

pub async fn create_artist(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateArtistRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    request.check()?;

    let id = state
        .store
        .insert_artist(&request.name)
        .await
        .map_err(store_failed(StoreOp::InsertArtist.as_str()))
        .map_err(rejected)?;

    tracing::info!(artist_id = %id, "Artist created");
    Ok(Json(CreatedResponse::from(id)))
}

pub async fn delete_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_object_id(&artist_id, "artist")?;

    let deleted = state
        .store
        .delete_artist(id)
        .await
        .map_err(store_failed(StoreOp::DeleteArtist.as_str()))?;
    if !deleted {
        return Err(artist_not_found());
    }

    tracing::info!(artist_id = %id, "Artist deleted");
    Ok(Json(SuccessResponse::ok()))
}

pub async fn add_song(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    JsonBody(request): JsonBody<AddSongRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    request.check()?;
    let id = parse_object_id(&artist_id, "artist")?;

    let matched = state
        .store
        .push_artist_song(id, &request.into())
        .await
        .map_err(store_failed(StoreOp::PushArtistSong.as_str()))?;
    if !matched {
        return Err(artist_not_found());
    }

    tracing::info!(artist_id = %id, "Song added to artist");
    Ok(Json(SuccessResponse::ok()))
}

/// Removes the song at `index`. The index is only meaningful against the
/// artist as just read; see [`mutations::remove_song_at`].
pub async fn delete_song(
    State(state): State<AppState>,
    Path((artist_id, index)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, AppError> {
    let index = parse_song_index(&index)?;
    let id = parse_object_id(&artist_id, "artist")?;

    let artist = state
        .store
        .find_artist(id)
        .await
        .map_err(store_failed(StoreOp::FindArtist.as_str()))?
        .ok_or_else(artist_not_found)?;
    if index >= artist.songs.len() {
        return Err(index_out_of_range());
    }

    mutations::remove_song_at(state.store.as_ref(), SongOwner::Artist, id, index)
        .await
        .map_err(store_failed("remove_artist_song"))?;

    tracing::info!(artist_id = %id, index, "Song removed from artist");
    Ok(Json(SuccessResponse::ok()))
}
