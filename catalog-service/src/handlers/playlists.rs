use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

use super::{
    index_out_of_range, parse_object_id, parse_song_index, rejected, store_failed, JsonBody,
};
use crate::dtos::{
    CheckedRequest, CreatePlaylistRequest, CreatedResponse, PlaylistResponse, SongRefRequest,
    SuccessResponse,
};
use crate::services::{mutations, SongOwner, StoreOp};
use crate::startup::AppState;

fn playlist_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Playlist not found"))
}

pub async fn list_playlists(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlaylistResponse>>, AppError> {
    let playlists = state
        .store
        .list_playlists()
        .await
        .map_err(store_failed(StoreOp::ListPlaylists.as_str()))?;

    Ok(Json(
        playlists.into_iter().map(PlaylistResponse::from).collect(),
    ))
}

pub async fn create_playlist(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreatePlaylistRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    request.check()?;

    let id = state
        .store
        .insert_playlist(&request.name, &request.description)
        .await
        .map_err(store_failed(StoreOp::InsertPlaylist.as_str()))
        .map_err(rejected)?;

    tracing::info!(playlist_id = %id, "Playlist created");
    Ok(Json(CreatedResponse::from(id)))
}

pub async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<Json<PlaylistResponse>, AppError> {
    let id = parse_object_id(&playlist_id, "playlist")?;

    let playlist = state
        .store
        .find_playlist(id)
        .await
        .map_err(store_failed(StoreOp::FindPlaylist.as_str()))?
        .ok_or_else(playlist_not_found)?;

    Ok(Json(PlaylistResponse::from(playlist)))
}

pub async fn delete_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_object_id(&playlist_id, "playlist")?;

    let deleted = state
        .store
        .delete_playlist(id)
        .await
        .map_err(store_failed(StoreOp::DeletePlaylist.as_str()))?;
    if !deleted {
        return Err(playlist_not_found());
    }

    tracing::info!(playlist_id = %id, "Playlist deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// Appends a song snapshot. The artist fields are copied as given and are not
/// checked against the artists collection.
pub async fn add_song(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    JsonBody(request): JsonBody<SongRefRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    request.check()?;
    let id = parse_object_id(&playlist_id, "playlist")?;

    let matched = state
        .store
        .push_playlist_song(id, &request.into())
        .await
        .map_err(store_failed(StoreOp::PushPlaylistSong.as_str()))?;
    if !matched {
        return Err(playlist_not_found());
    }

    tracing::info!(playlist_id = %id, "Song added to playlist");
    Ok(Json(SuccessResponse::ok()))
}

pub async fn delete_song(
    State(state): State<AppState>,
    Path((playlist_id, index)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, AppError> {
    let index = parse_song_index(&index)?;
    let id = parse_object_id(&playlist_id, "playlist")?;

    let playlist = state
        .store
        .find_playlist(id)
        .await
        .map_err(store_failed(StoreOp::FindPlaylist.as_str()))?
        .ok_or_else(playlist_not_found)?;
    if index >= playlist.songs.len() {
        return Err(index_out_of_range());
    }

    mutations::remove_song_at(state.store.as_ref(), SongOwner::Playlist, id, index)
        .await
        .map_err(store_failed("remove_playlist_song"))?;

    tracing::info!(playlist_id = %id, index, "Song removed from playlist");
    Ok(Json(SuccessResponse::ok()))
}
