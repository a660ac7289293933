use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::models::{Artist, Favorites, Playlist, Song, SongRef};

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: String,
}

impl From<ObjectId> for CreatedResponse {
    fn from(id: ObjectId) -> Self {
        Self {
            success: true,
            id: id.to_hex(),
        }
    }
}

/// Artist as returned over the wire, `_id` as a 24-character hex string.
#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub songs: Vec<Option<Song>>,
}

impl From<Artist> for ArtistResponse {
    fn from(artist: Artist) -> Self {
        Self {
            id: artist.id.to_hex(),
            name: artist.name,
            songs: artist.songs,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub songs: Vec<Option<SongRef>>,
}

impl From<Playlist> for PlaylistResponse {
    fn from(playlist: Playlist) -> Self {
        Self {
            id: playlist.id.to_hex(),
            name: playlist.name,
            description: playlist.description,
            songs: playlist.songs,
        }
    }
}

/// Favorites document, or just `{"songs": []}` when none has been created.
#[derive(Debug, Default, Serialize)]
pub struct FavoritesResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub songs: Vec<SongRef>,
}

impl From<Option<Favorites>> for FavoritesResponse {
    fn from(favorites: Option<Favorites>) -> Self {
        match favorites {
            Some(favorites) => Self {
                id: Some(favorites.id.to_hex()),
                kind: Some(favorites.kind),
                songs: favorites.songs,
            },
            None => Self::default(),
        }
    }
}
