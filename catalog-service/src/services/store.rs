//! The document store seam.
//!
//! Handlers talk to the store only through [`CatalogStore`], so the MongoDB
//! implementation and the in-process one are interchangeable. Each method is a
//! single, independently visible write or read; multi-step protocols are
//! composed in [`super::mutations`].

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::error::ErrorKind;
use thiserror::Error;

use crate::models::{Artist, Favorites, Playlist, Song, SongRef};

/// Substring the store puts in credential failures.
pub const AUTH_FAILURE_MARKER: &str = "Authentication failed";

/// Failure reported by a store. `Display` is the underlying message verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] mongodb::error::Error),

    #[error("{0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_auth_failure(&self) -> bool {
        if let StoreError::Database(err) = self {
            if matches!(*err.kind, ErrorKind::Authentication { .. }) {
                return true;
            }
        }
        self.to_string().contains(AUTH_FAILURE_MARKER)
    }
}

/// Collection owning an embedded, positionally addressed `songs` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SongOwner {
    Artist,
    Playlist,
}

impl SongOwner {
    pub fn collection(&self) -> &'static str {
        match self {
            SongOwner::Artist => "artists",
            SongOwner::Playlist => "playlists",
        }
    }
}

/// Store operations, used as log/metric labels and for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Ping,
    ListArtists,
    FindArtist,
    InsertArtist,
    DeleteArtist,
    PushArtistSong,
    ListPlaylists,
    FindPlaylist,
    InsertPlaylist,
    DeletePlaylist,
    PushPlaylistSong,
    UnsetSongSlot,
    CompactSongs,
    FindFavorites,
    EnsureFavorites,
    PushFavorite,
    PullFavorite,
}

impl StoreOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOp::Ping => "ping",
            StoreOp::ListArtists => "list_artists",
            StoreOp::FindArtist => "find_artist",
            StoreOp::InsertArtist => "insert_artist",
            StoreOp::DeleteArtist => "delete_artist",
            StoreOp::PushArtistSong => "push_artist_song",
            StoreOp::ListPlaylists => "list_playlists",
            StoreOp::FindPlaylist => "find_playlist",
            StoreOp::InsertPlaylist => "insert_playlist",
            StoreOp::DeletePlaylist => "delete_playlist",
            StoreOp::PushPlaylistSong => "push_playlist_song",
            StoreOp::UnsetSongSlot => "unset_song_slot",
            StoreOp::CompactSongs => "compact_songs",
            StoreOp::FindFavorites => "find_favorites",
            StoreOp::EnsureFavorites => "ensure_favorites",
            StoreOp::PushFavorite => "push_favorite",
            StoreOp::PullFavorite => "pull_favorite",
        }
    }
}

/// Counts reported by a pull from the favorites document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullOutcome {
    /// Favorites documents matched (0 or 1).
    pub matched: u64,
    /// Documents changed; 0 when nothing matched the composite key.
    pub modified: u64,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Administrative round trip used by health checks.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn list_artists(&self) -> Result<Vec<Artist>, StoreError>;
    async fn find_artist(&self, id: ObjectId) -> Result<Option<Artist>, StoreError>;
    /// Inserts `{name, songs: []}` and returns the generated id.
    async fn insert_artist(&self, name: &str) -> Result<ObjectId, StoreError>;
    /// Returns `false` when no artist had this id.
    async fn delete_artist(&self, id: ObjectId) -> Result<bool, StoreError>;
    /// Appends to the artist's songs. Returns `false` when no artist matched.
    async fn push_artist_song(&self, id: ObjectId, song: &Song) -> Result<bool, StoreError>;

    async fn list_playlists(&self) -> Result<Vec<Playlist>, StoreError>;
    async fn find_playlist(&self, id: ObjectId) -> Result<Option<Playlist>, StoreError>;
    async fn insert_playlist(&self, name: &str, description: &str)
        -> Result<ObjectId, StoreError>;
    async fn delete_playlist(&self, id: ObjectId) -> Result<bool, StoreError>;
    async fn push_playlist_song(&self, id: ObjectId, song: &SongRef) -> Result<bool, StoreError>;

    /// Replaces the slot at `index` with the null sentinel. Out-of-range
    /// indexes and missing documents are no-ops.
    async fn unset_song_slot(
        &self,
        owner: SongOwner,
        id: ObjectId,
        index: usize,
    ) -> Result<(), StoreError>;
    /// Removes every null sentinel from the owner's `songs` array.
    async fn compact_songs(&self, owner: SongOwner, id: ObjectId) -> Result<(), StoreError>;

    async fn find_favorites(&self) -> Result<Option<Favorites>, StoreError>;
    /// Creates the favorites document with empty songs if none exists.
    async fn ensure_favorites(&self) -> Result<(), StoreError>;
    /// Appends `song` unless an entry with the same `(artist_id, title)` is
    /// already present. Returns whether the song was added.
    async fn push_favorite_if_absent(&self, song: &SongRef) -> Result<bool, StoreError>;
    /// Removes every entry matching `(artist_id, title)`.
    async fn pull_favorite(&self, artist_id: &str, title: &str)
        -> Result<PullOutcome, StoreError>;
}
