use serde::{Deserialize, Serialize};

/// Denormalized snapshot of a song, as stored in playlists and favorites.
///
/// `artist_id` and `artist_name` are copied at insert time; later edits to the
/// artist are not reflected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRef {
    pub artist_id: String,
    pub artist_name: String,
    pub title: String,
    pub duration: String,
}

impl SongRef {
    /// Favorites treat two refs as the same song when artist id and title
    /// match, whatever the duration or artist name.
    pub fn same_favorite(&self, artist_id: &str, title: &str) -> bool {
        self.artist_id == artist_id && self.title == title
    }
}
