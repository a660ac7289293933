use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::SongRef;

/// Discriminator value of the one favorites document.
pub const FAVORITES_TYPE: &str = "user_favorites";

/// The shared favorites list. At most one exists, keyed by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub songs: Vec<SongRef>,
}

impl Favorites {
    pub fn empty() -> Self {
        Self {
            id: ObjectId::new(),
            kind: FAVORITES_TYPE.to_string(),
            songs: Vec::new(),
        }
    }

    pub fn contains(&self, artist_id: &str, title: &str) -> bool {
        self.songs
            .iter()
            .any(|song| song.same_favorite(artist_id, title))
    }
}
