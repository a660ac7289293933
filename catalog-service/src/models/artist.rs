use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::SongSlots;

/// A song embedded in an artist document. It has no identity of its own and
/// is addressed by its position in the parent's `songs` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub songs: SongSlots<Song>,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            songs: Vec::new(),
        }
    }
}
