use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{SongRef, SongSlots};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub songs: SongSlots<SongRef>,
}

impl Playlist {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            description: description.into(),
            songs: Vec::new(),
        }
    }
}
