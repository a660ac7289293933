pub mod artist;
pub mod favorites;
pub mod playlist;
pub mod song_ref;

pub use artist::{Artist, Song};
pub use favorites::{Favorites, FAVORITES_TYPE};
pub use playlist::Playlist;
pub use song_ref::SongRef;

/// An embedded song array as stored.
///
/// A slot is `None` between the two steps of a positional removal (the slot
/// has been unset but not yet compacted away), and readers may observe it.
pub type SongSlots<T> = Vec<Option<T>>;
