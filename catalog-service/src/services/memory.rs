//! In-process [`CatalogStore`] with the same observable semantics as the
//! MongoDB store, for local runs and tests.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::store::{CatalogStore, PullOutcome, SongOwner, StoreError, StoreOp};
use crate::models::{Artist, Favorites, Playlist, Song, SongRef};

#[derive(Default)]
struct MemoryState {
    artists: Vec<Artist>,
    playlists: Vec<Playlist>,
    favorites: Option<Favorites>,
    failures: HashMap<StoreOp, String>,
    calls: Vec<StoreOp>,
}

/// Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call of `op` fail with `message`.
    pub async fn fail_on(&self, op: StoreOp, message: impl Into<String>) {
        self.state.lock().await.failures.insert(op, message.into());
    }

    pub async fn clear_failures(&self) {
        self.state.lock().await.failures.clear();
    }

    /// Operations invoked so far, in order, including failed ones.
    pub async fn calls(&self) -> Vec<StoreOp> {
        self.state.lock().await.calls.clone()
    }

    pub async fn was_called(&self, op: StoreOp) -> bool {
        self.state.lock().await.calls.contains(&op)
    }

    async fn begin(&self, op: StoreOp) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        let mut state = self.state.lock().await;
        state.calls.push(op);
        if let Some(message) = state.failures.get(&op).cloned() {
            return Err(StoreError::Backend(message));
        }
        Ok(state)
    }
}

fn unset_slot<T>(slots: &mut [Option<T>], index: usize) {
    if let Some(slot) = slots.get_mut(index) {
        *slot = None;
    }
}

fn compact<T>(slots: &mut Vec<Option<T>>) {
    slots.retain(Option::is_some);
}

impl MemoryState {
    fn artist_mut(&mut self, id: ObjectId) -> Option<&mut Artist> {
        self.artists.iter_mut().find(|artist| artist.id == id)
    }

    fn playlist_mut(&mut self, id: ObjectId) -> Option<&mut Playlist> {
        self.playlists.iter_mut().find(|playlist| playlist.id == id)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let _state = self.begin(StoreOp::Ping).await?;
        Ok(())
    }

    async fn list_artists(&self) -> Result<Vec<Artist>, StoreError> {
        let state = self.begin(StoreOp::ListArtists).await?;
        Ok(state.artists.clone())
    }

    async fn find_artist(&self, id: ObjectId) -> Result<Option<Artist>, StoreError> {
        let state = self.begin(StoreOp::FindArtist).await?;
        Ok(state.artists.iter().find(|artist| artist.id == id).cloned())
    }

    async fn insert_artist(&self, name: &str) -> Result<ObjectId, StoreError> {
        let mut state = self.begin(StoreOp::InsertArtist).await?;
        let artist = Artist::new(name);
        let id = artist.id;
        state.artists.push(artist);
        Ok(id)
    }

    async fn delete_artist(&self, id: ObjectId) -> Result<bool, StoreError> {
        let mut state = self.begin(StoreOp::DeleteArtist).await?;
        let before = state.artists.len();
        state.artists.retain(|artist| artist.id != id);
        Ok(state.artists.len() < before)
    }

    async fn push_artist_song(&self, id: ObjectId, song: &Song) -> Result<bool, StoreError> {
        let mut state = self.begin(StoreOp::PushArtistSong).await?;
        match state.artist_mut(id) {
            Some(artist) => {
                artist.songs.push(Some(song.clone()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>, StoreError> {
        let state = self.begin(StoreOp::ListPlaylists).await?;
        Ok(state.playlists.clone())
    }

    async fn find_playlist(&self, id: ObjectId) -> Result<Option<Playlist>, StoreError> {
        let state = self.begin(StoreOp::FindPlaylist).await?;
        Ok(state
            .playlists
            .iter()
            .find(|playlist| playlist.id == id)
            .cloned())
    }

    async fn insert_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<ObjectId, StoreError> {
        let mut state = self.begin(StoreOp::InsertPlaylist).await?;
        let playlist = Playlist::new(name, description);
        let id = playlist.id;
        state.playlists.push(playlist);
        Ok(id)
    }

    async fn delete_playlist(&self, id: ObjectId) -> Result<bool, StoreError> {
        let mut state = self.begin(StoreOp::DeletePlaylist).await?;
        let before = state.playlists.len();
        state.playlists.retain(|playlist| playlist.id != id);
        Ok(state.playlists.len() < before)
    }

    async fn push_playlist_song(&self, id: ObjectId, song: &SongRef) -> Result<bool, StoreError> {
        let mut state = self.begin(StoreOp::PushPlaylistSong).await?;
        match state.playlist_mut(id) {
            Some(playlist) => {
                playlist.songs.push(Some(song.clone()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn unset_song_slot(
        &self,
        owner: SongOwner,
        id: ObjectId,
        index: usize,
    ) -> Result<(), StoreError> {
        let mut state = self.begin(StoreOp::UnsetSongSlot).await?;
        match owner {
            SongOwner::Artist => {
                if let Some(artist) = state.artist_mut(id) {
                    unset_slot(&mut artist.songs, index);
                }
            }
            SongOwner::Playlist => {
                if let Some(playlist) = state.playlist_mut(id) {
                    unset_slot(&mut playlist.songs, index);
                }
            }
        }
        Ok(())
    }

    async fn compact_songs(&self, owner: SongOwner, id: ObjectId) -> Result<(), StoreError> {
        let mut state = self.begin(StoreOp::CompactSongs).await?;
        match owner {
            SongOwner::Artist => {
                if let Some(artist) = state.artist_mut(id) {
                    compact(&mut artist.songs);
                }
            }
            SongOwner::Playlist => {
                if let Some(playlist) = state.playlist_mut(id) {
                    compact(&mut playlist.songs);
                }
            }
        }
        Ok(())
    }

    async fn find_favorites(&self) -> Result<Option<Favorites>, StoreError> {
        let state = self.begin(StoreOp::FindFavorites).await?;
        Ok(state.favorites.clone())
    }

    async fn ensure_favorites(&self) -> Result<(), StoreError> {
        let mut state = self.begin(StoreOp::EnsureFavorites).await?;
        state.favorites.get_or_insert_with(Favorites::empty);
        Ok(())
    }

    async fn push_favorite_if_absent(&self, song: &SongRef) -> Result<bool, StoreError> {
        let mut state = self.begin(StoreOp::PushFavorite).await?;
        match state.favorites.as_mut() {
            Some(favorites) if !favorites.contains(&song.artist_id, &song.title) => {
                favorites.songs.push(song.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn pull_favorite(&self, artist_id: &str, title: &str) -> Result<PullOutcome, StoreError> {
        let mut state = self.begin(StoreOp::PullFavorite).await?;
        let Some(favorites) = state.favorites.as_mut() else {
            return Ok(PullOutcome::default());
        };

        let before = favorites.songs.len();
        favorites
            .songs
            .retain(|song| !song.same_favorite(artist_id, title));

        Ok(PullOutcome {
            matched: 1,
            modified: u64::from(favorites.songs.len() < before),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str) -> Song {
        Song {
            title: title.to_string(),
            duration: "3:00".to_string(),
        }
    }

    fn song_ref(artist_id: &str, title: &str, duration: &str) -> SongRef {
        SongRef {
            artist_id: artist_id.to_string(),
            artist_name: "Artist".to_string(),
            title: title.to_string(),
            duration: duration.to_string(),
        }
    }

    #[tokio::test]
    async fn unset_leaves_a_visible_sentinel_until_compacted() {
        let store = MemoryCatalogStore::new();
        let id = store.insert_artist("Nina").await.unwrap();
        for title in ["a", "b", "c"] {
            store.push_artist_song(id, &song(title)).await.unwrap();
        }

        store
            .unset_song_slot(SongOwner::Artist, id, 1)
            .await
            .unwrap();
        let artist = store.find_artist(id).await.unwrap().unwrap();
        assert_eq!(artist.songs.len(), 3);
        assert!(artist.songs[1].is_none());

        store.compact_songs(SongOwner::Artist, id).await.unwrap();
        let artist = store.find_artist(id).await.unwrap().unwrap();
        let titles: Vec<_> = artist
            .songs
            .iter()
            .flatten()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, ["a", "c"]);
    }

    #[tokio::test]
    async fn unset_out_of_range_is_a_no_op() {
        let store = MemoryCatalogStore::new();
        let id = store.insert_playlist("Mix", "").await.unwrap();
        store
            .push_playlist_song(id, &song_ref("x", "t", "1:00"))
            .await
            .unwrap();

        store
            .unset_song_slot(SongOwner::Playlist, id, 5)
            .await
            .unwrap();
        let playlist = store.find_playlist(id).await.unwrap().unwrap();
        assert_eq!(playlist.songs.len(), 1);
        assert!(playlist.songs[0].is_some());
    }

    #[tokio::test]
    async fn push_to_missing_document_reports_no_match() {
        let store = MemoryCatalogStore::new();
        assert!(!store
            .push_artist_song(ObjectId::new(), &song("a"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn favorites_dedup_ignores_duration() {
        let store = MemoryCatalogStore::new();
        assert!(!store
            .push_favorite_if_absent(&song_ref("a1", "Song", "3:00"))
            .await
            .unwrap());

        store.ensure_favorites().await.unwrap();
        store.ensure_favorites().await.unwrap();
        assert!(store
            .push_favorite_if_absent(&song_ref("a1", "Song", "3:00"))
            .await
            .unwrap());
        assert!(!store
            .push_favorite_if_absent(&song_ref("a1", "Song", "4:10"))
            .await
            .unwrap());
        assert!(store
            .push_favorite_if_absent(&song_ref("a2", "Song", "3:00"))
            .await
            .unwrap());

        let favorites = store.find_favorites().await.unwrap().unwrap();
        assert_eq!(favorites.songs.len(), 2);
    }

    #[tokio::test]
    async fn pull_reports_match_and_modification_separately() {
        let store = MemoryCatalogStore::new();
        assert_eq!(
            store.pull_favorite("a1", "Song").await.unwrap(),
            PullOutcome::default()
        );

        store.ensure_favorites().await.unwrap();
        store
            .push_favorite_if_absent(&song_ref("a1", "Song", "3:00"))
            .await
            .unwrap();

        let missing = store.pull_favorite("a1", "Other").await.unwrap();
        assert_eq!(missing, PullOutcome { matched: 1, modified: 0 });

        let removed = store.pull_favorite("a1", "Song").await.unwrap();
        assert_eq!(removed, PullOutcome { matched: 1, modified: 1 });
    }

    #[tokio::test]
    async fn injected_failures_are_recorded_and_returned() {
        let store = MemoryCatalogStore::new();
        store.fail_on(StoreOp::ListArtists, "DB Connection Error").await;

        let err = store.list_artists().await.unwrap_err();
        assert_eq!(err.to_string(), "DB Connection Error");
        assert_eq!(store.calls().await, vec![StoreOp::ListArtists]);

        store.clear_failures().await;
        assert!(store.list_artists().await.unwrap().is_empty());
    }
}
