//! Multi-step write protocols over [`CatalogStore`].
//!
//! None of these are atomic: each step is an independent write that other
//! readers can observe. Between the two steps of [`remove_song_at`] a reader
//! sees a null slot, and an index computed from an earlier read can point at a
//! different song once another removal has compacted the array.

use mongodb::bson::oid::ObjectId;

use super::store::{CatalogStore, SongOwner, StoreError};
use crate::models::SongRef;

/// Removes the song at `index` by unsetting the slot and then compacting null
/// slots out of the array.
///
/// Compaction is attempted even if the unset fails, so a stray sentinel left
/// by an earlier partial removal is still cleaned up. The first error wins.
pub async fn remove_song_at(
    store: &dyn CatalogStore,
    owner: SongOwner,
    id: ObjectId,
    index: usize,
) -> Result<(), StoreError> {
    let unset = store.unset_song_slot(owner, id, index).await;
    let compacted = store.compact_songs(owner, id).await;
    unset.and(compacted)
}

/// Adds `song` to favorites, creating the favorites document first if needed.
///
/// Returns `false` when an entry with the same `(artist_id, title)` already
/// existed; that is not an error.
pub async fn add_favorite(store: &dyn CatalogStore, song: &SongRef) -> Result<bool, StoreError> {
    store.ensure_favorites().await?;
    store.push_favorite_if_absent(song).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Song;
    use crate::services::memory::MemoryCatalogStore;
    use crate::services::store::StoreOp;

    #[tokio::test]
    async fn compaction_runs_even_when_unset_fails() {
        let store = MemoryCatalogStore::new();
        let id = store.insert_artist("A").await.unwrap();
        store
            .push_artist_song(
                id,
                &Song {
                    title: "t".into(),
                    duration: "1:00".into(),
                },
            )
            .await
            .unwrap();
        store.fail_on(StoreOp::UnsetSongSlot, "unset failed").await;

        let err = remove_song_at(&store, SongOwner::Artist, id, 0)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "unset failed");
        assert!(store.was_called(StoreOp::CompactSongs).await);
    }

    #[tokio::test]
    async fn add_favorite_stops_when_ensure_fails() {
        let store = MemoryCatalogStore::new();
        store.fail_on(StoreOp::EnsureFavorites, "upsert failed").await;

        let song = SongRef {
            artist_id: "a".into(),
            artist_name: "n".into(),
            title: "t".into(),
            duration: "1:00".into(),
        };
        assert!(add_favorite(&store, &song).await.is_err());
        assert!(!store.was_called(StoreOp::PushFavorite).await);
    }
}
