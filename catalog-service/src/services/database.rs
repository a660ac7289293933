use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Bson, Document},
    options::{ClientOptions, IndexOptions, UpdateOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};

use super::store::{CatalogStore, PullOutcome, SongOwner, StoreError};
use crate::models::{Artist, Favorites, Playlist, Song, SongRef, FAVORITES_TYPE};

pub const DEFAULT_DATABASE: &str = "music_db";

/// [`CatalogStore`] over a MongoDB database with `artists`, `playlists` and
/// `favorites` collections.
#[derive(Clone)]
pub struct MongoCatalogStore {
    client: MongoClient,
    db: Database,
}

impl MongoCatalogStore {
    /// Builds a client for `uri`. The database is `database` if given, else the
    /// URI's default database, else [`DEFAULT_DATABASE`]. The driver connects
    /// lazily, so an unreachable server surfaces on the first operation.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            StoreError::from(e)
        })?;
        options.app_name = Some("catalog-service".to_string());

        let database = database
            .map(str::to_string)
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            StoreError::from(e)
        })?;
        let db = client.database(&database);
        tracing::info!(database = %database, "MongoDB client configured");

        Ok(Self { client, db })
    }

    /// Enforces the favorites singleton with a unique index on `type`.
    pub async fn initialize_indexes(&self) -> Result<(), StoreError> {
        let favorites_index = IndexModel::builder()
            .keys(doc! { "type": 1 })
            .options(
                IndexOptions::builder()
                    .name("favorites_type_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.raw("favorites")
            .create_index(favorites_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create favorites type index: {}", e);
                StoreError::from(e)
            })?;

        tracing::info!("MongoDB indexes initialized");
        Ok(())
    }

    fn artists(&self) -> Collection<Artist> {
        self.db.collection("artists")
    }

    fn playlists(&self) -> Collection<Playlist> {
        self.db.collection("playlists")
    }

    fn favorites(&self) -> Collection<Favorites> {
        self.db.collection("favorites")
    }

    fn raw(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError> {
        let result = self.raw(collection).insert_one(document, None).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Backend(format!(
                "{} insert returned a non-ObjectId identifier: {}",
                collection, result.inserted_id
            ))
        })
    }

    async fn push(&self, collection: &str, id: ObjectId, song: Bson) -> Result<bool, StoreError> {
        let result = self
            .raw(collection)
            .update_one(doc! { "_id": id }, doc! { "$push": { "songs": song } }, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: &str, id: ObjectId) -> Result<bool, StoreError> {
        let result = self
            .raw(collection)
            .delete_one(doc! { "_id": id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl CatalogStore for MongoCatalogStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    async fn list_artists(&self) -> Result<Vec<Artist>, StoreError> {
        let cursor = self.artists().find(doc! {}, None).await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn find_artist(&self, id: ObjectId) -> Result<Option<Artist>, StoreError> {
        Ok(self.artists().find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert_artist(&self, name: &str) -> Result<ObjectId, StoreError> {
        self.insert("artists", doc! { "name": name, "songs": [] })
            .await
    }

    async fn delete_artist(&self, id: ObjectId) -> Result<bool, StoreError> {
        self.delete("artists", id).await
    }

    async fn push_artist_song(&self, id: ObjectId, song: &Song) -> Result<bool, StoreError> {
        self.push("artists", id, to_bson(song)?).await
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>, StoreError> {
        let cursor = self.playlists().find(doc! {}, None).await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn find_playlist(&self, id: ObjectId) -> Result<Option<Playlist>, StoreError> {
        Ok(self.playlists().find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<ObjectId, StoreError> {
        self.insert(
            "playlists",
            doc! { "name": name, "description": description, "songs": [] },
        )
        .await
    }

    async fn delete_playlist(&self, id: ObjectId) -> Result<bool, StoreError> {
        self.delete("playlists", id).await
    }

    async fn push_playlist_song(&self, id: ObjectId, song: &SongRef) -> Result<bool, StoreError> {
        self.push("playlists", id, to_bson(song)?).await
    }

    async fn unset_song_slot(
        &self,
        owner: SongOwner,
        id: ObjectId,
        index: usize,
    ) -> Result<(), StoreError> {
        let mut slot = Document::new();
        slot.insert(format!("songs.{}", index), 1);

        self.raw(owner.collection())
            .update_one(doc! { "_id": id }, doc! { "$unset": slot }, None)
            .await?;
        Ok(())
    }

    async fn compact_songs(&self, owner: SongOwner, id: ObjectId) -> Result<(), StoreError> {
        self.raw(owner.collection())
            .update_one(
                doc! { "_id": id },
                doc! { "$pull": { "songs": Bson::Null } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn find_favorites(&self) -> Result<Option<Favorites>, StoreError> {
        Ok(self
            .favorites()
            .find_one(doc! { "type": FAVORITES_TYPE }, None)
            .await?)
    }

    async fn ensure_favorites(&self) -> Result<(), StoreError> {
        // The equality on `type` in the filter is copied into an upserted document.
        self.raw("favorites")
            .update_one(
                doc! { "type": FAVORITES_TYPE },
                doc! { "$setOnInsert": { "songs": [] } },
                UpdateOptions::builder().upsert(true).build(),
            )
            .await?;
        Ok(())
    }

    async fn push_favorite_if_absent(&self, song: &SongRef) -> Result<bool, StoreError> {
        let filter = doc! {
            "type": FAVORITES_TYPE,
            "songs": {
                "$not": {
                    "$elemMatch": {
                        "artist_id": song.artist_id.as_str(),
                        "title": song.title.as_str(),
                    }
                }
            }
        };

        let result = self
            .raw("favorites")
            .update_one(filter, doc! { "$push": { "songs": to_bson(song)? } }, None)
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn pull_favorite(&self, artist_id: &str, title: &str) -> Result<PullOutcome, StoreError> {
        let result = self
            .raw("favorites")
            .update_one(
                doc! { "type": FAVORITES_TYPE },
                doc! { "$pull": { "songs": { "artist_id": artist_id, "title": title } } },
                None,
            )
            .await?;
        Ok(PullOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }
}
