//! Library snapshot codec and the persisting library store

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use super::library::Library;
use super::storage::KeyValueStore;
use super::types::{ArtistId, ArtistRef, Collection, CollectionId, Track, TrackId, UserPlaylist, UserPlaylistId};

/// Storage key holding the library snapshot
pub const LIBRARY_STORAGE_KEY: &str = "local-library";

pub fn encode_snapshot(library: &Library) -> Result<String> {
    Ok(serde_json::to_string(library)?)
}

pub fn decode_snapshot(raw: &str) -> Result<Library> {
    Ok(serde_json::from_str(raw)?)
}

/// Library plus its storage. Every mutation writes a full snapshot.
pub struct LibraryStore {
    library: Library,
    storage: Arc<dyn KeyValueStore>,
}

impl LibraryStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            library: Library::default(),
            storage,
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Load the persisted snapshot. Missing or malformed data leaves the library empty.
    ///
    /// Members are replayed through the regular add methods and nothing is written back.
    /// Returns the number of restored entries.
    pub fn rehydrate(&mut self) -> usize {
        let raw = match self.storage.get(LIBRARY_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No persisted library found");
                return 0;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted library");
                return 0;
            }
        };

        let snapshot = match decode_snapshot(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Persisted library is malformed, starting empty");
                return 0;
            }
        };

        let mut restored = Library::default();
        let mut count = 0;
        for album in snapshot.albums {
            restored.add_album(album);
            count += 1;
        }
        for playlist in snapshot.playlists {
            restored.add_playlist(playlist);
            count += 1;
        }
        for playlist in snapshot.user_playlists {
            restored.add_user_playlist(playlist);
            count += 1;
        }
        for artist in snapshot.followings {
            restored.add_following(artist);
            count += 1;
        }
        self.library = restored;

        tracing::info!(entries = count, "Library restored from storage");
        count
    }

    fn persist(&self) {
        let encoded = match encode_snapshot(&self.library) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode library snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.set(LIBRARY_STORAGE_KEY, &encoded) {
            tracing::warn!(error = %e, "Failed to persist library");
        }
    }

    pub fn add_album(&mut self, album: Collection) {
        tracing::debug!(album_id = %album.id, "Saving album to library");
        self.library.add_album(album);
        self.persist();
    }

    pub fn remove_album(&mut self, id: &CollectionId) {
        tracing::debug!(album_id = %id, "Removing album from library");
        self.library.remove_album(id);
        self.persist();
    }

    pub fn add_playlist(&mut self, playlist: Collection) {
        tracing::debug!(playlist_id = %playlist.id, "Saving playlist to library");
        self.library.add_playlist(playlist);
        self.persist();
    }

    pub fn remove_playlist(&mut self, id: &CollectionId) {
        tracing::debug!(playlist_id = %id, "Removing playlist from library");
        self.library.remove_playlist(id);
        self.persist();
    }

    pub fn add_following(&mut self, artist: ArtistRef) {
        tracing::debug!(artist_id = %artist.id, "Following artist");
        self.library.add_following(artist);
        self.persist();
    }

    pub fn remove_following(&mut self, id: &ArtistId) {
        tracing::debug!(artist_id = %id, "Unfollowing artist");
        self.library.remove_following(id);
        self.persist();
    }

    pub fn add_user_playlist(&mut self, playlist: UserPlaylist) {
        tracing::debug!(user_playlist_id = %playlist.id, "Adding user playlist");
        self.library.add_user_playlist(playlist);
        self.persist();
    }

    pub fn remove_user_playlist(&mut self, id: UserPlaylistId) {
        tracing::debug!(user_playlist_id = %id, "Removing user playlist");
        self.library.remove_user_playlist(id);
        self.persist();
    }

    /// Create an empty user playlist with the next free id
    pub fn create_user_playlist(&mut self, name: impl Into<String>) -> UserPlaylistId {
        let id = self.library.next_user_playlist_id();
        self.add_user_playlist(UserPlaylist {
            id,
            name: name.into(),
            created_at: Utc::now(),
            songs: Vec::new(),
        });
        id
    }

    pub fn add_song_to_user_playlist(&mut self, id: UserPlaylistId, track: Track) -> bool {
        let added = self.library.add_song_to_user_playlist(id, track);
        if added {
            self.persist();
        }
        added
    }

    pub fn remove_song_from_user_playlist(&mut self, id: UserPlaylistId, track_id: &TrackId) {
        self.library.remove_song_from_user_playlist(id, track_id);
        self.persist();
    }

    pub fn rename_user_playlist(&mut self, id: UserPlaylistId, name: String) -> bool {
        let renamed = self.library.rename_user_playlist(id, name);
        if renamed {
            self.persist();
        }
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::storage::MemoryStore;
    use crate::model::types::{CollectionKind, MediaLink};

    fn album(id: &str) -> Collection {
        Collection {
            id: CollectionId::new(id),
            name: format!("Album {}", id),
            kind: CollectionKind::Album,
            image: vec![MediaLink {
                quality: "500x500".to_string(),
                url: format!("https://img.example/{}.jpg", id),
            }],
            songs: vec![Track {
                id: TrackId::new(format!("{}-1", id)),
                name: "Opening".to_string(),
                duration: Some(200),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn stored_library(storage: &MemoryStore) -> Library {
        let raw = storage.get(LIBRARY_STORAGE_KEY).unwrap().expect("snapshot written");
        decode_snapshot(&raw).unwrap()
    }

    #[test]
    fn test_add_then_remove_album_persists_each_step() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = LibraryStore::new(storage.clone());
        let album_x = album("x");

        store.add_album(album_x.clone());
        assert_eq!(store.library().albums, vec![album_x.clone()]);
        assert_eq!(storage.write_count(), 1);
        assert_eq!(stored_library(&storage).albums, vec![album_x.clone()]);

        store.remove_album(&album_x.id);
        assert!(store.library().albums.is_empty());
        assert_eq!(storage.write_count(), 2);
        assert!(stored_library(&storage).albums.is_empty());
    }

    #[test]
    fn test_snapshot_layout_uses_camel_case_keys() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = LibraryStore::new(storage.clone());
        store.create_user_playlist("Mine");

        let raw = storage.get(LIBRARY_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["albums", "followings", "playlists", "userPlaylists"]);
    }

    #[test]
    fn test_rehydrate_roundtrip_preserves_order() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = LibraryStore::new(storage.clone());
        store.add_album(album("a"));
        store.add_album(album("b"));
        store.add_playlist(Collection {
            kind: CollectionKind::Playlist,
            ..album("p")
        });
        store.add_following(ArtistRef {
            id: ArtistId::new("ar"),
            name: "Artist".to_string(),
            image: vec![],
        });
        let id = store.create_user_playlist("Mine");
        store.add_song_to_user_playlist(id, album("s").songs[0].clone());
        let writes = storage.write_count();

        let mut restored = LibraryStore::new(storage.clone());
        let count = restored.rehydrate();

        assert_eq!(count, 5);
        assert_eq!(restored.library(), store.library());
        // Replay never writes back
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn test_rehydrate_missing_snapshot_is_empty() {
        let mut store = LibraryStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(store.rehydrate(), 0);
        assert_eq!(store.library(), &Library::default());
    }

    #[test]
    fn test_rehydrate_malformed_snapshot_is_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(LIBRARY_STORAGE_KEY, "{not json").unwrap();

        let mut store = LibraryStore::new(storage);
        assert_eq!(store.rehydrate(), 0);
        assert_eq!(store.library(), &Library::default());
    }

    #[test]
    fn test_rehydrate_partial_snapshot_defaults_missing_lists() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(LIBRARY_STORAGE_KEY, r#"{"albums":[{"id":"a1","name":"One"}]}"#)
            .unwrap();

        let mut store = LibraryStore::new(storage);
        assert_eq!(store.rehydrate(), 1);
        assert_eq!(store.library().albums[0].id, CollectionId::new("a1"));
        assert!(store.library().followings.is_empty());
    }
}
