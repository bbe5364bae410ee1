//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Identifiers, catalog entities and UI enums
//! - `playback`: The now-playing session and queue identity
//! - `library`: Saved collections, followed artists, user playlists and favorites
//! - `storage`: Key-value persistence backends
//! - `persistence`: Library snapshot codec and the persisting library store
//! - `search`: Search result shapes, pipeline phases and query normalization
//! - `browse`: Home screen genre and chart caches
//! - `content`: Main pane views and loading state
//! - `listing`: Selectable rows of each view
//! - `catalog`: Catalog API client
//! - `app_model`: Main application model with state management methods

mod types;
mod playback;
mod library;
mod storage;
mod persistence;
mod search;
mod browse;
mod content;
mod listing;
mod catalog;
mod app_model;

// Re-export all public types for convenient access
pub use types::{
    best_quality, ActiveSection, AlbumRef, ArtistDetail, ArtistId, ArtistRef, Collection,
    CollectionId, CollectionKind, MediaLink, SearchResultSection, SelectedItem, SidebarEntry,
    Timeframe, Track, TrackArtists, TrackId, UiState, UserPlaylist, UserPlaylistId,
};

pub use playback::{LoadOutcome, NowPlaying, PlaybackInfo, Queue, QueueKey};

pub use library::{Favorites, Library};

pub use storage::{FileStore, KeyValueStore, MemoryStore};

pub use persistence::{decode_snapshot, encode_snapshot, LibraryStore, LIBRARY_STORAGE_KEY};

pub use search::{
    normalize_query, ResultBucket, SearchHit, SearchPhase, SearchResults, SearchState,
    DEFAULT_MIN_QUERY_LEN,
};

pub use browse::{BrowseCache, BrowseKey};

pub use content::{ContentState, ContentView, Loadable};

pub use listing::Listing;

pub use catalog::{CatalogClient, CatalogError, CatalogResult, HttpCatalog};

#[cfg(test)]
pub use catalog::mock;

pub use app_model::{AppModel, AppSnapshot};
