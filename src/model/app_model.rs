//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::browse::{BrowseCache, BrowseKey};
use super::content::{ContentState, ContentView, Loadable};
use super::library::{Favorites, Library};
use super::listing::Listing;
use super::persistence::LibraryStore;
use super::playback::{LoadOutcome, NowPlaying, PlaybackInfo, Queue};
use super::search::{SearchPhase, SearchResults, SearchState};
use super::storage::KeyValueStore;
use super::types::{
    ActiveSection, ArtistDetail, ArtistId, ArtistRef, Collection, CollectionId, CollectionKind,
    SearchResultSection, SelectedItem, SidebarEntry, Timeframe, Track, TrackId, UiState,
    UserPlaylistId,
};

/// Everything the view needs for one frame
#[derive(Clone)]
pub struct AppSnapshot {
    pub playback: PlaybackInfo,
    pub ui_state: UiState,
    pub content_state: ContentState,
    pub library: Library,
    pub favorites: Favorites,
    pub search: SearchState,
    pub search_phase: SearchPhase,
    pub browse: BrowseCache,
    pub genres: Arc<Vec<String>>,
}

impl AppSnapshot {
    pub fn listing(&self) -> Listing<'_> {
        Listing {
            library: &self.library,
            favorites: &self.favorites,
            search: &self.search.results,
            browse: &self.browse,
            now_playing: &self.playback.now_playing,
            genres: &self.genres,
        }
    }
}

/// Main application model containing all state.
///
/// Each subsystem sits behind its own lock so a slow commit in one never
/// holds up another. Cloning shares the same state.
#[derive(Clone)]
pub struct AppModel {
    now_playing: Arc<Mutex<NowPlaying>>,
    library: Arc<Mutex<LibraryStore>>,
    favorites: Arc<Mutex<Favorites>>,
    search: Arc<Mutex<SearchState>>,
    search_phase: Arc<Mutex<SearchPhase>>,
    browse: Arc<Mutex<BrowseCache>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    should_quit: Arc<Mutex<bool>>,
    /// Genre shelves shown on the home screen
    genres: Arc<Vec<String>>,
}

impl AppModel {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            now_playing: Arc::new(Mutex::new(NowPlaying::default())),
            library: Arc::new(Mutex::new(LibraryStore::new(storage))),
            favorites: Arc::new(Mutex::new(Favorites::default())),
            search: Arc::new(Mutex::new(SearchState::default())),
            search_phase: Arc::new(Mutex::new(SearchPhase::default())),
            browse: Arc::new(Mutex::new(BrowseCache::default())),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            should_quit: Arc::new(Mutex::new(false)),
            genres: Arc::new(Vec::new()),
        }
    }

    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = Arc::new(genres);
        self
    }

    pub fn genres(&self) -> Arc<Vec<String>> {
        self.genres.clone()
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            playback: self.get_playback_info().await,
            ui_state: self.get_ui_state().await,
            content_state: self.get_content_state().await,
            library: self.get_library().await,
            favorites: self.get_favorites().await,
            search: self.get_search_state().await,
            search_phase: self.search_phase().await,
            browse: self.get_browse_cache().await,
            genres: self.genres.clone(),
        }
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub async fn get_playback_info(&self) -> PlaybackInfo {
        PlaybackInfo {
            now_playing: self.now_playing.lock().await.clone(),
        }
    }

    pub async fn now_playing(&self) -> NowPlaying {
        self.now_playing.lock().await.clone()
    }

    pub async fn load_queue(&self, queue: Queue, start_playing: bool) -> LoadOutcome {
        let mut now = self.now_playing.lock().await;
        let outcome = now.load(queue, start_playing);
        tracing::info!(
            ?outcome,
            queue = %now.queue.name,
            track = now.track.as_ref().map(|t| t.name.as_str()).unwrap_or("-"),
            is_playing = now.is_playing,
            "Queue loaded"
        );
        outcome
    }

    pub async fn load_collection(&self, collection: &Collection, start_playing: bool) -> LoadOutcome {
        self.load_queue(Queue::from(collection), start_playing).await
    }

    pub async fn play_from(&self, queue: Queue, track_id: &TrackId) {
        let mut now = self.now_playing.lock().await;
        now.play_from(queue, track_id);
        tracing::info!(queue = %now.queue.name, track_id = %track_id, "Playing from queue");
    }

    pub async fn select_track(&self, track_id: &TrackId) -> bool {
        self.now_playing.lock().await.select_track(track_id)
    }

    pub async fn step_track(&self, forward: bool) -> bool {
        self.now_playing.lock().await.step(forward)
    }

    pub async fn is_playing(&self) -> bool {
        self.now_playing.lock().await.is_playing
    }

    pub async fn set_playing(&self, playing: bool) {
        self.now_playing.lock().await.set_playing(playing);
    }

    pub async fn is_shuffling(&self) -> bool {
        self.now_playing.lock().await.is_shuffling
    }

    pub async fn set_shuffling(&self, shuffling: bool) {
        self.now_playing.lock().await.set_shuffling(shuffling);
    }

    // ========================================================================
    // Library
    // ========================================================================

    /// Restore the persisted library. Run once at startup.
    pub async fn rehydrate_library(&self) -> usize {
        self.library.lock().await.rehydrate()
    }

    pub async fn get_library(&self) -> Library {
        self.library.lock().await.library().clone()
    }

    pub async fn add_library_album(&self, album: Collection) {
        self.library.lock().await.add_album(album);
    }

    pub async fn remove_library_album(&self, id: &CollectionId) {
        self.library.lock().await.remove_album(id);
    }

    pub async fn add_library_playlist(&self, playlist: Collection) {
        self.library.lock().await.add_playlist(playlist);
    }

    pub async fn remove_library_playlist(&self, id: &CollectionId) {
        self.library.lock().await.remove_playlist(id);
    }

    pub async fn add_following(&self, artist: ArtistRef) {
        self.library.lock().await.add_following(artist);
    }

    pub async fn remove_following(&self, id: &ArtistId) {
        self.library.lock().await.remove_following(id);
    }

    pub async fn create_user_playlist(&self, name: String) -> UserPlaylistId {
        self.library.lock().await.create_user_playlist(name)
    }

    pub async fn remove_user_playlist(&self, id: UserPlaylistId) {
        self.library.lock().await.remove_user_playlist(id);
    }

    pub async fn rename_user_playlist(&self, id: UserPlaylistId, name: String) -> bool {
        self.library.lock().await.rename_user_playlist(id, name)
    }

    pub async fn add_song_to_user_playlist(&self, id: UserPlaylistId, track: Track) -> bool {
        self.library.lock().await.add_song_to_user_playlist(id, track)
    }

    pub async fn remove_song_from_user_playlist(&self, id: UserPlaylistId, track_id: &TrackId) {
        self.library
            .lock()
            .await
            .remove_song_from_user_playlist(id, track_id);
    }

    /// Save a collection to the library if absent, remove it otherwise.
    /// Returns true when it ends up saved.
    pub async fn toggle_saved(&self, collection: &Collection) -> bool {
        let mut store = self.library.lock().await;
        let library = store.library();
        let saved = match collection.kind {
            CollectionKind::Album => library.has_album(&collection.id),
            CollectionKind::Playlist => library.has_playlist(&collection.id),
        };
        match (collection.kind, saved) {
            (CollectionKind::Album, false) => store.add_album(collection.clone()),
            (CollectionKind::Album, true) => store.remove_album(&collection.id),
            (CollectionKind::Playlist, false) => store.add_playlist(collection.clone()),
            (CollectionKind::Playlist, true) => store.remove_playlist(&collection.id),
        }
        !saved
    }

    /// Follow an artist if not followed, unfollow otherwise. Returns the new state.
    pub async fn toggle_following(&self, artist: ArtistRef) -> bool {
        let mut store = self.library.lock().await;
        if store.library().is_following(&artist.id) {
            store.remove_following(&artist.id);
            false
        } else {
            store.add_following(artist);
            true
        }
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    pub async fn get_favorites(&self) -> Favorites {
        self.favorites.lock().await.clone()
    }

    pub async fn add_favorite_album(&self, album: Collection) {
        self.favorites.lock().await.add_album(album);
    }

    pub async fn remove_favorite_album(&self, id: &CollectionId) {
        self.favorites.lock().await.remove_album(id);
    }

    pub async fn add_favorite_playlist(&self, playlist: Collection) {
        self.favorites.lock().await.add_playlist(playlist);
    }

    pub async fn remove_favorite_playlist(&self, id: &CollectionId) {
        self.favorites.lock().await.remove_playlist(id);
    }

    /// Returns true when the collection ends up favorited
    pub async fn toggle_favorite(&self, collection: &Collection) -> bool {
        let mut favorites = self.favorites.lock().await;
        let favorited = match collection.kind {
            CollectionKind::Album => favorites.has_album(&collection.id),
            CollectionKind::Playlist => favorites.has_playlist(&collection.id),
        };
        match (collection.kind, favorited) {
            (CollectionKind::Album, false) => favorites.add_album(collection.clone()),
            (CollectionKind::Album, true) => favorites.remove_album(&collection.id),
            (CollectionKind::Playlist, false) => favorites.add_playlist(collection.clone()),
            (CollectionKind::Playlist, true) => favorites.remove_playlist(&collection.id),
        }
        !favorited
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub async fn get_search_state(&self) -> SearchState {
        self.search.lock().await.clone()
    }

    /// Replace all result buckets at once
    pub async fn set_search_results(&self, query: String, results: SearchResults) {
        self.commit_search_results(query, results, || true).await;
    }

    /// Replace the search state if `is_current` still holds once the search
    /// lock is taken. A results page already on screen is refreshed in place;
    /// any other page is left alone.
    pub async fn commit_search_results(
        &self,
        query: String,
        results: SearchResults,
        is_current: impl FnOnce() -> bool,
    ) -> bool {
        let mut search = self.search.lock().await;
        if !is_current() {
            return false;
        }
        let section = results.first_populated();
        *search = SearchState { query, results };

        let mut content = self.content_state.lock().await;
        if let ContentView::SearchResults { .. } = content.view {
            content.view = ContentView::SearchResults { section };
            content.selected_index = 0;
        }
        true
    }

    /// Bring up the results page unless it is already showing
    pub async fn show_search_results(&self) {
        let section = self.search.lock().await.results.first_populated();
        let mut content = self.content_state.lock().await;
        if !matches!(content.view, ContentView::SearchResults { .. }) {
            content.push(ContentView::SearchResults { section });
        }
    }

    pub async fn search_phase(&self) -> SearchPhase {
        self.search_phase.lock().await.clone()
    }

    pub async fn set_search_phase(&self, phase: SearchPhase) {
        *self.search_phase.lock().await = phase;
    }

    /// Mark request `seq` as settled. No-op once a newer phase has taken over.
    pub async fn settle_search(&self, seq: u64) -> bool {
        let mut phase = self.search_phase.lock().await;
        match &*phase {
            SearchPhase::InFlight { query, seq: current } if *current == seq => {
                *phase = SearchPhase::Settled { query: query.clone() };
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Browse caches
    // ========================================================================

    pub async fn get_browse_cache(&self) -> BrowseCache {
        self.browse.lock().await.clone()
    }

    pub async fn begin_browse_fetch(&self, key: BrowseKey) -> bool {
        self.browse.lock().await.begin_fetch(key)
    }

    pub async fn abandon_browse_fetch(&self, key: &BrowseKey) {
        self.browse.lock().await.abandon_fetch(key);
    }

    pub async fn fill_genre(&self, genre: &str, collections: Vec<Collection>) {
        self.browse.lock().await.fill_genre(genre, collections);
    }

    pub async fn fill_chart(&self, timeframe: Timeframe, queue: Queue) {
        self.browse.lock().await.fill_chart(timeframe, queue);
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    pub async fn sidebar_move(&self, down: bool) {
        let mut state = self.ui_state.lock().await;
        if down {
            if state.sidebar_selected < SidebarEntry::ALL.len() - 1 {
                state.sidebar_selected += 1;
            }
        } else if state.sidebar_selected > 0 {
            state.sidebar_selected -= 1;
        }
    }

    /// Returns the updated query
    pub async fn update_search_query(&self, query: String) -> String {
        let mut state = self.ui_state.lock().await;
        state.search_query = query;
        state.search_query.clone()
    }

    pub async fn append_to_search(&self, c: char) -> String {
        let mut state = self.ui_state.lock().await;
        state.search_query.push(c);
        state.search_query.clone()
    }

    pub async fn backspace_search(&self) -> String {
        let mut state = self.ui_state.lock().await;
        state.search_query.pop();
        state.search_query.clone()
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > 5 {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    // ========================================================================
    // Content navigation
    // ========================================================================

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    pub async fn push_view(&self, view: ContentView) {
        self.content_state.lock().await.push(view);
    }

    pub async fn reset_view(&self, view: ContentView) {
        self.content_state.lock().await.reset(view);
    }

    pub async fn navigate_back(&self) -> bool {
        self.content_state.lock().await.back()
    }

    pub async fn content_move(&self, down: bool) {
        let item_count = self.content_item_count().await;
        let mut state = self.content_state.lock().await;
        if down {
            if state.selected_index + 1 < item_count {
                state.selected_index += 1;
            }
        } else if state.selected_index > 0 {
            state.selected_index -= 1;
        }
    }

    pub async fn navigate_search_section(&self, forward: bool) {
        let mut state = self.content_state.lock().await;
        if let ContentView::SearchResults { section } = state.view {
            let section = if forward { section.next() } else { section.prev() };
            state.view = ContentView::SearchResults { section };
            state.selected_index = 0;
        }
    }

    pub async fn current_search_section(&self) -> Option<SearchResultSection> {
        match self.content_state.lock().await.view {
            ContentView::SearchResults { section } => Some(section),
            _ => None,
        }
    }

    async fn with_listing<R>(&self, f: impl FnOnce(&Listing<'_>, &ContentState) -> R) -> R {
        let store = self.library.lock().await;
        let favorites = self.favorites.lock().await;
        let search = self.search.lock().await;
        let browse = self.browse.lock().await;
        let now_playing = self.now_playing.lock().await;
        let content = self.content_state.lock().await;
        let listing = Listing {
            library: store.library(),
            favorites: &favorites,
            search: &search.results,
            browse: &browse,
            now_playing: &now_playing,
            genres: &self.genres,
        };
        f(&listing, &content)
    }

    pub async fn content_item_count(&self) -> usize {
        self.with_listing(|listing, content| listing.items(&content.view).len())
            .await
    }

    pub async fn selected_content_item(&self) -> Option<SelectedItem> {
        self.with_listing(|listing, content| listing.item_at(&content.view, content.selected_index))
            .await
    }

    pub async fn focused_collection(&self) -> Option<Collection> {
        self.with_listing(|listing, content| listing.collection_at(&content.view, content.selected_index))
            .await
    }

    pub async fn focused_artist(&self) -> Option<ArtistRef> {
        self.with_listing(|listing, content| listing.artist_at(&content.view, content.selected_index))
            .await
    }

    pub async fn focused_queue(&self) -> Option<Queue> {
        self.with_listing(|listing, content| listing.queue_for(&content.view, content.selected_index))
            .await
    }

    pub async fn focused_track(&self) -> Option<Track> {
        self.with_listing(|listing, content| listing.track_at(&content.view, content.selected_index))
            .await
    }

    pub async fn resolve_collection(
        &self,
        kind: CollectionKind,
        id: &CollectionId,
        result: Loadable<Option<Collection>>,
    ) -> bool {
        self.content_state
            .lock()
            .await
            .resolve_collection(kind, id, result)
    }

    pub async fn resolve_artist(&self, id: &ArtistId, result: Loadable<Option<ArtistDetail>>) -> bool {
        self.content_state.lock().await.resolve_artist(id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::persistence::{decode_snapshot, LIBRARY_STORAGE_KEY};
    use crate::model::storage::MemoryStore;
    use crate::model::types::MediaLink;

    fn collection(id: &str, kind: CollectionKind) -> Collection {
        Collection {
            id: CollectionId::new(id),
            name: id.to_uppercase(),
            kind,
            image: vec![MediaLink::default()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_library_album_scenario_writes_snapshots() {
        let storage = Arc::new(MemoryStore::new());
        let model = AppModel::new(storage.clone());
        let album_x = collection("x", CollectionKind::Album);

        model.add_library_album(album_x.clone()).await;
        assert_eq!(model.get_library().await.albums, vec![album_x.clone()]);
        let snapshot = decode_snapshot(&storage.get(LIBRARY_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(snapshot.albums, vec![album_x.clone()]);

        model.remove_library_album(&album_x.id).await;
        assert!(model.get_library().await.albums.is_empty());
        let snapshot = decode_snapshot(&storage.get(LIBRARY_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert!(snapshot.albums.is_empty());
        assert_eq!(storage.write_count(), 2);
    }

    #[tokio::test]
    async fn test_favorites_are_never_persisted() {
        let storage = Arc::new(MemoryStore::new());
        let model = AppModel::new(storage.clone());
        let playlist = collection("p", CollectionKind::Playlist);

        assert!(model.toggle_favorite(&playlist).await);
        assert_eq!(model.get_favorites().await.playlists.len(), 1);
        assert!(!model.toggle_favorite(&playlist).await);
        assert!(model.get_favorites().await.playlists.is_empty());

        model.add_favorite_album(collection("a", CollectionKind::Album)).await;
        model.remove_favorite_album(&CollectionId::new("a")).await;
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_toggle_saved_respects_kind() {
        let model = AppModel::new(Arc::new(MemoryStore::new()));
        let album = collection("1", CollectionKind::Album);
        let playlist = collection("1", CollectionKind::Playlist);

        assert!(model.toggle_saved(&album).await);
        assert!(model.toggle_saved(&playlist).await);
        let library = model.get_library().await;
        assert_eq!(library.albums.len(), 1);
        assert_eq!(library.playlists.len(), 1);

        assert!(!model.toggle_saved(&album).await);
        assert!(model.get_library().await.albums.is_empty());
    }

    #[tokio::test]
    async fn test_new_search_results_replace_all_buckets() {
        let model = AppModel::new(Arc::new(MemoryStore::new()));
        let mut first = SearchResults::default();
        first.albums.results.push(Default::default());
        first.artists.results.push(Default::default());
        model.show_search_results().await;
        model.set_search_results("old".to_string(), first).await;

        let mut second = SearchResults::default();
        second.songs.results.push(Default::default());
        model.set_search_results("new".to_string(), second.clone()).await;

        let state = model.get_search_state().await;
        assert_eq!(state.query, "new");
        assert_eq!(state.results, second);
        assert!(state.results.albums.results.is_empty());
        assert_eq!(
            model.current_search_section().await,
            Some(SearchResultSection::Songs)
        );
    }

    #[tokio::test]
    async fn test_stale_commit_keeps_newer_results() {
        let model = AppModel::new(Arc::new(MemoryStore::new()));
        let mut newer = SearchResults::default();
        newer.songs.results.push(Default::default());
        model.set_search_results("newer".to_string(), newer.clone()).await;

        let committed = model
            .commit_search_results("older".to_string(), SearchResults::default(), || false)
            .await;

        assert!(!committed);
        let state = model.get_search_state().await;
        assert_eq!(state.query, "newer");
        assert_eq!(state.results, newer);
    }

    #[tokio::test]
    async fn test_load_collection_through_model() {
        let model = AppModel::new(Arc::new(MemoryStore::new()));
        let mut playlist = collection("p1", CollectionKind::Playlist);
        playlist.songs = vec![Track {
            id: TrackId::new("t1"),
            ..Default::default()
        }];

        assert_eq!(model.load_collection(&playlist, true).await, LoadOutcome::Replaced);
        assert!(model.is_playing().await);
        assert_eq!(model.load_collection(&playlist, true).await, LoadOutcome::Toggled);
        assert!(!model.is_playing().await);
    }
}
