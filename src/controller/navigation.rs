//! Navigation-related controller methods (detail pages, browse caches, sidebar)

use futures::future::join_all;

use crate::model::{
    ActiveSection, ArtistId, BrowseKey, CatalogResult, CollectionId, CollectionKind, ContentView,
    Loadable, Queue, SelectedItem, SidebarEntry, Timeframe,
};
use super::AppController;

/// Map a catalog answer onto a detail page's loading state
fn to_loadable<T>(result: &CatalogResult<T>) -> Loadable<Option<T>>
where
    T: Clone,
{
    match result {
        Ok(data) => Loadable::Ready(data.clone()),
        Err(e) => Loadable::Failed(AppController::format_error(e)),
    }
}

impl AppController {
    /// Open an album or playlist page. The page shows as pending until the
    /// catalog answers.
    pub async fn open_collection(&self, kind: CollectionKind, id: CollectionId) {
        if id.is_empty() {
            tracing::debug!(kind = kind.label(), "Ignoring open without an id");
            return;
        }

        self.model
            .push_view(ContentView::Collection {
                kind,
                id: id.clone(),
                detail: Loadable::Pending,
            })
            .await;
        self.model.set_active_section(ActiveSection::MainContent).await;

        let controller = self.clone();
        tokio::spawn(async move {
            controller.fetch_collection(kind, id).await;
        });
    }

    async fn fetch_collection(&self, kind: CollectionKind, id: CollectionId) {
        let result = match kind {
            CollectionKind::Album => self.catalog.album(id.as_str()).await,
            CollectionKind::Playlist => self.catalog.playlist(id.as_str()).await,
        };
        crate::log_api_result!(kind.label(), result);

        let detail = to_loadable(&result);
        if !self.model.resolve_collection(kind, &id, detail).await {
            tracing::debug!(id = %id, "Collection page closed before it loaded");
        }
        if let Err(e) = result {
            self.model.set_error(Self::format_error(&e)).await;
        }
    }

    pub async fn open_artist(&self, id: ArtistId) {
        if id.is_empty() {
            tracing::debug!("Ignoring artist open without an id");
            return;
        }

        self.model
            .push_view(ContentView::Artist {
                id: id.clone(),
                detail: Loadable::Pending,
            })
            .await;
        self.model.set_active_section(ActiveSection::MainContent).await;

        let controller = self.clone();
        tokio::spawn(async move {
            controller.fetch_artist(id).await;
        });
    }

    async fn fetch_artist(&self, id: ArtistId) {
        let result = self.catalog.artist(id.as_str()).await;
        crate::log_api_result!("artist", result);

        if !self.model.resolve_artist(&id, to_loadable(&result)).await {
            tracing::debug!(id = %id, "Artist page closed before it loaded");
        }
        if let Err(e) = result {
            self.model.set_error(Self::format_error(&e)).await;
        }
    }

    /// Fetch a genre shelf unless it is already populated or being fetched
    pub async fn ensure_genre(&self, genre: &str) {
        let key = BrowseKey::Genre(genre.to_string());
        if !self.model.begin_browse_fetch(key.clone()).await {
            return;
        }

        match self.catalog.genre(genre).await {
            Ok(collections) => {
                let collections = collections.unwrap_or_default();
                tracing::info!(genre, count = collections.len(), "Genre shelf loaded");
                self.model.fill_genre(genre, collections).await;
            }
            Err(e) => {
                tracing::error!(genre, error = %e, "Failed to load genre");
                self.model.abandon_browse_fetch(&key).await;
            }
        }
    }

    /// Fetch a chart unless it is already populated or being fetched
    pub async fn ensure_timeframe(&self, timeframe: Timeframe) {
        let key = BrowseKey::Chart(timeframe);
        if !self.model.begin_browse_fetch(key.clone()).await {
            return;
        }

        match self.catalog.chart(timeframe).await {
            Ok(Some(collection)) => {
                let queue = Queue::from_chart(timeframe, &collection);
                tracing::info!(timeframe = timeframe.id(), songs = queue.songs.len(), "Chart loaded");
                self.model.fill_chart(timeframe, queue).await;
            }
            Ok(None) => {
                tracing::debug!(timeframe = timeframe.id(), "Chart returned no data");
                self.model.fill_chart(timeframe, Queue::default()).await;
            }
            Err(e) => {
                tracing::error!(timeframe = timeframe.id(), error = %e, "Failed to load chart");
                self.model.abandon_browse_fetch(&key).await;
            }
        }
    }

    /// Warm every home screen shelf concurrently
    pub async fn load_home_sections(&self) {
        let genres = self.model.genres();
        let genre_loads = genres.iter().map(|g| self.ensure_genre(g));
        let chart_loads = Timeframe::ALL.iter().map(|&t| self.ensure_timeframe(t));
        futures::join!(join_all(genre_loads), join_all(chart_loads));
    }

    fn spawn_home_sections(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.load_home_sections().await;
        });
    }

    pub async fn open_genre(&self, name: String) {
        self.model.push_view(ContentView::Genre { name: name.clone() }).await;
        let controller = self.clone();
        tokio::spawn(async move {
            controller.ensure_genre(&name).await;
        });
    }

    pub async fn open_chart(&self, timeframe: Timeframe) {
        self.model.push_view(ContentView::Chart { timeframe }).await;
        let controller = self.clone();
        tokio::spawn(async move {
            controller.ensure_timeframe(timeframe).await;
        });
    }

    pub async fn open_sidebar_entry(&self, entry: SidebarEntry) {
        tracing::debug!(entry = entry.label(), "Opening sidebar entry");
        let view = match entry {
            SidebarEntry::Home => {
                self.spawn_home_sections();
                ContentView::Home
            }
            SidebarEntry::Charts => {
                self.spawn_home_sections();
                ContentView::Charts
            }
            SidebarEntry::LibraryAlbums => ContentView::LibraryAlbums,
            SidebarEntry::LibraryPlaylists => ContentView::LibraryPlaylists,
            SidebarEntry::UserPlaylists => ContentView::UserPlaylists,
            SidebarEntry::Following => ContentView::Following,
            SidebarEntry::FavoriteAlbums => ContentView::FavoriteAlbums,
            SidebarEntry::FavoritePlaylists => ContentView::FavoritePlaylists,
            SidebarEntry::Queue => ContentView::Queue,
        };
        self.model.reset_view(view).await;
        self.model.set_active_section(ActiveSection::MainContent).await;
    }

    pub async fn handle_selected_item(&self, item: SelectedItem) {
        match item {
            SelectedItem::Track { track, context } => {
                let queue = context.unwrap_or_else(|| Queue::single(&track));
                self.play_track_in(queue, &track.id).await;
            }
            SelectedItem::Collection { kind, id } => self.open_collection(kind, id).await,
            SelectedItem::Artist { id } => self.open_artist(id).await,
            SelectedItem::UserPlaylist { id } => {
                self.model.push_view(ContentView::UserPlaylist { id }).await;
            }
            SelectedItem::Genre { name } => self.open_genre(name).await,
            SelectedItem::Chart { timeframe } => self.open_chart(timeframe).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::controller::test_support::{controller, settle};
    use crate::model::mock::{MockCatalog, Scripted};
    use crate::model::{ArtistDetail, Collection, Track, TrackId};

    fn album(id: &str) -> Collection {
        Collection {
            id: CollectionId::new(id),
            name: format!("Album {}", id),
            kind: CollectionKind::Album,
            songs: vec![Track {
                id: TrackId::new(format!("{}-1", id)),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_open_collection_resolves_pending_page() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .albums
            .lock()
            .unwrap()
            .insert("a1".to_string(), Scripted::Data(album("a1")));
        let controller = controller(catalog.clone());

        controller.open_collection(CollectionKind::Album, CollectionId::new("a1")).await;
        settle().await;

        match controller.model.get_content_state().await.view {
            ContentView::Collection { detail: Loadable::Ready(Some(c)), .. } => assert_eq!(c.name, "Album a1"),
            other => panic!("unexpected view {:?}", other),
        }
        assert_eq!(catalog.calls(), vec!["album:a1".to_string()]);
    }

    #[tokio::test]
    async fn test_page_left_while_loading_is_ready_on_back() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .albums
            .lock()
            .unwrap()
            .insert("a1".to_string(), Scripted::Data(album("a1")));
        let controller = controller(catalog);

        controller.open_collection(CollectionKind::Album, CollectionId::new("a1")).await;
        controller.model.push_view(ContentView::Queue).await;
        settle().await;
        controller.model.navigate_back().await;

        match controller.model.get_content_state().await.view {
            ContentView::Collection { detail: Loadable::Ready(Some(c)), .. } => assert_eq!(c.name, "Album a1"),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_with_empty_id_does_nothing() {
        let catalog = Arc::new(MockCatalog::new());
        let controller = controller(catalog.clone());

        controller.open_collection(CollectionKind::Playlist, CollectionId::new("")).await;
        controller.open_artist(ArtistId::new("")).await;
        settle().await;

        assert!(catalog.calls().is_empty());
        assert_eq!(controller.model.get_content_state().await.view, ContentView::Home);
    }

    #[tokio::test]
    async fn test_missing_and_failed_details() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .artists
            .lock()
            .unwrap()
            .insert("bad".to_string(), Scripted::Fail);
        let controller = controller(catalog.clone());

        controller.open_collection(CollectionKind::Playlist, CollectionId::new("gone")).await;
        settle().await;
        assert!(matches!(
            controller.model.get_content_state().await.view,
            ContentView::Collection { detail: Loadable::Ready(None), .. }
        ));

        controller.open_artist(ArtistId::new("bad")).await;
        settle().await;
        assert!(matches!(
            controller.model.get_content_state().await.view,
            ContentView::Artist { detail: Loadable::Failed(_), .. }
        ));
        assert!(controller.model.has_error().await);
    }

    #[tokio::test]
    async fn test_artist_page_lists_songs_then_albums() {
        let catalog = Arc::new(MockCatalog::new());
        catalog.artists.lock().unwrap().insert(
            "ar".to_string(),
            Scripted::Data(ArtistDetail {
                id: ArtistId::new("ar"),
                name: "Artist".to_string(),
                top_songs: album("s").songs,
                top_albums: vec![album("x")],
                ..Default::default()
            }),
        );
        let controller = controller(catalog);

        controller.open_artist(ArtistId::new("ar")).await;
        settle().await;

        assert_eq!(controller.model.content_item_count().await, 2);
        assert_eq!(controller.model.focused_artist().await.map(|a| a.name), Some("Artist".to_string()));
    }

    #[tokio::test]
    async fn test_ensure_genre_fetches_once_when_cold() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .genres
            .lock()
            .unwrap()
            .insert("jazz".to_string(), Scripted::Data(vec![album("j1")]));
        let controller = controller(catalog.clone());

        controller.ensure_genre("jazz").await;
        controller.ensure_genre("jazz").await;

        assert_eq!(catalog.calls_to("genre"), vec!["genre:jazz".to_string()]);
        assert_eq!(controller.model.get_browse_cache().await.genre("jazz").len(), 1);
    }

    #[tokio::test]
    async fn test_empty_or_failed_shelf_is_retried() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .genres
            .lock()
            .unwrap()
            .insert("rock".to_string(), Scripted::Fail);
        let controller = controller(catalog.clone());

        controller.ensure_genre("rock").await;
        controller.ensure_genre("rock").await;
        controller.ensure_timeframe(Timeframe::Monthly).await;
        controller.ensure_timeframe(Timeframe::Monthly).await;

        assert_eq!(catalog.calls_to("genre").len(), 2);
        assert_eq!(catalog.calls_to("chart").len(), 2);
    }

    #[tokio::test]
    async fn test_ensure_timeframe_builds_chart_queue() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .charts
            .lock()
            .unwrap()
            .insert("weekly", Scripted::Data(album("w")));
        let controller = controller(catalog.clone());

        controller.ensure_timeframe(Timeframe::Weekly).await;
        controller.ensure_timeframe(Timeframe::Weekly).await;

        let cache = controller.model.get_browse_cache().await;
        let queue = cache.chart(Timeframe::Weekly).unwrap();
        assert_eq!(queue.name, "Weekly Top");
        assert_eq!(catalog.calls_to("chart"), vec!["chart:weekly".to_string()]);
    }

    #[tokio::test]
    async fn test_home_sections_load_every_shelf() {
        let catalog = Arc::new(MockCatalog::new());
        let controller = controller(catalog.clone());

        controller.load_home_sections().await;

        let mut calls = catalog.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                "chart:monthly",
                "chart:today",
                "chart:weekly",
                "chart:yearly",
                "genre:jazz",
                "genre:rock",
            ]
        );
    }

    #[tokio::test]
    async fn test_sidebar_entry_resets_navigation() {
        let catalog = Arc::new(MockCatalog::new());
        let controller = controller(catalog);

        controller.model.push_view(ContentView::Queue).await;
        controller.open_sidebar_entry(SidebarEntry::LibraryAlbums).await;

        let content = controller.model.get_content_state().await;
        assert_eq!(content.view, ContentView::LibraryAlbums);
        assert!(content.navigation_stack.is_empty());
        assert_eq!(controller.model.get_ui_state().await.active_section, ActiveSection::MainContent);
    }
}
