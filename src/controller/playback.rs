//! Playback, library and favorites actions

use crate::model::{ContentView, LoadOutcome, Queue, SelectedItem, TrackId};
use super::AppController;

impl AppController {
    /// Start `queue` at the given song
    pub async fn play_track_in(&self, queue: Queue, track_id: &TrackId) {
        self.model.play_from(queue, track_id).await;
    }

    pub async fn toggle_playback(&self) {
        let playing = self.model.is_playing().await;
        self.model.set_playing(!playing).await;
        tracing::debug!(playing = self.model.is_playing().await, "Playback toggled");
    }

    pub async fn next_track(&self) {
        if !self.model.step_track(true).await {
            tracing::debug!("Already at the last song of the queue");
        }
    }

    pub async fn previous_track(&self) {
        if !self.model.step_track(false).await {
            tracing::debug!("Already at the first song of the queue");
        }
    }

    pub async fn toggle_shuffle(&self) {
        let shuffling = !self.model.is_shuffling().await;
        self.model.set_shuffling(shuffling).await;
        tracing::debug!(shuffling, "Shuffle toggled");
    }

    /// Load the whole collection in focus, or toggle it if it is already playing
    pub async fn play_focused(&self) {
        let Some(queue) = self.model.focused_queue().await else {
            return;
        };
        if queue.is_empty() {
            tracing::debug!(queue = %queue.name, "Nothing to play");
            return;
        }
        match self.model.load_queue(queue, true).await {
            LoadOutcome::Toggled => tracing::debug!("Active queue toggled in place"),
            LoadOutcome::Replaced => tracing::debug!("Queue replaced"),
        }
    }

    /// Save or unsave the focused album/playlist, or follow the focused artist
    pub async fn toggle_library_focused(&self) {
        if let Some(collection) = self.model.focused_collection().await {
            let saved = self.model.toggle_saved(&collection).await;
            tracing::info!(id = %collection.id, kind = collection.kind.label(), saved, "Library updated");
        } else if self.model.focused_artist().await.is_some() {
            self.toggle_follow_focused().await;
        }
    }

    pub async fn toggle_favorite_focused(&self) {
        if let Some(collection) = self.model.focused_collection().await {
            let favorited = self.model.toggle_favorite(&collection).await;
            tracing::info!(id = %collection.id, kind = collection.kind.label(), favorited, "Favorites updated");
        }
    }

    pub async fn toggle_follow_focused(&self) {
        if let Some(artist) = self.model.focused_artist().await {
            let id = artist.id.clone();
            let following = self.model.toggle_following(artist).await;
            tracing::info!(artist_id = %id, following, "Following updated");
        }
    }

    pub async fn create_user_playlist(&self) {
        let count = self.model.get_library().await.user_playlists.len();
        let name = format!("My Playlist #{}", count + 1);
        let id = self.model.create_user_playlist(name.clone()).await;
        tracing::info!(user_playlist_id = %id, name = %name, "User playlist created");
    }

    /// Add the focused song to the most recently created user playlist,
    /// creating one if none exists
    pub async fn add_focused_track_to_playlist(&self) {
        let Some(track) = self.model.focused_track().await else {
            return;
        };
        let newest = self
            .model
            .get_library()
            .await
            .user_playlists
            .iter()
            .map(|p| p.id)
            .max();
        let id = match newest {
            Some(id) => id,
            None => self.model.create_user_playlist("My Playlist #1".to_string()).await,
        };
        let track_id = track.id.clone();
        if self.model.add_song_to_user_playlist(id, track).await {
            tracing::info!(user_playlist_id = %id, track_id = %track_id, "Song added to user playlist");
        }
    }

    /// Rename the focused user playlist to whatever is in the search box
    pub async fn rename_focused_playlist(&self) {
        let Some(SelectedItem::UserPlaylist { id }) = self.model.selected_content_item().await else {
            return;
        };
        let name = self.model.get_ui_state().await.search_query.trim().to_string();
        if name.is_empty() {
            self.model
                .set_error("Type the new name in the search box first".to_string())
                .await;
            return;
        }
        if self.model.rename_user_playlist(id, name.clone()).await {
            tracing::info!(user_playlist_id = %id, name = %name, "User playlist renamed");
        }
    }

    /// Delete the focused user playlist, or the focused song from the open one
    pub async fn delete_focused(&self) {
        let content = self.model.get_content_state().await;
        match content.view {
            ContentView::UserPlaylists => {
                if let Some(SelectedItem::UserPlaylist { id }) = self.model.selected_content_item().await {
                    self.model.remove_user_playlist(id).await;
                    let remaining = self.model.content_item_count().await;
                    if content.selected_index >= remaining && remaining > 0 {
                        self.model.content_move(false).await;
                    }
                }
            }
            ContentView::UserPlaylist { id } => {
                if let Some(track) = self.model.focused_track().await {
                    self.model.remove_song_from_user_playlist(id, &track.id).await;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::controller::test_support::controller;
    use crate::model::mock::MockCatalog;
    use crate::model::{Collection, CollectionId, CollectionKind, Loadable, Track};

    fn playlist(id: &str, songs: &[&str]) -> Collection {
        Collection {
            id: CollectionId::new(id),
            name: format!("Playlist {}", id),
            kind: CollectionKind::Playlist,
            songs: songs
                .iter()
                .map(|s| Track {
                    id: TrackId::new(*s),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    async fn show_detail(controller: &AppController, collection: Collection) {
        controller
            .model
            .push_view(ContentView::Collection {
                kind: collection.kind,
                id: collection.id.clone(),
                detail: Loadable::Ready(Some(collection)),
            })
            .await;
    }

    #[tokio::test]
    async fn test_play_focused_toggles_in_place() {
        let controller = controller(Arc::new(MockCatalog::new()));
        show_detail(&controller, playlist("p1", &["t1", "t2"])).await;

        controller.play_focused().await;
        assert!(controller.model.is_playing().await);

        controller.play_focused().await;
        let now = controller.model.now_playing().await;
        assert!(!now.is_playing);
        assert_eq!(now.track.map(|t| t.id), Some(TrackId::new("t1")));
    }

    #[tokio::test]
    async fn test_toggle_playback_needs_a_track() {
        let controller = controller(Arc::new(MockCatalog::new()));
        controller.toggle_playback().await;
        assert!(!controller.model.is_playing().await);
    }

    #[tokio::test]
    async fn test_library_and_favorite_toggles() {
        let controller = controller(Arc::new(MockCatalog::new()));
        show_detail(&controller, playlist("p1", &["t1"])).await;

        controller.toggle_library_focused().await;
        controller.toggle_favorite_focused().await;
        assert_eq!(controller.model.get_library().await.playlists.len(), 1);
        assert_eq!(controller.model.get_favorites().await.playlists.len(), 1);

        controller.toggle_library_focused().await;
        assert!(controller.model.get_library().await.playlists.is_empty());
    }

    #[tokio::test]
    async fn test_add_song_creates_playlist_when_none_exist() {
        let controller = controller(Arc::new(MockCatalog::new()));
        show_detail(&controller, playlist("p1", &["t1", "t2"])).await;
        controller.model.content_move(true).await;

        controller.add_focused_track_to_playlist().await;

        let library = controller.model.get_library().await;
        assert_eq!(library.user_playlists.len(), 1);
        assert_eq!(library.user_playlists[0].songs[0].id, TrackId::new("t2"));
    }

    #[tokio::test]
    async fn test_delete_song_and_playlist() {
        let controller = controller(Arc::new(MockCatalog::new()));
        show_detail(&controller, playlist("p1", &["t1"])).await;
        controller.add_focused_track_to_playlist().await;
        let id = controller.model.get_library().await.user_playlists[0].id;

        controller.model.push_view(ContentView::UserPlaylist { id }).await;
        controller.delete_focused().await;
        assert!(controller.model.get_library().await.user_playlists[0].songs.is_empty());

        controller.model.reset_view(ContentView::UserPlaylists).await;
        controller.delete_focused().await;
        assert!(controller.model.get_library().await.user_playlists.is_empty());
    }

    #[tokio::test]
    async fn test_rename_uses_search_text() {
        let controller = controller(Arc::new(MockCatalog::new()));
        controller.create_user_playlist().await;
        controller.model.reset_view(ContentView::UserPlaylists).await;

        controller.rename_focused_playlist().await;
        assert!(controller.model.has_error().await);
        controller.model.clear_error().await;

        controller.model.update_search_query("Road Trip ".to_string()).await;
        controller.rename_focused_playlist().await;
        assert_eq!(controller.model.get_library().await.user_playlists[0].name, "Road Trip");
    }

    #[tokio::test]
    async fn test_next_and_previous_follow_queue_order() {
        let controller = controller(Arc::new(MockCatalog::new()));
        let p1 = playlist("p1", &["t1", "t2"]);
        controller.play_track_in(Queue::from(&p1), &TrackId::new("t1")).await;

        controller.next_track().await;
        controller.next_track().await;
        assert_eq!(
            controller.model.now_playing().await.track.map(|t| t.id),
            Some(TrackId::new("t2"))
        );
        controller.previous_track().await;
        assert_eq!(
            controller.model.now_playing().await.track.map(|t| t.id),
            Some(TrackId::new("t1"))
        );
    }
}
