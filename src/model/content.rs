//! Content view state: what the main pane shows and the loading state of detail views

use super::types::{
    ArtistDetail, ArtistId, Collection, CollectionId, CollectionKind, SearchResultSection, Timeframe,
    UserPlaylistId,
};

/// Loading state of data a view is waiting for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Loadable<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Loadable::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Represents the current view in the main content area
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ContentView {
    /// Charts and genre shelves
    #[default]
    Home,
    Charts,
    Genre { name: String },
    Chart { timeframe: Timeframe },
    SearchResults { section: SearchResultSection },
    Collection {
        kind: CollectionKind,
        id: CollectionId,
        /// `Ready(None)` when the catalog had nothing for this id
        detail: Loadable<Option<Collection>>,
    },
    Artist {
        id: ArtistId,
        detail: Loadable<Option<ArtistDetail>>,
    },
    LibraryAlbums,
    LibraryPlaylists,
    UserPlaylists,
    UserPlaylist { id: UserPlaylistId },
    Following,
    FavoriteAlbums,
    FavoritePlaylists,
    Queue,
}

/// State for the main content area
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub view: ContentView,
    pub selected_index: usize,
    pub navigation_stack: Vec<(ContentView, usize)>,
}

impl ContentState {
    /// Show `view`, remembering the current one for back navigation
    pub fn push(&mut self, view: ContentView) {
        let previous = std::mem::replace(&mut self.view, view);
        self.navigation_stack.push((previous, self.selected_index));
        self.selected_index = 0;
    }

    /// Show `view` as a new root
    pub fn reset(&mut self, view: ContentView) {
        self.navigation_stack.clear();
        self.view = view;
        self.selected_index = 0;
    }

    pub fn back(&mut self) -> bool {
        match self.navigation_stack.pop() {
            Some((view, index)) => {
                self.view = view;
                self.selected_index = index;
                true
            }
            None => false,
        }
    }

    /// The current view followed by every view waiting on the back stack
    fn views_mut(&mut self) -> impl Iterator<Item = &mut ContentView> {
        std::iter::once(&mut self.view).chain(self.navigation_stack.iter_mut().map(|(view, _)| view))
    }

    /// Resolve every pending page for this collection, including pages the
    /// user has navigated away from. Returns false if none is open.
    pub fn resolve_collection(&mut self, kind: CollectionKind, id: &CollectionId, result: Loadable<Option<Collection>>) -> bool {
        let mut resolved = false;
        for view in self.views_mut() {
            if let ContentView::Collection { kind: k, id: current, detail } = view {
                if *k == kind && current == id && detail.is_pending() {
                    *detail = result.clone();
                    resolved = true;
                }
            }
        }
        resolved
    }

    /// Resolve every pending page for this artist. Returns false if none is open.
    pub fn resolve_artist(&mut self, id: &ArtistId, result: Loadable<Option<ArtistDetail>>) -> bool {
        let mut resolved = false;
        for view in self.views_mut() {
            if let ContentView::Artist { id: current, detail } = view {
                if current == id && detail.is_pending() {
                    *detail = result.clone();
                    resolved = true;
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_back_restore_selection() {
        let mut state = ContentState::default();
        state.selected_index = 3;
        state.push(ContentView::LibraryAlbums);
        assert_eq!(state.selected_index, 0);

        assert!(state.back());
        assert_eq!(state.view, ContentView::Home);
        assert_eq!(state.selected_index, 3);
        assert!(!state.back());
    }

    #[test]
    fn test_page_behind_another_is_resolved() {
        let mut state = ContentState::default();
        let first = CollectionId::new("a1");
        state.push(ContentView::Collection {
            kind: CollectionKind::Album,
            id: first.clone(),
            detail: Loadable::Pending,
        });
        state.push(ContentView::Collection {
            kind: CollectionKind::Album,
            id: CollectionId::new("a2"),
            detail: Loadable::Pending,
        });

        assert!(state.resolve_collection(CollectionKind::Album, &first, Loadable::Ready(None)));
        match &state.view {
            ContentView::Collection { detail, .. } => assert!(detail.is_pending()),
            other => panic!("unexpected view {:?}", other),
        }

        assert!(state.back());
        assert_eq!(
            state.view,
            ContentView::Collection {
                kind: CollectionKind::Album,
                id: first,
                detail: Loadable::Ready(None),
            }
        );
    }

    #[test]
    fn test_resolution_without_open_page_is_ignored() {
        let mut state = ContentState::default();
        assert!(!state.resolve_artist(&ArtistId::new("ar"), Loadable::Failed("gone".to_string())));
        assert_eq!(state.view, ContentView::Home);
    }
}
