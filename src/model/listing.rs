//! Selectable rows of each content view
//!
//! The view renders rows in this order and the controller resolves the
//! highlighted row through the same functions, so both always agree.

use super::browse::BrowseCache;
use super::content::{ContentView, Loadable};
use super::library::{Favorites, Library};
use super::playback::{NowPlaying, Queue};
use super::search::{SearchHit, SearchResults};
use super::types::{
    ArtistId, ArtistRef, Collection, CollectionId, CollectionKind, SearchResultSection,
    SelectedItem, Timeframe, Track,
};

/// Borrowed view over everything a content pane can list
pub struct Listing<'a> {
    pub library: &'a Library,
    pub favorites: &'a Favorites,
    pub search: &'a SearchResults,
    pub browse: &'a BrowseCache,
    pub now_playing: &'a NowPlaying,
    pub genres: &'a [String],
}

fn tracks_in(queue: &Queue) -> Vec<SelectedItem> {
    queue
        .songs
        .iter()
        .map(|track| SelectedItem::Track {
            track: track.clone(),
            context: Some(queue.clone()),
        })
        .collect()
}

fn collections(items: &[Collection]) -> Vec<SelectedItem> {
    items
        .iter()
        .map(|c| SelectedItem::Collection {
            kind: c.kind,
            id: c.id.clone(),
        })
        .collect()
}

fn hit_item(section: SearchResultSection, hit: &SearchHit) -> SelectedItem {
    let kind = match hit.kind.as_str() {
        "song" => SearchResultSection::Songs,
        "album" => SearchResultSection::Albums,
        "artist" => SearchResultSection::Artists,
        "playlist" => SearchResultSection::Playlists,
        _ => section,
    };
    match kind {
        SearchResultSection::Albums => SelectedItem::Collection {
            kind: CollectionKind::Album,
            id: CollectionId::new(hit.id.clone()),
        },
        SearchResultSection::Playlists => SelectedItem::Collection {
            kind: CollectionKind::Playlist,
            id: CollectionId::new(hit.id.clone()),
        },
        SearchResultSection::Artists => SelectedItem::Artist {
            id: ArtistId::new(hit.id.clone()),
        },
        SearchResultSection::Songs | SearchResultSection::TopQuery => SelectedItem::Track {
            track: hit.to_track(),
            context: None,
        },
    }
}

impl Listing<'_> {
    pub fn items(&self, view: &ContentView) -> Vec<SelectedItem> {
        match view {
            ContentView::Home => {
                let mut items: Vec<SelectedItem> = Timeframe::ALL
                    .iter()
                    .map(|&timeframe| SelectedItem::Chart { timeframe })
                    .collect();
                items.extend(
                    self.genres
                        .iter()
                        .map(|name| SelectedItem::Genre { name: name.clone() }),
                );
                items
            }
            ContentView::Charts => Timeframe::ALL
                .iter()
                .map(|&timeframe| SelectedItem::Chart { timeframe })
                .collect(),
            ContentView::Genre { name } => collections(self.browse.genre(name)),
            ContentView::Chart { timeframe } => self.browse.chart(*timeframe).map(tracks_in).unwrap_or_default(),
            ContentView::SearchResults { section } => self
                .search
                .bucket(*section)
                .results
                .iter()
                .map(|hit| hit_item(*section, hit))
                .collect(),
            ContentView::Collection { detail, .. } => match detail {
                Loadable::Ready(Some(collection)) => tracks_in(&Queue::from(collection)),
                _ => Vec::new(),
            },
            ContentView::Artist { detail, .. } => match detail {
                Loadable::Ready(Some(artist)) => {
                    let mut items: Vec<SelectedItem> = artist
                        .top_songs
                        .iter()
                        .map(|track| SelectedItem::Track {
                            track: track.clone(),
                            context: None,
                        })
                        .collect();
                    items.extend(collections(&artist.top_albums));
                    items
                }
                _ => Vec::new(),
            },
            ContentView::LibraryAlbums => collections(&self.library.albums),
            ContentView::LibraryPlaylists => collections(&self.library.playlists),
            ContentView::UserPlaylists => self
                .library
                .user_playlists
                .iter()
                .map(|p| SelectedItem::UserPlaylist { id: p.id })
                .collect(),
            ContentView::UserPlaylist { id } => self
                .library
                .user_playlist(*id)
                .map(|p| tracks_in(&Queue::from(p)))
                .unwrap_or_default(),
            ContentView::Following => self
                .library
                .followings
                .iter()
                .map(|a| SelectedItem::Artist { id: a.id.clone() })
                .collect(),
            ContentView::FavoriteAlbums => collections(&self.favorites.albums),
            ContentView::FavoritePlaylists => collections(&self.favorites.playlists),
            ContentView::Queue => tracks_in(&self.now_playing.queue),
        }
    }

    pub fn item_at(&self, view: &ContentView, index: usize) -> Option<SelectedItem> {
        self.items(view).into_iter().nth(index)
    }

    /// Full collection behind the highlighted row or the open detail page
    pub fn collection_at(&self, view: &ContentView, index: usize) -> Option<Collection> {
        let pick = |list: &[Collection]| list.get(index).cloned();
        match view {
            ContentView::Collection {
                detail: Loadable::Ready(Some(collection)),
                ..
            } => Some(collection.clone()),
            ContentView::Genre { name } => pick(self.browse.genre(name)),
            ContentView::LibraryAlbums => pick(&self.library.albums),
            ContentView::LibraryPlaylists => pick(&self.library.playlists),
            ContentView::FavoriteAlbums => pick(&self.favorites.albums),
            ContentView::FavoritePlaylists => pick(&self.favorites.playlists),
            ContentView::Artist {
                detail: Loadable::Ready(Some(artist)),
                ..
            } => index
                .checked_sub(artist.top_songs.len())
                .and_then(|i| artist.top_albums.get(i).cloned()),
            _ => None,
        }
    }

    pub fn artist_at(&self, view: &ContentView, index: usize) -> Option<ArtistRef> {
        match view {
            ContentView::Artist {
                detail: Loadable::Ready(Some(artist)),
                ..
            } => Some(artist.to_artist_ref()),
            ContentView::Following => self.library.followings.get(index).cloned(),
            _ => None,
        }
    }

    /// Queue that "play all" would load for this view
    pub fn queue_for(&self, view: &ContentView, index: usize) -> Option<Queue> {
        match view {
            ContentView::Chart { timeframe } => self.browse.chart(*timeframe).cloned(),
            ContentView::UserPlaylist { id } => self.library.user_playlist(*id).map(Queue::from),
            ContentView::UserPlaylists => self.library.user_playlists.get(index).map(Queue::from),
            ContentView::Queue => Some(self.now_playing.queue.clone()),
            _ => self.collection_at(view, index).as_ref().map(Queue::from),
        }
    }

    /// The song on the highlighted row, if the row is a song
    pub fn track_at(&self, view: &ContentView, index: usize) -> Option<Track> {
        match self.item_at(view, index)? {
            SelectedItem::Track { track, .. } => Some(track),
            _ => None,
        }
    }
}
