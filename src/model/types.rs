//! Core type definitions for the application

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::playback::Queue;

/// Catalog identifier of a track
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub String);

/// Catalog identifier of an album or playlist
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(pub String);

/// Catalog identifier of an artist
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(pub String);

/// Locally assigned identifier of a user-created playlist
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPlaylistId(pub u64);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(TrackId);
string_id!(CollectionId);
string_id!(ArtistId);

impl fmt::Display for UserPlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An artwork variant or a stream URL, tagged with its quality label
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLink {
    #[serde(default)]
    pub quality: String,
    #[serde(default, alias = "link")]
    pub url: String,
}

/// Pick the last (highest quality) variant of an ordered list
pub fn best_quality(links: &[MediaLink]) -> Option<&MediaLink> {
    links.last()
}

/// Reference to the album a track belongs to
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A followed or credited artist
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: ArtistId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Vec<MediaLink>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackArtists {
    #[serde(default)]
    pub primary: Vec<ArtistRef>,
    #[serde(default)]
    pub featured: Vec<ArtistRef>,
    #[serde(default)]
    pub all: Vec<ArtistRef>,
}

/// A playable catalog track
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub album: AlbumRef,
    /// Length in seconds. The catalog sends either a number or a numeric string.
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub artists: TrackArtists,
    #[serde(default)]
    pub image: Vec<MediaLink>,
    #[serde(default)]
    pub download_url: Vec<MediaLink>,
}

impl Track {
    /// Primary artist names joined for display
    pub fn artist_line(&self) -> String {
        let source = if self.artists.primary.is_empty() {
            &self.artists.all
        } else {
            &self.artists.primary
        };
        source
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn album_name(&self) -> &str {
        self.album.name.as_deref().unwrap_or_default()
    }

    pub fn stream_url(&self) -> Option<&str> {
        best_quality(&self.download_url).map(|l| l.url.as_str())
    }
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => match n.as_u64() {
            Some(v) => u32::try_from(v).ok(),
            None => n.as_f64().and_then(seconds_from_float),
        },
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            s.parse::<u32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(seconds_from_float))
        }
        _ => None,
    })
}

/// Whole seconds, or `None` for negative, non-finite or out-of-range values
fn seconds_from_float(value: f64) -> Option<u32> {
    if value.is_finite() && (0.0..=u32::MAX as f64).contains(&value) {
        Some(value.round() as u32)
    } else {
        None
    }
}

/// Kind of catalog collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    #[default]
    Album,
    Playlist,
}

impl CollectionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Album => "Album",
            Self::Playlist => "Playlist",
        }
    }
}

/// An album or playlist from the catalog
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: CollectionKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Vec<MediaLink>,
    #[serde(default)]
    pub songs: Vec<Track>,
}

impl Collection {
    pub fn is_same(&self, other: &Collection) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

/// A playlist created locally by the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPlaylist {
    pub id: UserPlaylistId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub songs: Vec<Track>,
}

/// Artist page payload
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDetail {
    pub id: ArtistId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Vec<MediaLink>,
    #[serde(default)]
    pub top_songs: Vec<Track>,
    #[serde(default)]
    pub top_albums: Vec<Collection>,
}

impl ArtistDetail {
    pub fn to_artist_ref(&self) -> ArtistRef {
        ArtistRef {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

/// Chart windows shown on the home screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Today,
    Weekly,
    Monthly,
    Yearly,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [Self::Today, Self::Weekly, Self::Monthly, Self::Yearly];

    pub fn id(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today's Top",
            Self::Weekly => "Weekly Top",
            Self::Monthly => "Monthly Top",
            Self::Yearly => "Yearly Top",
        }
    }
}

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Sidebar,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Sidebar,
            ActiveSection::Sidebar => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::Sidebar => ActiveSection::Search,
            ActiveSection::MainContent => ActiveSection::Sidebar,
        }
    }
}

/// Entries of the sidebar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SidebarEntry {
    Home,
    Charts,
    LibraryAlbums,
    LibraryPlaylists,
    UserPlaylists,
    Following,
    FavoriteAlbums,
    FavoritePlaylists,
    Queue,
}

impl SidebarEntry {
    pub const ALL: [SidebarEntry; 9] = [
        Self::Home,
        Self::Charts,
        Self::LibraryAlbums,
        Self::LibraryPlaylists,
        Self::UserPlaylists,
        Self::Following,
        Self::FavoriteAlbums,
        Self::FavoritePlaylists,
        Self::Queue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Charts => "Charts",
            Self::LibraryAlbums => "Albums",
            Self::LibraryPlaylists => "Playlists",
            Self::UserPlaylists => "My Playlists",
            Self::Following => "Following",
            Self::FavoriteAlbums => "Favorite Albums",
            Self::FavoritePlaylists => "Favorite Playlists",
            Self::Queue => "Queue",
        }
    }
}

/// Which bucket of search results is selected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchResultSection {
    #[default]
    TopQuery,
    Songs,
    Albums,
    Artists,
    Playlists,
}

impl SearchResultSection {
    pub const ALL: [SearchResultSection; 5] = [
        Self::TopQuery,
        Self::Songs,
        Self::Albums,
        Self::Artists,
        Self::Playlists,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::TopQuery => Self::Songs,
            Self::Songs => Self::Albums,
            Self::Albums => Self::Artists,
            Self::Artists => Self::Playlists,
            Self::Playlists => Self::TopQuery,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::TopQuery => Self::Playlists,
            Self::Songs => Self::TopQuery,
            Self::Albums => Self::Songs,
            Self::Artists => Self::Albums,
            Self::Playlists => Self::Artists,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TopQuery => "Top",
            Self::Songs => "Songs",
            Self::Albums => "Albums",
            Self::Artists => "Artists",
            Self::Playlists => "Playlists",
        }
    }
}

/// Represents a selected item for action handling
#[derive(Clone, Debug)]
pub enum SelectedItem {
    /// A song, with the collection it was listed in (if any)
    Track { track: Track, context: Option<Queue> },
    Collection { kind: CollectionKind, id: CollectionId },
    Artist { id: ArtistId },
    UserPlaylist { id: UserPlaylistId },
    Genre { name: String },
    Chart { timeframe: Timeframe },
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    pub sidebar_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_query: String::new(),
            sidebar_selected: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}

impl UiState {
    pub fn selected_sidebar_entry(&self) -> SidebarEntry {
        SidebarEntry::ALL
            .get(self.sidebar_selected)
            .copied()
            .unwrap_or(SidebarEntry::Home)
    }
}
