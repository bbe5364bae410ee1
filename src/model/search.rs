//! Search result shapes and query normalization

use serde::{Deserialize, Serialize};

use super::types::{MediaLink, SearchResultSection, Track, TrackId};

/// Minimum trimmed query length that is sent to the catalog
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// A single entry of a result bucket
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// "song", "album", "artist" or "playlist"
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Vec<MediaLink>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SearchHit {
    /// Playable stand-in for a song hit. Hits carry no stream links.
    pub fn to_track(&self) -> Track {
        Track {
            id: TrackId::new(self.id.clone()),
            name: self.title.clone(),
            image: self.image.clone(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBucket {
    #[serde(default)]
    pub results: Vec<SearchHit>,
    /// Display order of this bucket on the results page
    #[serde(default)]
    pub position: u32,
}

/// The five result buckets of a search. `Default` is the empty shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub top_query: ResultBucket,
    #[serde(default)]
    pub songs: ResultBucket,
    #[serde(default)]
    pub albums: ResultBucket,
    #[serde(default)]
    pub artists: ResultBucket,
    #[serde(default)]
    pub playlists: ResultBucket,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        SearchResultSection::ALL
            .iter()
            .all(|s| self.bucket(*s).results.is_empty())
    }

    pub fn bucket(&self, section: SearchResultSection) -> &ResultBucket {
        match section {
            SearchResultSection::TopQuery => &self.top_query,
            SearchResultSection::Songs => &self.songs,
            SearchResultSection::Albums => &self.albums,
            SearchResultSection::Artists => &self.artists,
            SearchResultSection::Playlists => &self.playlists,
        }
    }

    /// First non-empty section, by bucket position
    pub fn first_populated(&self) -> SearchResultSection {
        let mut sections = SearchResultSection::ALL.to_vec();
        sections.sort_by_key(|s| self.bucket(*s).position);
        sections
            .into_iter()
            .find(|s| !self.bucket(*s).results.is_empty())
            .unwrap_or_default()
    }
}

/// Search results together with the query that produced them
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub results: SearchResults,
}

/// Phases of the debounced search pipeline
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Idle,
    Debouncing { query: String },
    InFlight { query: String, seq: u64 },
    Settled { query: String },
}

/// Trim the query and join its words with `+`.
///
/// Returns `None` when the trimmed query is shorter than `min_len` characters.
pub fn normalize_query(raw: &str, min_len: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < min_len {
        return None;
    }
    Some(trimmed.split_whitespace().collect::<Vec<_>>().join("+"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_joins_words_with_plus() {
        assert_eq!(
            normalize_query("new value", DEFAULT_MIN_QUERY_LEN).as_deref(),
            Some("new+value")
        );
        assert_eq!(
            normalize_query("  lo   fi  beats ", DEFAULT_MIN_QUERY_LEN).as_deref(),
            Some("lo+fi+beats")
        );
    }

    #[test]
    fn test_normalize_rejects_short_queries() {
        assert_eq!(normalize_query("a", DEFAULT_MIN_QUERY_LEN), None);
        assert_eq!(normalize_query("  a  ", DEFAULT_MIN_QUERY_LEN), None);
        assert_eq!(normalize_query("", DEFAULT_MIN_QUERY_LEN), None);
        assert_eq!(normalize_query("ab", DEFAULT_MIN_QUERY_LEN).as_deref(), Some("ab"));
    }

    #[test]
    fn test_default_results_are_empty() {
        let results = SearchResults::default();
        assert!(results.is_empty());
        assert_eq!(results.first_populated(), SearchResultSection::TopQuery);
    }

    #[test]
    fn test_results_decode_from_catalog_shape() {
        let raw = r#"{
            "topQuery": {"results": [{"id": "s1", "title": "Hit", "type": "song"}], "position": 0},
            "songs": {"results": [{"id": "s1", "title": "Hit", "type": "song"}], "position": 1},
            "albums": {"results": [], "position": 2},
            "artists": {"results": [], "position": 3},
            "playlists": {"results": [], "position": 4}
        }"#;
        let results: SearchResults = serde_json::from_str(raw).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results.songs.results[0].kind, "song");
        assert_eq!(results.first_populated(), SearchResultSection::TopQuery);
    }
}
