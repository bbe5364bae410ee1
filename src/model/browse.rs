//! Lazily filled home screen caches: per-genre collections and per-timeframe charts

use std::collections::{HashMap, HashSet};

use super::playback::Queue;
use super::types::{Collection, Timeframe};

/// Addresses one cache entry
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BrowseKey {
    Genre(String),
    Chart(Timeframe),
}

/// Session-lifetime caches. An entry goes empty -> fetching -> populated and
/// is never fetched again once it holds at least one item.
#[derive(Clone, Debug, Default)]
pub struct BrowseCache {
    genres: HashMap<String, Vec<Collection>>,
    charts: HashMap<Timeframe, Queue>,
    fetching: HashSet<BrowseKey>,
}

impl BrowseCache {
    pub fn is_populated(&self, key: &BrowseKey) -> bool {
        match key {
            BrowseKey::Genre(genre) => self.genres.get(genre).is_some_and(|c| !c.is_empty()),
            BrowseKey::Chart(timeframe) => self.charts.get(timeframe).is_some_and(|q| !q.is_empty()),
        }
    }

    pub fn is_fetching(&self, key: &BrowseKey) -> bool {
        self.fetching.contains(key)
    }

    /// Claim a cold entry for fetching. Returns false if it is populated or
    /// another fetch already holds it.
    pub fn begin_fetch(&mut self, key: BrowseKey) -> bool {
        if self.is_populated(&key) {
            return false;
        }
        self.fetching.insert(key)
    }

    /// Release a claim without filling the entry, so a later trigger can retry
    pub fn abandon_fetch(&mut self, key: &BrowseKey) {
        self.fetching.remove(key);
    }

    pub fn fill_genre(&mut self, genre: &str, collections: Vec<Collection>) {
        self.fetching.remove(&BrowseKey::Genre(genre.to_string()));
        if collections.is_empty() {
            return;
        }
        self.genres.insert(genre.to_string(), collections);
    }

    pub fn fill_chart(&mut self, timeframe: Timeframe, queue: Queue) {
        self.fetching.remove(&BrowseKey::Chart(timeframe));
        if queue.is_empty() {
            return;
        }
        self.charts.insert(timeframe, queue);
    }

    pub fn genre(&self, genre: &str) -> &[Collection] {
        self.genres.get(genre).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn chart(&self, timeframe: Timeframe) -> Option<&Queue> {
        self.charts.get(&timeframe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{CollectionId, Track, TrackId};

    fn collection(id: &str) -> Collection {
        Collection {
            id: CollectionId::new(id),
            ..Default::default()
        }
    }

    #[test]
    fn test_populated_entry_is_not_refetched() {
        let mut cache = BrowseCache::default();
        let key = BrowseKey::Genre("jazz".to_string());

        assert!(cache.begin_fetch(key.clone()));
        // A second trigger while fetching is rejected
        assert!(!cache.begin_fetch(key.clone()));

        cache.fill_genre("jazz", vec![collection("c1")]);
        assert!(cache.is_populated(&key));
        assert!(!cache.is_fetching(&key));
        assert!(!cache.begin_fetch(key));
        assert_eq!(cache.genre("jazz").len(), 1);
    }

    #[test]
    fn test_empty_fill_leaves_entry_cold() {
        let mut cache = BrowseCache::default();
        let key = BrowseKey::Chart(Timeframe::Weekly);

        assert!(cache.begin_fetch(key.clone()));
        cache.fill_chart(Timeframe::Weekly, Queue::default());
        assert!(!cache.is_populated(&key));
        assert!(cache.begin_fetch(key.clone()));

        cache.abandon_fetch(&key);
        assert!(!cache.is_fetching(&key));
    }

    #[test]
    fn test_chart_fill() {
        let mut cache = BrowseCache::default();
        let chart = Collection {
            songs: vec![Track {
                id: TrackId::new("t1"),
                ..Default::default()
            }],
            ..collection("chart")
        };
        cache.begin_fetch(BrowseKey::Chart(Timeframe::Today));
        cache.fill_chart(Timeframe::Today, Queue::from_chart(Timeframe::Today, &chart));

        let queue = cache.chart(Timeframe::Today).unwrap();
        assert_eq!(queue.name, "Today's Top");
        assert_eq!(queue.songs.len(), 1);
        assert!(cache.chart(Timeframe::Yearly).is_none());
    }
}
