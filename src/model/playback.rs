//! Playback session: the current track, the active queue and the play/shuffle flags

use super::types::{Collection, CollectionId, CollectionKind, MediaLink, Timeframe, Track, TrackId, UserPlaylist, UserPlaylistId};

/// Identity of a queue. Two queues are the same only if their keys are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueueKey {
    Catalog { kind: CollectionKind, id: CollectionId },
    User(UserPlaylistId),
    Chart(Timeframe),
}

/// The collection currently loaded for playback
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Queue {
    /// `None` when the source had no usable id; such a queue never matches another
    pub key: Option<QueueKey>,
    pub name: String,
    /// `None` when the source had no artwork
    pub image: Option<Vec<MediaLink>>,
    pub songs: Vec<Track>,
}

impl Queue {
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    fn artwork(image: &[MediaLink]) -> Option<Vec<MediaLink>> {
        if image.is_empty() {
            None
        } else {
            Some(image.to_vec())
        }
    }

    pub fn from_chart(timeframe: Timeframe, collection: &Collection) -> Self {
        Self {
            key: Some(QueueKey::Chart(timeframe)),
            name: timeframe.label().to_string(),
            image: Self::artwork(&collection.image),
            songs: collection.songs.clone(),
        }
    }

    /// A queue holding a single song, keyed by nothing
    pub fn single(track: &Track) -> Self {
        Self {
            key: None,
            name: track.name.clone(),
            image: Self::artwork(&track.image),
            songs: vec![track.clone()],
        }
    }

    fn position_of(&self, track_id: &TrackId) -> Option<usize> {
        self.songs.iter().position(|t| &t.id == track_id)
    }
}

impl From<&Collection> for Queue {
    fn from(collection: &Collection) -> Self {
        let key = if collection.id.is_empty() {
            None
        } else {
            Some(QueueKey::Catalog {
                kind: collection.kind,
                id: collection.id.clone(),
            })
        };
        Self {
            key,
            name: collection.name.clone(),
            image: Self::artwork(&collection.image),
            songs: collection.songs.clone(),
        }
    }
}

impl From<&UserPlaylist> for Queue {
    fn from(playlist: &UserPlaylist) -> Self {
        let image = playlist.songs.first().and_then(|t| Self::artwork(&t.image));
        Self {
            key: Some(QueueKey::User(playlist.id)),
            name: playlist.name.clone(),
            image,
            songs: playlist.songs.clone(),
        }
    }
}

/// What a call to [`NowPlaying::load`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The queue was already active; only the play flag flipped
    Toggled,
    /// A new queue and its first track were installed
    Replaced,
}

/// Single source of truth for what is playing.
///
/// Invariant: `is_playing` implies `track.is_some()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub track: Option<Track>,
    pub is_playing: bool,
    pub is_shuffling: bool,
    pub queue: Queue,
}

impl NowPlaying {
    pub fn is_active(&self, key: &QueueKey) -> bool {
        self.queue.key.as_ref() == Some(key)
    }

    /// Load a queue for playback, or toggle play/pause if it is already the active one.
    pub fn load(&mut self, queue: Queue, start_playing: bool) -> LoadOutcome {
        let same_queue = match (&queue.key, &self.queue.key) {
            (Some(incoming), Some(active)) => incoming == active,
            _ => false,
        };

        if same_queue {
            self.is_playing = !self.is_playing && self.track.is_some();
            return LoadOutcome::Toggled;
        }

        self.track = queue.songs.first().cloned();
        self.is_playing = start_playing && self.track.is_some();
        self.queue = queue;
        LoadOutcome::Replaced
    }

    /// Install `queue` and start at `track_id`. When the queue is already active
    /// only the track changes.
    pub fn play_from(&mut self, queue: Queue, track_id: &TrackId) {
        let same_queue = queue.key.is_some() && queue.key == self.queue.key;
        if !same_queue {
            self.queue = queue;
        }
        let index = self.queue.position_of(track_id).unwrap_or(0);
        self.track = self.queue.songs.get(index).cloned();
        self.is_playing = self.track.is_some();
    }

    /// Jump to a song of the active queue. Returns false if it is not queued.
    pub fn select_track(&mut self, track_id: &TrackId) -> bool {
        match self.queue.position_of(track_id) {
            Some(index) => {
                self.track = self.queue.songs.get(index).cloned();
                self.is_playing = true;
                true
            }
            None => false,
        }
    }

    /// Move one song forward or backward in stored queue order
    pub fn step(&mut self, forward: bool) -> bool {
        let Some(current) = self.track.as_ref() else {
            return false;
        };
        let Some(index) = self.queue.position_of(&current.id) else {
            return false;
        };
        let target = if forward {
            index + 1
        } else {
            match index.checked_sub(1) {
                Some(i) => i,
                None => return false,
            }
        };
        match self.queue.songs.get(target) {
            Some(track) => {
                self.track = Some(track.clone());
                true
            }
            None => false,
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        if playing && self.track.is_none() {
            return;
        }
        self.is_playing = playing;
    }

    pub fn set_shuffling(&mut self, shuffling: bool) {
        self.is_shuffling = shuffling;
    }
}

/// Snapshot of playback state for rendering the UI
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    pub now_playing: NowPlaying,
}

impl PlaybackInfo {
    pub fn track_name(&self) -> Option<&str> {
        self.now_playing.track.as_ref().map(|t| t.name.as_str())
    }
}
