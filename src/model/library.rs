//! The user's saved collections, follows and favorites

use serde::{Deserialize, Serialize};

use super::types::{ArtistId, ArtistRef, Collection, CollectionId, Track, TrackId, UserPlaylist, UserPlaylistId};

/// Saved albums, playlists, follows and user-created playlists.
///
/// Adds always append; callers check membership first. Removes filter by id and
/// are idempotent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(default)]
    pub albums: Vec<Collection>,
    #[serde(default)]
    pub playlists: Vec<Collection>,
    #[serde(default)]
    pub user_playlists: Vec<UserPlaylist>,
    #[serde(default)]
    pub followings: Vec<ArtistRef>,
}

impl Library {
    pub fn add_album(&mut self, album: Collection) {
        self.albums.push(album);
    }

    pub fn remove_album(&mut self, id: &CollectionId) {
        self.albums.retain(|a| &a.id != id);
    }

    pub fn has_album(&self, id: &CollectionId) -> bool {
        self.albums.iter().any(|a| &a.id == id)
    }

    pub fn add_playlist(&mut self, playlist: Collection) {
        self.playlists.push(playlist);
    }

    pub fn remove_playlist(&mut self, id: &CollectionId) {
        self.playlists.retain(|p| &p.id != id);
    }

    pub fn has_playlist(&self, id: &CollectionId) -> bool {
        self.playlists.iter().any(|p| &p.id == id)
    }

    pub fn add_following(&mut self, artist: ArtistRef) {
        self.followings.push(artist);
    }

    pub fn remove_following(&mut self, id: &ArtistId) {
        self.followings.retain(|a| &a.id != id);
    }

    pub fn is_following(&self, id: &ArtistId) -> bool {
        self.followings.iter().any(|a| &a.id == id)
    }

    pub fn add_user_playlist(&mut self, playlist: UserPlaylist) {
        self.user_playlists.push(playlist);
    }

    pub fn remove_user_playlist(&mut self, id: UserPlaylistId) {
        self.user_playlists.retain(|p| p.id != id);
    }

    pub fn user_playlist(&self, id: UserPlaylistId) -> Option<&UserPlaylist> {
        self.user_playlists.iter().find(|p| p.id == id)
    }

    /// Next free numeric id for a user playlist
    pub fn next_user_playlist_id(&self) -> UserPlaylistId {
        let max = self.user_playlists.iter().map(|p| p.id.0).max().unwrap_or(0);
        match max.checked_add(1) {
            Some(next) => UserPlaylistId(next),
            // Top of the range is taken, fall back to the lowest free id
            None => (1..)
                .map(UserPlaylistId)
                .find(|id| self.user_playlist(*id).is_none())
                .unwrap_or_default(),
        }
    }

    /// Returns false if the playlist does not exist
    pub fn add_song_to_user_playlist(&mut self, id: UserPlaylistId, track: Track) -> bool {
        match self.user_playlists.iter_mut().find(|p| p.id == id) {
            Some(playlist) => {
                playlist.songs.push(track);
                true
            }
            None => false,
        }
    }

    pub fn remove_song_from_user_playlist(&mut self, id: UserPlaylistId, track_id: &TrackId) {
        if let Some(playlist) = self.user_playlists.iter_mut().find(|p| p.id == id) {
            playlist.songs.retain(|t| &t.id != track_id);
        }
    }

    pub fn rename_user_playlist(&mut self, id: UserPlaylistId, name: String) -> bool {
        match self.user_playlists.iter_mut().find(|p| p.id == id) {
            Some(playlist) => {
                playlist.name = name;
                true
            }
            None => false,
        }
    }
}

/// Liked albums and playlists. Kept for the session only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Favorites {
    pub albums: Vec<Collection>,
    pub playlists: Vec<Collection>,
}

impl Favorites {
    pub fn add_album(&mut self, album: Collection) {
        self.albums.push(album);
    }

    pub fn remove_album(&mut self, id: &CollectionId) {
        self.albums.retain(|a| &a.id != id);
    }

    pub fn has_album(&self, id: &CollectionId) -> bool {
        self.albums.iter().any(|a| &a.id == id)
    }

    pub fn add_playlist(&mut self, playlist: Collection) {
        self.playlists.push(playlist);
    }

    pub fn remove_playlist(&mut self, id: &CollectionId) {
        self.playlists.retain(|p| &p.id != id);
    }

    pub fn has_playlist(&self, id: &CollectionId) -> bool {
        self.playlists.iter().any(|p| &p.id == id)
    }
}
