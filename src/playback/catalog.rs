// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Track identifiers, playlist metadata and the registered track catalog.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::resource::AudioResource;

/// Number of tracks on the page playlist
pub const TRACK_COUNT: usize = 11;

/// Title shown for ids that have no playlist entry
pub const UNKNOWN_TITLE: &str = "Unknown Song";

/// Identifier of a track (e.g. `song3`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a track id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the n-th playlist track (1-based)
    pub fn numbered(n: usize) -> Self {
        Self(format!("song{}", n))
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for TrackId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Playlist entry: id and display title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Track id
    pub id: TrackId,
    /// Display title
    pub title: String,
}

impl TrackInfo {
    /// Create a playlist entry
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// The page playlist, in page order
pub fn default_playlist() -> Vec<TrackInfo> {
    [
        "Your Mind's On Lockdown",
        "Vengeance",
        "Attacks The Brain",
        "For Your Protection",
        "Confirmation",
        "Numb",
        "Life Without Instructions",
        "Meditation (Ride That Wave)",
        "Tree Of Life",
        "Amazing Me",
        "Self Explorer",
    ]
    .iter()
    .enumerate()
    .map(|(i, title)| TrackInfo::new(TrackId::numbered(i + 1), *title))
    .collect()
}

/// A registered track: playlist info plus its audio resource
pub struct Track {
    info: TrackInfo,
    resource: Box<dyn AudioResource>,
}

impl Track {
    /// Create a track
    pub fn new(info: TrackInfo, resource: Box<dyn AudioResource>) -> Self {
        Self { info, resource }
    }

    /// Track id
    pub fn id(&self) -> &TrackId {
        &self.info.id
    }

    /// Display title
    pub fn title(&self) -> &str {
        &self.info.title
    }

    /// Get resource reference
    pub fn resource(&self) -> &dyn AudioResource {
        self.resource.as_ref()
    }

    /// Get mutable resource reference
    pub fn resource_mut(&mut self) -> &mut dyn AudioResource {
        self.resource.as_mut()
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track").field("info", &self.info).finish_non_exhaustive()
    }
}

/// Registered tracks, keyed by id, kept in registration order.
///
/// Built once at startup. Ids that were never registered are simply absent.
#[derive(Debug, Default)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
    index: HashMap<TrackId, usize>,
}

impl TrackCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a track. A second registration under the same id replaces
    /// the first.
    pub fn register(&mut self, info: TrackInfo, resource: Box<dyn AudioResource>) {
        let track = Track::new(info, resource);
        match self.index.get(track.id()) {
            Some(&slot) => self.tracks[slot] = track,
            None => {
                self.index.insert(track.id().clone(), self.tracks.len());
                self.tracks.push(track);
            }
        }
    }

    /// Look up a track
    pub fn get(&self, id: &str) -> Option<&Track> {
        self.index.get(id).map(|&slot| &self.tracks[slot])
    }

    /// Look up a track mutably
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Track> {
        match self.index.get(id) {
            Some(&slot) => self.tracks.get_mut(slot),
            None => None,
        }
    }

    /// Check whether an id has a resource
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Title for an id, or [`UNKNOWN_TITLE`]
    pub fn title_of(&self, id: &str) -> &str {
        self.get(id).map(Track::title).unwrap_or(UNKNOWN_TITLE)
    }

    /// Number of registered tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if no tracks are registered
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate tracks in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Iterate tracks mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.iter_mut()
    }
}
