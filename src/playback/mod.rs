// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback for the page playlist.
//!
//! This module provides:
//! - Track ids, playlist metadata and the registered catalog
//! - The audio resource trait and a simulated backend
//! - The playback manager enforcing a single active track

pub mod catalog;
pub mod manager;
pub mod resource;
pub mod simulated;

pub use catalog::{default_playlist, Track, TrackCatalog, TrackId, TrackInfo, TRACK_COUNT};
pub use manager::{PendingStart, PlayOutcome, PlaybackManager, Settled, StartTicket, ToggleOutcome};
pub use resource::{AudioResource, ResourceHook, ResourceSignal, StartError, StartFuture};
pub use simulated::{AutoplayGate, SimulatedResource};

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Volume used at startup and when unmuting
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Playback state owned by the manager
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Selected track (None = nothing selected yet)
    pub current: Option<TrackId>,
    /// Whether the selected track is audibly playing
    pub playing: bool,
    /// Volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            playing: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl PlaybackState {
    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume == 0.0
    }

    /// Volume as a whole percentage
    pub fn volume_percent(&self) -> u32 {
        (self.volume * 100.0).round() as u32
    }
}

/// Playback error types.
///
/// None of these are fatal; callers log them and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The track id has no registered resource
    #[error("audio resource not found for {0}")]
    MissingResource(TrackId),
    /// Host policy refused to start audio
    #[error("playback of {track} denied: {reason}")]
    StartDenied { track: TrackId, reason: String },
    /// The resource failed to start
    #[error("playback of {track} failed: {reason}")]
    StartFailed { track: TrackId, reason: String },
    /// Play/pause was requested before any track was selected
    #[error("no track selected")]
    NoTrackSelected,
}

/// Read-only snapshot for manual inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugInfo {
    /// Crate version
    pub version: String,
    /// Number of registered tracks
    pub tracks_loaded: usize,
    /// Current track id
    pub current_track: Option<TrackId>,
    /// Current track title
    pub current_title: Option<String>,
    /// Whether playing
    pub playing: bool,
    /// Volume percentage
    pub volume_percent: u32,
}

impl fmt::Display for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{}", rule)?;
        writeln!(f, "SIGNATURE: THE AWAKENING - Debug Info (v{})", self.version)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Audio files loaded: {}", self.tracks_loaded)?;
        match (&self.current_track, &self.current_title) {
            (Some(id), Some(title)) => writeln!(f, "Current song: {} ({})", id, title)?,
            (Some(id), None) => writeln!(f, "Current song: {}", id)?,
            _ => writeln!(f, "Current song: None")?,
        }
        writeln!(f, "Is playing: {}", self.playing)?;
        writeln!(f, "Volume: {}%", self.volume_percent)?;
        write!(f, "{}", rule)
    }
}
