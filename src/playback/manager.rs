// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback manager: the single owner of "what is playing".
//!
//! At most one track is active at a time. Starting a track stops the
//! previous one synchronously, then hands the caller a [`PendingStart`]
//! whose outcome must be fed back through [`PlaybackManager::settle`].
//! The playing flag only flips once that outcome says playback started.

use tracing::{debug, info, warn};

use super::catalog::{TrackCatalog, TrackId};
use super::resource::{ResourceHook, StartError, StartFuture};
use super::{DebugInfo, PlaybackError, PlaybackState, DEFAULT_VOLUME};

/// Identifies one start request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTicket {
    track: TrackId,
    generation: u64,
}

impl StartTicket {
    /// Track the request was made for
    pub fn track(&self) -> &TrackId {
        &self.track
    }

    /// Request sequence number
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A start request that has not settled yet
pub struct PendingStart {
    /// Ticket to hand back to [`PlaybackManager::settle`]
    pub ticket: StartTicket,
    /// Resolves when the resource started or refused
    pub future: StartFuture,
}

impl PendingStart {
    /// Wait for the resource and return the ticket with the outcome
    pub async fn wait(self) -> (StartTicket, Result<(), StartError>) {
        let result = self.future.await;
        (self.ticket, result)
    }
}

impl std::fmt::Debug for PendingStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingStart").field("ticket", &self.ticket).finish_non_exhaustive()
    }
}

/// Result of [`PlaybackManager::play`]
#[derive(Debug)]
pub enum PlayOutcome {
    /// Start requested; settle it when the future resolves
    Pending(PendingStart),
    /// The track is already current and playing; nothing changed
    AlreadyPlaying,
}

/// Result of [`PlaybackManager::toggle_play_pause`]
#[derive(Debug)]
pub enum ToggleOutcome {
    /// Playback was paused
    Paused,
    /// Resume requested; settle it like a play request
    Resuming(PendingStart),
}

/// Result of a successful [`PlaybackManager::settle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The current request started; playing is now true
    Started,
    /// The ticket was superseded by a later request and was ignored
    Stale,
}

/// Owns the registered tracks and the playback state
#[derive(Debug)]
pub struct PlaybackManager {
    catalog: TrackCatalog,
    state: PlaybackState,
    /// Ticket of the only start request allowed to settle
    pending: Option<StartTicket>,
    next_generation: u64,
}

impl PlaybackManager {
    /// Create a manager at the default volume
    pub fn new(catalog: TrackCatalog) -> Self {
        Self::with_volume(catalog, DEFAULT_VOLUME)
    }

    /// Create a manager with a starting volume, applied to every track
    pub fn with_volume(catalog: TrackCatalog, volume: f32) -> Self {
        let mut manager = Self {
            catalog,
            state: PlaybackState::default(),
            pending: None,
            next_generation: 0,
        };
        manager.set_volume(volume);
        info!("Playback manager ready with {} tracks", manager.catalog.len());
        manager
    }

    /// Get the playback state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Get the track catalog
    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    /// Current track id, if any
    pub fn current_track(&self) -> Option<&TrackId> {
        self.state.current.as_ref()
    }

    /// Title of the current track, if any
    pub fn current_title(&self) -> Option<&str> {
        self.state
            .current
            .as_ref()
            .map(|id| self.catalog.title_of(id.as_str()))
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    /// Current volume (0.0 - 1.0)
    pub fn volume(&self) -> f32 {
        self.state.volume
    }

    /// Check if a start request is waiting to settle
    pub fn has_pending_start(&self) -> bool {
        self.pending.is_some()
    }

    /// Play a track.
    ///
    /// A different active track is paused and rewound first. If the track is
    /// already current and playing this is a no-op; if it is current but not
    /// playing it resumes from where it stopped.
    pub fn play(&mut self, id: &str) -> Result<PlayOutcome, PlaybackError> {
        if !self.catalog.contains(id) {
            warn!("Audio resource not found for {}", id);
            return Err(PlaybackError::MissingResource(TrackId::from(id)));
        }

        debug!("Attempting to play: {} ({})", id, self.catalog.title_of(id));

        match self.state.current.as_ref() {
            Some(current) if current.as_str() == id => {
                if self.state.playing {
                    debug!("{} is already playing", id);
                    return Ok(PlayOutcome::AlreadyPlaying);
                }
            }
            Some(_) => self.stop_current(),
            None => {}
        }

        self.state.current = Some(TrackId::from(id));
        self.request_start(id).map(PlayOutcome::Pending)
    }

    /// Pause if playing, resume if paused.
    ///
    /// Does nothing when no track has been selected yet.
    pub fn toggle_play_pause(&mut self) -> Result<ToggleOutcome, PlaybackError> {
        let current = match self.state.current.clone() {
            Some(current) => current,
            None => {
                info!("No track selected yet");
                return Err(PlaybackError::NoTrackSelected);
            }
        };

        if self.state.playing {
            self.pause();
            return Ok(ToggleOutcome::Paused);
        }

        debug!("Resuming {}", current);
        self.request_start(current.as_str()).map(ToggleOutcome::Resuming)
    }

    /// Pause the current track, keeping its position.
    pub fn pause(&mut self) {
        let Some(current) = self.state.current.clone() else {
            return;
        };
        if let Some(track) = self.catalog.get_mut(current.as_str()) {
            track.resource_mut().pause();
        }
        self.pending = None;
        if self.state.playing {
            self.state.playing = false;
            info!("Paused {}", current);
        }
    }

    /// Apply the outcome of a start request.
    ///
    /// Only the most recent request may change state; older tickets are
    /// reported as [`Settled::Stale`]. A stale request that did start a track
    /// which is no longer current gets that track stopped again.
    pub fn settle(
        &mut self,
        ticket: StartTicket,
        result: Result<(), StartError>,
    ) -> Result<Settled, PlaybackError> {
        if self.pending.as_ref() != Some(&ticket) {
            debug!(
                "Ignoring stale start of {} (request {})",
                ticket.track, ticket.generation
            );
            let is_current = self.state.current.as_ref() == Some(&ticket.track);
            if result.is_ok() && !is_current {
                if let Some(track) = self.catalog.get_mut(ticket.track.as_str()) {
                    track.resource_mut().pause();
                    track.resource_mut().rewind();
                }
            }
            return Ok(Settled::Stale);
        }

        self.pending = None;
        match result {
            Ok(()) => {
                self.state.playing = true;
                info!("Now playing: {}", self.catalog.title_of(ticket.track.as_str()));
                Ok(Settled::Started)
            }
            Err(err) => {
                self.state.playing = false;
                warn!("Playback of {} did not start: {}", ticket.track, err);
                Err(match err {
                    StartError::Denied(reason) => PlaybackError::StartDenied {
                        track: ticket.track,
                        reason,
                    },
                    StartError::Failed(reason) => PlaybackError::StartFailed {
                        track: ticket.track,
                        reason,
                    },
                })
            }
        }
    }

    /// Set the volume for every track, clamped to 0.0 - 1.0.
    ///
    /// Returns the stored value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.state.volume = volume;
        for track in self.catalog.iter_mut() {
            track.resource_mut().set_volume(volume);
        }
        debug!("Volume set to {}%", self.state.volume_percent());
        volume
    }

    /// Toggle between silence and the default volume.
    ///
    /// Returns true if now muted.
    pub fn toggle_mute(&mut self) -> bool {
        let was_muted = self.state.is_muted();
        self.set_volume(if was_muted { DEFAULT_VOLUME } else { 0.0 });
        info!("{}", if was_muted { "Unmuted" } else { "Muted" });
        !was_muted
    }

    /// A track reached its natural end.
    ///
    /// The current track stays selected so it can still be displayed.
    pub fn on_track_end(&mut self, id: &str) {
        match self.state.current.as_ref() {
            Some(current) if current.as_str() == id => {
                self.state.playing = false;
                self.pending = None;
                info!("Track ended: {}", id);
            }
            _ => debug!("Ignoring end of inactive track {}", id),
        }
    }

    /// Give every resource a hook built from its track id
    pub fn install_hooks<F>(&mut self, mut make_hook: F)
    where
        F: FnMut(&TrackId) -> ResourceHook,
    {
        for track in self.catalog.iter_mut() {
            let hook = make_hook(track.id());
            track.resource_mut().set_hook(hook);
        }
    }

    /// Snapshot for manual inspection
    pub fn debug_info(&self) -> DebugInfo {
        DebugInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            tracks_loaded: self.catalog.len(),
            current_track: self.state.current.clone(),
            current_title: self.current_title().map(str::to_string),
            playing: self.state.playing,
            volume_percent: self.state.volume_percent(),
        }
    }

    /// Pause and rewind the current track
    fn stop_current(&mut self) {
        let Some(current) = self.state.current.take() else {
            return;
        };
        if let Some(track) = self.catalog.get_mut(current.as_str()) {
            track.resource_mut().pause();
            track.resource_mut().rewind();
        }
        self.state.playing = false;
        self.pending = None;
        info!("Stopped: {}", current);
    }

    fn request_start(&mut self, id: &str) -> Result<PendingStart, PlaybackError> {
        let volume = self.state.volume;
        let track = self
            .catalog
            .get_mut(id)
            .ok_or_else(|| PlaybackError::MissingResource(TrackId::from(id)))?;

        track.resource_mut().set_volume(volume);
        let future = track.resource_mut().start();

        self.next_generation += 1;
        let ticket = StartTicket {
            track: TrackId::from(id),
            generation: self.next_generation,
        };
        self.pending = Some(ticket.clone());

        Ok(PendingStart { ticket, future })
    }
}
