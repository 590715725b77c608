// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Visibility trigger dispatcher.
//!
//! Turns "region came into view" into one-way reveals and at most one
//! playback request per trigger region for the lifetime of the page. The
//! dispatcher does not talk to the player itself: it returns a
//! [`VisibilityReaction`] and the caller acts on it.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info};

use super::{RegionId, TriggerMap};
use crate::playback::TrackId;

/// How long a triggered region stays highlighted
pub const DEFAULT_PULSE: Duration = Duration::from_millis(2000);

/// Static description of a region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSpec {
    /// Region id
    pub id: RegionId,
    /// Fades in the first time it is seen
    pub reveal: bool,
    /// Trigger identifier resolved through the trigger map
    pub trigger: Option<String>,
    /// Track played when the region is clicked
    pub song: Option<TrackId>,
}

impl RegionSpec {
    /// A decorative region
    pub fn reveal(id: impl Into<RegionId>) -> Self {
        Self {
            id: id.into(),
            reveal: true,
            trigger: None,
            song: None,
        }
    }

    /// A trigger region
    pub fn trigger(id: impl Into<RegionId>, trigger: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reveal: false,
            trigger: Some(trigger.into()),
            song: None,
        }
    }

    /// Also fade in
    pub fn with_reveal(mut self) -> Self {
        self.reveal = true;
        self
    }

    /// Play a track when clicked
    pub fn with_song(mut self, song: impl Into<TrackId>) -> Self {
        self.song = Some(song.into());
        self
    }
}

#[derive(Debug)]
struct RegionState {
    spec: RegionSpec,
    revealed: bool,
    triggered: bool,
    pulsing: bool,
}

/// What should happen in response to a region becoming visible
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityReaction {
    /// The region was revealed by this event
    pub revealed: bool,
    /// Track to play
    pub play: Option<TrackId>,
    /// A pulse started; clear it after the pulse duration
    pub pulse: bool,
}

impl VisibilityReaction {
    /// Check if nothing happened
    pub fn is_empty(&self) -> bool {
        !self.revealed && self.play.is_none() && !self.pulse
    }
}

/// Dispatches visibility events for registered regions
#[derive(Debug)]
pub struct TriggerDispatcher {
    map: TriggerMap,
    regions: HashMap<RegionId, RegionState>,
    pulse: Duration,
}

impl TriggerDispatcher {
    /// Create a dispatcher
    pub fn new(map: TriggerMap) -> Self {
        Self {
            map,
            regions: HashMap::new(),
            pulse: DEFAULT_PULSE,
        }
    }

    /// Set the pulse duration
    pub fn with_pulse(mut self, pulse: Duration) -> Self {
        self.pulse = pulse;
        self
    }

    /// Pulse duration
    pub fn pulse_duration(&self) -> Duration {
        self.pulse
    }

    /// Register a region. Registering the same id again keeps its state.
    pub fn register(&mut self, spec: RegionSpec) {
        self.regions
            .entry(spec.id.clone())
            .or_insert_with(|| RegionState {
                spec,
                revealed: false,
                triggered: false,
                pulsing: false,
            });
    }

    /// Number of registered regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if no regions are registered
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of trigger regions registered
    pub fn trigger_count(&self) -> usize {
        self.regions
            .values()
            .filter(|r| r.spec.trigger.is_some())
            .count()
    }

    /// Number of regions that have already triggered
    pub fn triggered_count(&self) -> usize {
        self.regions.values().filter(|r| r.triggered).count()
    }

    /// Check if a region has been revealed
    pub fn is_revealed(&self, id: &str) -> bool {
        self.regions.get(id).map(|r| r.revealed).unwrap_or(false)
    }

    /// Check if a region has triggered playback
    pub fn is_triggered(&self, id: &str) -> bool {
        self.regions.get(id).map(|r| r.triggered).unwrap_or(false)
    }

    /// Check if a region is highlighted
    pub fn is_pulsing(&self, id: &str) -> bool {
        self.regions.get(id).map(|r| r.pulsing).unwrap_or(false)
    }

    /// Handle a region coming into view
    pub fn on_region_visible(&mut self, id: &str) -> VisibilityReaction {
        let mut reaction = VisibilityReaction::default();
        let Some(region) = self.regions.get_mut(id) else {
            debug!("Visibility event for unregistered region {}", id);
            return reaction;
        };

        if region.spec.reveal && !region.revealed {
            region.revealed = true;
            reaction.revealed = true;
            debug!("Section revealed: {}", id);
        }

        let Some(trigger) = region.spec.trigger.as_deref() else {
            return reaction;
        };
        let Some(track) = self.map.resolve(trigger) else {
            debug!("No track mapped for trigger {}", trigger);
            return reaction;
        };
        if region.triggered {
            return reaction;
        }

        region.triggered = true;
        region.pulsing = true;
        reaction.play = Some(track.clone());
        reaction.pulse = true;
        info!("Triggered: {} -> {}", trigger, track);
        reaction
    }

    /// Handle a click on a region; returns the track to play, if any
    pub fn on_region_clicked(&self, id: &str) -> Option<TrackId> {
        let song = self.regions.get(id)?.spec.song.clone();
        if let Some(song) = &song {
            debug!("Region {} clicked, playing {}", id, song);
        }
        song
    }

    /// Clear a region's pulse
    pub fn on_pulse_expired(&mut self, id: &str) {
        if let Some(region) = self.regions.get_mut(id) {
            region.pulsing = false;
        }
    }
}
