// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for the page.
//!
//! This module provides data structures for loading and managing the page
//! description: playlist, region layout, observer settings and which
//! controls are present.

pub mod validate;

pub use validate::validate_config;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::playback::{default_playlist, TrackId, TrackInfo, DEFAULT_VOLUME};
use crate::triggers::{ObserverOptions, RegionId, RegionSpec, Span, TriggerMap};

/// Root configuration for a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageFile {
    /// Page-level settings
    #[serde(default)]
    pub page: PageConfig,
    /// Visibility detection settings
    #[serde(default)]
    pub observer: ObserverOptions,
    /// Which control widgets exist
    #[serde(default)]
    pub controls: ControlsConfig,
    /// Playlist
    #[serde(default = "default_tracks")]
    pub tracks: Vec<TrackConfig>,
    /// Region layout
    #[serde(default = "default_regions")]
    pub regions: Vec<RegionConfig>,
    /// Trigger identifier to track id (None = the page table)
    #[serde(default)]
    pub triggers: Option<BTreeMap<String, TrackId>>,
}

impl Default for PageFile {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            observer: ObserverOptions::default(),
            controls: ControlsConfig::default(),
            tracks: default_tracks(),
            regions: default_regions(),
            triggers: None,
        }
    }
}

impl PageFile {
    /// Load a page configuration; `.toml` files are read as TOML, anything
    /// else as YAML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Parse a page configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a page configuration from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Playlist entries
    pub fn playlist(&self) -> Vec<TrackInfo> {
        self.tracks
            .iter()
            .map(|t| TrackInfo::new(t.id.clone(), t.title.clone()))
            .collect()
    }

    /// The trigger lookup table
    pub fn trigger_map(&self) -> TriggerMap {
        match &self.triggers {
            Some(triggers) => TriggerMap::from_pairs(triggers.clone()),
            None => TriggerMap::page_default(),
        }
    }

    /// Region descriptions for the dispatcher
    pub fn region_specs(&self) -> Vec<RegionSpec> {
        self.regions.iter().map(RegionConfig::spec).collect()
    }

    /// Total page height covered by regions
    pub fn page_height(&self) -> f64 {
        self.regions
            .iter()
            .map(|r| r.top + r.height)
            .fold(0.0, f64::max)
    }
}

/// Page-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageConfig {
    /// Page title
    #[serde(default = "default_title")]
    pub title: String,
    /// Starting volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// How long a triggered region stays highlighted
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,
    /// Browser window height used for simulation
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    /// Buffering delay of simulated tracks
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_title() -> String {
    "Signature: The Awakening".to_string()
}
fn default_volume() -> f32 {
    DEFAULT_VOLUME
}
fn default_pulse_ms() -> u64 {
    2000
}
fn default_viewport_height() -> f64 {
    900.0
}
fn default_latency_ms() -> u64 {
    150
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            volume: default_volume(),
            pulse_ms: default_pulse_ms(),
            viewport_height: default_viewport_height(),
            latency_ms: default_latency_ms(),
        }
    }
}

impl PageConfig {
    /// Pulse duration
    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    /// Buffering delay
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Presence of each control widget
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ControlsConfig {
    /// Play/pause button
    #[serde(default = "default_true")]
    pub play_pause: bool,
    /// Mute button
    #[serde(default = "default_true")]
    pub mute: bool,
    /// Volume slider
    #[serde(default = "default_true")]
    pub volume: bool,
    /// Now-playing display
    #[serde(default = "default_true")]
    pub now_playing: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            play_pause: true,
            mute: true,
            volume: true,
            now_playing: true,
        }
    }
}

/// A playlist entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackConfig {
    /// Track id
    pub id: TrackId,
    /// Display title
    pub title: String,
    /// Audio file (relative to the page)
    #[serde(default)]
    pub source: Option<String>,
    /// Length in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
}

fn default_duration_secs() -> f64 {
    180.0
}

impl TrackConfig {
    /// Track length, if `duration_secs` is representable
    pub fn checked_duration(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.duration_secs).ok()
    }

    /// Track length; out-of-range values saturate
    pub fn duration(&self) -> Duration {
        match self.checked_duration() {
            Some(duration) => duration,
            None if self.duration_secs > 0.0 => Duration::MAX,
            None => Duration::ZERO,
        }
    }
}

/// A page region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionConfig {
    /// Region id
    pub id: RegionId,
    /// Fades in when first seen
    #[serde(default)]
    pub reveal: bool,
    /// Trigger identifier
    #[serde(default)]
    pub trigger: Option<String>,
    /// Track played on click
    #[serde(default)]
    pub song: Option<TrackId>,
    /// Offset from the top of the page
    #[serde(default)]
    pub top: f64,
    /// Height
    #[serde(default)]
    pub height: f64,
}

impl RegionConfig {
    /// Dispatcher description
    pub fn spec(&self) -> RegionSpec {
        RegionSpec {
            id: self.id.clone(),
            reveal: self.reveal,
            trigger: self.trigger.clone(),
            song: self.song.clone(),
        }
    }

    /// Vertical extent
    pub fn span(&self) -> Span {
        Span::new(self.top, self.height)
    }
}

fn default_tracks() -> Vec<TrackConfig> {
    default_playlist()
        .into_iter()
        .map(|info| TrackConfig {
            source: Some(format!("audio/{}.mp3", info.id)),
            id: info.id,
            title: info.title,
            duration_secs: default_duration_secs(),
        })
        .collect()
}

/// Height of one song section in the default layout
const SECTION_HEIGHT: f64 = 1400.0;
/// Height of the hero header in the default layout
const HERO_HEIGHT: f64 = 900.0;

/// Hero header, then per song a fade-in section holding a trigger panel
fn default_regions() -> Vec<RegionConfig> {
    let mut regions = vec![RegionConfig {
        id: RegionId::from("hero"),
        reveal: true,
        trigger: None,
        song: None,
        top: 0.0,
        height: HERO_HEIGHT,
    }];

    for (i, trigger) in TriggerMap::page_triggers().enumerate() {
        let n = i + 1;
        let top = HERO_HEIGHT + i as f64 * SECTION_HEIGHT;
        regions.push(RegionConfig {
            id: RegionId::new(format!("section-{}", n)),
            reveal: true,
            trigger: None,
            song: Some(TrackId::numbered(n)),
            top,
            height: SECTION_HEIGHT,
        });
        regions.push(RegionConfig {
            id: RegionId::new(format!("panel-{}", n)),
            reveal: false,
            trigger: Some(trigger.to_string()),
            song: None,
            top: top + 400.0,
            height: 600.0,
        });
    }
    regions
}
