// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scroll triggers for page regions.
//!
//! This module provides:
//! - Viewport visibility detection with threshold and margin
//! - The static trigger-to-track lookup table
//! - The dispatcher turning visibility into reveals and one-shot plays

pub mod dispatcher;
pub mod visibility;

pub use dispatcher::{RegionSpec, TriggerDispatcher, VisibilityReaction};
pub use visibility::{ObserverOptions, Span, Viewport, VisibilityObserver};

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::playback::TrackId;

/// Identifier of a page region
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Create a region id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Trigger identifiers of the page, in page order, with their tracks
const PAGE_TRIGGERS: [(&str, usize); 11] = [
    ("song1-start", 1),
    ("song2-awakening", 2),
    ("song3-liberation", 3),
    ("song4-sekmet", 4),
    ("song5-twinflame", 5),
    ("song6-healing", 6),
    ("song7-innerwise", 7),
    ("song8-meditation", 8),
    ("song9-treeoflife", 9),
    ("song10-amazing", 10),
    ("song11-ultimate", 11),
];

/// Read-only lookup from trigger identifier to track
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriggerMap {
    entries: HashMap<String, TrackId>,
}

impl TriggerMap {
    /// Build a map from pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<TrackId>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The page's trigger table
    pub fn page_default() -> Self {
        Self::from_pairs(
            PAGE_TRIGGERS
                .iter()
                .map(|&(trigger, n)| (trigger, TrackId::numbered(n))),
        )
    }

    /// Trigger identifiers of the page in page order
    pub fn page_triggers() -> impl Iterator<Item = &'static str> {
        PAGE_TRIGGERS.iter().map(|&(trigger, _)| trigger)
    }

    /// Resolve a trigger identifier
    pub fn resolve(&self, trigger: &str) -> Option<&TrackId> {
        self.entries.get(trigger)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
