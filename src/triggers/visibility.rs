// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Viewport visibility tracking.
//!
//! A region counts as visible once enough of it sits inside the central
//! band of the viewport. The observer reports regions as they enter that
//! state, in page order.

use serde::{Deserialize, Serialize};

use super::RegionId;

/// Fraction of a region that must be inside the band
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Fraction of the viewport height cut from both the top and the bottom
pub const DEFAULT_MARGIN: f64 = 0.2;

/// Detection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// Visible fraction required (0.0 - 1.0)
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Viewport fraction trimmed from each vertical edge (0.0 - 0.5)
    #[serde(default = "default_margin")]
    pub margin: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}
fn default_margin() -> f64 {
    DEFAULT_MARGIN
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl ObserverOptions {
    /// Create options, clamping both values into range
    pub fn new(threshold: f64, margin: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            margin: margin.clamp(0.0, 0.5),
        }
    }

    /// The detection band for a viewport
    pub fn band(&self, viewport: Viewport) -> Span {
        let inset = viewport.height * self.margin;
        Span::new(viewport.top + inset, viewport.height - 2.0 * inset)
    }

    /// Visible fraction of a region within the band
    pub fn intersection_ratio(&self, region: Span, viewport: Viewport) -> f64 {
        if region.height <= 0.0 {
            return 0.0;
        }
        region.overlap(self.band(viewport)) / region.height
    }

    /// Check whether a region counts as visible
    pub fn is_visible(&self, region: Span, viewport: Viewport) -> bool {
        let ratio = self.intersection_ratio(region, viewport);
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// A vertical stretch of the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Offset from the top of the page
    pub top: f64,
    /// Height (negative values are treated as zero)
    pub height: f64,
}

impl Span {
    /// Create a span
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Length of the overlap with another span
    pub fn overlap(&self, other: Span) -> f64 {
        (self.bottom().min(other.bottom()) - self.top.max(other.top)).max(0.0)
    }
}

/// The visible window onto the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Scroll offset
    pub top: f64,
    /// Window height
    pub height: f64,
}

impl Viewport {
    /// Create a viewport
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    /// Same window scrolled to another offset
    pub fn scrolled_to(self, top: f64) -> Self {
        Self { top, ..self }
    }
}

struct Observed {
    id: RegionId,
    span: Span,
    visible: bool,
}

/// Tracks which regions are in view as the viewport moves
pub struct VisibilityObserver {
    options: ObserverOptions,
    regions: Vec<Observed>,
}

impl VisibilityObserver {
    /// Create an observer
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            regions: Vec::new(),
        }
    }

    /// Get options
    pub fn options(&self) -> ObserverOptions {
        self.options
    }

    /// Start watching a region. Re-observing an id moves it to its new span.
    pub fn observe(&mut self, id: RegionId, span: Span) {
        let visible = match self.regions.iter().position(|r| r.id == id) {
            Some(pos) => self.regions.remove(pos).visible,
            None => false,
        };
        let pos = self
            .regions
            .iter()
            .position(|r| r.span.top > span.top)
            .unwrap_or(self.regions.len());
        self.regions.insert(pos, Observed { id, span, visible });
    }

    /// Stop watching a region
    pub fn unobserve(&mut self, id: &RegionId) {
        self.regions.retain(|r| &r.id != id);
    }

    /// Number of observed regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if nothing is observed
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Check whether a region is currently in view
    pub fn is_visible(&self, id: &RegionId) -> bool {
        self.regions.iter().any(|r| &r.id == id && r.visible)
    }

    /// Update for a new viewport, returning regions that just came into view
    pub fn update(&mut self, viewport: Viewport) -> Vec<RegionId> {
        let options = self.options;
        let mut entered = Vec::new();
        for region in &mut self.regions {
            let visible = options.is_visible(region.span, viewport);
            if visible && !region.visible {
                entered.push(region.id.clone());
            }
            region.visible = visible;
        }
        entered
    }
}
