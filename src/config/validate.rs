// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Consistency checks for page configurations.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Result};

use super::PageFile;

/// Load a page file and reject it if it is inconsistent
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<PageFile> {
    let config = PageFile::load(path)?;
    let problems = config.problems();
    if !problems.is_empty() {
        bail!("Invalid page configuration:\n  - {}", problems.join("\n  - "));
    }
    Ok(config)
}

impl PageFile {
    /// Everything wrong with this configuration, one message per problem
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !(0.0..=1.0).contains(&self.page.volume) {
            problems.push(format!("volume {} is outside 0.0 - 1.0", self.page.volume));
        }
        if !(0.0..=1.0).contains(&self.observer.threshold) {
            problems.push(format!(
                "observer threshold {} is outside 0.0 - 1.0",
                self.observer.threshold
            ));
        }
        if !(0.0..0.5).contains(&self.observer.margin) {
            problems.push(format!(
                "observer margin {} leaves no detection band",
                self.observer.margin
            ));
        }
        if self.page.viewport_height <= 0.0 {
            problems.push("viewport height must be positive".to_string());
        }

        let mut track_ids = HashSet::new();
        for track in &self.tracks {
            if !track_ids.insert(track.id.as_str()) {
                problems.push(format!("duplicate track id {}", track.id));
            }
            if !(track.duration_secs.is_finite() && track.duration_secs > 0.0) {
                problems.push(format!("track {} has no positive duration", track.id));
            } else if track.checked_duration().is_none() {
                problems.push(format!(
                    "track {} duration {} is out of range",
                    track.id, track.duration_secs
                ));
            }
        }

        let mut region_ids = HashSet::new();
        for region in &self.regions {
            if !region_ids.insert(region.id.as_str()) {
                problems.push(format!("duplicate region id {}", region.id));
            }
            if region.height < 0.0 {
                problems.push(format!("region {} has negative height", region.id));
            }
            if let Some(song) = &region.song {
                if !track_ids.contains(song.as_str()) {
                    problems.push(format!("region {} plays unknown track {}", region.id, song));
                }
            }
        }

        if let Some(triggers) = &self.triggers {
            for (trigger, track) in triggers {
                if !track_ids.contains(track.as_str()) {
                    problems.push(format!("trigger {} maps to unknown track {}", trigger, track));
                }
            }
        }

        problems
    }
}
