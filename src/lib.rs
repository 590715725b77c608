// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scroll-triggered playback for "Signature: The Awakening".
//!
//! The page plays one track of an eleven-track album per designated
//! section as the visitor scrolls, with a small player (play/pause, mute,
//! volume) on the side.
//!
//! - [`playback`] owns the tracks and guarantees a single active one
//! - [`triggers`] turns region visibility into reveals and one-shot plays
//! - [`page`] runs the event loop tying both to the controls
//! - [`config`] describes a page in YAML or TOML

pub mod config;
pub mod page;
pub mod playback;
pub mod triggers;

pub use config::PageFile;
pub use page::{Page, PageEvent, PageHandle};
pub use playback::{PlaybackError, PlaybackManager};
pub use triggers::{RegionId, TriggerDispatcher};
