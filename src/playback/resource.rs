// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio resource abstraction.
//!
//! A resource is one playable item behind a track id. Everything except
//! starting playback is immediate; starting may need buffering and can be
//! refused by the host, so it hands back a future that settles later.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Why a start request did not result in playback
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// Host policy refused unsolicited audio (no user interaction yet)
    #[error("playback denied: {0}")]
    Denied(String),
    /// Transient or resource-level failure
    #[error("playback failed: {0}")]
    Failed(String),
}

/// Future returned by [`AudioResource::start`]
pub type StartFuture = Pin<Box<dyn Future<Output = Result<(), StartError>> + Send + 'static>>;

/// Out-of-band notifications a resource raises on its own
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceSignal {
    /// Playback reached the end of the media
    Ended,
    /// The resource could not be loaded or decoded
    Error(String),
}

/// Callback receiving [`ResourceSignal`]s
pub type ResourceHook = Arc<dyn Fn(ResourceSignal) + Send + Sync>;

/// Trait for playable audio resources.
///
/// Implementations are driven from a single event loop, so methods take
/// `&mut self` and never block.
pub trait AudioResource: Send {
    /// Request playback from the current position.
    ///
    /// The returned future resolves once playback actually started, or with
    /// the reason it could not.
    fn start(&mut self) -> StartFuture;

    /// Pause at the current position.
    fn pause(&mut self);

    /// Move the position back to the start of the media.
    fn rewind(&mut self);

    /// Set output volume (0.0 - 1.0).
    fn set_volume(&mut self, volume: f32);

    /// Current output volume.
    fn volume(&self) -> f32;

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Install the hook that receives end/error signals.
    fn set_hook(&mut self, _hook: ResourceHook) {}
}
