// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Simulated audio backend.
//!
//! Behaves like a media element without producing sound: starting takes a
//! buffering delay, is refused until the autoplay gate is unlocked, the
//! position advances with wall time and the end hook fires when the track
//! runs out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use super::resource::{AudioResource, ResourceHook, ResourceSignal, StartError, StartFuture};
use super::DEFAULT_VOLUME;

/// Shared switch standing in for the host's autoplay policy.
///
/// Locked until the visitor interacts with the page.
#[derive(Debug, Clone, Default)]
pub struct AutoplayGate {
    unlocked: Arc<AtomicBool>,
}

impl AutoplayGate {
    /// Create a locked gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gate that already allows playback
    pub fn unlocked() -> Self {
        let gate = Self::new();
        gate.unlock();
        gate
    }

    /// Record a user interaction
    pub fn unlock(&self) {
        if !self.unlocked.swap(true, Ordering::SeqCst) {
            debug!("Audio enabled by user interaction");
        }
    }

    /// Check whether playback may start
    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct Inner {
    volume: f32,
    /// Position accumulated before the current run
    offset: Duration,
    /// Set while audibly running
    running_since: Option<Instant>,
    /// Bumped whenever a start or end timer must be invalidated
    epoch: u64,
    hook: Option<ResourceHook>,
}

impl Inner {
    fn position(&self, duration: Duration) -> Duration {
        let elapsed = self.running_since.map(|t| t.elapsed()).unwrap_or_default();
        (self.offset + elapsed).min(duration)
    }
}

/// A silent resource with a fixed duration
pub struct SimulatedResource {
    name: String,
    duration: Duration,
    latency: Duration,
    gate: AutoplayGate,
    inner: Arc<Mutex<Inner>>,
}

impl SimulatedResource {
    /// Create a resource
    pub fn new(name: impl Into<String>, duration: Duration, gate: AutoplayGate) -> Self {
        Self {
            name: name.into(),
            duration,
            latency: Duration::ZERO,
            gate,
            inner: Arc::new(Mutex::new(Inner {
                volume: DEFAULT_VOLUME,
                ..Default::default()
            })),
        }
    }

    /// Set the buffering delay before a start settles
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Media duration
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Check if audibly running
    pub fn is_running(&self) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.running_since.is_some())
            .unwrap_or(false)
    }
}

/// Fire the end hook once `remaining` has elapsed, unless the epoch moved on.
fn arm_end_timer(
    inner: Arc<Mutex<Inner>>,
    name: String,
    duration: Duration,
    epoch: u64,
    remaining: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(remaining).await;
        let hook = {
            let Ok(mut state) = inner.lock() else {
                return;
            };
            if state.epoch != epoch {
                return;
            }
            state.offset = duration;
            state.running_since = None;
            state.hook.clone()
        };
        trace!("{} reached its end", name);
        if let Some(hook) = hook {
            hook(ResourceSignal::Ended);
        }
    });
}

impl AudioResource for SimulatedResource {
    fn start(&mut self) -> StartFuture {
        let inner = Arc::clone(&self.inner);
        let gate = self.gate.clone();
        let name = self.name.clone();
        let duration = self.duration;
        let latency = self.latency;

        let epoch = match self.inner.lock() {
            Ok(mut state) => {
                state.epoch += 1;
                state.epoch
            }
            Err(_) => {
                return Box::pin(async { Err(StartError::Failed("resource state poisoned".into())) })
            }
        };

        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if !gate.is_unlocked() {
                return Err(StartError::Denied("no user interaction yet".into()));
            }

            let remaining = {
                let Ok(mut state) = inner.lock() else {
                    return Err(StartError::Failed("resource state poisoned".into()));
                };
                if state.epoch != epoch {
                    return Err(StartError::Failed("start interrupted".into()));
                }
                if state.running_since.is_some() {
                    return Ok(());
                }
                if state.offset >= duration {
                    state.offset = Duration::ZERO;
                }
                state.running_since = Some(Instant::now());
                duration - state.offset
            };

            debug!("{} started ({:?} remaining)", name, remaining);
            arm_end_timer(inner, name, duration, epoch, remaining);
            Ok(())
        })
    }

    fn pause(&mut self) {
        if let Ok(mut state) = self.inner.lock() {
            state.epoch += 1;
            if state.running_since.is_some() {
                state.offset = state.position(self.duration);
                state.running_since = None;
            }
        }
    }

    fn rewind(&mut self) {
        let Ok(mut state) = self.inner.lock() else {
            return;
        };
        state.offset = Duration::ZERO;
        if state.running_since.is_some() {
            state.epoch += 1;
            state.running_since = Some(Instant::now());
            let epoch = state.epoch;
            drop(state);
            arm_end_timer(
                Arc::clone(&self.inner),
                self.name.clone(),
                self.duration,
                epoch,
                self.duration,
            );
        }
    }

    fn set_volume(&mut self, volume: f32) {
        if let Ok(mut state) = self.inner.lock() {
            state.volume = volume.clamp(0.0, 1.0);
        }
    }

    fn volume(&self) -> f32 {
        self.inner.lock().map(|state| state.volume).unwrap_or(0.0)
    }

    fn position(&self) -> Duration {
        self.inner
            .lock()
            .map(|state| state.position(self.duration))
            .unwrap_or_default()
    }

    fn set_hook(&mut self, hook: ResourceHook) {
        if let Ok(mut state) = self.inner.lock() {
            state.hook = Some(hook);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_hook() -> (ResourceHook, Arc<AtomicUsize>) {
        let ended = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ended);
        let hook: ResourceHook = Arc::new(move |signal| {
            if signal == ResourceSignal::Ended {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (hook, ended)
    }

    #[test]
    fn test_gate() {
        let gate = AutoplayGate::new();
        let shared = gate.clone();
        assert!(!gate.is_unlocked());
        shared.unlock();
        assert!(gate.is_unlocked());
        assert!(AutoplayGate::unlocked().is_unlocked());
    }

    #[tokio::test]
    async fn test_start_denied_while_locked() {
        let mut resource = SimulatedResource::new("song1", Duration::from_secs(5), AutoplayGate::new());
        let result = resource.start().await;
        assert!(matches!(result, Err(StartError::Denied(_))));
        assert!(!resource.is_running());
    }

    #[tokio::test]
    async fn test_start_pause_rewind() {
        let mut resource =
            SimulatedResource::new("song1", Duration::from_secs(60), AutoplayGate::unlocked());

        resource.start().await.unwrap();
        assert!(resource.is_running());

        tokio::time::sleep(Duration::from_millis(20)).await;
        resource.pause();
        assert!(!resource.is_running());
        let paused_at = resource.position();
        assert!(paused_at >= Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(resource.position(), paused_at);

        resource.rewind();
        assert_eq!(resource.position(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_pause_before_settle_interrupts_start() {
        let mut resource = SimulatedResource::new("song2", Duration::from_secs(60), AutoplayGate::unlocked())
            .with_latency(Duration::from_millis(20));

        let start = resource.start();
        resource.pause();
        assert!(matches!(start.await, Err(StartError::Failed(_))));
        assert!(!resource.is_running());
    }

    #[tokio::test]
    async fn test_end_hook_fires_once() {
        let mut resource =
            SimulatedResource::new("song3", Duration::from_millis(20), AutoplayGate::unlocked());
        let (hook, ended) = counting_hook();
        resource.set_hook(hook);

        resource.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert!(!resource.is_running());
        assert_eq!(resource.position(), resource.duration());
    }

    #[tokio::test]
    async fn test_pause_cancels_end() {
        let mut resource =
            SimulatedResource::new("song4", Duration::from_millis(40), AutoplayGate::unlocked());
        let (hook, ended) = counting_hook();
        resource.set_hook(hook);

        resource.start().await.unwrap();
        resource.pause();
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(ended.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_volume_clamped() {
        let mut resource = SimulatedResource::new("song5", Duration::from_secs(1), AutoplayGate::new());
        assert_eq!(resource.volume(), DEFAULT_VOLUME);
        resource.set_volume(3.0);
        assert_eq!(resource.volume(), 1.0);
    }
}
