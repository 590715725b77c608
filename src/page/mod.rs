// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The page runtime.
//!
//! A single cooperative loop owns the playback manager, the trigger
//! dispatcher, the visibility observer and the control panel. Host input
//! arrives as [`PageEvent`]s and is handled one event at a time. Work that
//! completes later (a start settling, a pulse running out, a track ending)
//! is posted back into the same queue, so no two handlers ever interleave.

pub mod controls;

pub use controls::{ButtonView, ControlPanel, READY_TEXT};

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::config::PageFile;
use crate::playback::{
    default_playlist, AutoplayGate, DebugInfo, PendingStart, PlayOutcome, PlaybackError,
    PlaybackManager, ResourceHook, ResourceSignal, Settled, SimulatedResource, StartError,
    StartTicket, ToggleOutcome, TrackCatalog, TrackId, TrackInfo,
};
use crate::triggers::{RegionId, TriggerDispatcher, Viewport, VisibilityObserver};

/// Everything the page reacts to
#[derive(Debug)]
pub enum PageEvent {
    /// The viewport moved
    Scrolled(Viewport),
    /// A region came into view
    RegionVisible(RegionId),
    /// A region was clicked
    RegionClicked(RegionId),
    /// Play/pause button clicked
    PlayPauseClicked,
    /// Mute button clicked
    MuteClicked,
    /// Volume slider moved (0 - 100)
    VolumeInput(u8),
    /// Click, touch or key press anywhere on the page
    UserInteraction,
    /// A resource played to its end
    TrackEnded(TrackId),
    /// A resource failed to load
    ResourceError(TrackId, String),
    /// A start request settled
    StartSettled {
        ticket: StartTicket,
        result: Result<(), StartError>,
    },
    /// A region's highlight should be cleared
    PulseExpired(RegionId),
    /// Stop the loop
    Shutdown,
}

/// Cloneable sender for page events
#[derive(Debug, Clone)]
pub struct PageHandle {
    tx: UnboundedSender<PageEvent>,
}

impl PageHandle {
    /// Queue an event; false if the page is gone
    pub fn send(&self, event: PageEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// The page controller
pub struct Page {
    manager: PlaybackManager,
    dispatcher: TriggerDispatcher,
    observer: VisibilityObserver,
    controls: ControlPanel,
    gate: Option<AutoplayGate>,
    tx: UnboundedSender<PageEvent>,
    rx: UnboundedReceiver<PageEvent>,
}

impl Page {
    /// Wire the components together.
    ///
    /// Every registered resource gets a hook that posts its end and error
    /// signals back to this page.
    pub fn new(
        mut manager: PlaybackManager,
        dispatcher: TriggerDispatcher,
        observer: VisibilityObserver,
        controls: ControlPanel,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        manager.install_hooks(|id| {
            let tx = tx.clone();
            let id = id.clone();
            let hook: ResourceHook = Arc::new(move |signal: ResourceSignal| {
                let event = match signal {
                    ResourceSignal::Ended => PageEvent::TrackEnded(id.clone()),
                    ResourceSignal::Error(reason) => PageEvent::ResourceError(id.clone(), reason),
                };
                let _ = tx.send(event);
            });
            hook
        });

        let mut page = Self {
            manager,
            dispatcher,
            observer,
            controls,
            gate: None,
            tx,
            rx,
        };
        page.controls.refresh(&page.manager);
        info!(
            "Page ready: {} tracks, {} regions ({} triggers)",
            page.manager.catalog().len(),
            page.dispatcher.len(),
            page.dispatcher.trigger_count()
        );
        page
    }

    /// Build a page of simulated tracks from a configuration
    pub fn from_config(config: &PageFile, gate: AutoplayGate) -> Self {
        let mut catalog = TrackCatalog::new();
        for track in &config.tracks {
            let resource = SimulatedResource::new(track.id.as_str(), track.duration(), gate.clone())
                .with_latency(config.page.latency());
            catalog.register(
                TrackInfo::new(track.id.clone(), track.title.clone()),
                Box::new(resource),
            );
        }
        for id in default_playlist().into_iter().map(|t| t.id) {
            if !catalog.contains(id.as_str()) {
                warn!("{} has no audio resource", id);
            }
        }

        let manager = PlaybackManager::with_volume(catalog, config.page.volume);

        let mut dispatcher = TriggerDispatcher::new(config.trigger_map()).with_pulse(config.page.pulse());
        let mut observer = VisibilityObserver::new(config.observer);
        for region in &config.regions {
            dispatcher.register(region.spec());
            observer.observe(region.id.clone(), region.span());
        }

        Self::new(manager, dispatcher, observer, ControlPanel::new(config.controls)).with_gate(gate)
    }

    /// Let user interaction unlock this gate
    pub fn with_gate(mut self, gate: AutoplayGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Sender for feeding events into the loop
    pub fn handle(&self) -> PageHandle {
        PageHandle { tx: self.tx.clone() }
    }

    /// Get the playback manager
    pub fn manager(&self) -> &PlaybackManager {
        &self.manager
    }

    /// Get the trigger dispatcher
    pub fn dispatcher(&self) -> &TriggerDispatcher {
        &self.dispatcher
    }

    /// Get the visibility observer
    pub fn observer(&self) -> &VisibilityObserver {
        &self.observer
    }

    /// Get the control panel
    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    /// Debug snapshot
    pub fn debug_info(&self) -> DebugInfo {
        self.manager.debug_info()
    }

    /// Run until [`PageEvent::Shutdown`], then hand the page back
    pub async fn run(mut self) -> Self {
        while self.step().await {}
        info!("Page loop stopped");
        self
    }

    /// Wait for and handle the next event; false once the loop should stop
    pub async fn step(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => self.dispatch(event),
            None => false,
        }
    }

    /// Handle one event; false for [`PageEvent::Shutdown`]
    pub fn dispatch(&mut self, event: PageEvent) -> bool {
        debug!("Page event: {:?}", event);
        match event {
            PageEvent::Scrolled(viewport) => {
                for id in self.observer.update(viewport) {
                    self.region_visible(&id);
                }
            }
            PageEvent::RegionVisible(id) => self.region_visible(&id),
            PageEvent::RegionClicked(id) => {
                self.user_interaction();
                if let Some(song) = self.dispatcher.on_region_clicked(id.as_str()) {
                    self.play(&song);
                }
            }
            PageEvent::PlayPauseClicked => {
                if self.controls.play_pause().is_some() {
                    self.user_interaction();
                    self.toggle_play_pause();
                }
            }
            PageEvent::MuteClicked => {
                if self.controls.mute().is_some() {
                    self.user_interaction();
                    self.manager.toggle_mute();
                }
            }
            PageEvent::VolumeInput(value) => {
                if self.controls.volume_slider().is_some() {
                    self.manager.set_volume(f32::from(value.min(100)) / 100.0);
                }
            }
            PageEvent::UserInteraction => self.user_interaction(),
            PageEvent::TrackEnded(id) => self.manager.on_track_end(id.as_str()),
            PageEvent::ResourceError(id, reason) => {
                error!("Error loading {}: {}", id, reason);
            }
            PageEvent::StartSettled { ticket, result } => self.settle(ticket, result),
            PageEvent::PulseExpired(id) => self.dispatcher.on_pulse_expired(id.as_str()),
            PageEvent::Shutdown => return false,
        }
        self.controls.refresh(&self.manager);
        true
    }

    fn region_visible(&mut self, id: &RegionId) {
        let reaction = self.dispatcher.on_region_visible(id.as_str());
        if reaction.pulse {
            self.schedule_pulse_clear(id.clone());
        }
        if let Some(track) = reaction.play {
            self.play(&track);
        }
    }

    fn play(&mut self, id: &TrackId) {
        match self.manager.play(id.as_str()) {
            Ok(PlayOutcome::Pending(start)) => self.await_start(start),
            Ok(PlayOutcome::AlreadyPlaying) => {}
            Err(err) => warn!("{}", err),
        }
    }

    fn toggle_play_pause(&mut self) {
        match self.manager.toggle_play_pause() {
            Ok(ToggleOutcome::Paused) => {}
            Ok(ToggleOutcome::Resuming(start)) => self.await_start(start),
            Err(PlaybackError::NoTrackSelected) => {}
            Err(err) => warn!("{}", err),
        }
    }

    fn settle(&mut self, ticket: StartTicket, result: Result<(), StartError>) {
        match self.manager.settle(ticket, result) {
            Ok(Settled::Started) | Ok(Settled::Stale) => {}
            Err(err @ PlaybackError::StartDenied { .. }) => {
                warn!("{}", err);
                info!("Tip: click anywhere on the page to enable audio");
            }
            Err(err) => warn!("{}", err),
        }
    }

    fn user_interaction(&self) {
        if let Some(gate) = &self.gate {
            gate.unlock();
        }
    }

    fn await_start(&self, start: PendingStart) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let (ticket, result) = start.wait().await;
            let _ = tx.send(PageEvent::StartSettled { ticket, result });
        });
    }

    fn schedule_pulse_clear(&self, id: RegionId) {
        let tx = self.tx.clone();
        let delay = self.dispatcher.pulse_duration();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(PageEvent::PulseExpired(id));
        });
    }
}
