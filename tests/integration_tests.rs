// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for the page controller
//!
//! These tests drive the public API with synthetic host events and
//! recording resources, without a real document or viewport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use awakening::config::PageFile;
use awakening::page::{ControlPanel, Page, PageEvent, READY_TEXT};
use awakening::playback::{
    default_playlist, AudioResource, AutoplayGate, PlayOutcome, PlaybackManager, ResourceHook,
    ResourceSignal, StartError, StartFuture, TrackCatalog, TrackId,
};
use awakening::triggers::{
    ObserverOptions, RegionId, RegionSpec, Span, TriggerDispatcher, TriggerMap, Viewport,
    VisibilityObserver,
};

/// Calls a recording resource has received
#[derive(Default)]
struct Record {
    starts: usize,
    pauses: usize,
    rewinds: usize,
    active: bool,
    volume: f32,
    position: Duration,
    hook: Option<ResourceHook>,
}

#[derive(Clone)]
struct Recorder(Arc<Mutex<Record>>);

impl Recorder {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Record::default())))
    }

    fn with<R>(&self, f: impl FnOnce(&Record) -> R) -> R {
        f(&self.0.lock().unwrap())
    }

    /// Play to the end, as the media would on its own
    fn finish(&self) {
        let hook = {
            let mut record = self.0.lock().unwrap();
            record.active = false;
            record.hook.clone()
        };
        if let Some(hook) = hook {
            hook(ResourceSignal::Ended);
        }
    }

    /// Report a load failure, as a broken media file would
    fn fail(&self, reason: &str) {
        let hook = self.0.lock().unwrap().hook.clone();
        if let Some(hook) = hook {
            hook(ResourceSignal::Error(reason.to_string()));
        }
    }
}

struct RecordingResource {
    recorder: Recorder,
    gate: AutoplayGate,
}

impl AudioResource for RecordingResource {
    fn start(&mut self) -> StartFuture {
        let allowed = self.gate.is_unlocked();
        {
            let mut record = self.recorder.0.lock().unwrap();
            record.starts += 1;
            if allowed {
                record.active = true;
                record.position += Duration::from_secs(30);
            }
        }
        Box::pin(async move {
            if allowed {
                Ok(())
            } else {
                Err(StartError::Denied("no user interaction yet".into()))
            }
        })
    }

    fn pause(&mut self) {
        let mut record = self.recorder.0.lock().unwrap();
        record.pauses += 1;
        record.active = false;
    }

    fn rewind(&mut self) {
        let mut record = self.recorder.0.lock().unwrap();
        record.rewinds += 1;
        record.position = Duration::ZERO;
    }

    fn set_volume(&mut self, volume: f32) {
        self.recorder.0.lock().unwrap().volume = volume;
    }

    fn volume(&self) -> f32 {
        self.recorder.0.lock().unwrap().volume
    }

    fn position(&self) -> Duration {
        self.recorder.0.lock().unwrap().position
    }

    fn set_hook(&mut self, hook: ResourceHook) {
        self.recorder.0.lock().unwrap().hook = Some(hook);
    }
}

/// Resources for song1..song11 plus their recorders, in playlist order
fn recorded_catalog(gate: &AutoplayGate) -> (TrackCatalog, Vec<Recorder>) {
    let mut catalog = TrackCatalog::new();
    let mut recorders = Vec::new();
    for info in default_playlist() {
        let recorder = Recorder::new();
        recorders.push(recorder.clone());
        catalog.register(
            info,
            Box::new(RecordingResource {
                recorder,
                gate: gate.clone(),
            }),
        );
    }
    (catalog, recorders)
}

fn active_count(recorders: &[Recorder]) -> usize {
    recorders.iter().filter(|r| r.with(|rec| rec.active)).count()
}

/// A page with all eleven trigger panels stacked 1000px apart
fn page_with_panels(gate: AutoplayGate) -> (Page, Vec<Recorder>) {
    let (catalog, recorders) = recorded_catalog(&gate);
    let mut dispatcher =
        TriggerDispatcher::new(TriggerMap::page_default()).with_pulse(Duration::from_secs(60));
    let mut observer = VisibilityObserver::new(ObserverOptions::default());

    for (i, trigger) in TriggerMap::page_triggers().enumerate() {
        let id = RegionId::new(format!("panel-{}", i + 1));
        dispatcher.register(RegionSpec::trigger(id.clone(), trigger).with_reveal());
        observer.observe(id, Span::new(1000.0 * (i + 1) as f64, 400.0));
    }
    dispatcher.register(RegionSpec::trigger("panel-encore", "song12-encore"));
    observer.observe(RegionId::from("panel-encore"), Span::new(20_000.0, 400.0));

    let page = Page::new(
        PlaybackManager::new(catalog),
        dispatcher,
        observer,
        ControlPanel::default(),
    )
    .with_gate(gate);
    (page, recorders)
}

/// The scenario from the playlist walkthrough: song3, then song5, then song5 ends
#[tokio::test]
async fn test_play_switch_and_natural_end() {
    let gate = AutoplayGate::unlocked();
    let (catalog, recorders) = recorded_catalog(&gate);
    let mut manager = PlaybackManager::new(catalog);

    let start = match manager.play("song3").unwrap() {
        PlayOutcome::Pending(start) => start,
        PlayOutcome::AlreadyPlaying => panic!("nothing was playing"),
    };
    let (ticket, result) = start.wait().await;
    manager.settle(ticket, result).unwrap();
    assert_eq!(manager.current_track(), Some(&TrackId::from("song3")));
    assert!(manager.is_playing());

    let start = match manager.play("song5").unwrap() {
        PlayOutcome::Pending(start) => start,
        PlayOutcome::AlreadyPlaying => panic!("song5 was not playing"),
    };
    let song3 = &recorders[2];
    assert!(!song3.with(|r| r.active));
    assert_eq!(song3.with(|r| r.position), Duration::ZERO);

    let (ticket, result) = start.wait().await;
    manager.settle(ticket, result).unwrap();
    assert_eq!(manager.current_track(), Some(&TrackId::from("song5")));
    assert!(manager.is_playing());
    assert_eq!(active_count(&recorders), 1);

    manager.on_track_end("song5");
    assert!(!manager.is_playing());
    assert_eq!(manager.current_track(), Some(&TrackId::from("song5")));
}

/// The same region becoming visible three times starts playback once
#[tokio::test]
async fn test_region_triggers_once_per_page() {
    let (mut page, recorders) = page_with_panels(AutoplayGate::unlocked());

    for _ in 0..3 {
        page.dispatch(PageEvent::RegionVisible(RegionId::from("panel-4")));
    }
    assert!(page.step().await);

    assert_eq!(recorders[3].with(|r| r.starts), 1);
    assert!(page.manager().is_playing());
    assert_eq!(page.manager().current_track(), Some(&TrackId::from("song4")));
}

/// A trigger with no entry in the lookup table never plays
#[tokio::test]
async fn test_unmapped_trigger_is_ignored() {
    let (mut page, recorders) = page_with_panels(AutoplayGate::unlocked());

    page.dispatch(PageEvent::RegionVisible(RegionId::from("panel-encore")));
    page.dispatch(PageEvent::Scrolled(Viewport::new(19_700.0, 1000.0)));

    assert!(recorders.iter().all(|r| r.with(|rec| rec.starts) == 0));
    assert_eq!(page.manager().current_track(), None);
    assert!(!page.dispatcher().is_triggered("panel-encore"));
}

/// Scrolling down the page plays each panel in turn with one track at a time
#[tokio::test]
async fn test_scroll_through_page() {
    let (mut page, recorders) = page_with_panels(AutoplayGate::unlocked());
    let viewport = Viewport::new(0.0, 1000.0);

    for panel in 1..=11 {
        // Panel n sits at n * 1000px; this puts it in the middle of the band
        page.dispatch(PageEvent::Scrolled(viewport.scrolled_to(1000.0 * panel as f64 - 300.0)));
        assert!(page.step().await);

        let expected = TrackId::numbered(panel);
        assert_eq!(page.manager().current_track(), Some(&expected));
        assert!(page.manager().is_playing());
        assert!(active_count(&recorders) <= 1);
        assert!(page.dispatcher().is_revealed(&format!("panel-{}", panel)));
    }

    // Scrolling back up replays nothing
    page.dispatch(PageEvent::Scrolled(viewport.scrolled_to(700.0)));
    assert_eq!(page.manager().current_track(), Some(&TrackId::numbered(11)));
    assert_eq!(recorders[0].with(|r| r.starts), 1);
    assert_eq!(page.dispatcher().triggered_count(), 11);
}

/// Autoplay policy: scroll-triggered starts fail until the visitor interacts
#[tokio::test]
async fn test_denied_start_then_manual_resume() {
    let gate = AutoplayGate::new();
    let (mut page, recorders) = page_with_panels(gate.clone());

    page.dispatch(PageEvent::RegionVisible(RegionId::from("panel-1")));
    assert!(page.step().await);
    assert!(!page.manager().is_playing());
    assert_eq!(page.manager().current_track(), Some(&TrackId::from("song1")));
    assert_eq!(page.controls().now_playing(), Some(READY_TEXT));

    // No automatic retry
    assert_eq!(recorders[0].with(|r| r.starts), 1);

    page.dispatch(PageEvent::PlayPauseClicked);
    assert!(page.step().await);
    assert!(page.manager().is_playing());
    assert_eq!(recorders[0].with(|r| r.starts), 2);
    assert_eq!(page.controls().now_playing(), Some("Your Mind's On Lockdown"));
}

/// Toggling before anything was selected does nothing
#[tokio::test]
async fn test_toggle_without_selection() {
    let (mut page, recorders) = page_with_panels(AutoplayGate::unlocked());

    page.dispatch(PageEvent::PlayPauseClicked);

    assert!(!page.manager().is_playing());
    assert_eq!(page.manager().current_track(), None);
    assert!(recorders.iter().all(|r| r.with(|rec| rec.starts) == 0));
}

/// Natural end reported by the resource reaches the page loop
#[tokio::test]
async fn test_track_end_through_hook() {
    let (mut page, recorders) = page_with_panels(AutoplayGate::unlocked());

    page.dispatch(PageEvent::RegionVisible(RegionId::from("panel-2")));
    assert!(page.step().await);
    assert!(page.manager().is_playing());

    recorders[1].finish();
    assert!(page.step().await);

    assert!(!page.manager().is_playing());
    assert_eq!(page.manager().current_track(), Some(&TrackId::from("song2")));
    assert_eq!(page.controls().play_pause().map(|b| b.title), Some("Play"));
}

/// A resource failing to load is logged and leaves the player alone
#[tokio::test]
async fn test_resource_error_keeps_page_running() {
    let (mut page, recorders) = page_with_panels(AutoplayGate::unlocked());

    page.dispatch(PageEvent::RegionVisible(RegionId::from("panel-6")));
    assert!(page.step().await);
    assert!(page.manager().is_playing());
    let before = page.manager().state().clone();

    recorders[6].fail("404 Not Found");
    recorders[5].fail("decode error");
    assert!(page.step().await);
    assert!(page.step().await);

    assert_eq!(page.manager().state(), &before);
    assert_eq!(page.controls().now_playing(), Some("Numb"));

    // The loop still reacts to later events
    page.dispatch(PageEvent::RegionVisible(RegionId::from("panel-7")));
    assert!(page.step().await);
    assert_eq!(page.manager().current_track(), Some(&TrackId::from("song7")));
}

/// Volume changes reach every resource, active or not
#[tokio::test]
async fn test_volume_applies_to_all_tracks() {
    let (mut page, recorders) = page_with_panels(AutoplayGate::unlocked());

    page.dispatch(PageEvent::VolumeInput(42));
    assert!(recorders.iter().all(|r| r.with(|rec| rec.volume) == 0.42));

    page.dispatch(PageEvent::MuteClicked);
    page.dispatch(PageEvent::MuteClicked);
    assert_eq!(page.manager().volume(), 0.7);
    assert!(recorders.iter().all(|r| r.with(|rec| rec.volume) == 0.7));
}

/// The default page configuration drives a complete simulated visit
#[tokio::test]
async fn test_default_page_from_config() {
    let mut config = PageFile::default();
    config.page.latency_ms = 0;
    config.page.pulse_ms = 60_000;

    let gate = AutoplayGate::new();
    let mut page = Page::from_config(&config, gate.clone());
    assert_eq!(page.debug_info().tracks_loaded, 11);

    page.dispatch(PageEvent::UserInteraction);
    assert!(gate.is_unlocked());

    // Third section: panel-3 sits 400px into it
    let section_top = 900.0 + 2.0 * 1400.0;
    let viewport = Viewport::new(section_top + 100.0, config.page.viewport_height);
    page.dispatch(PageEvent::Scrolled(viewport));
    assert!(page.step().await);

    assert!(page.dispatcher().is_triggered("panel-3"));
    assert!(page.dispatcher().is_revealed("section-3"));
    assert_eq!(page.manager().current_track(), Some(&TrackId::from("song3")));
    assert!(page.manager().is_playing());

    let info = page.debug_info();
    assert_eq!(info.current_title.as_deref(), Some("Attacks The Brain"));
    assert_eq!(info.volume_percent, 70);
}

/// Clicking a song section plays its track even after its trigger fired
#[tokio::test]
async fn test_click_section_replays() {
    let mut config = PageFile::default();
    config.page.latency_ms = 0;
    config.page.pulse_ms = 60_000;
    let mut page = Page::from_config(&config, AutoplayGate::new());

    page.dispatch(PageEvent::RegionClicked(RegionId::from("section-7")));
    assert!(page.step().await);
    assert_eq!(page.manager().current_track(), Some(&TrackId::from("song7")));
    assert!(page.manager().is_playing());

    page.dispatch(PageEvent::RegionClicked(RegionId::from("section-2")));
    assert!(page.step().await);
    assert_eq!(page.manager().current_track(), Some(&TrackId::from("song2")));
}
