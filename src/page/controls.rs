// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Player control widgets.
//!
//! Every widget is optional; a page without one simply never shows or
//! updates it.

use serde::Serialize;

use crate::config::ControlsConfig;
use crate::playback::PlaybackManager;

/// Text shown before anything has played
pub const READY_TEXT: &str = "Ready to Begin";

/// Label and tooltip of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    /// Button face
    pub label: &'static str,
    /// Tooltip
    pub title: &'static str,
}

impl ButtonView {
    const PLAY: Self = Self { label: "▶️", title: "Play" };
    const PAUSE: Self = Self { label: "⏸️", title: "Pause" };
    const MUTE: Self = Self { label: "🔊", title: "Mute" };
    const UNMUTE: Self = Self { label: "🔇", title: "Unmute" };
}

/// Rendered state of the control widgets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPanel {
    play_pause: Option<ButtonView>,
    mute: Option<ButtonView>,
    volume_slider: Option<u8>,
    now_playing: Option<String>,
}

impl ControlPanel {
    /// Create the widgets present on the page
    pub fn new(config: ControlsConfig) -> Self {
        Self {
            play_pause: config.play_pause.then_some(ButtonView::PLAY),
            mute: config.mute.then_some(ButtonView::MUTE),
            volume_slider: config.volume.then_some(70),
            now_playing: config.now_playing.then(|| READY_TEXT.to_string()),
        }
    }

    /// Bring every present widget in line with the player.
    ///
    /// The now-playing text only changes while a track is audibly playing,
    /// so a pending or refused start never shows up there.
    pub fn refresh(&mut self, manager: &PlaybackManager) {
        let state = manager.state();

        if let Some(button) = self.play_pause.as_mut() {
            *button = if state.playing {
                ButtonView::PAUSE
            } else {
                ButtonView::PLAY
            };
        }

        if let Some(button) = self.mute.as_mut() {
            *button = if state.is_muted() {
                ButtonView::UNMUTE
            } else {
                ButtonView::MUTE
            };
        }

        if let Some(slider) = self.volume_slider.as_mut() {
            *slider = state.volume_percent().min(100) as u8;
        }

        if let (Some(display), Some(title)) = (self.now_playing.as_mut(), manager.current_title()) {
            if state.playing {
                *display = title.to_string();
            }
        }
    }

    /// Play/pause button, if present
    pub fn play_pause(&self) -> Option<ButtonView> {
        self.play_pause
    }

    /// Mute button, if present
    pub fn mute(&self) -> Option<ButtonView> {
        self.mute
    }

    /// Volume slider position (0 - 100), if present
    pub fn volume_slider(&self) -> Option<u8> {
        self.volume_slider
    }

    /// Now-playing text, if present
    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(ControlsConfig::default())
    }
}
