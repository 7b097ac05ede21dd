//! Game settings and preferences
//!
//! Persisted separately from game saves through the platform store.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::platform::storage::{load_json, save_json};

/// On/off preferences the player can flip in game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    ShowFps,
    DebugBodies,
    HighContrast,
    MuteOnBlur,
}

impl Toggle {
    /// Keyboard shortcut for each toggle
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "f" | "F" => Some(Toggle::ShowFps),
            "b" | "B" => Some(Toggle::DebugBodies),
            "h" | "H" => Some(Toggle::HighContrast),
            "m" | "M" => Some(Toggle::MuteOnBlur),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Draw physics body outlines
    pub debug_bodies: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
    /// Pause the run when the tab is hidden
    pub pause_on_blur: bool,

    // === Accessibility ===
    /// High contrast palette
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // HUD
            show_fps: false,
            debug_bodies: false,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
            pause_on_blur: true,

            // Accessibility
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "star_hop_settings";

    /// Combined SFX gain after master volume
    pub fn effective_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Keep volumes in range after hand-edited storage
    pub fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
    }

    /// Flip a preference and persist the result. Returns the new value.
    pub fn toggle(&mut self, which: Toggle, store: &dyn KeyValueStore) -> bool {
        let flag = match which {
            Toggle::ShowFps => &mut self.show_fps,
            Toggle::DebugBodies => &mut self.debug_bodies,
            Toggle::HighContrast => &mut self.high_contrast,
            Toggle::MuteOnBlur => &mut self.mute_on_blur,
        };
        *flag = !*flag;
        let value = *flag;
        log::info!("{:?} -> {}", which, value);
        self.save(store);
        value
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Some(mut settings) => {
                settings.sanitize();
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        if save_json(store, Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
