//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player leaves the ground
    Jump,
    /// Star picked up
    StarCollect,
    /// Whole star row collected
    RoundClear,
    /// A new bomb drops in
    BombSpawn,
    /// Player touched a bomb
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Which sound (if any) a simulation event triggers
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerJumped => Some(SoundEffect::Jump),
            GameEvent::StarCollected { .. } => Some(SoundEffect::StarCollect),
            GameEvent::StarsRespawned => Some(SoundEffect::RoundClear),
            GameEvent::BombSpawned { .. } => Some(SoundEffect::BombSpawn),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::GameOver),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set effective SFX volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Play the sound for each event in order
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => self.sweep(ctx, vol * 0.25, 220.0, 520.0, 0.12, OscillatorType::Square),
            SoundEffect::StarCollect => {
                self.arpeggio(ctx, vol * 0.25, &[880.0, 1320.0], 0.06, OscillatorType::Sine)
            }
            SoundEffect::RoundClear => self.arpeggio(
                ctx,
                vol * 0.3,
                &[523.0, 659.0, 784.0, 1047.0],
                0.1,
                OscillatorType::Triangle,
            ),
            SoundEffect::BombSpawn => {
                self.sweep(ctx, vol * 0.3, 900.0, 300.0, 0.3, OscillatorType::Sawtooth)
            }
            SoundEffect::GameOver => self.arpeggio(
                ctx,
                vol * 0.3,
                &[400.0, 350.0, 300.0, 200.0],
                0.2,
                OscillatorType::Sine,
            ),
            SoundEffect::HighScore => self.arpeggio(
                ctx,
                vol * 0.25,
                &[500.0, 600.0, 700.0, 800.0, 1000.0],
                0.08,
                OscillatorType::Triangle,
            ),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single tone gliding from `from` to `to` Hz
    fn sweep(
        &self,
        ctx: &AudioContext,
        level: f32,
        from: f32,
        to: f32,
        duration: f64,
        osc_type: OscillatorType,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration + 0.05).ok();
    }

    /// Short notes played one after another
    fn arpeggio(
        &self,
        ctx: &AudioContext,
        level: f32,
        notes: &[f32],
        spacing: f64,
        osc_type: OscillatorType,
    ) {
        for (i, freq) in notes.iter().enumerate() {
            let delay = i as f64 * spacing;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(level, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + spacing * 2.5)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + spacing * 3.0).ok();
            }
        }
    }
}
