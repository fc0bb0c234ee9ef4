//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, no sample files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Band released the ornament
    Launch,
    /// A gift box broke open
    TargetBreak,
    /// Fresh ornament placed on the slingshot
    LevelReset,
    /// Last gift opened
    Cleared,
    /// New round after clearing
    Restart,
}

impl SoundEffect {
    /// Sound to play for a game event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Launched => None,
            GameEvent::LinkReleased => Some(Self::Launch),
            GameEvent::TargetDestroyed { .. } => Some(Self::TargetBreak),
            GameEvent::LevelReset => Some(Self::LevelReset),
            GameEvent::Cleared => Some(Self::Cleared),
            GameEvent::Restarted => Some(Self::Restart),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.6 }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let vol = self.volume;
        match effect {
            SoundEffect::Launch => self.play_launch(ctx, vol),
            SoundEffect::TargetBreak => self.play_target_break(ctx, vol),
            SoundEffect::LevelReset => self.play_level_reset(ctx, vol),
            SoundEffect::Cleared => self.play_cleared(ctx, vol),
            SoundEffect::Restart => self.play_restart(ctx, vol),
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

    /// Short decaying tone starting at `start` seconds from now
    fn pluck(&self, ctx: &AudioContext, freq: f32, osc_type: OscillatorType, vol: f32, start: f64, len: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + start;

        gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + len)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + len + 0.02).ok();
    }

    /// Launch - elastic twang dropping in pitch
    fn play_launch(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 260.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(260.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(90.0, t + 0.25)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Target break - papery crunch with a bell on top
    fn play_target_break(&self, ctx: &AudioContext, vol: f32) {
        if let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Square) {
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.12)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        self.pluck(ctx, 1568.0, OscillatorType::Sine, vol * 0.2, 0.02, 0.4);
        self.pluck(ctx, 2093.0, OscillatorType::Sine, vol * 0.1, 0.02, 0.3);
    }

    /// Level reset - soft low blip
    fn play_level_reset(&self, ctx: &AudioContext, vol: f32) {
        self.pluck(ctx, 330.0, OscillatorType::Triangle, vol * 0.2, 0.0, 0.15);
    }

    /// Cleared - jingle arpeggio
    fn play_cleared(&self, ctx: &AudioContext, vol: f32) {
        // E5 E5 E5, G5 C5 D5 E5
        let notes: [(f32, f64); 7] = [
            (659.25, 0.0),
            (659.25, 0.15),
            (659.25, 0.30),
            (783.99, 0.50),
            (523.25, 0.65),
            (587.33, 0.80),
            (659.25, 0.95),
        ];
        for (freq, start) in notes {
            self.pluck(ctx, freq, OscillatorType::Triangle, vol * 0.35, start, 0.3);
            self.pluck(ctx, freq * 2.0, OscillatorType::Sine, vol * 0.08, start, 0.2);
        }
    }

    /// Restart - quick rising pair
    fn play_restart(&self, ctx: &AudioContext, vol: f32) {
        self.pluck(ctx, 523.25, OscillatorType::Sine, vol * 0.3, 0.0, 0.12);
        self.pluck(ctx, 783.99, OscillatorType::Sine, vol * 0.3, 0.1, 0.2);
    }
}
