//! Audio cues using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use crate::sim::{EndCause, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Countdown finished, round running
    Go,
    /// Pipe passed
    Score,
    /// Bird hit a pipe
    Crash,
    /// Bird flew off the top
    FlewAway,
    /// Round ended with a new best
    NewHighScore,
}

impl SoundEffect {
    /// Cues for a batch of tick events, in order
    pub fn cues(events: &[GameEvent]) -> Vec<SoundEffect> {
        let mut cues = Vec::new();
        for event in events {
            match event {
                GameEvent::RoundStarted => cues.push(SoundEffect::Go),
                GameEvent::ObstaclePassed { .. } => cues.push(SoundEffect::Score),
                GameEvent::RoundEnded {
                    cause, new_record, ..
                } => {
                    cues.push(match cause {
                        EndCause::Ceiling => SoundEffect::FlewAway,
                        EndCause::Collision { .. } => SoundEffect::Crash,
                    });
                    if *new_record {
                        cues.push(SoundEffect::NewHighScore);
                    }
                }
                GameEvent::ObstacleSpawned { .. } | GameEvent::Restarted => {}
            }
        }
        cues
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - sound effects disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up volume/mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Go => self.play_go(ctx, vol),
                SoundEffect::Score => self.play_score(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::FlewAway => self.play_flew_away(ctx, vol),
                SoundEffect::NewHighScore => self.play_high_score(ctx, vol),
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

        /// Go - quick rising chirp
        fn play_go(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(900.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Score - two-note ding
        fn play_score(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [880.0, 1320.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.15).ok();
                }
            }
        }

        /// Crash - thump plus a falling saw
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            // Bass thump
            if let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.6, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.frequency().set_value_at_time(150.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(50.0, t + 0.15)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.2).ok();
            }

            // Falling saw, 400Hz to 80Hz
            if let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.frequency().set_value_at_time(400.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(80.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }

        /// Flew away - whoosh fading upward
        fn play_flew_away(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(0.01, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.3, t + 0.1)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1600.0, t + 0.5)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.6).ok();
        }

        /// High score - celebratory
        fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                let delay = 0.3 + i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Segment;

    #[test]
    fn test_cues_follow_events() {
        let events = vec![
            GameEvent::RoundStarted,
            GameEvent::ObstacleSpawned { id: 1 },
            GameEvent::ObstaclePassed { id: 1, score: 1 },
            GameEvent::RoundEnded {
                score: 1,
                cause: EndCause::Collision {
                    obstacle_id: 2,
                    segment: Segment::Lower,
                },
                new_record: true,
            },
        ];
        assert_eq!(
            SoundEffect::cues(&events),
            vec![
                SoundEffect::Go,
                SoundEffect::Score,
                SoundEffect::Crash,
                SoundEffect::NewHighScore
            ]
        );
    }

    #[test]
    fn test_ceiling_cue() {
        let events = vec![
            GameEvent::RoundEnded {
                score: 0,
                cause: EndCause::Ceiling,
                new_record: false,
            },
            GameEvent::Restarted,
        ];
        assert_eq!(SoundEffect::cues(&events), vec![SoundEffect::FlewAway]);
    }
}
