//! Microphone level metering
//!
//! The level fed to the simulation is the RMS amplitude of the most recent
//! block of time-domain samples, optionally smoothed, in `[0, 1]`.

/// Root-mean-square amplitude of a sample block (0 for an empty block)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Turns sample blocks into a smoothed level
#[derive(Debug, Clone, Default)]
pub struct LevelMeter {
    /// 0 = no smoothing; closer to 1 = slower response
    pub smoothing: f32,
    level: f32,
}

impl LevelMeter {
    pub fn new(smoothing: f32) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 0.99),
            level: 0.0,
        }
    }

    /// Feed one block and return the updated level
    pub fn push(&mut self, samples: &[f32]) -> f32 {
        let raw = rms(samples).min(1.0);
        self.level = self.smoothing * self.level + (1.0 - self.smoothing) * raw;
        self.level
    }

    /// Last computed level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Forget history (e.g. after the mic was lost)
    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::Microphone;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AnalyserNode, AudioContext, MediaStream, MediaStreamConstraints};

    use super::LevelMeter;

    /// Analyser window size (samples per level reading)
    const FFT_SIZE: u32 = 1024;

    /// Live microphone input through the Web Audio API
    pub struct Microphone {
        ctx: AudioContext,
        analyser: AnalyserNode,
        buffer: Vec<f32>,
        meter: LevelMeter,
    }

    impl Microphone {
        /// Ask for microphone permission and wire it into an analyser.
        ///
        /// The returned context may start suspended until a user gesture;
        /// call [`Microphone::resume`] from an input handler.
        pub async fn open(smoothing: f32) -> Result<Self, JsValue> {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            let devices = window.navigator().media_devices()?;

            let constraints = MediaStreamConstraints::new();
            constraints.set_audio(&JsValue::TRUE);
            constraints.set_video(&JsValue::FALSE);

            let promise = devices.get_user_media_with_constraints(&constraints)?;
            let stream: MediaStream = JsFuture::from(promise).await?.dyn_into()?;

            let ctx = AudioContext::new()?;
            let source = ctx.create_media_stream_source(&stream)?;
            let analyser = ctx.create_analyser()?;
            analyser.set_fft_size(FFT_SIZE);
            source.connect_with_audio_node(&analyser)?;

            log::info!("Microphone ready ({} Hz)", ctx.sample_rate());

            Ok(Self {
                ctx,
                analyser,
                buffer: vec![0.0; FFT_SIZE as usize],
                meter: LevelMeter::new(smoothing),
            })
        }

        /// Resume the audio context (required after a user gesture)
        pub fn resume(&self) {
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }
        }

        /// Sample the current level; call once per frame
        pub fn level(&mut self) -> f32 {
            self.analyser.get_float_time_domain_data(&mut self.buffer);
            self.meter.push(&self.buffer)
        }
    }
}
