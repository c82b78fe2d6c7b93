//! Mic Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use mic_flap::audio::{AudioManager, SoundEffect};
    use mic_flap::mic::Microphone;
    use mic_flap::platform::{KeyValueStore, LocalStorage, MemoryStore};
    use mic_flap::renderer::{RenderState, shapes};
    use mic_flap::sim::{GameEvent, GamePhase, TickInput, autopilot_level};
    use mic_flap::{Session, Settings, Tuning};

    /// Sensitivity step for the +/- keys
    const SENSITIVITY_STEP: f32 = 0.25;

    /// Game instance holding all state
    struct Game {
        session: Session<Box<dyn KeyValueStore>>,
        settings: Settings,
        render_state: Option<RenderState>,
        audio: AudioManager,
        mic: Option<Microphone>,
        input: TickInput,
        /// Level fed to the last tick (after sensitivity)
        level: f32,
        /// Did the last finished round set a record
        last_round_record: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, store: Box<dyn KeyValueStore>) -> Self {
            let settings = Settings::load(&store);
            let audio = AudioManager::new(&settings);
            Self {
                session: Session::new(seed, Tuning::default(), store),
                settings,
                render_state: None,
                audio,
                mic: None,
                input: TickInput::default(),
                level: 0.0,
                last_round_record: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run exactly one simulation tick for this frame
        fn update(&mut self, time: f64) {
            let raw = self.mic.as_mut().map(|mic| mic.level()).unwrap_or(0.0);
            self.input.level = self.settings.adjust_level(raw);
            self.level = if self.input.autopilot {
                autopilot_level(&self.session.state)
            } else {
                self.input.level
            };

            let events = self.session.advance(&self.input);
            // Restart is one-shot
            self.input.restart = false;

            for cue in SoundEffect::cues(&events) {
                self.audio.play(cue);
            }
            for event in &events {
                match event {
                    GameEvent::RoundEnded { new_record, .. } => {
                        self.last_round_record = *new_record;
                    }
                    GameEvent::Restarted => self.last_round_record = false,
                    _ => {}
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = shapes::scene(&self.session.state, self.level);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.session.state;

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.session.best.best.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-speed .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("x{:.2}", state.speed_multiplier())));
            }

            // Debug readouts
            let debug_class = if self.settings.show_debug {
                "hud-item"
            } else {
                "hud-item hidden"
            };
            if let Some(el) = document.get_element_by_id("hud-mic") {
                let _ = el.set_attribute("class", debug_class);
                if let Some(val) = document.query_selector("#hud-mic .hud-value").ok().flatten() {
                    let text = if self.mic.is_some() || self.input.autopilot {
                        format!("{:.3}", self.level)
                    } else {
                        "no mic".to_string()
                    };
                    val.set_text_content(Some(&text));
                }
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                let _ = el.set_attribute("class", debug_class);
                if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    val.set_text_content(Some(&self.fps.to_string()));
                }
            }

            if let Some(el) = document.get_element_by_id("hud-autopilot") {
                let class = if self.input.autopilot {
                    "hud-item"
                } else {
                    "hud-item hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            // Show/hide "Get Ready!"
            if let Some(el) = document.get_element_by_id("ready-prompt") {
                if state.phase == GamePhase::NotStarted {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if state.phase == GamePhase::Ended {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&state.score.to_string()));
                    }
                    if let Some(best_el) = document.get_element_by_id("final-best") {
                        best_el.set_text_content(Some(&self.session.best.best.to_string()));
                    }
                    if let Some(record_el) = document.get_element_by_id("new-record") {
                        let class = if self.last_round_record { "" } else { "hidden" };
                        let _ = record_el.set_attribute("class", class);
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Browsers keep audio suspended until a user gesture
        fn wake_audio(&self) {
            self.audio.resume();
            if let Some(mic) = &self.mic {
                mic.resume();
            }
        }

        /// Apply a settings change and persist it
        fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
            change(&mut self.settings);
            self.settings = self.settings.clone().sanitized();
            self.audio.apply_settings(&self.settings);
            if let Err(e) = self.settings.save(self.session.store_mut()) {
                log::warn!("Failed to save settings: {}", e);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mic Flap starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{} - high score will not survive a reload", e);
                Box::new(MemoryStore::new())
            }
        };

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, store)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let playfield = {
            let g = game.borrow();
            let tuning = &g.session.state.tuning;
            (tuning.playfield_width, tuning.playfield_height)
        };
        match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        request_microphone(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Mic Flap running!");
    }

    /// Ask for the microphone; the game runs (bird just falls) until it arrives
    fn request_microphone(game: Rc<RefCell<Game>>) {
        let smoothing = game.borrow().settings.mic_smoothing;
        wasm_bindgen_futures::spawn_local(async move {
            match Microphone::open(smoothing).await {
                Ok(mic) => game.borrow_mut().mic = Some(mic),
                Err(e) => log::warn!("Microphone unavailable: {:?}", e),
            }
        });
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Click - wake audio
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow().wake_audio();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.wake_audio();
                match event.key().as_str() {
                    "r" | "R" => g.input.restart = true,
                    "i" | "I" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    "m" | "M" => g.update_settings(|s| s.muted = !s.muted),
                    "+" | "=" => g.update_settings(|s| s.mic_sensitivity += SENSITIVITY_STEP),
                    "-" | "_" => g.update_settings(|s| s.mic_sensitivity -= SENSITIVITY_STEP),
                    "d" | "D" => g.update_settings(|s| s.show_debug = !s.show_debug),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.wake_audio();
                g.input.restart = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mic Flap (native) starting...");
    log::info!("The playable game needs a browser microphone - run with `trunk serve`");
    log::info!("Running a headless autopilot demo instead");

    let tuning = match demo::load_tuning() {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("Bad tuning: {}", e);
            std::process::exit(1);
        }
    };

    let best = demo::run(demo::seed_from_clock(), tuning);
    println!("Best score over {} demo rounds: {}", demo::ROUNDS, best);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use mic_flap::platform::MemoryStore;
    use mic_flap::sim::{GameEvent, TickInput};
    use mic_flap::{Session, Tuning};

    /// Rounds played by the demo
    pub const ROUNDS: u32 = 3;
    /// Cap per round (two minutes at the nominal frame rate)
    const MAX_FRAMES: u64 = 60 * 120;
    /// Environment variable naming a tuning JSON file
    const TUNING_ENV: &str = "MIC_FLAP_TUNING";

    pub fn load_tuning() -> Result<Tuning, Box<dyn std::error::Error>> {
        match std::env::var(TUNING_ENV) {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)?;
                let tuning = Tuning::from_json(&json)?;
                log::info!("Loaded tuning from {}", path);
                Ok(tuning)
            }
            Err(_) => Ok(Tuning::default()),
        }
    }

    pub fn seed_from_clock() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Play `ROUNDS` autopilot rounds; returns the best score
    pub fn run(seed: u64, tuning: Tuning) -> u64 {
        log::info!("Demo seed: {}", seed);
        let mut session = Session::new(seed, tuning, MemoryStore::new());
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        for round in 1..=ROUNDS {
            let mut ended = false;
            for _ in 0..MAX_FRAMES {
                let events = session.advance(&input);
                if let Some(GameEvent::RoundEnded {
                    score,
                    cause,
                    new_record,
                }) = events
                    .iter()
                    .find(|e| matches!(e, GameEvent::RoundEnded { .. }))
                {
                    log::info!(
                        "Round {}: score {} ({:?}){}",
                        round,
                        score,
                        cause,
                        if *new_record { " - new record" } else { "" }
                    );
                    ended = true;
                    break;
                }
            }
            if !ended {
                log::info!(
                    "Round {}: still flying after {} frames at score {}",
                    round,
                    MAX_FRAMES,
                    session.state.score
                );
                // A live round never reaches RoundEnded, so bank it here
                if session.bank_score() {
                    log::info!("New best: {}", session.best.best);
                }
            }
            session.advance(&TickInput {
                restart: true,
                ..input.clone()
            });
        }

        session.best.best
    }
}
