//! Star Hop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use star_hop::audio::{AudioManager, SoundEffect};
    use star_hop::consts::*;
    use star_hop::persistence;
    use star_hop::platform::KeyValueStore;
    use star_hop::renderer::{Palette, RenderState, build_scene};
    use star_hop::sim::{GamePhase, GameState, TickInput, tick};
    use star_hop::persistence::SaveGuard;
    use star_hop::{HighScores, Settings, Toggle};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        high_scores: HighScores,
        store: Box<dyn KeyValueStore>,
        save_guard: SaveGuard,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for auto-save and score recording
        last_phase: GamePhase,
        last_rank: Option<usize>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let store = star_hop::platform::default_store();
            let settings = Settings::load(store.as_ref());
            let high_scores = HighScores::load(store.as_ref());
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());

            Self {
                state: GameState::new(seed),
                render_state: None,
                audio,
                settings,
                high_scores,
                store,
                save_guard: SaveGuard::default(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Playing,
                last_rank: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
            }

            let events = self.state.drain_events();
            self.audio.play_events(&events);

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

            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                match current_phase {
                    GamePhase::Paused => self.save_game(),
                    GamePhase::GameOver => self.finish_run(),
                    GamePhase::Playing => {}
                }
                self.last_phase = current_phase;
            }
        }

        /// Record the score and drop the save once the run ends
        fn finish_run(&mut self) {
            persistence::clear_game(self.store.as_ref());
            let now = js_sys::Date::now();
            self.last_rank =
                self.high_scores
                    .add_score(self.state.score, self.state.rounds_cleared, now);
            if let Some(rank) = self.last_rank {
                log::info!("New high score #{}: {}", rank, self.state.score);
                self.high_scores.save(self.store.as_ref());
                self.audio.play(SoundEffect::HighScore);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let palette = Palette::for_settings(self.settings.high_contrast);
            let vertices = build_scene(&self.state, &palette, self.settings.debug_bodies);

            if let Some(ref mut render_state) = self.render_state {
                render_state.clear = palette.background;
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
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
            let Some(document) = document() else { return };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.state.score_text()));
            }

            if let Some(el) = document.get_element_by_id("hud-best") {
                let best = self.high_scores.top_score().unwrap_or(0).max(self.state.score);
                el.set_text_content(Some(&format!("Best: {}", best)));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            let paused = self.state.phase == GamePhase::Paused;
            show_if(&document, "pause-menu", paused && !self.save_guard.offer_pending());
            show_if(&document, "idle-badge", self.input.idle_mode);

            let over = self.state.is_game_over();
            show_if(&document, "game-over", over);
            if over {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
                if let Some(el) = document.get_element_by_id("final-rank") {
                    let text = match self.last_rank {
                        Some(rank) => format!("High score #{}", rank),
                        None => String::new(),
                    };
                    el.set_text_content(Some(&text));
                }
            }
        }

        fn save_game(&self) {
            if let Err(e) = self.save_guard.save(self.store.as_ref(), &self.state) {
                log::warn!("Save failed: {}", e);
            }
        }

        /// Hold the fresh run while a stored one is on offer
        fn offer_saved(&mut self, saved: Option<&GameState>) {
            self.save_guard = SaveGuard::for_saved(saved);
            if self.save_guard.offer_pending() {
                self.state.phase = GamePhase::Paused;
                self.last_phase = GamePhase::Paused;
            }
        }

        /// Reset game state for restart
        fn restart(&mut self, seed: u64) {
            let idle = self.input.idle_mode;
            self.state = GameState::new(seed);
            self.accumulator = 0.0;
            self.input = TickInput {
                idle_mode: idle,
                ..Default::default()
            };
            self.last_phase = GamePhase::Playing;
            self.last_rank = None;
            self.save_guard.resolve();
            persistence::clear_game(self.store.as_ref());
            log::info!("Game restarted with seed: {}", seed);
        }

        /// Resume a saved run, paused so the player can get ready
        fn load_state(&mut self, mut state: GameState) {
            state.phase = GamePhase::Paused;
            self.state = state;
            self.accumulator = 0.0;
            self.input = TickInput::default();
            self.last_phase = GamePhase::Paused;
            self.save_guard.resolve();
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn show_if(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Star Hop starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        show_if(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let world = {
            let g = game.borrow();
            (g.state.config.width, g.state.config.height)
        };
        let render_state = RenderState::new(surface, &adapter, width, height, world)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        // Offer to continue a saved run
        let saved_game = persistence::load_game(game.borrow().store.as_ref());
        game.borrow_mut().offer_saved(saved_game.as_ref());
        if let Some(ref save) = saved_game {
            show_if(&document, "continue-prompt", true);
            if let Some(el) = document.get_element_by_id("continue-score") {
                el.set_text_content(Some(&save.score.to_string()));
            }
            log::info!("Found saved game with score {}", save.score);
        }

        setup_keyboard(game.clone())?;
        setup_buttons(game.clone(), saved_game)?;
        setup_auto_pause(game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Star Hop running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        // Key down: held keys plus one-shot commands
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                g.audio.resume();
                let offer_pending = g.save_guard.offer_pending();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "ArrowUp" => g.input.up = true,
                    "Escape" | "p" | "P" if !event.repeat() && !offer_pending => {
                        g.input.pause = true
                    }
                    "i" | "I" if !event.repeat() => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    "Enter" | "r" | "R" if g.state.is_game_over() => {
                        g.restart(js_sys::Date::now() as u64);
                    }
                    key => match Toggle::from_key(key) {
                        Some(which) if !event.repeat() => {
                            g.settings.toggle(which, g.store.as_ref());
                        }
                        _ => return,
                    },
                }
                event.prevent_default();
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up: release held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    "ArrowUp" => g.input.up = false,
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn on_click(
        document: &Document,
        id: &str,
        handler: impl FnMut(web_sys::MouseEvent) + 'static,
    ) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_buttons(
        game: Rc<RefCell<Game>>,
        saved_game: Option<GameState>,
    ) -> Result<(), JsValue> {
        let doc = document().ok_or_else(|| JsValue::from_str("no document"))?;

        {
            let game = game.clone();
            on_click(&doc, "restart-btn", move |_| {
                game.borrow_mut().restart(js_sys::Date::now() as u64);
            })?;
        }

        {
            let game = game.clone();
            on_click(&doc, "resume-btn", move |_| {
                game.borrow_mut().input.pause = true; // Toggle back to playing
            })?;
        }

        {
            let game = game.clone();
            on_click(&doc, "continue-btn", move |_| {
                if let Some(ref state) = saved_game {
                    game.borrow_mut().load_state(state.clone());
                    log::info!("Loaded saved game with score {}", state.score);
                }
                if let Some(document) = document() {
                    show_if(&document, "continue-prompt", false);
                }
            })?;
        }

        on_click(&doc, "new-game-btn", move |_| {
            game.borrow_mut().restart(js_sys::Date::now() as u64);
            if let Some(document) = document() {
                show_if(&document, "continue-prompt", false);
            }
        })?;

        Ok(())
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                if hidden && g.settings.pause_on_blur && g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (tab hidden)");
                }
                let mute = hidden && g.settings.mute_on_blur;
                g.audio.set_muted(mute);
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside): drop held keys so the player stops
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.left = false;
                g.input.right = false;
                g.input.up = false;
                if g.settings.pause_on_blur && g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Star Hop (native) starting...");
    log::info!("Native mode runs the auto-play demo headless - run with `trunk serve` to play");

    // star-hop [seed] [seconds]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(120);

    headless::run(seed, seconds);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use star_hop::HighScores;
    use star_hop::consts::SIM_DT;
    use star_hop::platform::default_store;
    use star_hop::sim::{GameEvent, GameState, TickInput, tick};

    /// Let the autopilot play one run and report the result
    pub fn run(seed: u64, seconds: u32) {
        let store = default_store();
        let mut high_scores = HighScores::load(store.as_ref());

        let mut state = GameState::new(seed);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        let max_ticks = seconds as u64 * 60;
        while state.time_ticks < max_ticks && !state.is_game_over() {
            tick(&mut state, &input, SIM_DT);
            for event in state.drain_events() {
                match event {
                    GameEvent::BombSpawned { id } => {
                        log::info!("Bomb {} incoming ({} on screen)", id, state.bombs.len())
                    }
                    GameEvent::PlayerHit { bomb_id } => log::info!("Hit by bomb {}", bomb_id),
                    other => log::debug!("{:?}", other),
                }
            }
        }

        let elapsed = state.time_ticks as f32 * SIM_DT;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        if let Some(rank) = high_scores.add_score(state.score, state.rounds_cleared, timestamp) {
            log::info!("Leaderboard rank #{}", rank);
            high_scores.save(store.as_ref());
        }

        println!(
            "seed {}: {} after {:.1}s, {} rounds cleared{}",
            seed,
            state.score_text(),
            elapsed,
            state.rounds_cleared,
            if state.is_game_over() { ", game over" } else { "" }
        );
    }
}
