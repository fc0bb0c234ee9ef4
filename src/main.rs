//! Holiday Havoc entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use holiday_havoc::Tuning;
    use holiday_havoc::audio::{AudioManager, SoundEffect};
    use holiday_havoc::consts::*;
    use holiday_havoc::renderer::{RenderState, scene};
    use holiday_havoc::sim::{Game, GameEvent};

    /// Browser app holding the game and everything around it
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
    }

    impl App {
        fn new(seed: u64) -> Self {
            Self {
                game: Game::new(Tuning::default(), seed),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                audio: AudioManager::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.game.tick();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            // Drop time we could not catch up on
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }

            for event in self.game.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                if let GameEvent::TargetDestroyed { pos } = event {
                    log::debug!("Gift opened at ({:.0}, {:.0})", pos.x, pos.y);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = scene::build(&self.game);
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let score = self.game.state.score.to_string();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&score));
            }

            // Win overlay once every gift is open; the score label stays up
            let cleared = self.game.state.is_cleared();
            if let Some(el) = document.get_element_by_id("win-overlay") {
                let _ = el.set_attribute("class", if cleared { "" } else { "hidden" });
            }
            if cleared {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&score));
                }
            }
        }

        /// Canvas offset (CSS pixels) to game coordinates
        fn to_game(&self, canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
            let play = self.game.tuning().play_size;
            let w = canvas.client_width().max(1) as f32;
            let h = canvas.client_height().max(1) as f32;
            Vec2::new(
                event.offset_x() as f32 * play.x / w,
                event.offset_y() as f32 * play.y / h,
            )
        }
    }

    fn js_err(msg: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&msg.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Holiday Havoc starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()
            .map_err(|_| js_err("#canvas is not a canvas"))?;

        // Backing store at device resolution
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let play_size = app.borrow().game.tuning().play_size;
        let render_state = RenderState::new(surface, &adapter, width, height, play_size)
            .await
            .map_err(js_err)?;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, app.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(app);

        log::info!("Holiday Havoc running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Press: grab whatever is under the pointer, or restart a cleared board
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                let point = a.to_game(&canvas_clone, &event);
                a.game.pointer_down(point);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Move: drag target follows the pointer
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let point = a.to_game(&canvas_clone, &event);
                a.game.pointer_move(point);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Release on the window so letting go off-canvas still fires
        {
            let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.pointer_up();
            });
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Start-up failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: one scripted shot after another, logging what happens
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use holiday_havoc::Tuning;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Holiday Havoc (native) starting...");
    log::info!("The playable version runs in the browser - build for wasm32 with `trunk serve`");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => Tuning::default(),
    };
    run_demo(tuning);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> holiday_havoc::Tuning {
    use holiday_havoc::Tuning;

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Could not read {}: {} - using defaults", path, e);
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::error!("Bad tuning in {}: {} - using defaults", path, e);
            Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_demo(tuning: holiday_havoc::Tuning) {
    use glam::Vec2;
    use holiday_havoc::consts::SIM_DT;
    use holiday_havoc::sim::{Game, GameEvent, LevelPhase};

    const SHOTS: u32 = 3;
    const SHOT_TIMEOUT_SECS: f64 = 8.0;

    let mut game = Game::new(tuning, 2024);
    let ticks = |secs: f64| (secs / SIM_DT as f64).ceil() as u32;

    // Let the stack settle
    for _ in 0..ticks(0.5) {
        game.tick();
    }

    for shot in 1..=SHOTS {
        if game.state.is_cleared() {
            break;
        }
        let anchor = game.tuning().anchor;
        let before = game.state.targets.len();

        // Pull back and down, a little harder each time
        let pull = Vec2::new(-80.0 - 10.0 * shot as f32, 30.0 + 5.0 * shot as f32);
        game.pointer_down(anchor);
        game.pointer_move(anchor + pull);
        for _ in 0..ticks(0.5) {
            game.tick();
        }
        game.pointer_up();

        let mut ran = 0;
        loop {
            game.tick();
            ran += 1;
            if matches!(game.state.phase, LevelPhase::Aiming | LevelPhase::Cleared)
                || ran >= ticks(SHOT_TIMEOUT_SECS)
            {
                break;
            }
        }

        let events = game.state.drain_events();
        let opened = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TargetDestroyed { .. }))
            .count();
        log::info!(
            "Shot {}: {} gift(s) opened, {} -> {} left, score {}",
            shot,
            opened,
            before,
            game.state.targets.len(),
            game.state.score
        );
    }

    log::info!(
        "Demo finished after {:.1}s simulated: score {}, {} gift(s) left{}",
        game.state.elapsed,
        game.state.score,
        game.state.targets.len(),
        if game.state.is_cleared() { " - HOLIDAY HAVOC!" } else { "" }
    );
}
