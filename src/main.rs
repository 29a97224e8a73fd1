//! Slice Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use glam::Vec2;
    use slice_rush::audio::{AudioManager, SoundEffect};
    use slice_rush::consts::*;
    use slice_rush::renderer::CanvasRenderer;
    use slice_rush::sim::{GameEvent, GamePhase, GameState, ParticleSystem, tick};
    use slice_rush::Settings;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, renderer: CanvasRenderer) -> Self {
            let settings = Settings::load();
            let mut state = GameState::new(seed);
            state.particles = ParticleSystem::with_capacity(settings.max_particles());

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            Self {
                state,
                renderer,
                audio,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, dt: f32) {
            self.accumulator += dt.min(MAX_TICK_DT);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            // Long stall: drop the leftover rather than spiraling
            if self.accumulator >= SIM_DT {
                self.accumulator = 0.0;
            }

            if !self.settings.effective_screen_shake() {
                self.state.screen_shake = 0.0;
            }
        }

        /// Render the current frame
        fn render(&self, time: f64) {
            self.renderer.render(&self.state, time);
        }

        /// React to everything the sim reported this frame
        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::PhaseChanged(phase) => {
                        sync_overlays(phase);
                        if phase == GamePhase::Playing {
                            self.audio.resume();
                        }
                    }
                    GameEvent::ScoreChanged(score) => {
                        set_hud_value("hud-score", &score.to_string());
                    }
                    GameEvent::TimeChanged(elapsed) => {
                        set_hud_value("hud-time", &format!("{elapsed:.1}"));
                    }
                    GameEvent::TargetSliced { combo, .. } => {
                        self.audio.play(SoundEffect::for_slice(combo));
                    }
                    GameEvent::TargetMissed { misses } => {
                        self.audio.play(SoundEffect::Miss);
                        set_hud_value("hud-misses", &format!("{misses}/{MAX_MISSES}"));
                    }
                    GameEvent::GameOver { score, time } => {
                        self.audio.play(SoundEffect::GameOver);
                        set_text("final-score", &score.to_string());
                        set_text("final-time", &format!("{time:.1}s"));
                        log::info!("round over: score {score}, {time:.1}s");
                    }
                }
            }
        }

        fn start_round(&mut self) {
            self.state.start();
            self.audio.play(SoundEffect::Start);
            set_hud_value("hud-misses", &format!("0/{MAX_MISSES}"));
        }

        /// Fit the playfield to the canvas element
        fn fit_to_canvas(&mut self, canvas: &HtmlCanvasElement) {
            let window = web_sys::window().expect("no window");
            let dpr = window.device_pixel_ratio();
            let w = canvas.client_width() as f32;
            let h = canvas.client_height() as f32;
            self.renderer.resize(w, h, dpr);
            self.state.set_bounds(w, h);
        }
    }

    fn document() -> web_sys::Document {
        web_sys::window().expect("no window").document().expect("no document")
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hud_value(id: &str, text: &str) {
        if let Some(el) = document()
            .query_selector(&format!("#{id} .hud-value"))
            .ok()
            .flatten()
        {
            el.set_text_content(Some(text));
        }
    }

    /// Show the one overlay matching the phase, hide the rest
    fn sync_overlays(phase: GamePhase) {
        let document = document();
        let overlays = [
            ("menu", GamePhase::Menu),
            ("pause-menu", GamePhase::Paused),
            ("game-over", GamePhase::GameOver),
        ];
        for (id, overlay_phase) in overlays {
            if let Some(el) = document.get_element_by_id(id) {
                if phase == overlay_phase {
                    let _ = el.class_list().remove_1("hidden");
                } else {
                    let _ = el.class_list().add_1("hidden");
                }
            }
        }
        if let Some(hud) = document.get_element_by_id("hud") {
            if phase == GamePhase::Menu {
                let _ = hud.class_list().add_1("hidden");
            } else {
                let _ = hud.class_list().remove_1("hidden");
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Slice Rush starting...");

        let document = document();

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let renderer = CanvasRenderer::new(canvas.clone()).expect("canvas 2d unavailable");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, renderer)));
        game.borrow_mut().fit_to_canvas(&canvas);

        log::info!("Game initialized with seed: {}", seed);

        sync_overlays(GamePhase::Menu);
        setup_pointer_handlers(&canvas, game.clone());
        setup_keyboard(game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas.clone(), game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Slice Rush running!");
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - start a stroke
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.state
                    .pointer_down(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - extend the stroke
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .state
                    .pointer_move(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / leave - end the stroke
        for event_name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().state.pointer_up();
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    g.state.pointer_down(Vec2::new(x, y));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().state.pointer_move(Vec2::new(x, y));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for event_name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().state.pointer_up();
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                " " | "Enter" => match g.state.phase {
                    GamePhase::Menu | GamePhase::GameOver => g.start_round(),
                    GamePhase::Paused => g.state.resume(),
                    GamePhase::Playing => {}
                },
                "Escape" | "p" | "P" => match g.state.phase {
                    GamePhase::Playing => g.state.pause(),
                    GamePhase::Paused => g.state.resume(),
                    _ => {}
                },
                "m" | "M" => {
                    let muted = !g.audio.muted();
                    g.audio.set_muted(muted);
                    g.settings.muted = muted;
                    g.settings.save();
                    log::info!("Muted: {muted}");
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = document();

        for id in ["start-btn", "restart-btn", "play-again-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start_round();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().state.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for id in ["menu-btn", "quit-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().state.go_to_menu();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().fit_to_canvas(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = document();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.state.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.state.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.handle_events();
            g.render(time);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo round: run the sim at a fixed cadence with a scripted
/// slice stroke each second, then print the session summary.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use slice_rush::consts::SIM_DT;
    use slice_rush::sim::{GameEvent, GameState, tick};

    env_logger::init();
    log::info!("Slice Rush (native) starting...");

    let seed = 0xC0FFEE;
    let mut state = GameState::new(seed);
    let mut state_events: Vec<GameEvent> = Vec::new();
    state.start();

    // 30 simulated seconds, one horizontal stroke per second
    let ticks_per_second = (1.0 / SIM_DT) as u32;
    'outer: for second in 0..30u32 {
        state.pointer_down(Vec2::new(50.0, 280.0));
        state.pointer_move(Vec2::new(750.0, 320.0));
        state.pointer_up();

        for _ in 0..ticks_per_second {
            tick(&mut state, SIM_DT);
            for event in state.drain_events() {
                if matches!(event, GameEvent::GameOver { .. }) {
                    state_events.push(event);
                    break 'outer;
                }
                state_events.push(event);
            }
        }
        log::debug!(
            "t={}s score={} combo={} misses={}",
            second + 1,
            state.score,
            state.combo,
            state.misses
        );
    }

    let slices = state_events
        .iter()
        .filter(|e| matches!(e, GameEvent::TargetSliced { .. }))
        .count();
    println!(
        "demo round: score {} | {} slices | {} misses | {:.1}s",
        state.score, slices, state.misses, state.elapsed
    );
}
