//! Hemi Bounce entry point
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
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, Window};

    use hemi_bounce::audio::WebAudio;
    use hemi_bounce::hud::DomHud;
    use hemi_bounce::renderer::RenderState;
    use hemi_bounce::sim::Side;
    use hemi_bounce::{FrameStatus, GameController, HighScore, Settings};

    /// Horizontal margin kept free around the canvas
    const CANVAS_MARGIN: f64 = 40.0;
    const CANVAS_MAX_HEIGHT: f64 = 400.0;
    const CANVAS_HEIGHT_FRACTION: f64 = 0.4;

    /// Everything the browser callbacks share
    struct App {
        controller: GameController<WebAudio, DomHud>,
        render_state: RenderState,
        /// A requestAnimationFrame callback is pending. At most one is.
        loop_scheduled: bool,
    }

    impl App {
        /// Draw once outside the loop (initial paint, resize while idle)
        fn paint(&mut self) {
            if let Err(e) = self.controller.render(&mut self.render_state) {
                log::warn!("Idle render failed: {e}");
            }
        }
    }

    fn now_ms(window: &Window) -> f64 {
        window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    /// Playfield size in CSS pixels for the current window
    fn playfield_size(window: &Window) -> Vec2 {
        let inner_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(840.0);
        let inner_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1000.0);
        Vec2::new(
            (inner_w - CANVAS_MARGIN).max(1.0) as f32,
            (inner_h * CANVAS_HEIGHT_FRACTION).min(CANVAS_MAX_HEIGHT).max(1.0) as f32,
        )
    }

    /// Size the canvas backbuffer (physical pixels) and CSS box. Returns the
    /// backbuffer size.
    fn size_canvas(window: &Window, canvas: &HtmlCanvasElement, css: Vec2) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (css.x as f64 * dpr).round() as u32;
        let height = (css.y as f64 * dpr).round() as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", css.x));
        let _ = style.set_property("height", &format!("{}px", css.y));
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Hemi Bounce starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let css = playfield_size(&window);
        let (width, height) = size_canvas(&window, &canvas, css);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = match RenderState::new(surface, &adapter, width, height, css).await {
            Ok(state) => state,
            Err(e) => {
                log::error!("Renderer setup failed: {e}");
                return;
            }
        };

        let settings = Settings::load();
        let audio = WebAudio::new(settings.master_volume, settings.speed);
        let hud = DomHud::new(document.clone(), HighScore::load());
        let seed = js_sys::Date::now() as u64;
        init_controls(&document, &settings);

        let controller = GameController::new(css.x, css.y, settings, audio, hud, seed);
        let app = Rc::new(RefCell::new(App {
            controller,
            render_state,
            loop_scheduled: false,
        }));
        app.borrow_mut().paint();

        setup_keyboard(&document, app.clone());
        setup_controls(&document, app.clone());
        setup_start_button(&document, app.clone());
        setup_resize(&window, canvas, app);

        log::info!("Hemi Bounce ready (seed {seed})");
    }

    /// Reflect loaded settings in the page controls
    fn init_controls(document: &Document, settings: &Settings) {
        if let Some(input) = input_by_id(document, "speedControl") {
            input.set_value(&settings.speed.to_string());
        }
        if let Some(input) = input_by_id(document, "hemisyncToggle") {
            input.set_checked(settings.hemisync);
        }
    }

    fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    /// Ensure exactly one frame callback is pending while the session runs
    fn ensure_loop(app: &Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.loop_scheduled || !a.controller.is_running() {
                return;
            }
            a.loop_scheduled = true;
        }
        request_animation_frame(app.clone());
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
        let status = {
            let mut a = app.borrow_mut();
            let App {
                controller,
                render_state,
                ..
            } = &mut *a;
            controller.frame(time, render_state)
        };

        match status {
            Ok(FrameStatus::Continue) => request_animation_frame(app),
            // Errors were logged and the session stopped by the controller
            Ok(FrameStatus::Halt) | Err(_) => app.borrow_mut().loop_scheduled = false,
        }
    }

    fn setup_keyboard(document: &Document, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let side = match event.key().as_str() {
                "w" | "W" => Side::Left,
                "ArrowUp" => Side::Right,
                _ => return,
            };
            event.prevent_default();
            app.borrow_mut().controller.jump(side);
        });
        let _ =
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_controls(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(input) = input_by_id(document, "speedControl") {
            let app = app.clone();
            let target = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Ok(speed) = target.value().trim().parse::<i32>() else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.controller.set_speed(speed);
                a.controller.settings().save();
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(input) = input_by_id(document, "hemisyncToggle") {
            let target = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                a.controller.set_hemisync(target.checked());
                a.controller.settings().save();
            });
            let _ =
                input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(document: &Document, app: Rc<RefCell<App>>) {
        let Some(button) = document.get_element_by_id("startButton") else {
            log::warn!("No #startButton element");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            {
                let mut a = app.borrow_mut();
                a.controller.toggle(now_ms(&window));
                if !a.controller.is_running() {
                    a.paint();
                }
            }
            ensure_loop(&app);
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(window: &Window, canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let css = playfield_size(&window);
            let (width, height) = size_canvas(&window, &canvas, css);

            let mut a = app.borrow_mut();
            a.render_state.resize(width, height, css);
            a.controller.resize(css.x, css.y);
            if !a.controller.is_running() {
                a.paint();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Hemi Bounce (native) starting...");
    log::info!("Rendering needs a browser canvas - run with `trunk serve` for the web version");

    let policy = std::env::args()
        .nth(1)
        .and_then(|arg| hemi_bounce::sim::ScoringPolicy::from_str(&arg))
        .unwrap_or_default();
    headless_demo(policy);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one minute of simulated time with a bot pressing the jump keys
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(policy: hemi_bounce::sim::ScoringPolicy) {
    use hemi_bounce::audio::SilentAudio;
    use hemi_bounce::hud::LogHud;
    use hemi_bounce::renderer::VertexCanvas;
    use hemi_bounce::sim::{GameState, Side};
    use hemi_bounce::{GameController, Settings};

    /// Jump when the ball is this close to a character
    const JUMP_GAP: f32 = 40.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const DEMO_SEED: u64 = 0x5EED;

    fn gap(state: &GameState, side: Side) -> Option<f32> {
        let ball = &state.ball;
        let body = state.character(side);
        match side {
            Side::Left if ball.direction < 0.0 => Some(ball.pos.x - (body.pos.x + body.width)),
            Side::Right if ball.direction > 0.0 => Some(body.pos.x - (ball.pos.x + ball.size)),
            _ => None,
        }
    }

    let settings = Settings {
        scoring: policy,
        ..Settings::default()
    };
    let mut controller =
        GameController::new(800.0, 400.0, settings, SilentAudio, LogHud::default(), DEMO_SEED);
    let mut canvas = VertexCanvas::new();

    controller.start(0.0);
    let mut now = 0.0;
    while controller.is_running() && now < 60_000.0 {
        now += FRAME_MS;
        for side in [Side::Left, Side::Right] {
            if gap(controller.state(), side).is_some_and(|g| (0.0..=JUMP_GAP).contains(&g)) {
                controller.jump(side);
            }
        }

        canvas.clear();
        if let Err(e) = controller.frame(now, &mut canvas) {
            log::error!("Demo halted: {e}");
            break;
        }
    }
    controller.stop();

    log::info!(
        "Demo finished ({} scoring): score {}, {} vertices in last frame",
        policy.as_str(),
        controller.score(),
        canvas.vertices().len()
    );
}
