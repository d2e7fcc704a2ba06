//! Rock Shooter entry point
//!
//! Handles platform-specific initialization. On the web the browser drives
//! frames through `requestAnimationFrame`; natively a headless autopilot
//! plays one session at a fixed 60 Hz and prints a JSON summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlSelectElement, KeyboardEvent, Window};

    use rock_shooter::audio::AudioManager;
    use rock_shooter::driver::{Driver, GamePhase, final_score_text};
    use rock_shooter::platform::{FrameHandle, Platform, Screen, SoundEffect, Sprite};
    use rock_shooter::renderer::{CanvasLayout, RenderState, SpriteBatch};
    use rock_shooter::settings::Settings;
    use rock_shooter::sim::{Key, Playfield, Tier};

    type SharedDriver = Rc<RefCell<Driver<WebPlatform>>>;

    /// Browser host: DOM overlays, Web Audio, WebGPU and rAF scheduling
    struct WebPlatform {
        window: Window,
        document: Document,
        canvas: HtmlCanvasElement,
        settings: Settings,
        playfield: Playfield,
        render_state: Option<RenderState>,
        batch: SpriteBatch,
        audio: AudioManager,
        /// Handed to frame callbacks so they can reach the driver
        driver: Weak<RefCell<Driver<WebPlatform>>>,
        next_handle: u64,
        /// Outstanding request and its rAF id
        pending: Option<(FrameHandle, i32)>,
    }

    impl WebPlatform {
        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        /// Size the backing store to the canvas as laid out now
        fn fit_canvas(&mut self) -> Playfield {
            let layout = CanvasLayout::new(
                self.canvas.client_width(),
                self.canvas.client_height(),
                self.window.device_pixel_ratio(),
            );
            if layout.playfield != self.playfield {
                log::info!(
                    "Playfield {}x{}",
                    layout.playfield.width,
                    layout.playfield.height
                );
            }
            self.canvas.set_width(layout.backing.0);
            self.canvas.set_height(layout.backing.1);
            if let Some(ref mut render_state) = self.render_state {
                render_state.apply_layout(&layout);
            }
            self.playfield = layout.playfield;
            layout.playfield
        }
    }

    impl Platform for WebPlatform {
        fn draw_sprite(&mut self, sprite: &Sprite) {
            self.batch.push(sprite);
        }

        fn finish_frame(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.batch.vertices()) {
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
            self.batch.clear();
        }

        fn play_sound(&mut self, effect: SoundEffect) {
            self.audio.play(effect);
        }

        fn set_music(&mut self, playing: bool) {
            self.audio.set_music(playing);
        }

        fn show_screen(&mut self, screen: Screen) {
            self.set_visible("menu", screen == Screen::Menu);
            self.set_visible("hud", matches!(screen, Screen::Playing | Screen::Paused));
            self.set_visible("pause-menu", screen == Screen::Paused);
            self.set_visible("game-over", matches!(screen, Screen::GameOver { .. }));
            if let Screen::GameOver { score } = screen {
                self.set_text("final-score", &final_score_text(score));
            }
        }

        fn set_score_text(&mut self, text: &str) {
            self.set_text("hud-score", text);
        }

        fn request_frame(&mut self) -> FrameHandle {
            self.next_handle += 1;
            let handle = FrameHandle(self.next_handle);

            let driver = self.driver.clone();
            let closure = Closure::once(move |time: f64| {
                if let Some(driver) = driver.upgrade() {
                    driver.borrow_mut().on_frame(handle, time);
                }
            });
            match self
                .window
                .request_animation_frame(closure.as_ref().unchecked_ref())
            {
                Ok(id) => self.pending = Some((handle, id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
            closure.forget();
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            match self.pending {
                Some((pending, id)) if pending == handle => {
                    let _ = self.window.cancel_animation_frame(id);
                    self.pending = None;
                }
                _ => {}
            }
        }
    }

    fn now(window: &Window) -> f64 {
        window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Rock Shooter starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Backing store at device resolution; the playfield stays in CSS pixels
        let layout = CanvasLayout::new(
            canvas.client_width(),
            canvas.client_height(),
            window.device_pixel_ratio(),
        );
        let (width, height) = layout.backing;
        canvas.set_width(width);
        canvas.set_height(height);
        let playfield = layout.playfield;

        let settings = Settings::load();
        if let Some(select) = document
            .get_element_by_id("difficulty-select")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            select.set_value(settings.difficulty.as_str());
        }

        let driver: SharedDriver = Rc::new_cyclic(|weak| {
            RefCell::new(Driver::new(WebPlatform {
                window: window.clone(),
                document: document.clone(),
                canvas: canvas.clone(),
                audio: AudioManager::from_settings(&settings),
                settings,
                playfield,
                render_state: None,
                batch: SpriteBatch::new(),
                driver: weak.clone(),
                next_handle: 0,
                pending: None,
            }))
        });

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, playfield)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        driver.borrow_mut().platform_mut().render_state = Some(render_state);

        setup_keyboard(&window, driver.clone())?;
        setup_menu(&document, driver.clone())?;
        setup_pause_menu(&document, driver.clone())?;
        setup_game_over(&document, driver.clone())?;
        setup_auto_pause(&window, &document, driver)?;

        log::info!("Rock Shooter ready");
        Ok(())
    }

    fn setup_keyboard(window: &Window, driver: SharedDriver) -> Result<(), JsValue> {
        {
            let driver = driver.clone();
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                event.prevent_default();
                driver.borrow_mut().key_down(key, now(&window_clone));
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    driver.borrow_mut().key_up(key);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Start a session with the tier currently chosen in the menu
    fn start_game(driver: &SharedDriver) {
        let mut d = driver.borrow_mut();
        let platform = d.platform_mut();
        platform.audio.resume();

        if let Some(select) = platform
            .document
            .get_element_by_id("difficulty-select")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            match select.value().parse::<Tier>() {
                Ok(tier) => platform.settings.difficulty = tier,
                Err(e) => {
                    log::error!("{}", e);
                    return;
                }
            }
        }
        platform.settings.save();

        // The canvas may have been resized since page load
        let playfield = platform.fit_canvas();
        let config = match platform
            .settings
            .session_config(playfield.width, playfield.height)
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        let time = now(&platform.window);
        let seed = js_sys::Date::now() as u64;
        match d.start(config, seed, time) {
            Ok(()) => log::info!("Started new game with seed: {}", seed),
            Err(e) => log::error!("Cannot start: {}", e),
        }
    }

    fn on_click(
        document: &Document,
        id: &str,
        mut handler: impl FnMut() + 'static,
    ) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_menu(document: &Document, driver: SharedDriver) -> Result<(), JsValue> {
        on_click(document, "start-btn", move || start_game(&driver))
    }

    fn setup_pause_menu(document: &Document, driver: SharedDriver) -> Result<(), JsValue> {
        {
            let driver = driver.clone();
            on_click(document, "resume-btn", move || {
                let mut d = driver.borrow_mut();
                let time = now(&d.platform().window);
                d.resume(time);
            })?;
        }
        on_click(document, "quit-btn", move || driver.borrow_mut().reset())
    }

    fn setup_game_over(document: &Document, driver: SharedDriver) -> Result<(), JsValue> {
        {
            let driver = driver.clone();
            on_click(document, "restart-btn", move || {
                let mut d = driver.borrow_mut();
                let playfield = d.platform_mut().fit_canvas();
                let time = now(&d.platform().window);
                let seed = js_sys::Date::now() as u64;
                if let Err(e) = d.restart(playfield, seed, time) {
                    log::error!("Cannot restart: {}", e);
                }
            })?;
        }
        on_click(document, "menu-btn", move || driver.borrow_mut().reset())
    }

    fn setup_auto_pause(
        window: &Window,
        document: &Document,
        driver: SharedDriver,
    ) -> Result<(), JsValue> {
        fn auto_pause(driver: &SharedDriver, reason: &str) {
            let mut d = driver.borrow_mut();
            if d.phase() == GamePhase::Running && d.platform().settings.pause_on_blur {
                let time = now(&d.platform().window);
                d.pause(time);
                log::info!("Auto-paused ({})", reason);
            }
        }

        // Visibility change (tab switch, minimize)
        {
            let driver = driver.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause(&driver, "tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                auto_pause(&driver, "window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless_run {
    use rock_shooter::driver::{Driver, GamePhase};
    use rock_shooter::platform::{HeadlessPlatform, SoundEffect};
    use rock_shooter::settings::Settings;
    use rock_shooter::sim::{Key, Session};
    use rock_shooter::ConfigError;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Two minutes of play at 60 Hz
    const MAX_FRAMES: u64 = 60 * 120;
    const PLAYFIELD: (f32, f32) = (800.0, 600.0);
    /// How far above the ship an asteroid counts as a threat
    const DANGER_ZONE: f32 = 180.0;

    /// Pick steering for this frame: dodge threats, otherwise line up a shot
    fn autopilot(session: &Session) -> (bool, bool) {
        let player = &session.store.player.bounds;
        let center = session.store.player.center_x();

        let threat = session.store.asteroids.iter().find(|a| {
            a.bounds.bottom() > player.pos.y - DANGER_ZONE
                && a.bounds.pos.y < player.bottom()
                && a.bounds.right() > player.pos.x - 10.0
                && a.bounds.pos.x < player.right() + 10.0
        });
        if let Some(threat) = threat {
            let threat_center = threat.bounds.pos.x + threat.bounds.size.x / 2.0;
            let go_left = if player.pos.x <= 0.0 {
                false
            } else if player.right() >= session.playfield().width {
                true
            } else {
                threat_center >= center
            };
            return (go_left, !go_left);
        }

        let target = session
            .store
            .asteroids
            .iter()
            .filter(|a| a.bounds.bottom() < player.pos.y - DANGER_ZONE)
            .max_by(|a, b| a.bounds.pos.y.total_cmp(&b.bounds.pos.y));
        match target {
            Some(a) => {
                let x = a.bounds.pos.x + a.bounds.size.x / 2.0;
                (x < center - 5.0, x > center + 5.0)
            }
            None => (false, false),
        }
    }

    fn set_key(driver: &mut Driver<HeadlessPlatform>, key: Key, down: bool, now: f64) {
        if down {
            driver.key_down(key, now);
        } else {
            driver.key_up(key);
        }
    }

    pub fn run(tier: &str, seed: u64) -> Result<serde_json::Value, ConfigError> {
        let settings = Settings::with_difficulty(tier)?;
        let config = settings.session_config(PLAYFIELD.0, PLAYFIELD.1)?;

        let mut driver = Driver::new(HeadlessPlatform::new());
        driver.start(config, seed, 0.0)?;

        let mut frames = 0;
        while frames < MAX_FRAMES {
            let now = frames as f64 * FRAME_MS;
            let Some(handle) = driver.platform_mut().take_pending() else {
                break;
            };

            if let Some(session) = driver.session() {
                let (left, right) = autopilot(session);
                set_key(&mut driver, Key::Left, left, now);
                set_key(&mut driver, Key::Right, right, now);
                // Tap fire every tenth frame
                set_key(&mut driver, Key::Fire, frames % 10 == 0, now);
            }

            driver.on_frame(handle, now);
            frames += 1;
        }

        let platform = driver.platform();
        let explosions = platform
            .sounds
            .iter()
            .filter(|s| **s == SoundEffect::Explosion)
            .count();
        let Some(session) = driver.session() else {
            return Ok(serde_json::json!({ "error": "no session" }));
        };

        Ok(serde_json::json!({
            "tier": session.config.tier,
            "seed": seed,
            "frames": frames,
            "session_ms": frames as f64 * FRAME_MS,
            "score": session.score,
            "game_over": driver.phase() == GamePhase::GameOver,
            "explosions": explosions,
            "live_entities": session.store.entity_count(),
            "spawn_multiplier": session.difficulty.spawn_multiplier,
            "speed_multiplier": session.difficulty.speed_multiplier,
            "score_text": platform.score_text,
        }))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rock Shooter (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let tier = args.next().unwrap_or_else(|| "mid".to_string());
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        None => 0x5eed,
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            eprintln!("invalid seed: {}", e);
            std::process::exit(2);
        }
    };

    match headless_run::run(&tier, seed) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}
