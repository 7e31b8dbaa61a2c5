//! Challenge Blaster entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlInputElement,
        KeyboardEvent, MouseEvent, TouchEvent,
    };

    use challenge_blaster::config::fit_playfield;
    use challenge_blaster::consts::*;
    use challenge_blaster::lead::{FetchSink, LeadField, LeadSink};
    use challenge_blaster::recommend::{NO_PRIORITIES_TEXT, NO_RECOMMENDATIONS_TEXT, Summary};
    use challenge_blaster::renderer::{RenderState, build_scene, wrap_label};
    use challenge_blaster::share;
    use challenge_blaster::sim::{GameEvent, GamePhase, RenderSnapshot, Session, TickInput, tick};
    use challenge_blaster::{GameConfig, RenderError};

    const LABEL_FONT: &str = "8px \"Press Start 2P\", monospace";

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        /// Transparent 2D canvas stacked on the WebGPU one for label text
        label_canvas: Option<HtmlCanvasElement>,
        label_ctx: Option<CanvasRenderingContext2d>,
        sink: FetchSink,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Currently held key codes
        held: HashSet<String>,
        pointer_down: bool,
        dpr: f64,
    }

    impl Game {
        fn new(config: GameConfig, seed: u64, canvas: HtmlCanvasElement) -> Self {
            let sink = FetchSink::new(config.lead_endpoint.clone());
            Self {
                session: Session::new(config, seed),
                render_state: None,
                canvas,
                label_canvas: None,
                label_ctx: None,
                sink,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                held: HashSet::new(),
                pointer_down: false,
                dpr: 1.0,
            }
        }

        fn attach_label_layer(&mut self, canvas: HtmlCanvasElement) {
            self.label_ctx = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
            if self.label_ctx.is_none() {
                log::warn!("No 2D context for the label layer; target labels disabled");
            }
            self.label_canvas = Some(canvas);
        }

        /// Size the canvases and the playfield to the current viewport
        fn fit_to_viewport(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = |v: Result<JsValue, JsValue>, fallback: f32| {
                v.ok().and_then(|v| v.as_f64()).map_or(fallback, |v| v as f32)
            };
            let (width, height) = fit_playfield(
                viewport(window.inner_width(), PLAYFIELD_WIDTH),
                viewport(window.inner_height(), PLAYFIELD_HEIGHT),
            );
            self.dpr = window.device_pixel_ratio();
            let pixel_w = (width as f64 * self.dpr) as u32;
            let pixel_h = (height as f64 * self.dpr) as u32;

            for canvas in std::iter::once(&self.canvas).chain(self.label_canvas.as_ref()) {
                canvas.set_width(pixel_w);
                canvas.set_height(pixel_h);
                let style = canvas.style();
                let _ = style.set_property("width", &format!("{}px", width));
                let _ = style.set_property("height", &format!("{}px", height));
            }

            self.session.resize(width, height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(pixel_w, pixel_h);
                render_state.set_playfield(width, height);
            }
            log::info!("Playfield {}x{} (dpr {})", width, height, self.dpr);
        }

        /// Pointer position in playfield pixels
        fn pointer_x(&self, client_x: i32) -> f32 {
            let rect = self.canvas.get_bounding_client_rect();
            client_x as f32 - rect.left() as f32
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.left = self.held.contains("ArrowLeft") || self.held.contains("KeyA");
                self.input.right = self.held.contains("ArrowRight") || self.held.contains("KeyD");
                let input = self.input.clone();
                tick(&mut self.session, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.fire = false;
            }

            for event in self.session.drain_events() {
                self.handle_event(event);
            }
        }

        fn handle_event(&self, event: GameEvent) {
            match event {
                GameEvent::LeadReady(record) => self.sink.submit(record),
                GameEvent::GateOpened { gate, fields } => {
                    log::info!("Gate {} asks for {:?}", gate, fields);
                    if let Some(input) = fields.first().and_then(|f| input_element(f.input_id())) {
                        let _ = input.focus();
                    }
                }
                GameEvent::SessionFinished(summary) => show_summary(&summary),
                GameEvent::TargetDestroyed { label, hits } => {
                    log::debug!("Hit '{}' ({}x)", label, hits)
                }
                GameEvent::TargetMissed { label } => log::debug!("Missed '{}'", label),
                GameEvent::Fired | GameEvent::BatchCleared { .. } => {}
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let snapshot = self.session.snapshot();

            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&build_scene(&snapshot)) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            if let Some(ctx) = &self.label_ctx {
                draw_labels(ctx, &snapshot, self.dpr);
            }
            update_hud(&snapshot, self.session.config.gates.len());
        }

        /// Gate form submitted: read the gate's inputs and hand them over
        fn submit_gate(&mut self, gate: u32) {
            if self.session.phase != GamePhase::Gate(gate) {
                log::warn!("Gate {} form submitted while not open", gate);
                return;
            }
            let values: Vec<(LeadField, String)> = self
                .session
                .config
                .gate_after(gate)
                .unwrap_or(&[])
                .iter()
                .map(|f| (*f, input_value(f.input_id())))
                .collect();
            self.session.submit_gate(&values);
        }

        /// Play again
        fn restart(&mut self) {
            self.session.reset();
            self.accumulator = 0.0;
            self.input = TickInput::default();
            for field in LeadField::ALL {
                if let Some(input) = input_element(field.input_id()) {
                    input.set_value("");
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn js_err(err: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn input_element(id: &str) -> Option<HtmlInputElement> {
        document()?.get_element_by_id(id)?.dyn_into().ok()
    }

    fn input_value(id: &str) -> String {
        input_element(id).map(|i| i.value()).unwrap_or_default()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Append `<tag class=..>text</tag>` to `parent`
    fn append(parent: &Element, tag: &str, class: &str, text: &str) -> Option<Element> {
        let el = document()?.create_element(tag).ok()?;
        if !class.is_empty() {
            el.set_class_name(class);
        }
        if !text.is_empty() {
            el.set_text_content(Some(text));
        }
        parent.append_child(&el).ok()?;
        Some(el)
    }

    /// Update HUD elements and screen panels in DOM
    fn update_hud(snapshot: &RenderSnapshot, gate_count: usize) {
        let Some(document) = document() else {
            return;
        };

        set_text(&document, "score", &snapshot.score.to_string());
        set_text(&document, "level", &snapshot.level.to_string());

        set_visible(&document, "start-screen", snapshot.phase == GamePhase::Start);
        for gate in 1..=gate_count as u32 {
            let id = format!("gate{}", gate);
            set_visible(&document, &id, snapshot.phase == GamePhase::Gate(gate));
        }
        set_visible(&document, "final-cta", snapshot.phase == GamePhase::Final);

        match &snapshot.overlay {
            Some(text) => {
                set_text(&document, "level-text", text);
                set_visible(&document, "level-text", true);
            }
            None => set_visible(&document, "level-text", false),
        }
    }

    /// Fill the final screen lists
    fn show_summary(summary: &Summary) {
        let Some(document) = document() else {
            return;
        };

        if let Some(list) = document.get_element_by_id("priorities-list") {
            list.set_inner_html("");
            if summary.top_priorities.is_empty() {
                append(&list, "li", "", NO_PRIORITIES_TEXT);
            }
            for priority in &summary.top_priorities {
                append(&list, "li", "", &priority.label);
            }
        }

        if let Some(list) = document.get_element_by_id("recommendations-list") {
            list.set_inner_html("");
            if summary.recommendations.is_empty() {
                append(&list, "p", "no-recs", NO_RECOMMENDATIONS_TEXT);
            }
            for (i, rec) in summary.recommendations.iter().enumerate() {
                let Some(card) = append(&list, "div", "game-rec", "") else {
                    continue;
                };
                append(&card, "div", "game-rec-number", &(i + 1).to_string());
                if let Some(content) = append(&card, "div", "game-rec-content", "") {
                    append(&content, "div", "game-rec-name", &rec.name);
                    append(&content, "div", "game-rec-desc", &rec.description);
                }
            }
        }
    }

    fn css_color(rgb: [f32; 3]) -> String {
        let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("rgb({}, {}, {})", r, g, b)
    }

    /// Draw wrapped target labels on the 2D layer
    fn draw_labels(ctx: &CanvasRenderingContext2d, snapshot: &RenderSnapshot, dpr: f64) {
        let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, snapshot.width as f64, snapshot.height as f64);
        if !matches!(snapshot.phase, GamePhase::Playing | GamePhase::Transition) {
            return;
        }

        ctx.set_font(LABEL_FONT);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for target in &snapshot.targets {
            let center = target.rect.center();
            ctx.set_fill_style_str(&css_color(target.color));
            let (x, y) = (center.x as f64, center.y as f64);
            match wrap_label(&target.label).as_slice() {
                [first, second] => {
                    let _ = ctx.fill_text(first, x, y - 6.0);
                    let _ = ctx.fill_text(second, x, y + 8.0);
                }
                lines => {
                    for line in lines {
                        let _ = ctx.fill_text(line, x, y);
                    }
                }
            }
        }
    }

    /// Config overrides from `<script id="game-config" type="application/json">`
    fn load_config(document: &Document) -> GameConfig {
        let Some(json) = document
            .get_element_by_id("game-config")
            .and_then(|el| el.text_content())
        else {
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded page config");
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                GameConfig::default()
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Challenge Blaster starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = load_config(&document);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(config, seed, canvas.clone())));
        if let Some(layer) = document
            .get_element_by_id("label-layer")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            game.borrow_mut().attach_label_layer(layer);
        }
        game.borrow_mut().fit_to_viewport();

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| js_err(RenderError::from(e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| js_err(RenderError::from(e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let playfield = {
            let g = game.borrow();
            (g.session.config.playfield_width, g.session.config.playfield_height)
        };
        let render_state =
            RenderState::new(surface, &adapter, canvas.width(), canvas.height(), playfield)
                .await
                .map_err(js_err)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_gate_forms(game.clone());
        setup_resize(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Challenge Blaster running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if code == "Space" && g.session.phase == GamePhase::Playing {
                    event.prevent_default();
                    g.input.fire = true;
                }
                g.held.insert(code);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().held.remove(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: track and fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if let Some(touch) = event.touches().get(0) {
                    let x = g.pointer_x(touch.client_x());
                    g.pointer_down = true;
                    g.input.pointer_x = Some(x);
                }
                if g.session.phase == GamePhase::Playing {
                    g.input.fire = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if !g.pointer_down {
                    return;
                }
                if let Some(touch) = event.touches().get(0) {
                    let x = g.pointer_x(touch.client_x());
                    g.input.pointer_x = Some(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down: desktop stand-in for touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.pointer_x(event.client_x());
                g.pointer_down = true;
                g.input.pointer_x = Some(x);
                if g.session.phase == GamePhase::Playing {
                    g.input.fire = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.pointer_down {
                    let x = g.pointer_x(event.client_x());
                    g.input.pointer_x = Some(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release ends pointer steering
        for name in ["touchend", "touchcancel", "mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.pointer_down = false;
                g.input.pointer_x = None;
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input = TickInput::default();
                if !g.session.start() {
                    log::warn!("Start ignored in phase '{}'", g.session.phase.as_str());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("play-again") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("share-email") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Err(err) = share_via_email() {
                    log::warn!("Email share failed: {:?}", err);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("share-copy") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                wasm_bindgen_futures::spawn_local(copy_game_link());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn current_game_link() -> Result<String, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let href = window.location().href()?;
        Ok(share::game_link(&href).to_string())
    }

    fn share_via_email() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let link = current_game_link()?;
        let subject = js_sys::encode_uri_component(share::SHARE_SUBJECT);
        let body = js_sys::encode_uri_component(&share::share_body(&link));
        let url = share::mailto(&String::from(subject), &String::from(body));
        window.open_with_url_and_target(&url, "_blank")?;
        Ok(())
    }

    /// Copy the link, flashing `#copy-confirmation`; falls back to a prompt
    async fn copy_game_link() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let link = match current_game_link() {
            Ok(link) => link,
            Err(err) => {
                log::warn!("No page address to share: {:?}", err);
                return;
            }
        };

        let promise = window.navigator().clipboard().write_text(&link);
        if wasm_bindgen_futures::JsFuture::from(promise).await.is_err() {
            let _ = window.prompt_with_message_and_default(share::COPY_PROMPT, &link);
            return;
        }

        let Some(document) = document() else {
            return;
        };
        set_visible(&document, "copy-confirmation", true);
        let hide = Closure::once_into_js(move || {
            if let Some(document) = self::document() {
                set_visible(&document, "copy-confirmation", false);
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            hide.unchecked_ref(),
            share::COPY_CONFIRMATION_MS,
        );
    }

    fn setup_gate_forms(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };
        let gate_count = game.borrow().session.config.gates.len() as u32;

        for gate in 1..=gate_count {
            let Some(form) = document.get_element_by_id(&format!("gate{}-form", gate)) else {
                log::warn!("No form for gate {}", gate);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                game.borrow_mut().submit_gate(gate);
            });
            let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().fit_to_viewport();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use challenge_blaster::GameConfig;

    env_logger::init();
    log::info!("Challenge Blaster (native) starting...");
    log::info!("Native mode plays one headless autopilot session - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let config = match args.next().as_deref() {
        Some("waves") => GameConfig::wave_preset(),
        _ => GameConfig::default(),
    };

    run_headless(config, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless(config: challenge_blaster::GameConfig, seed: u64) {
    use challenge_blaster::consts::TICKS_PER_SECOND;
    use challenge_blaster::lead::{LeadField, LeadSink, LogSink};
    use challenge_blaster::sim::{GameEvent, GamePhase, Session, autopilot_input, tick};

    // Ten minutes of game time
    let max_ticks = u64::from(TICKS_PER_SECOND) * 600;

    let sink = LogSink;
    let mut session = Session::new(config, seed);
    session.start();

    let mut summary = None;
    while summary.is_none() && session.time_ticks < max_ticks {
        if let GamePhase::Gate(gate) = session.phase {
            let values: Vec<(LeadField, String)> = session
                .config
                .gate_after(gate)
                .unwrap_or(&[])
                .iter()
                .map(|f| (*f, format!("demo-{}", f.input_id())))
                .collect();
            session.submit_gate(&values);
        }

        let input = autopilot_input(&session);
        tick(&mut session, &input);

        for event in session.drain_events() {
            match event {
                GameEvent::LeadReady(record) => sink.submit(record),
                GameEvent::SessionFinished(finished) => summary = Some(finished),
                _ => {}
            }
        }
    }

    let Some(summary) = summary else {
        log::warn!("Session did not finish within {} ticks", max_ticks);
        return;
    };

    println!("\nScore: {} ({} ticks)", session.score, session.time_ticks);
    println!("Top priorities: {}", summary.format_priorities());
    for (i, rec) in summary.recommendations.iter().enumerate() {
        println!("{}. {} (relevance {}) - {}", i + 1, rec.name, rec.score, rec.description);
    }
}
