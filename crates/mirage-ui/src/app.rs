use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;
use winit::dpi::LogicalSize;

use mirage_engine::coords::Vec2;
use mirage_engine::core::{App as EngineApp, AppControl, FrameCtx};
use mirage_engine::device::GpuInit;
use mirage_engine::input::{InputEvent, InputFrame, InputState, KeyState, MouseButton};
use mirage_engine::paint::Color;
use mirage_engine::render::SceneRenderer;
use mirage_engine::text::FontId;
use mirage_engine::window::{Runtime, RuntimeConfig};

use crate::scene::{UiInput, UiScene};
use crate::widget::Element;

// ── FontMap ───────────────────────────────────────────────────────────────

/// Name-keyed handles of the fonts that loaded successfully.
#[derive(Debug, Clone, Default)]
pub struct FontMap {
    by_name: HashMap<String, FontId>,
    first: Option<FontId>,
}

impl FontMap {
    pub fn get(&self, name: &str) -> Option<FontId> {
        self.by_name.get(name).copied()
    }

    /// The first font that loaded, whatever its name.
    pub fn primary(&self) -> Option<FontId> {
        self.first
    }

    fn insert(&mut self, name: String, id: FontId) {
        self.first.get_or_insert(id);
        self.by_name.insert(name, id);
    }
}

// ── Redraw gating ─────────────────────────────────────────────────────────

/// When the window repaints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedrawMode {
    /// Every event-loop iteration. For animated content.
    Continuous,
    /// Only after input, a resize, or a [`RedrawHandle::request`].
    #[default]
    OnDemand,
}

/// Shared dirty flag. Widget callbacks call `request` after mutating state
/// that is not driven by input alone.
#[derive(Debug, Clone, Default)]
pub struct RedrawHandle(Rc<Cell<bool>>);

impl RedrawHandle {
    pub fn request(&self) {
        self.0.set(true);
    }

    /// Returns the flag and clears it.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

// ── Application ───────────────────────────────────────────────────────────

/// Top-level builder: window, fonts, redraw policy, then
/// [`run_widget`](Self::run_widget) to start the event loop.
///
/// ```rust,ignore
/// Application::new()
///     .title("Cafe Wall")
///     .font("body", bytes)
///     .redraw_mode(RedrawMode::OnDemand)
///     .run_widget(|fonts| IllusionView::new(state).into())?;
/// ```
pub struct Application {
    title: String,
    width: f64,
    height: f64,
    fonts: Vec<(String, Vec<u8>)>,
    background: Color,
    redraw_mode: RedrawMode,
    redraw: RedrawHandle,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title: "mirage".to_string(),
            width: 1280.0,
            height: 720.0,
            fonts: Vec::new(),
            background: Color::BLACK,
            redraw_mode: RedrawMode::default(),
            redraw: RedrawHandle::default(),
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Registers a named font. Fonts that fail to parse are logged and
    /// skipped.
    pub fn font(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.fonts.push((name.into(), data));
        self
    }

    /// Clear colour behind the widget tree.
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn redraw_mode(mut self, mode: RedrawMode) -> Self {
        self.redraw_mode = mode;
        self
    }

    /// Handle to the dirty flag checked in [`RedrawMode::OnDemand`].
    pub fn redraw_handle(&self) -> RedrawHandle {
        self.redraw.clone()
    }

    /// Loads the fonts, builds the root widget once and runs the event loop
    /// until the window closes. The root persists across frames.
    pub fn run_widget<F>(self, build: F) -> Result<()>
    where
        F: FnOnce(&FontMap) -> Element,
    {
        let config = RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let state = UiAppState::new(self, build);
        Runtime::run(config, GpuInit::default(), state)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── UiAppState ────────────────────────────────────────────────────────────

/// Engine-side application: owns the scene, renderer and root widget.
struct UiAppState {
    ui_scene: UiScene,
    renderer: SceneRenderer,
    root: Element,
    background: Color,
    redraw_mode: RedrawMode,
    redraw: RedrawHandle,
}

impl UiAppState {
    fn new<F>(app: Application, build: F) -> Self
    where
        F: FnOnce(&FontMap) -> Element,
    {
        let mut ui_scene = UiScene::new();
        let mut fonts = FontMap::default();
        for (name, bytes) in &app.fonts {
            match ui_scene.load_font(bytes) {
                Ok(id) => fonts.insert(name.clone(), id),
                Err(e) => log::warn!("failed to load font '{name}': {e}"),
            }
        }
        if fonts.primary().is_none() {
            log::warn!("no font available, labels will not be drawn");
        }

        let root = build(&fonts);
        Self {
            ui_scene,
            renderer: SceneRenderer::new(),
            root,
            background: app.background,
            redraw_mode: app.redraw_mode,
            redraw: app.redraw,
        }
    }
}

impl EngineApp for UiAppState {
    fn needs_redraw(&mut self) -> bool {
        match self.redraw_mode {
            RedrawMode::Continuous => true,
            RedrawMode::OnDemand => self.redraw.take(),
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (w, h) = ctx.window.logical_size();
        let scale = ctx.window.scale_factor();

        let input = ui_input(ctx.input, ctx.input_frame, ctx.time.dt, ctx.time.elapsed);

        let _ = self.ui_scene.frame(&mut self.root, Vec2::new(w, h), scale, &input);
        // Everything requested so far is in this frame.
        self.redraw.take();

        let renderer = &mut self.renderer;
        let draw_list = &mut self.ui_scene.draw_list;
        let fonts = &self.ui_scene.font_system;
        ctx.render(self.background, |rctx, target| {
            renderer.render(rctx, target, draw_list, fonts);
        })
    }
}

/// Snapshot of this frame's input for the widget tree.
fn ui_input(input: &InputState, frame: &InputFrame, dt: f32, elapsed: f32) -> UiInput {
    let (mx, my) = input.pointer_pos.unwrap_or((0.0, 0.0));
    let keys_pressed = frame
        .events
        .iter()
        .filter_map(|ev| match ev {
            InputEvent::Key { key, state: KeyState::Pressed, modifiers, repeat: false, .. } => {
                Some((*key, *modifiers))
            }
            _ => None,
        })
        .collect();
    UiInput {
        mouse_pos: Vec2::new(mx, my),
        mouse_pressed: input.button_down(MouseButton::Left),
        mouse_released: frame.buttons_released.contains(&MouseButton::Left),
        keys_pressed,
        keys_down: input.keys_down.iter().copied().collect(),
        dt,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use mirage_engine::input::{Modifiers, MouseButtonState, PointerButtonEvent};

    use super::*;

    fn left(state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x: 40.0,
            y: 12.0,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn press_and_release_in_one_frame_reports_the_release() {
        let mut input = InputState::default();
        let mut frame = InputFrame::default();
        input.apply_event(&mut frame, left(MouseButtonState::Pressed));
        input.apply_event(&mut frame, left(MouseButtonState::Released));

        let ui = ui_input(&input, &frame, 0.016, 1.0);
        assert!(!ui.mouse_pressed);
        assert!(ui.mouse_released);
        assert_eq!(ui.mouse_pos, Vec2::new(40.0, 12.0));
    }

    #[test]
    fn held_button_is_not_released() {
        let mut input = InputState::default();
        let mut frame = InputFrame::default();
        input.apply_event(&mut frame, left(MouseButtonState::Pressed));

        let ui = ui_input(&input, &frame, 0.016, 1.0);
        assert!(ui.mouse_pressed);
        assert!(!ui.mouse_released);
    }

    #[test]
    fn redraw_handle_take_clears() {
        let handle = RedrawHandle::default();
        let shared = handle.clone();
        assert!(!handle.take());
        shared.request();
        assert!(handle.take());
        assert!(!handle.take());
    }

    #[test]
    fn empty_font_map_has_no_primary() {
        let fonts = FontMap::default();
        assert_eq!(fonts.primary(), None);
        assert_eq!(fonts.get("body"), None);
    }

    #[test]
    fn redraw_mode_defaults_to_on_demand() {
        assert_eq!(RedrawMode::default(), RedrawMode::OnDemand);
    }
}
