use mirage_engine::coords::{Rect, Vec2};
use mirage_engine::input::{Key, Modifiers};
use mirage_engine::scene::DrawList;
use mirage_engine::text::{FontId, FontLoadError, FontSystem};

use crate::constraints::{Constraints, LayoutCtx};
use crate::event::UiEvent;
use crate::painter::Painter;
use crate::widget::Element;

/// Pointer travel (logical px) after which a press becomes a drag.
pub const DRAG_THRESHOLD: f32 = 4.0;

// ── UiInput ───────────────────────────────────────────────────────────────

/// Input snapshot for one UI frame, built from the engine's input state.
#[derive(Debug, Clone, Default)]
pub struct UiInput {
    pub mouse_pos: Vec2,
    /// `true` while the primary button is held.
    pub mouse_pressed: bool,
    /// The primary button was released since the previous frame. Set even
    /// when the press happened in the same frame.
    pub mouse_released: bool,
    /// Keys pressed since the previous frame.
    pub keys_pressed: Vec<(Key, Modifiers)>,
    /// Keys currently held.
    pub keys_down: Vec<Key>,
    pub dt: f32,
    pub elapsed: f32,
}

// ── PointerTracker ────────────────────────────────────────────────────────

/// Turns sampled primary-button state into click / drag events.
///
/// A press that moves less than [`DRAG_THRESHOLD`] before release is a
/// `Click` at the release position. Past the threshold, every move is a
/// `Drag` and the release is a `DragEnd`. A press and release that both
/// land between two frames still count as a click.
#[derive(Debug, Default)]
pub struct PointerTracker {
    press_origin: Option<Vec2>,
    last_pos: Vec2,
    dragging: bool,
}

impl PointerTracker {
    pub fn update(&mut self, pos: Vec2, pressed: bool, released: bool) -> Option<UiEvent> {
        let event = if released || (!pressed && self.press_origin.is_some()) {
            let start = self.press_origin.take().unwrap_or(pos);
            let ended = if std::mem::take(&mut self.dragging) {
                UiEvent::DragEnd { pos, start }
            } else {
                UiEvent::Click { pos }
            };
            // Released and pressed again within one frame.
            if pressed {
                self.press_origin = Some(pos);
            }
            Some(ended)
        } else if pressed {
            match self.press_origin {
                None => {
                    self.press_origin = Some(pos);
                    None
                }
                Some(start) => {
                    if !self.dragging && (pos - start).length() >= DRAG_THRESHOLD {
                        self.dragging = true;
                        self.last_pos = start;
                    }
                    if self.dragging && pos != self.last_pos {
                        Some(UiEvent::Drag { pos, start, delta: pos - self.last_pos })
                    } else {
                        None
                    }
                }
            }
        } else {
            None
        };
        self.last_pos = pos;
        event
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

// ── UiScene ───────────────────────────────────────────────────────────────

/// Owns the fonts, the draw list and pointer tracking across frames.
pub struct UiScene {
    /// Public so the renderer can borrow it next to `draw_list`.
    pub font_system: FontSystem,
    pub draw_list: DrawList,
    pointer: PointerTracker,
}

impl UiScene {
    pub fn new() -> Self {
        Self { font_system: FontSystem::new(), draw_list: DrawList::new(), pointer: PointerTracker::default() }
    }

    pub fn load_font(&mut self, data: &[u8]) -> Result<FontId, FontLoadError> {
        self.font_system.load_font(data)
    }

    /// Routes this frame's events into `root`, then lays it out and paints it
    /// over the whole viewport. Events go first so state changes show in the
    /// same frame.
    pub fn frame(&mut self, root: &mut Element, viewport: Vec2, scale: f32, input: &UiInput) -> &mut DrawList {
        let rect = Rect::new(0.0, 0.0, viewport.x, viewport.y);

        // ── events ────────────────────────────────────────────────────────
        {
            let ctx = LayoutCtx { fonts: &self.font_system, scale };
            root.on_event(&UiEvent::Hover { pos: input.mouse_pos }, rect, &ctx);
            if let Some(ev) = self.pointer.update(input.mouse_pos, input.mouse_pressed, input.mouse_released) {
                root.on_event(&ev, rect, &ctx);
            }
            for &(key, modifiers) in &input.keys_pressed {
                root.on_event(&UiEvent::KeyPress { key, modifiers }, rect, &ctx);
            }
            let frame = UiEvent::Frame {
                dt: input.dt,
                elapsed: input.elapsed,
                keys_down: input.keys_down.clone(),
            };
            root.on_event(&frame, rect, &ctx);
        }

        // ── measure + paint ───────────────────────────────────────────────
        self.draw_list.clear();
        let ctx = LayoutCtx { fonts: &self.font_system, scale };
        let _ = root.measure(Constraints::loose(viewport), &ctx);
        let mut painter = Painter::new(
            &mut self.draw_list,
            &self.font_system,
            input.mouse_pos,
            input.mouse_pressed,
            scale,
        );
        root.paint(&mut painter, rect);

        &mut self.draw_list
    }
}

impl Default for UiScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    // ── click vs drag ─────────────────────────────────────────────────────

    #[test]
    fn small_wiggle_is_still_a_click() {
        let mut t = PointerTracker::default();
        assert_eq!(t.update(p(10.0, 10.0), true, false), None);
        assert_eq!(t.update(p(12.0, 11.0), true, false), None);
        assert_eq!(t.update(p(12.0, 11.0), false, true), Some(UiEvent::Click { pos: p(12.0, 11.0) }));
    }

    #[test]
    fn moving_past_threshold_drags() {
        let mut t = PointerTracker::default();
        t.update(p(0.0, 0.0), true, false);
        let ev = t.update(p(10.0, 0.0), true, false);
        assert_eq!(ev, Some(UiEvent::Drag { pos: p(10.0, 0.0), start: p(0.0, 0.0), delta: p(10.0, 0.0) }));
        let ev = t.update(p(13.0, 2.0), true, false);
        assert_eq!(ev, Some(UiEvent::Drag { pos: p(13.0, 2.0), start: p(0.0, 0.0), delta: p(3.0, 2.0) }));
        assert!(t.is_dragging());
        let ev = t.update(p(13.0, 2.0), false, true);
        assert_eq!(ev, Some(UiEvent::DragEnd { pos: p(13.0, 2.0), start: p(0.0, 0.0) }));
        assert!(!t.is_dragging());
    }

    #[test]
    fn stationary_drag_emits_nothing() {
        let mut t = PointerTracker::default();
        t.update(p(0.0, 0.0), true, false);
        t.update(p(0.0, 8.0), true, false);
        assert_eq!(t.update(p(0.0, 8.0), true, false), None);
    }

    #[test]
    fn hover_without_press_is_silent() {
        let mut t = PointerTracker::default();
        assert_eq!(t.update(p(5.0, 5.0), false, false), None);
        assert_eq!(t.update(p(50.0, 5.0), false, false), None);
    }

    #[test]
    fn tap_between_frames_is_a_click() {
        let mut t = PointerTracker::default();
        assert_eq!(t.update(p(7.0, 7.0), false, true), Some(UiEvent::Click { pos: p(7.0, 7.0) }));
        assert_eq!(t.update(p(7.0, 7.0), false, false), None);
    }

    #[test]
    fn release_and_press_again_in_one_frame() {
        let mut t = PointerTracker::default();
        t.update(p(0.0, 0.0), true, false);
        assert_eq!(t.update(p(1.0, 0.0), true, true), Some(UiEvent::Click { pos: p(1.0, 0.0) }));
        // The second press is live: releasing it clicks again.
        assert_eq!(t.update(p(1.0, 0.0), false, true), Some(UiEvent::Click { pos: p(1.0, 0.0) }));
    }

    #[test]
    fn focus_loss_mid_press_still_ends_it() {
        let mut t = PointerTracker::default();
        t.update(p(0.0, 0.0), true, false);
        t.update(p(20.0, 0.0), true, false);
        assert_eq!(t.update(p(20.0, 0.0), false, false), Some(UiEvent::DragEnd { pos: p(20.0, 0.0), start: p(0.0, 0.0) }));
    }

    // ── scene routing ─────────────────────────────────────────────────────

    #[test]
    fn quick_tap_reaches_a_button() {
        use std::cell::Cell;
        use std::rc::Rc;

        use crate::widgets::button::Button;
        use crate::widgets::text::Text;

        let clicks = Rc::new(Cell::new(0));
        let sink = clicks.clone();
        let mut root: Element = Button::new(Text::new("Reveal Illusion", None, 14.0, mirage_engine::paint::Color::WHITE))
            .on_click(move || sink.set(sink.get() + 1))
            .into();
        let mut scene = UiScene::new();
        let viewport = p(400.0, 300.0);

        // Pressed and released before this frame was drawn.
        let tap = UiInput { mouse_pos: p(5.0, 5.0), mouse_released: true, ..Default::default() };
        scene.frame(&mut root, viewport, 1.0, &tap);
        let idle = UiInput { mouse_pos: p(5.0, 5.0), ..Default::default() };
        scene.frame(&mut root, viewport, 1.0, &idle);

        assert_eq!(clicks.get(), 1);
    }
}
