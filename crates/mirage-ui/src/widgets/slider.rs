use mirage_engine::coords::{Rect, Vec2};
use mirage_engine::paint::Color;
use mirage_engine::scene::Border;
use mirage_engine::text::FontId;

use crate::constraints::{Constraints, LayoutCtx};
use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::widget::Widget;

/// Horizontal slider over `[min, max]`, snapped to `step`.
///
/// Clicking or dragging on the track sets the value. `on_change` fires on
/// every value change during a drag as well as on release. When a font is
/// given the current value is drawn to the right of the track with `suffix`.
///
/// ```rust,ignore
/// Slider::new(0.0, 10.0)
///     .step(0.5)
///     .value(3.0)
///     .value_label(font, 14.0, "°")
///     .on_change(|deg| println!("{deg}"))
/// ```
pub struct Slider {
    value: f32,
    min: f32,
    max: f32,
    step: f32,
    track_height: f32,
    thumb_radius: f32,
    track_color: Color,
    fill_color: Color,
    thumb_color: Color,
    suffix: String,
    label: Option<ValueLabel>,
    on_change: Option<Box<dyn FnMut(f32)>>,
}

struct ValueLabel {
    font: FontId,
    size: f32,
    color: Color,
}

/// Space reserved to the right of the track for the value label.
const LABEL_GAP: f32 = 10.0;

impl Slider {
    pub fn new(min: f32, max: f32) -> Self {
        debug_assert!(min <= max, "slider range inverted");
        Self {
            value: min,
            min,
            max,
            step: 0.0,
            track_height: 4.0,
            thumb_radius: 8.0,
            track_color: Color::from_srgb_u8(0x55, 0x55, 0x55, 0xff),
            fill_color: Color::from_srgb_u8(0x33, 0x99, 0xff, 0xff),
            thumb_color: Color::WHITE,
            suffix: String::new(),
            label: None,
            on_change: None,
        }
    }

    /// Snap increment; `0` disables snapping.
    pub fn step(mut self, step: f32) -> Self {
        self.step = step.max(0.0);
        self.value = self.snap(self.value);
        self
    }

    pub fn value(mut self, v: f32) -> Self {
        self.value = self.snap(v);
        self
    }

    /// Draws the value (formatted with `Display`) followed by `suffix`.
    /// Without a font nothing is drawn, but [`label_text`](Self::label_text)
    /// still carries the suffix.
    pub fn value_label(mut self, font: Option<FontId>, size: f32, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self.label = font.map(|font| ValueLabel { font, size, color: Color::WHITE });
        self
    }

    pub fn on_change(mut self, f: impl FnMut(f32) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn get(&self) -> f32 {
        self.value
    }

    /// Clamps into range and rounds to the nearest step from `min`.
    pub fn snap(&self, v: f32) -> f32 {
        let v = v.clamp(self.min, self.max);
        if self.step > 0.0 {
            let steps = ((v - self.min) / self.step).round();
            (self.min + steps * self.step).clamp(self.min, self.max)
        } else {
            v
        }
    }

    pub fn label_text(&self) -> String {
        format!("{}{}", self.value, self.suffix)
    }

    fn normalized(&self) -> f32 {
        if (self.max - self.min).abs() < f32::EPSILON {
            0.0
        } else {
            ((self.value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        }
    }

    /// Track area: the widget minus the label column.
    fn track_rect(&self, rect: Rect, ctx: &LayoutCtx) -> Rect {
        let label_w = match &self.label {
            Some(l) => {
                let widest = format!("{}{}", self.max, self.suffix);
                ctx.measure_text(&widest, Some(l.font), l.size, None).x + LABEL_GAP
            }
            None => 0.0,
        };
        let inset = self.thumb_radius;
        Rect::new(
            rect.origin.x + inset,
            rect.origin.y,
            (rect.size.x - label_w - 2.0 * inset).max(0.0),
            rect.size.y,
        )
    }

    fn set_from_x(&mut self, x: f32, track: Rect) {
        let t = if track.size.x > 0.0 { ((x - track.origin.x) / track.size.x).clamp(0.0, 1.0) } else { 0.0 };
        let v = self.snap(self.min + t * (self.max - self.min));
        if v != self.value {
            self.value = v;
            if let Some(f) = &mut self.on_change {
                f(v);
            }
        }
    }
}

impl Widget for Slider {
    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        let label_h = self.label.as_ref().map_or(0.0, |l| ctx.measure_text("0", Some(l.font), l.size, None).y);
        let h = (self.thumb_radius * 2.0).max(label_h);
        constraints.constrain(Vec2::new(constraints.width_or(240.0), h))
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let track = self.track_rect(rect, &painter.layout_ctx());
        let cy = rect.origin.y + rect.size.y * 0.5;

        let bar = Rect::new(track.origin.x, cy - self.track_height * 0.5, track.size.x, self.track_height);
        painter.fill_rect(bar, self.track_color);

        let thumb_x = track.origin.x + self.normalized() * track.size.x;
        let filled = thumb_x - bar.origin.x;
        if filled > 0.0 {
            painter.fill_rect(Rect::new(bar.origin.x, bar.origin.y, filled, bar.size.y), self.fill_color);
        }

        let r = if painter.is_hovered(rect) { self.thumb_radius + 1.5 } else { self.thumb_radius };
        painter.fill_circle(Vec2::new(thumb_x, cy), r, self.thumb_color, Some(Border::new(2.0, self.fill_color)));

        if let Some(l) = &self.label {
            let text = self.label_text();
            let h = painter.layout_ctx().measure_text(&text, Some(l.font), l.size, None).y;
            let origin = Vec2::new(track.max().x + self.thumb_radius + LABEL_GAP, cy - h * 0.5);
            painter.text(text, l.font, l.size, l.color, origin, None);
        }
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &LayoutCtx) -> EventResult {
        let track = self.track_rect(rect, ctx);
        match event {
            UiEvent::Click { pos } if rect.contains(*pos) => {
                self.set_from_x(pos.x, track);
                EventResult::Consumed
            }
            UiEvent::Drag { pos, start, .. } | UiEvent::DragEnd { pos, start } if rect.contains(*start) => {
                self.set_from_x(pos.x, track);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use mirage_engine::text::FontSystem;

    use super::*;

    // ── stepping ──────────────────────────────────────────────────────────

    #[test]
    fn snap_rounds_to_half_steps() {
        let s = Slider::new(0.0, 10.0).step(0.5);
        assert_eq!(s.snap(3.2), 3.0);
        assert_eq!(s.snap(3.3), 3.5);
        assert_eq!(s.snap(-2.0), 0.0);
        assert_eq!(s.snap(12.0), 10.0);
    }

    #[test]
    fn initial_value_is_snapped() {
        assert_eq!(Slider::new(0.0, 10.0).step(0.5).value(2.9).get(), 3.0);
        assert_eq!(Slider::new(0.0, 1.0).value(0.37).get(), 0.37);
    }

    #[test]
    fn label_text_uses_suffix() {
        let s = Slider::new(0.0, 10.0).step(0.5).value(3.5).value_label(None, 14.0, "°");
        assert_eq!(s.label_text(), "3.5°");
    }

    #[test]
    fn label_text_without_suffix_is_the_bare_value() {
        assert_eq!(Slider::new(0.0, 10.0).value(7.0).label_text(), "7");
    }

    // ── events ────────────────────────────────────────────────────────────

    #[test]
    fn drag_reports_each_new_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut s = Slider::new(0.0, 10.0).step(0.5).on_change(move |v| sink.borrow_mut().push(v));

        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        // 8 px thumb inset on both sides leaves a 100 px track from x = 8.
        let rect = Rect::new(0.0, 0.0, 116.0, 16.0);
        let start = Vec2::new(10.0, 8.0);

        let drag = |x: f32| UiEvent::Drag { pos: Vec2::new(x, 8.0), start, delta: Vec2::zero() };
        s.on_event(&drag(58.0), rect, &ctx);
        s.on_event(&drag(58.0), rect, &ctx);
        s.on_event(&UiEvent::DragEnd { pos: Vec2::new(500.0, 8.0), start }, rect, &ctx);

        assert_eq!(*seen.borrow(), vec![5.0, 10.0]);
    }

    #[test]
    fn drag_started_elsewhere_is_ignored() {
        let mut s = Slider::new(0.0, 10.0);
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let rect = Rect::new(0.0, 0.0, 116.0, 16.0);
        let ev = UiEvent::Drag { pos: Vec2::new(50.0, 8.0), start: Vec2::new(50.0, 300.0), delta: Vec2::zero() };
        assert_eq!(s.on_event(&ev, rect, &ctx), EventResult::Ignored);
        assert_eq!(s.get(), 0.0);
    }
}
