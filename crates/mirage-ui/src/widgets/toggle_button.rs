use mirage_engine::coords::{Rect, Vec2};
use mirage_engine::paint::Color;
use mirage_engine::text::FontId;

use crate::constraints::{inset_rect, Constraints, LayoutCtx};
use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::widget::Widget;
use crate::widgets::button::ButtonStyle;

/// A button for a two-state setting owned elsewhere.
///
/// The widget keeps no state of its own: `label` is asked for the current
/// caption on every layout and paint, and a click runs `on_toggle`, which
/// flips the setting. [`reserve`](Self::reserve) lists every caption the
/// label can return so the width stays put when it changes.
///
/// ```rust,ignore
/// let labels = state.clone();
/// ToggleButton::new(font, 14.0, move || labels.borrow().guides_label())
///     .reserve([SHOW_GUIDES, HIDE_GUIDES])
///     .on_toggle(move || { state.borrow_mut().toggle_guides(); })
/// ```
pub struct ToggleButton {
    label: Box<dyn Fn() -> &'static str>,
    reserved: Vec<&'static str>,
    font: Option<FontId>,
    size: f32,
    style: ButtonStyle,
    on_toggle: Option<Box<dyn FnMut()>>,
}

impl ToggleButton {
    pub fn new(
        font: impl Into<Option<FontId>>,
        size: f32,
        label: impl Fn() -> &'static str + 'static,
    ) -> Self {
        Self {
            label: Box::new(label),
            reserved: Vec::new(),
            font: font.into(),
            size,
            style: ButtonStyle::default(),
            on_toggle: None,
        }
    }

    pub fn reserve(mut self, captions: impl IntoIterator<Item = &'static str>) -> Self {
        self.reserved = captions.into_iter().collect();
        self
    }

    pub fn on_toggle(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_toggle = Some(Box::new(f));
        self
    }

    pub fn label(&self) -> &'static str {
        (self.label)()
    }
}

impl Widget for ToggleButton {
    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        let pad = self.style.padding;
        let text = std::iter::once(self.label())
            .chain(self.reserved.iter().copied())
            .map(|caption| ctx.measure_text(caption, self.font, self.size, None))
            .fold(Vec2::zero(), |a, b| Vec2::new(a.x.max(b.x), a.y.max(b.y)));
        constraints.constrain(Vec2::new(text.x + pad.h(), text.y + pad.v()))
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        self.style.paint_background(painter, rect);
        if let Some(font) = self.font {
            let inner = inset_rect(rect, self.style.padding);
            painter.text(self.label(), font, self.size, Color::WHITE, inner.origin, None);
        }
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, _ctx: &LayoutCtx) -> EventResult {
        match event {
            UiEvent::Click { pos } if rect.contains(*pos) => {
                if let Some(f) = &mut self.on_toggle {
                    f();
                }
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use mirage_engine::text::FontSystem;

    use super::*;

    fn switch(on: Rc<Cell<bool>>) -> ToggleButton {
        let shown = on.clone();
        ToggleButton::new(None, 14.0, move || if shown.get() { "Hide Illusion" } else { "Reveal Illusion" })
            .on_toggle(move || on.set(!on.get()))
    }

    #[test]
    fn label_reads_the_owning_state() {
        let on = Rc::new(Cell::new(false));
        let b = switch(on.clone());
        assert_eq!(b.label(), "Reveal Illusion");
        on.set(true);
        assert_eq!(b.label(), "Hide Illusion");
    }

    #[test]
    fn click_inside_flips_the_state() {
        let on = Rc::new(Cell::new(false));
        let mut b = switch(on.clone());

        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let rect = Rect::new(0.0, 0.0, 100.0, 30.0);

        let miss = b.on_event(&UiEvent::Click { pos: Vec2::new(150.0, 10.0) }, rect, &ctx);
        assert_eq!(miss, EventResult::Ignored);
        assert!(!on.get());

        let hit = b.on_event(&UiEvent::Click { pos: Vec2::new(50.0, 10.0) }, rect, &ctx);
        assert!(hit.is_consumed());
        assert!(on.get());
        assert_eq!(b.label(), "Hide Illusion");
    }

    #[test]
    fn reserved_captions_fix_the_width() {
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let on = Rc::new(Cell::new(false));
        let b = switch(on.clone()).reserve(["Reveal Illusion", "Hide Illusion"]);

        let off = b.measure(Constraints::unbounded(), &ctx);
        on.set(true);
        assert_eq!(b.measure(Constraints::unbounded(), &ctx), off);
    }
}
