use mirage_engine::coords::{Rect, Vec2};
use mirage_engine::paint::Color;
use mirage_engine::scene::Border;

use crate::constraints::{inset_rect, Constraints, Edges, LayoutCtx};
use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::widget::{Element, Widget};

/// Shared button look: background per pointer state plus an optional border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonStyle {
    pub background: Color,
    pub hover_background: Color,
    pub press_background: Color,
    pub border: Option<Border>,
    pub padding: Edges,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            background: Color::from_srgb_u8(0x33, 0x33, 0x33, 0xff),
            hover_background: Color::from_srgb_u8(0x4a, 0x4a, 0x4a, 0xff),
            press_background: Color::from_srgb_u8(0x22, 0x22, 0x22, 0xff),
            border: Some(Border::new(1.0, Color::from_srgb_u8(0x88, 0x88, 0x88, 0xff))),
            padding: Edges::symmetric(8.0, 14.0),
        }
    }
}

impl ButtonStyle {
    pub(crate) fn paint_background(&self, painter: &mut Painter, rect: Rect) {
        let bg = if painter.is_pressed(rect) {
            self.press_background
        } else if painter.is_hovered(rect) {
            self.hover_background
        } else {
            self.background
        };
        match self.border {
            Some(border) => painter.fill_bordered_rect(rect, bg, border),
            None => painter.fill_rect(rect, bg),
        }
    }
}

/// A clickable widget wrapping any child.
///
/// ```rust,ignore
/// Button::new(Text::new("Reset", font, 14.0, Color::WHITE))
///     .on_click(|| log::info!("reset"))
/// ```
pub struct Button {
    child: Element,
    on_click: Option<Box<dyn FnMut()>>,
    style: ButtonStyle,
}

impl Button {
    pub fn new(child: impl Into<Element>) -> Self {
        Self { child: child.into(), on_click: None, style: ButtonStyle::default() }
    }

    pub fn on_click(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }
}

impl Widget for Button {
    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        let pad = self.style.padding;
        let child = self.child.measure(constraints.shrink(pad), ctx);
        constraints.constrain(Vec2::new(child.x + pad.h(), child.y + pad.v()))
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        self.style.paint_background(painter, rect);
        self.child.paint(painter, inset_rect(rect, self.style.padding));
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, _ctx: &LayoutCtx) -> EventResult {
        match event {
            UiEvent::Click { pos } if rect.contains(*pos) => {
                if let Some(f) = &mut self.on_click {
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

    use super::*;
    use crate::widgets::text::Text;

    fn button(count: Rc<Cell<u32>>) -> Button {
        Button::new(Text::new("Reset", None, 14.0, Color::WHITE)).on_click(move || count.set(count.get() + 1))
    }

    #[test]
    fn click_inside_fires_and_consumes() {
        let fonts = mirage_engine::text::FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let count = Rc::new(Cell::new(0));
        let mut b = button(count.clone());
        let rect = Rect::new(0.0, 0.0, 80.0, 30.0);

        let r = b.on_event(&UiEvent::Click { pos: Vec2::new(10.0, 10.0) }, rect, &ctx);
        assert_eq!(r, EventResult::Consumed);
        let r = b.on_event(&UiEvent::Click { pos: Vec2::new(100.0, 10.0) }, rect, &ctx);
        assert_eq!(r, EventResult::Ignored);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn size_includes_padding() {
        let fonts = mirage_engine::text::FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let b = button(Rc::new(Cell::new(0)));
        let text = ctx.measure_text("Reset", None, 14.0, None);
        let size = b.measure(Constraints::unbounded(), &ctx);
        let pad = ButtonStyle::default().padding;
        assert_eq!(size, Vec2::new(text.x + pad.h(), text.y + pad.v()));
    }
}
