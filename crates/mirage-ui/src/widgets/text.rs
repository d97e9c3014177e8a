use mirage_engine::coords::{Rect, Vec2};
use mirage_engine::paint::Color;
use mirage_engine::text::FontId;

use crate::constraints::{Constraints, LayoutCtx};
use crate::painter::Painter;
use crate::widget::Widget;

/// A single run of text, wrapped to the parent's width.
///
/// Without a font the text still takes up its estimated size but is not
/// drawn.
pub struct Text {
    pub text: String,
    pub font: Option<FontId>,
    pub size: f32,
    pub color: Color,
}

impl Text {
    pub fn new(text: impl Into<String>, font: impl Into<Option<FontId>>, size: f32, color: Color) -> Self {
        Self { text: text.into(), font: font.into(), size, color }
    }
}

impl Widget for Text {
    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        let max_w = constraints.max.x.is_finite().then_some(constraints.max.x);
        constraints.constrain(ctx.measure_text(&self.text, self.font, self.size, max_w))
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let Some(font) = self.font else { return };
        let max_w = (rect.size.x > 0.0).then_some(rect.size.x);
        painter.text(self.text.as_str(), font, self.size, self.color, rect.origin, max_w);
    }
}
