use mirage_engine::coords::{Rect, Vec2};
use mirage_engine::text::{FontId, FontSystem};

// ── Edges ─────────────────────────────────────────────────────────────────

/// Insets on all four sides.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    #[inline]
    pub fn all(v: f32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    #[inline]
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self { top: vertical, bottom: vertical, left: horizontal, right: horizontal }
    }

    #[inline]
    pub fn h(self) -> f32 {
        self.left + self.right
    }

    #[inline]
    pub fn v(self) -> f32 {
        self.top + self.bottom
    }
}

// ── Constraints ───────────────────────────────────────────────────────────

/// Size range handed from parent to child during measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub min: Vec2,
    pub max: Vec2,
}

impl Constraints {
    #[inline]
    pub fn tight(size: Vec2) -> Self {
        Self { min: size, max: size }
    }

    #[inline]
    pub fn loose(max: Vec2) -> Self {
        Self { min: Vec2::zero(), max }
    }

    #[inline]
    pub fn unbounded() -> Self {
        Self::loose(Vec2::new(f32::INFINITY, f32::INFINITY))
    }

    /// Clamps `size` into `[min, max]`.
    #[inline]
    #[must_use]
    pub fn constrain(self, size: Vec2) -> Vec2 {
        Vec2::new(
            size.x.max(self.min.x).min(self.max.x),
            size.y.max(self.min.y).min(self.max.y),
        )
    }

    /// Shrinks `max` by `edges`; `min` drops to zero.
    #[inline]
    #[must_use]
    pub fn shrink(self, edges: Edges) -> Self {
        Self::loose(Vec2::new(
            (self.max.x - edges.h()).max(0.0),
            (self.max.y - edges.v()).max(0.0),
        ))
    }

    /// `max.x` when bounded, `fallback` otherwise.
    #[inline]
    pub fn width_or(self, fallback: f32) -> f32 {
        if self.max.x.is_finite() { self.max.x } else { fallback }
    }
}

// ── LayoutCtx ────────────────────────────────────────────────────────────

/// Shared resources for `Widget::measure` and `Widget::on_event`.
#[derive(Clone, Copy)]
pub struct LayoutCtx<'a> {
    pub fonts: &'a FontSystem,
    /// Window scale factor; text is measured at the renderer's raster scale.
    pub scale: f32,
}

impl<'a> LayoutCtx<'a> {
    /// Text extent in logical pixels. Without a font the width is estimated
    /// so labelled widgets keep a usable size.
    pub fn measure_text(&self, text: &str, font: Option<FontId>, size: f32, max_width: Option<f32>) -> Vec2 {
        match font {
            Some(id) => self.fonts.measure_text(text, id, size, max_width, self.scale),
            None => Vec2::new(text.chars().count() as f32 * size * 0.55, size * 1.2),
        }
    }
}

/// Shrinks a rect by `edges`.
#[inline]
pub fn inset_rect(rect: Rect, edges: Edges) -> Rect {
    Rect::new(
        rect.origin.x + edges.left,
        rect.origin.y + edges.top,
        (rect.size.x - edges.h()).max(0.0),
        (rect.size.y - edges.v()).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Constraints ───────────────────────────────────────────────────────

    #[test]
    fn constrain_clamps_both_ends() {
        let c = Constraints { min: Vec2::new(10.0, 10.0), max: Vec2::new(100.0, 100.0) };
        assert_eq!(c.constrain(Vec2::new(5.0, 300.0)), Vec2::new(10.0, 100.0));
        assert_eq!(c.constrain(Vec2::new(20.0, 30.0)), Vec2::new(20.0, 30.0));
    }

    #[test]
    fn shrink_never_goes_negative() {
        let c = Constraints::loose(Vec2::new(100.0, 8.0));
        let s = c.shrink(Edges::all(10.0));
        assert_eq!(s.max, Vec2::new(80.0, 0.0));
        assert_eq!(s.min, Vec2::zero());
    }

    #[test]
    fn width_or_falls_back_when_unbounded() {
        assert_eq!(Constraints::unbounded().width_or(200.0), 200.0);
        assert_eq!(Constraints::loose(Vec2::new(64.0, 1.0)).width_or(200.0), 64.0);
    }

    // ── inset_rect ────────────────────────────────────────────────────────

    #[test]
    fn inset_rect_asymmetric() {
        let edges = Edges { top: 4.0, bottom: 8.0, left: 6.0, right: 10.0 };
        let inner = inset_rect(Rect::new(5.0, 5.0, 100.0, 60.0), edges);
        assert_eq!(inner, Rect::new(11.0, 9.0, 84.0, 48.0));
    }

    #[test]
    fn inset_rect_clamps_to_zero() {
        let inner = inset_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Edges::symmetric(20.0, 20.0));
        assert_eq!(inner.size, Vec2::zero());
    }

    // ── LayoutCtx ─────────────────────────────────────────────────────────

    #[test]
    fn missing_font_gets_estimated_width() {
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let size = ctx.measure_text("abcd", None, 10.0, None);
        assert!((size.x - 22.0).abs() < 1e-4);
        assert!((size.y - 12.0).abs() < 1e-4);
    }
}
