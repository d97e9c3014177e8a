use mirage_engine::coords::{Rect, Vec2};
use mirage_engine::paint::{Color, Paint};
use mirage_engine::scene::shapes::mesh::MeshCmd;
use mirage_engine::scene::{Border, DrawList, ZIndex};
use mirage_engine::text::{FontId, FontSystem};

use crate::constraints::LayoutCtx;

/// Drawing surface passed to [`Widget::paint`](crate::widget::Widget::paint).
///
/// Wraps the engine `DrawList`. Every call gets the next z layer, so paint
/// order is call order. Pointer state is exposed for hover/press visuals.
pub struct Painter<'a> {
    pub(crate) draw_list: &'a mut DrawList,
    pub(crate) font_system: &'a FontSystem,
    /// Window scale factor for this frame.
    pub scale: f32,
    z: i32,
    pub mouse_pos: Vec2,
    pub mouse_pressed: bool,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(
        draw_list: &'a mut DrawList,
        font_system: &'a FontSystem,
        mouse_pos: Vec2,
        mouse_pressed: bool,
        scale: f32,
    ) -> Self {
        Self { draw_list, font_system, scale, z: 0, mouse_pos, mouse_pressed }
    }

    // ── input queries ─────────────────────────────────────────────────────

    #[inline]
    pub fn is_hovered(&self, rect: Rect) -> bool {
        rect.contains(self.mouse_pos)
    }

    #[inline]
    pub fn is_pressed(&self, rect: Rect) -> bool {
        self.mouse_pressed && rect.contains(self.mouse_pos)
    }

    /// Layout context borrowing this painter's fonts; containers use it to
    /// re-measure children while painting.
    #[inline]
    pub fn layout_ctx(&self) -> LayoutCtx<'a> {
        LayoutCtx { fonts: self.font_system, scale: self.scale }
    }

    // ── rectangles ────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let z = self.next_z();
        self.draw_list.push_rect(z, rect, color);
    }

    pub fn fill_bordered_rect(&mut self, rect: Rect, color: Color, border: Border) {
        let z = self.next_z();
        self.draw_list.push_bordered_rect(z, rect, color, border);
    }

    /// Rectangle of `size` centred on `center`, rotated by `rotation` radians
    /// (clockwise on screen).
    pub fn fill_rotated_rect(&mut self, center: Vec2, size: Vec2, rotation: f32, color: Color) {
        let z = self.next_z();
        self.draw_list.push_rotated_rect(z, center, size, rotation, color);
    }

    // ── round shapes ──────────────────────────────────────────────────────

    pub fn fill_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        paint: impl Into<Paint>,
        border: Option<Border>,
    ) {
        let z = self.next_z();
        self.draw_list.push_circle(z, center, radius, paint.into(), border);
    }

    pub fn fill_ring(&mut self, center: Vec2, inner_radius: f32, radius: f32, paint: impl Into<Paint>) {
        let z = self.next_z();
        self.draw_list.push_ring(z, center, inner_radius, radius, paint.into());
    }

    // ── lines & polygons ──────────────────────────────────────────────────

    /// Filled triangles; `vertices.len()` must be a multiple of 3.
    pub fn fill_triangles(&mut self, vertices: impl Into<Vec<Vec2>>, color: Color) {
        let z = self.next_z();
        self.draw_list.push_triangles(z, vertices, color);
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let z = self.next_z();
        self.draw_list.push_line(z, from, to, width, color);
    }

    /// Dashed line; `dash` and `gap` are lengths in logical pixels.
    pub fn dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, dash: f32, gap: f32, color: Color) {
        let z = self.next_z();
        for (a, b) in dash_segments(from, to, dash, gap) {
            self.draw_list.push_line(z, a, b, width, color);
        }
    }

    // ── text & meshes ─────────────────────────────────────────────────────

    /// Text with its first line's top-left at `origin`.
    pub fn text(
        &mut self,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        color: Color,
        origin: Vec2,
        max_width: Option<f32>,
    ) {
        let z = self.next_z();
        self.draw_list.push_text(z, text, font, size, color, origin, max_width);
    }

    pub fn mesh(&mut self, cmd: MeshCmd) {
        let z = self.next_z();
        self.draw_list.push_mesh(z, cmd);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    /// Begins a scissor region; pair with [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        self.draw_list.push_clip(rect);
    }

    pub fn pop_clip(&mut self) {
        self.draw_list.pop_clip();
    }

    #[inline]
    fn next_z(&mut self) -> ZIndex {
        let z = ZIndex::new(self.z);
        self.z += 1;
        z
    }
}

/// Splits `from → to` into dash segments. The last dash is cut at `to`.
pub fn dash_segments(from: Vec2, to: Vec2, dash: f32, gap: f32) -> Vec<(Vec2, Vec2)> {
    let length = (to - from).length();
    if length <= 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let period = dash + gap.max(0.0);
    let mut out = Vec::with_capacity((length / period).ceil() as usize);
    let mut s = 0.0;
    while s < length {
        let e = (s + dash).min(length);
        out.push((from.lerp(to, s / length), from.lerp(to, e / length)));
        s += period;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashes_cover_line_with_gaps() {
        let segs = dash_segments(Vec2::zero(), Vec2::new(10.0, 0.0), 2.0, 1.0);
        // starts at 0, 3, 6, 9; the last is clipped to 1 px
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[1].0, Vec2::new(3.0, 0.0));
        assert_eq!(segs[3], (Vec2::new(9.0, 0.0), Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn degenerate_dash_yields_nothing() {
        assert!(dash_segments(Vec2::zero(), Vec2::zero(), 2.0, 1.0).is_empty());
        assert!(dash_segments(Vec2::zero(), Vec2::new(5.0, 0.0), 0.0, 1.0).is_empty());
    }
}
