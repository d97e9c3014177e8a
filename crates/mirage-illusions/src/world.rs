//! World space for the 2D demos.
//!
//! World units are y-up and centred on the origin; screen space is the
//! engine's logical pixels, y-down from the top-left of the view rect.

use glam::Vec2;
use mirage_engine::coords::{Rect, Vec2 as Point};

/// Orthographic camera with a fixed vertical extent.
///
/// The horizontal extent follows the viewport aspect, so resizing never
/// stretches the scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthoCamera {
    pub half_height: f32,
}

/// Visible world-space bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Frustum {
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

impl OrthoCamera {
    pub const fn new(half_height: f32) -> Self {
        Self { half_height }
    }

    pub fn frustum(self, aspect: f32) -> Frustum {
        let half_width = self.half_height * aspect;
        Frustum {
            left: -half_width,
            right: half_width,
            top: self.half_height,
            bottom: -self.half_height,
        }
    }

    /// Mapping from world space onto `rect`.
    pub fn view(self, rect: Rect) -> WorldView {
        let px_per_unit = if self.half_height > 0.0 {
            rect.size.y / (2.0 * self.half_height)
        } else {
            0.0
        };
        WorldView { center: rect.center(), px_per_unit }
    }
}

/// World ↔ screen transform for one view rect.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WorldView {
    center: Point,
    px_per_unit: f32,
}

impl WorldView {
    #[inline]
    pub fn to_screen(&self, p: Vec2) -> Point {
        Point::new(
            self.center.x + p.x * self.px_per_unit,
            self.center.y - p.y * self.px_per_unit,
        )
    }

    /// Inverse of [`to_screen`](Self::to_screen). Degenerate views map
    /// everything to the origin.
    #[inline]
    pub fn to_world(&self, p: Point) -> Vec2 {
        if self.px_per_unit == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (p.x - self.center.x) / self.px_per_unit,
            (self.center.y - p.y) / self.px_per_unit,
        )
    }

    #[inline]
    pub fn length(&self, world: f32) -> f32 {
        world * self.px_per_unit
    }

    #[inline]
    pub fn size(&self, world: Vec2) -> Point {
        Point::new(world.x * self.px_per_unit, world.y * self.px_per_unit)
    }

    /// World rotations are counter-clockwise; the flipped y axis makes them
    /// clockwise on screen.
    #[inline]
    pub fn angle(&self, world: f32) -> f32 {
        -world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    // ── frustum ───────────────────────────────────────────────────────────

    #[test]
    fn frustum_width_follows_aspect() {
        let cam = OrthoCamera::new(6.0);
        for aspect in [0.5, 1.0, 16.0 / 9.0, 3.2] {
            let f = cam.frustum(aspect);
            assert!(approx(f.width(), f.height() * aspect));
            assert_eq!(f.height(), 12.0);
            assert_eq!(f.left, -f.right);
        }
    }

    // ── world ↔ screen ────────────────────────────────────────────────────

    #[test]
    fn origin_maps_to_rect_center_and_y_flips() {
        let view = OrthoCamera::new(6.0).view(Rect::new(0.0, 0.0, 1600.0, 1200.0));
        assert_eq!(view.to_screen(Vec2::ZERO), Point::new(800.0, 600.0));
        // 100 px per unit; +y is up.
        assert_eq!(view.to_screen(Vec2::new(1.0, 1.0)), Point::new(900.0, 500.0));
        assert_eq!(view.length(0.5), 50.0);
    }

    #[test]
    fn frustum_corners_land_on_rect_corners() {
        let rect = Rect::new(10.0, 20.0, 800.0, 450.0);
        let cam = OrthoCamera::new(15.0);
        let f = cam.frustum(rect.aspect());
        let view = cam.view(rect);
        let tl = view.to_screen(Vec2::new(f.left, f.top));
        let br = view.to_screen(Vec2::new(f.right, f.bottom));
        assert!(approx(tl.x, 10.0) && approx(tl.y, 20.0));
        assert!(approx(br.x, 810.0) && approx(br.y, 470.0));
    }

    #[test]
    fn mapping_round_trips() {
        let view = OrthoCamera::new(12.5).view(Rect::new(0.0, 0.0, 1024.0, 768.0));
        for p in [Vec2::new(-7.0, 3.5), Vec2::new(0.25, -12.0), Vec2::new(16.0, 12.5)] {
            let back = view.to_world(view.to_screen(p));
            assert!(approx(back.x, p.x) && approx(back.y, p.y), "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn degenerate_camera_does_not_divide_by_zero() {
        let view = OrthoCamera::new(0.0).view(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(view.to_world(Point::new(3.0, 4.0)), Vec2::ZERO);
    }
}
