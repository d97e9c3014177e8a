use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Rectangle draw payload.
///
/// `rect` is the unrotated box; `rotation` (radians) turns it about its
/// centre. Positive angles turn clockwise on screen because +Y points down.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub rotation: f32,
    pub color: Color,
    pub border: Option<Border>,
}

impl RectCmd {
    #[inline]
    pub fn new(rect: Rect, color: Color) -> Self {
        Self { rect, rotation: 0.0, color, border: None }
    }
}

impl DrawList {
    /// Records an axis-aligned solid rectangle.
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push(z, DrawCmd::Rect(RectCmd::new(rect, color)));
    }

    /// Records an axis-aligned rectangle with an inside border.
    #[inline]
    pub fn push_bordered_rect(&mut self, z: ZIndex, rect: Rect, color: Color, border: Border) {
        self.push(z, DrawCmd::Rect(RectCmd { border: Some(border), ..RectCmd::new(rect, color) }));
    }

    /// Records a rectangle of `size` centred on `center`, turned by `rotation`.
    #[inline]
    pub fn push_rotated_rect(
        &mut self,
        z: ZIndex,
        center: Vec2,
        size: Vec2,
        rotation: f32,
        color: Color,
    ) {
        self.push(z, DrawCmd::Rect(RectCmd {
            rotation,
            ..RectCmd::new(Rect::from_center_size(center, size), color)
        }));
    }

    /// Records a straight segment of `width` pixels with butt caps.
    ///
    /// Segments are rotated rectangles, so wide lines keep a constant width
    /// at any angle. Zero-length segments are dropped.
    pub fn push_line(&mut self, z: ZIndex, from: Vec2, to: Vec2, width: f32, color: Color) {
        let d = to - from;
        let len = d.length();
        if len <= f32::EPSILON {
            return;
        }
        self.push_rotated_rect(z, from.lerp(to, 0.5), Vec2::new(len, width), d.angle(), color);
    }
}
