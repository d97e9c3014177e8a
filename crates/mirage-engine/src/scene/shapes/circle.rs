use crate::coords::Vec2;
use crate::paint::{Color, Paint};
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Circle or ring draw payload.
///
/// `inner_radius > 0` cuts a hole, turning the disc into an annulus.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub inner_radius: f32,
    pub paint: Paint,
    pub border: Option<Border>,
}

impl CircleCmd {
    #[inline]
    pub fn new(center: Vec2, radius: f32, paint: Paint, border: Option<Border>) -> Self {
        Self { center, radius, inner_radius: 0.0, paint, border }
    }
}

impl DrawList {
    /// Records a circle draw command.
    #[inline]
    pub fn push_circle(
        &mut self,
        z: ZIndex,
        center: Vec2,
        radius: f32,
        paint: Paint,
        border: Option<Border>,
    ) {
        self.push(z, DrawCmd::Circle(CircleCmd::new(center, radius, paint, border)));
    }

    /// Records a solid circle.
    #[inline]
    pub fn push_solid_circle(&mut self, z: ZIndex, center: Vec2, radius: f32, color: Color) {
        self.push_circle(z, center, radius, Paint::Solid(color), None);
    }

    /// Records a ring between `inner_radius` and `radius`.
    #[inline]
    pub fn push_ring(
        &mut self,
        z: ZIndex,
        center: Vec2,
        inner_radius: f32,
        radius: f32,
        paint: Paint,
    ) {
        debug_assert!(inner_radius <= radius, "ring inner radius exceeds outer radius");
        self.push(z, DrawCmd::Circle(CircleCmd {
            inner_radius: inner_radius.max(0.0),
            ..CircleCmd::new(center, radius, paint, None)
        }));
    }
}
