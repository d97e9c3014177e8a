//! Scene objects for the 2D demos.

use glam::Vec2;
use mirage_engine::paint::{Color, Paint};
use mirage_ui::painter::Painter;

use crate::world::WorldView;

/// Dash pattern in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dash {
    pub dash: f32,
    pub gap: f32,
}

/// Geometry of a scene object, in world units unless noted.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Rectangle centred on `center`, rotated counter-clockwise by
    /// `rotation` radians.
    Rect { center: Vec2, size: Vec2, rotation: f32, color: Color },
    Disc { center: Vec2, radius: f32, color: Color },
    Ring { center: Vec2, inner: f32, outer: f32, paint: Paint },
    /// Line with a fixed on-screen width.
    Line { from: Vec2, to: Vec2, width_px: f32, color: Color, dash: Option<Dash> },
    /// Triangle list; the length is a multiple of 3.
    Triangles { points: Vec<Vec2>, color: Color },
}

/// A shape plus the per-object state controls toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub kind: ShapeKind,
    /// Layer; higher values paint on top.
    pub z: f32,
    pub visible: bool,
    pub opacity: f32,
}

impl SceneObject {
    pub fn new(kind: ShapeKind, z: f32) -> Self {
        Self { kind, z, visible: true, opacity: 1.0 }
    }

    pub fn rect(center: Vec2, size: Vec2, color: Color, z: f32) -> Self {
        Self::rotated_rect(center, size, 0.0, color, z)
    }

    pub fn rotated_rect(center: Vec2, size: Vec2, rotation: f32, color: Color, z: f32) -> Self {
        Self::new(ShapeKind::Rect { center, size, rotation, color }, z)
    }

    pub fn disc(center: Vec2, radius: f32, color: Color, z: f32) -> Self {
        Self::new(ShapeKind::Disc { center, radius, color }, z)
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    fn paint(&self, painter: &mut Painter, view: &WorldView) {
        let fade = |c: Color| c.with_opacity(self.opacity);
        match &self.kind {
            ShapeKind::Rect { center, size, rotation, color } => painter.fill_rotated_rect(
                view.to_screen(*center),
                view.size(*size),
                view.angle(*rotation),
                fade(*color),
            ),
            ShapeKind::Disc { center, radius, color } => {
                painter.fill_circle(view.to_screen(*center), view.length(*radius), fade(*color), None)
            }
            ShapeKind::Ring { center, inner, outer, paint } => {
                let paint = match *paint {
                    Paint::Solid(c) => Paint::Solid(fade(c)),
                    hue => hue,
                };
                painter.fill_ring(view.to_screen(*center), view.length(*inner), view.length(*outer), paint)
            }
            ShapeKind::Line { from, to, width_px, color, dash } => {
                let (a, b) = (view.to_screen(*from), view.to_screen(*to));
                match dash {
                    Some(d) => painter.dashed_line(
                        a,
                        b,
                        *width_px,
                        view.length(d.dash),
                        view.length(d.gap),
                        fade(*color),
                    ),
                    None => painter.line(a, b, *width_px, fade(*color)),
                }
            }
            ShapeKind::Triangles { points, color } => {
                let pts: Vec<_> = points.iter().map(|p| view.to_screen(*p)).collect();
                painter.fill_triangles(pts, fade(*color));
            }
        }
    }
}

/// Visible objects in paint order: ascending `z`, ties in input order.
pub fn paint_order<'a>(objects: impl IntoIterator<Item = &'a SceneObject>) -> Vec<&'a SceneObject> {
    let mut visible: Vec<&SceneObject> = objects.into_iter().filter(|o| o.visible).collect();
    visible.sort_by(|a, b| a.z.total_cmp(&b.z));
    visible
}

pub fn paint_objects<'a>(
    painter: &mut Painter,
    view: &WorldView,
    objects: impl IntoIterator<Item = &'a SceneObject>,
) {
    for object in paint_order(objects) {
        object.paint(painter, view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(z: f32, tag: f32) -> SceneObject {
        SceneObject::disc(Vec2::new(tag, 0.0), 1.0, Color::BLACK, z)
    }

    fn tag(o: &SceneObject) -> f32 {
        match o.kind {
            ShapeKind::Disc { center, .. } => center.x,
            _ => unreachable!(),
        }
    }

    #[test]
    fn paint_order_sorts_by_z_and_keeps_ties_stable() {
        let objects = [tagged(0.02, 0.0), tagged(0.0, 1.0), tagged(0.01, 2.0), tagged(0.0, 3.0)];
        let order: Vec<f32> = paint_order(&objects).into_iter().map(tag).collect();
        assert_eq!(order, vec![1.0, 3.0, 2.0, 0.0]);
    }

    #[test]
    fn hidden_objects_are_skipped() {
        let objects = [tagged(0.0, 0.0).hidden(), tagged(-0.1, 1.0)];
        let order: Vec<f32> = paint_order(&objects).into_iter().map(tag).collect();
        assert_eq!(order, vec![1.0]);
    }
}
