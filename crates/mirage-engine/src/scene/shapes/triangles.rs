use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Solid triangle list (three vertices per triangle, logical pixels).
#[derive(Debug, Clone, PartialEq)]
pub struct TrianglesCmd {
    pub vertices: Vec<Vec2>,
    pub color: Color,
}

impl DrawList {
    /// Records a solid triangle list. A trailing partial triangle is dropped.
    pub fn push_triangles(&mut self, z: ZIndex, vertices: impl Into<Vec<Vec2>>, color: Color) {
        let mut vertices = vertices.into();
        debug_assert!(vertices.len() % 3 == 0, "triangle list length must be a multiple of 3");
        vertices.truncate(vertices.len() - vertices.len() % 3);
        if vertices.is_empty() {
            return;
        }
        self.push(z, DrawCmd::Triangles(TrianglesCmd { vertices, color }));
    }
}
