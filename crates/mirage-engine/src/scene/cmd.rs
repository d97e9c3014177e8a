use crate::scene::shapes::circle::CircleCmd;
use crate::scene::shapes::mesh::MeshCmd;
use crate::scene::shapes::rect::RectCmd;
use crate::scene::shapes::text::TextCmd;
use crate::scene::shapes::triangles::TrianglesCmd;

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here
/// - implement push helpers inside that shape module
/// - add a matching renderer under `render::shapes::*` and route it in
///   `render::scene`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Circle(CircleCmd),
    Triangles(TrianglesCmd),
    Text(TextCmd),
    /// A depth-tested 3D pass confined to a rectangle of the window.
    Mesh(MeshCmd),
}
