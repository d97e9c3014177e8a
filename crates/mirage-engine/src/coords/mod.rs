//! Coordinate and geometry types shared across engine renderers and UI.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! World-space maths (y-up, camera frusta) lives with the demos and uses
//! `glam`; everything that reaches a renderer is converted to this space
//! first. The mesh pass is the exception and takes a clip-space matrix.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
