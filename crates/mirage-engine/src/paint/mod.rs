//! Paint model shared between UI and renderers.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - paint sources (solid, procedural hue wheel)
//!
//! Geometry types remain in `coords`.

mod color;
mod paint;

pub use color::Color;
pub use paint::Paint;
