//! Mirage engine crate.
//!
//! Platform + GPU runtime pieces used by the UI layer and the illusion demos:
//! window loop, input, frame timing, draw list, and the shape renderers.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;
