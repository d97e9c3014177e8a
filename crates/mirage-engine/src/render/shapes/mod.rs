//! Shape renderers.
//!
//! The 2D renderers share one protocol, driven by `render::SceneRenderer`:
//! `clear` → `push` (returns the instance/vertex range) → `upload` → `draw`
//! into an already open pass. The mesh renderer opens its own passes.

mod common;

pub mod circle;
pub mod mesh;
pub mod rect;
pub mod text;
pub mod triangles;

pub(crate) use common::logical_clip_to_scissor;
