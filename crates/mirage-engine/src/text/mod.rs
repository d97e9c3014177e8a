//! Font loading and measurement (fontdue). Rasterisation lives in
//! `render::shapes::text`.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
