//! The illusion demos.
//!
//! Each demo is a plain state struct: geometry generators are pure functions,
//! and the struct holds the scene-object groups they produced, rebuilding a
//! group whenever a parameter changes. Widgets own the state through
//! `Rc<RefCell<_>>` and mutate it from control callbacks.
//!
//! The 2D demos are drawn by [`IllusionView`](view::IllusionView) through an
//! orthographic [`OrthoCamera`](world::OrthoCamera); the Ames room renders a
//! lit mesh pass through [`RoomView`](ames_room::RoomView).

pub mod error;
pub mod shape;
pub mod view;
pub mod world;

pub mod ames_room;
pub mod cafe_wall;
pub mod ebbinghaus;
pub mod fake_cafe_wall;
pub mod poggendorff;
pub mod squint;

pub use error::ConfigError;
