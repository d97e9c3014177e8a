pub mod button;
pub mod flex;
pub mod slider;
pub mod stack;
pub mod text;
pub mod toggle_button;
