//! Mirage UI: a retained widget tree on top of `mirage-engine`.
//!
//! The root widget is built once and lives for the whole run; input is
//! routed into it as [`UiEvent`](event::UiEvent)s before it is painted each
//! frame.
//!
//! ```rust,ignore
//! use mirage_ui::prelude::*;
//!
//! Application::new()
//!     .title("demo")
//!     .font("body", font_bytes)
//!     .run_widget(|fonts| {
//!         Column::new()
//!             .child(Text::new("Hello", fonts.primary(), 16.0, Color::WHITE))
//!             .into()
//!     })?;
//! ```
//!
//! Custom widgets implement [`Widget`](widget::Widget) and convert into an
//! [`Element`](widget::Element) anywhere a child is accepted.

pub mod app;
pub mod constraints;
pub mod event;
pub mod painter;
pub mod scene;
pub mod widget;
pub mod widgets;

pub use app::Application;

/// Everything needed to build and extend a UI.
pub mod prelude {
    pub use crate::app::{Application, FontMap, RedrawHandle, RedrawMode};
    pub use crate::constraints::{Constraints, Edges, LayoutCtx};
    pub use crate::event::{EventResult, UiEvent};
    pub use crate::painter::Painter;
    pub use crate::widget::{Element, Widget};
    pub use crate::widgets::{
        button::{Button, ButtonStyle},
        flex::{Align, Column, Row},
        slider::Slider,
        stack::{AnchorVal, SizeHint, Stack, StackItem},
        text::Text,
        toggle_button::ToggleButton,
    };

    pub use mirage_engine::coords::{Rect, Vec2};
    pub use mirage_engine::input::Key;
    pub use mirage_engine::paint::{Color, Paint};
    pub use mirage_engine::scene::Border;
    pub use mirage_engine::text::FontId;
}
