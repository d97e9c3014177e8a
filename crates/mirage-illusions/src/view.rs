use std::cell::RefCell;
use std::rc::Rc;

use mirage_ui::prelude::*;

use crate::shape::{paint_objects, SceneObject};
use crate::world::OrthoCamera;

/// A 2D demo that [`IllusionView`] can draw.
pub trait Illusion: 'static {
    fn camera(&self) -> OrthoCamera;

    /// Every object of the current scene, visible or not.
    fn objects(&self) -> Vec<&SceneObject>;

    /// Called once per frame with the seconds since startup.
    fn advance(&mut self, _elapsed: f32) {}

    /// Returns the dirty flag and clears it.
    fn take_dirty(&mut self) -> bool;
}

/// Fills its rect with a demo's scene.
pub struct IllusionView<T: Illusion> {
    state: Rc<RefCell<T>>,
    redraw: Option<RedrawHandle>,
}

impl<T: Illusion> IllusionView<T> {
    pub fn new(state: Rc<RefCell<T>>) -> Self {
        Self { state, redraw: None }
    }

    /// Forward the demo's dirty flag to the window.
    pub fn redraw_handle(mut self, handle: RedrawHandle) -> Self {
        self.redraw = Some(handle);
        self
    }
}

impl<T: Illusion> Widget for IllusionView<T> {
    fn measure(&self, constraints: Constraints, _ctx: &LayoutCtx) -> Vec2 {
        let w = if constraints.max.x.is_finite() { constraints.max.x } else { 0.0 };
        let h = if constraints.max.y.is_finite() { constraints.max.y } else { 0.0 };
        constraints.constrain(Vec2::new(w, h))
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let state = self.state.borrow();
        let view = state.camera().view(rect);
        painter.push_clip(rect);
        paint_objects(painter, &view, state.objects());
        painter.pop_clip();
    }

    fn on_event(&mut self, event: &UiEvent, _rect: Rect, _ctx: &LayoutCtx) -> EventResult {
        if let UiEvent::Frame { elapsed, .. } = event {
            let mut state = self.state.borrow_mut();
            state.advance(*elapsed);
            if state.take_dirty() {
                log::trace!("scene changed");
                if let Some(handle) = &self.redraw {
                    handle.request();
                }
            }
        }
        EventResult::Ignored
    }
}
