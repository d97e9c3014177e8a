use mirage_engine::coords::{Rect, Vec2};
use mirage_engine::paint::Color;

use crate::constraints::{Constraints, LayoutCtx};
use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::widget::{Element, Widget};

// ── Anchors ───────────────────────────────────────────────────────────────

/// Distance from a parent edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorVal {
    Px(f32),
    /// Fraction of the parent's extent on that axis.
    Pct(f32),
}

impl AnchorVal {
    #[inline]
    pub fn resolve(self, parent_dim: f32) -> f32 {
        match self {
            AnchorVal::Px(v) => v,
            AnchorVal::Pct(p) => parent_dim * p,
        }
    }
}

/// How a stack child's width or height is chosen when it is not stretched
/// between two anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SizeHint {
    #[default]
    Natural,
    Px(f32),
    Pct(f32),
    Fill,
}

impl SizeHint {
    #[inline]
    pub fn resolve(self, parent_dim: f32, natural: f32) -> f32 {
        match self {
            SizeHint::Natural => natural,
            SizeHint::Px(v) => v,
            SizeHint::Pct(p) => parent_dim * p,
            SizeHint::Fill => parent_dim,
        }
    }
}

// ── StackItem ─────────────────────────────────────────────────────────────

/// A [`Stack`] child with its anchors.
///
/// Both anchors on an axis stretch the child between them; one anchor pins
/// it to that edge; none places it at the parent origin.
pub struct StackItem {
    pub element: Element,
    pub left: Option<AnchorVal>,
    pub top: Option<AnchorVal>,
    pub right: Option<AnchorVal>,
    pub bottom: Option<AnchorVal>,
    pub width: SizeHint,
    pub height: SizeHint,
}

impl StackItem {
    pub fn new(element: impl Into<Element>) -> Self {
        Self {
            element: element.into(),
            left: None,
            top: None,
            right: None,
            bottom: None,
            width: SizeHint::Natural,
            height: SizeHint::Natural,
        }
    }

    /// Stretched over the whole parent.
    pub fn fill(element: impl Into<Element>) -> Self {
        let z = AnchorVal::Px(0.0);
        Self::new(element).left(z).top(z).right(z).bottom(z)
    }

    pub fn left(mut self, v: AnchorVal) -> Self { self.left = Some(v); self }
    pub fn top(mut self, v: AnchorVal) -> Self { self.top = Some(v); self }
    pub fn right(mut self, v: AnchorVal) -> Self { self.right = Some(v); self }
    pub fn bottom(mut self, v: AnchorVal) -> Self { self.bottom = Some(v); self }
    pub fn width(mut self, v: SizeHint) -> Self { self.width = v; self }
    pub fn height(mut self, v: SizeHint) -> Self { self.height = v; self }

    pub fn compute_rect(&self, parent: Rect, ctx: &LayoutCtx) -> Rect {
        let natural = self.element.measure(Constraints::loose(parent.size), ctx);
        let (x, w) = place_axis(parent.origin.x, parent.size.x, self.left, self.right, self.width, natural.x);
        let (y, h) = place_axis(parent.origin.y, parent.size.y, self.top, self.bottom, self.height, natural.y);
        Rect::new(x, y, w, h)
    }
}

/// Position and extent on one axis from a start/end anchor pair.
fn place_axis(
    origin: f32,
    dim: f32,
    start: Option<AnchorVal>,
    end: Option<AnchorVal>,
    hint: SizeHint,
    natural: f32,
) -> (f32, f32) {
    match (start, end) {
        (Some(s), Some(e)) => {
            let s = s.resolve(dim);
            (origin + s, (dim - s - e.resolve(dim)).max(0.0))
        }
        (Some(s), None) => (origin + s.resolve(dim), hint.resolve(dim, natural)),
        (None, Some(e)) => {
            let len = hint.resolve(dim, natural);
            (origin + dim - e.resolve(dim) - len, len)
        }
        (None, None) => (origin, hint.resolve(dim, natural)),
    }
}

// ── Stack ─────────────────────────────────────────────────────────────────

/// Overlay container. Children paint in insertion order; events reach the
/// topmost (last) child first.
///
/// Clicks and drags stop at the topmost child whose rect holds the press,
/// whether or not it consumes them, so an overlay panel shields the children
/// under it.
pub struct Stack {
    children: Vec<StackItem>,
    bg: Option<Color>,
}

impl Stack {
    pub fn new() -> Self {
        Self { children: Vec::new(), bg: None }
    }

    pub fn item(mut self, item: StackItem) -> Self {
        self.children.push(item);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Stack {
    /// A stack fills whatever its parent offers.
    fn measure(&self, constraints: Constraints, _ctx: &LayoutCtx) -> Vec2 {
        let w = if constraints.max.x.is_finite() { constraints.max.x } else { 0.0 };
        let h = if constraints.max.y.is_finite() { constraints.max.y } else { 0.0 };
        constraints.constrain(Vec2::new(w, h))
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        if let Some(color) = self.bg {
            painter.fill_rect(rect, color);
        }
        let ctx = painter.layout_ctx();
        for item in &self.children {
            let child_rect = item.compute_rect(rect, &ctx);
            item.element.paint(painter, child_rect);
        }
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &LayoutCtx) -> EventResult {
        let origin = event.pointer_origin();
        for item in self.children.iter_mut().rev() {
            let child_rect = item.compute_rect(rect, ctx);
            if item.element.on_event(event, child_rect, ctx).is_consumed() {
                return EventResult::Consumed;
            }
            if origin.is_some_and(|p| child_rect.contains(p)) {
                break;
            }
        }
        EventResult::Ignored
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use mirage_engine::text::FontSystem;

    use super::*;

    const PARENT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    fn axis(start: Option<AnchorVal>, end: Option<AnchorVal>, hint: SizeHint) -> (f32, f32) {
        place_axis(PARENT.origin.x, PARENT.size.x, start, end, hint, 120.0)
    }

    #[test]
    fn both_anchors_stretch() {
        assert_eq!(axis(Some(AnchorVal::Px(10.0)), Some(AnchorVal::Px(30.0)), SizeHint::Natural), (10.0, 760.0));
    }

    #[test]
    fn end_anchor_pins_to_far_edge() {
        assert_eq!(axis(None, Some(AnchorVal::Px(20.0)), SizeHint::Natural), (660.0, 120.0));
        assert_eq!(axis(None, Some(AnchorVal::Pct(0.0)), SizeHint::Px(50.0)), (750.0, 50.0));
    }

    #[test]
    fn percent_anchor_and_size_hints() {
        assert_eq!(axis(Some(AnchorVal::Pct(0.25)), None, SizeHint::Pct(0.5)), (200.0, 400.0));
        assert_eq!(axis(None, None, SizeHint::Fill), (0.0, 800.0));
    }

    // ── event routing ─────────────────────────────────────────────────────

    /// Fixed-size widget counting the drags it is offered.
    struct Pad {
        size: Vec2,
        consume: bool,
        drags: Rc<Cell<u32>>,
    }

    impl Widget for Pad {
        fn measure(&self, constraints: Constraints, _ctx: &LayoutCtx) -> Vec2 {
            constraints.constrain(self.size)
        }

        fn paint(&self, _painter: &mut Painter, _rect: Rect) {}

        fn on_event(&mut self, event: &UiEvent, _rect: Rect, _ctx: &LayoutCtx) -> EventResult {
            match event {
                UiEvent::Drag { .. } => {
                    self.drags.set(self.drags.get() + 1);
                    if self.consume { EventResult::Consumed } else { EventResult::Ignored }
                }
                _ => EventResult::Ignored,
            }
        }
    }

    fn scene_with_panel() -> (Stack, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let under = Rc::new(Cell::new(0));
        let over = Rc::new(Cell::new(0));
        let scene = Pad { size: PARENT.size, consume: true, drags: under.clone() };
        let panel = Pad { size: Vec2::new(200.0, 80.0), consume: false, drags: over.clone() };
        let stack = Stack::new()
            .item(StackItem::fill(scene))
            .item(StackItem::new(panel).left(AnchorVal::Px(16.0)).bottom(AnchorVal::Px(16.0)));
        (stack, under, over)
    }

    fn drag_from(start: Vec2) -> UiEvent {
        UiEvent::Drag { pos: start + Vec2::new(30.0, 0.0), start, delta: Vec2::new(30.0, 0.0) }
    }

    #[test]
    fn drag_started_on_panel_does_not_reach_the_scene() {
        let (mut stack, under, over) = scene_with_panel();
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };

        // Panel spans x 16..216, y 504..584.
        let r = stack.on_event(&drag_from(Vec2::new(50.0, 550.0)), PARENT, &ctx);
        assert_eq!(r, EventResult::Ignored);
        assert_eq!(over.get(), 1);
        assert_eq!(under.get(), 0);
    }

    #[test]
    fn drag_started_elsewhere_reaches_the_scene() {
        let (mut stack, under, over) = scene_with_panel();
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };

        let r = stack.on_event(&drag_from(Vec2::new(400.0, 300.0)), PARENT, &ctx);
        assert!(r.is_consumed());
        assert_eq!(over.get(), 1);
        assert_eq!(under.get(), 1);
    }
}
