use mirage_engine::coords::{Rect, Vec2};

use crate::constraints::{inset_rect, Constraints, Edges, LayoutCtx};
use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::widget::{Element, Widget};

/// Cross-axis alignment inside a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn main(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    fn cross(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.y,
            Axis::Vertical => v.x,
        }
    }

    fn pack(self, main: f32, cross: f32) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(main, cross),
            Axis::Vertical => Vec2::new(cross, main),
        }
    }
}

/// Children laid out in a line along one axis at their natural size.
struct Flex {
    axis: Axis,
    children: Vec<Element>,
    spacing: f32,
    padding: Edges,
    align: Align,
}

impl Flex {
    fn new(axis: Axis) -> Self {
        Self { axis, children: Vec::new(), spacing: 0.0, padding: Edges::default(), align: Align::Start }
    }

    fn child_constraints(&self, inner: Vec2) -> Constraints {
        // Unbounded along the main axis.
        Constraints::loose(self.axis.pack(f32::INFINITY, self.axis.cross(inner)))
    }

    fn content_size(&self, sizes: &[Vec2]) -> Vec2 {
        let gaps = sizes.len().saturating_sub(1) as f32 * self.spacing;
        let main: f32 = sizes.iter().map(|s| self.axis.main(*s)).sum::<f32>() + gaps;
        let cross = sizes.iter().map(|s| self.axis.cross(*s)).fold(0.0, f32::max);
        self.axis.pack(main, cross)
    }

    /// Child rects inside `rect`.
    fn layout(&self, rect: Rect, ctx: &LayoutCtx) -> Vec<Rect> {
        let inner = inset_rect(rect, self.padding);
        let child_c = self.child_constraints(inner.size);
        let cross_extent = self.axis.cross(inner.size);

        let mut cursor = self.axis.main(inner.origin);
        let cross_origin = self.axis.cross(inner.origin);
        self.children
            .iter()
            .map(|child| {
                let size = child.measure(child_c, ctx);
                let (main_len, cross_len) = (self.axis.main(size), self.axis.cross(size));
                let cross = match self.align {
                    Align::Start => cross_origin,
                    Align::Center => cross_origin + (cross_extent - cross_len) * 0.5,
                    Align::End => cross_origin + cross_extent - cross_len,
                };
                let origin = self.axis.pack(cursor, cross);
                cursor += main_len + self.spacing;
                Rect::from_origin_size(origin, size)
            })
            .collect()
    }

    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        let child_c = self.child_constraints(constraints.shrink(self.padding).max);
        let sizes: Vec<Vec2> = self.children.iter().map(|c| c.measure(child_c, ctx)).collect();
        let content = self.content_size(&sizes);
        constraints.constrain(Vec2::new(content.x + self.padding.h(), content.y + self.padding.v()))
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let rects = self.layout(rect, &painter.layout_ctx());
        for (child, r) in self.children.iter().zip(rects) {
            child.paint(painter, r);
        }
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &LayoutCtx) -> EventResult {
        let rects = self.layout(rect, ctx);
        for (child, r) in self.children.iter_mut().zip(rects) {
            if child.on_event(event, r, ctx).is_consumed() {
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }
}

macro_rules! flex_container {
    ($(#[$doc:meta])* $name:ident, $axis:expr) => {
        $(#[$doc])*
        pub struct $name(Flex);

        impl $name {
            pub fn new() -> Self {
                Self(Flex::new($axis))
            }

            pub fn spacing(mut self, v: f32) -> Self {
                self.0.spacing = v;
                self
            }

            pub fn padding(mut self, edges: Edges) -> Self {
                self.0.padding = edges;
                self
            }

            pub fn padding_all(mut self, v: f32) -> Self {
                self.0.padding = Edges::all(v);
                self
            }

            pub fn align(mut self, align: Align) -> Self {
                self.0.align = align;
                self
            }

            pub fn child(mut self, child: impl Into<Element>) -> Self {
                self.0.children.push(child.into());
                self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Widget for $name {
            fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
                self.0.measure(constraints, ctx)
            }

            fn paint(&self, painter: &mut Painter, rect: Rect) {
                self.0.paint(painter, rect)
            }

            fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &LayoutCtx) -> EventResult {
                self.0.on_event(event, rect, ctx)
            }
        }
    };
}

flex_container!(
    /// Children stacked top to bottom.
    Column,
    Axis::Vertical
);

flex_container!(
    /// Children placed left to right.
    Row,
    Axis::Horizontal
);

#[cfg(test)]
mod tests {
    use mirage_engine::text::FontSystem;

    use super::*;

    /// Fixed-size leaf.
    struct Block(Vec2);

    impl Widget for Block {
        fn measure(&self, constraints: Constraints, _ctx: &LayoutCtx) -> Vec2 {
            constraints.constrain(self.0)
        }
        fn paint(&self, _painter: &mut Painter, _rect: Rect) {}
    }

    #[test]
    fn row_places_children_with_spacing() {
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let row = Row::new()
            .spacing(10.0)
            .padding_all(5.0)
            .align(Align::Center)
            .child(Block(Vec2::new(40.0, 20.0)))
            .child(Block(Vec2::new(60.0, 40.0)));

        let size = row.measure(Constraints::loose(Vec2::new(800.0, 600.0)), &ctx);
        assert_eq!(size, Vec2::new(120.0, 50.0));

        let rects = row.0.layout(Rect::new(0.0, 0.0, 120.0, 50.0), &ctx);
        assert_eq!(rects[0], Rect::new(5.0, 15.0, 40.0, 20.0));
        assert_eq!(rects[1], Rect::new(55.0, 5.0, 60.0, 40.0));
    }

    #[test]
    fn column_stacks_downwards() {
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let col = Column::new()
            .spacing(4.0)
            .child(Block(Vec2::new(30.0, 10.0)))
            .child(Block(Vec2::new(50.0, 10.0)));

        let size = col.measure(Constraints::loose(Vec2::new(800.0, 600.0)), &ctx);
        assert_eq!(size, Vec2::new(50.0, 24.0));
        let rects = col.0.layout(Rect::new(100.0, 100.0, 50.0, 24.0), &ctx);
        assert_eq!(rects[1].origin, Vec2::new(100.0, 114.0));
    }
}
