use std::ops::Range;

use crate::coords::Rect;
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

use super::shapes::circle::CircleRenderer;
use super::shapes::logical_clip_to_scissor;
use super::shapes::mesh::MeshRenderer;
use super::shapes::rect::RectRenderer;
use super::shapes::text::TextRenderer;
use super::shapes::triangles::TriangleRenderer;
use super::{RenderCtx, RenderTarget};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BatchKind {
    Rect,
    Circle,
    Triangles,
    Text,
    Mesh,
}

/// A run of consecutive draw items that one renderer can issue in one call.
#[derive(Debug, Clone, PartialEq)]
struct Batch {
    kind: BatchKind,
    range: Range<u32>,
    clip: Option<Rect>,
}

/// Appends `range`, extending the previous batch when it is the same
/// renderer, the same clip and directly adjacent. Mesh passes never merge.
fn push_batch(batches: &mut Vec<Batch>, kind: BatchKind, range: Range<u32>, clip: Option<Rect>) {
    if range.is_empty() {
        return;
    }
    if let Some(last) = batches.last_mut() {
        if kind != BatchKind::Mesh
            && last.kind == kind
            && last.clip == clip
            && last.range.end == range.start
        {
            last.range.end = range.end;
            return;
        }
    }
    batches.push(Batch { kind, range, clip });
}

/// Draws a whole [`DrawList`] in paint order.
///
/// Items are routed to the per-shape renderers, then replayed as batches so
/// that a ring pushed after a rect really lands on top of it. Consecutive 2D
/// batches share one render pass; every mesh command gets a pass of its own.
#[derive(Default)]
pub struct SceneRenderer {
    rects: RectRenderer,
    circles: CircleRenderer,
    triangles: TriangleRenderer,
    text: TextRenderer,
    meshes: MeshRenderer,
    batches: Vec<Batch>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        self.rects.clear();
        self.circles.clear();
        self.triangles.clear();
        self.text.clear();
        self.meshes.clear();
        self.batches.clear();

        for item in draw_list.iter_in_paint_order() {
            let (kind, range) = match &item.cmd {
                DrawCmd::Rect(cmd) => (BatchKind::Rect, self.rects.push(cmd)),
                DrawCmd::Circle(cmd) => (BatchKind::Circle, self.circles.push(cmd)),
                DrawCmd::Triangles(cmd) => (BatchKind::Triangles, self.triangles.push(cmd)),
                DrawCmd::Text(cmd) => (BatchKind::Text, self.text.push(ctx, fonts, cmd)),
                DrawCmd::Mesh(cmd) => (BatchKind::Mesh, self.meshes.push(ctx, cmd, item.clip_rect)),
            };
            push_batch(&mut self.batches, kind, range, item.clip_rect);
        }

        if self.batches.is_empty() {
            return;
        }

        self.rects.upload(ctx);
        self.circles.upload(ctx);
        self.triangles.upload(ctx);
        self.text.upload(ctx);
        self.meshes.upload(ctx);

        let mut i = 0;
        while i < self.batches.len() {
            if self.batches[i].kind == BatchKind::Mesh {
                self.meshes.encode(ctx, target, self.batches[i].range.start);
                i += 1;
                continue;
            }

            let end = self.batches[i..]
                .iter()
                .position(|b| b.kind == BatchKind::Mesh)
                .map_or(self.batches.len(), |p| i + p);
            self.encode_2d(ctx, target, i..end);
            i = end;
        }
    }

    fn encode_2d(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, batches: Range<usize>) {
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("mirage 2d pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for batch in &self.batches[batches] {
            let Some((sx, sy, sw, sh)) =
                logical_clip_to_scissor(batch.clip, ctx.viewport, ctx.scale_factor)
            else {
                continue;
            };
            rpass.set_scissor_rect(sx, sy, sw, sh);

            let range = batch.range.clone();
            match batch.kind {
                BatchKind::Rect => self.rects.draw(&mut rpass, range),
                BatchKind::Circle => self.circles.draw(&mut rpass, range),
                BatchKind::Triangles => self.triangles.draw(&mut rpass, range),
                BatchKind::Text => self.text.draw(&mut rpass, range),
                BatchKind::Mesh => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(batches: &[Batch]) -> Vec<(BatchKind, Range<u32>)> {
        batches.iter().map(|b| (b.kind, b.range.clone())).collect()
    }

    #[test]
    fn adjacent_same_kind_merges() {
        let mut b = Vec::new();
        push_batch(&mut b, BatchKind::Rect, 0..1, None);
        push_batch(&mut b, BatchKind::Rect, 1..2, None);
        push_batch(&mut b, BatchKind::Rect, 2..3, None);
        assert_eq!(kinds(&b), vec![(BatchKind::Rect, 0..3)]);
    }

    #[test]
    fn interleaved_kinds_keep_paint_order() {
        let mut b = Vec::new();
        push_batch(&mut b, BatchKind::Rect, 0..1, None);
        push_batch(&mut b, BatchKind::Circle, 0..1, None);
        push_batch(&mut b, BatchKind::Rect, 1..2, None);
        assert_eq!(
            kinds(&b),
            vec![(BatchKind::Rect, 0..1), (BatchKind::Circle, 0..1), (BatchKind::Rect, 1..2)]
        );
    }

    #[test]
    fn clip_change_splits_batch() {
        let mut b = Vec::new();
        push_batch(&mut b, BatchKind::Text, 0..4, None);
        push_batch(&mut b, BatchKind::Text, 4..9, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn empty_ranges_and_meshes() {
        let mut b = Vec::new();
        push_batch(&mut b, BatchKind::Rect, 3..3, None);
        assert!(b.is_empty());
        push_batch(&mut b, BatchKind::Mesh, 0..1, None);
        push_batch(&mut b, BatchKind::Mesh, 1..2, None);
        assert_eq!(b.len(), 2);
    }
}
