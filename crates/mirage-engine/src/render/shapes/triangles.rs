use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::shapes::triangles::TrianglesCmd;

use super::common::{
    create_viewport_ubo, shape_pipeline, viewport_layout_entry, write_viewport_ubo,
    GrowableBuffer,
};

/// Renderer for `DrawCmd::Triangles`: flat-coloured triangle lists.
///
/// Unlike the instanced renderers, vertices are streamed as-is; the ranges
/// handed out are vertex ranges.
pub struct TriangleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    vertices: Vec<TriangleVertex>,
    vbo: GrowableBuffer,
}

impl Default for TriangleRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            vertices: Vec::new(),
            vbo: GrowableBuffer::new("mirage triangle vbo"),
        }
    }
}

impl TriangleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn push(&mut self, cmd: &TrianglesCmd) -> Range<u32> {
        let start = self.vertices.len() as u32;
        let color = cmd.color.to_array();
        self.vertices.extend(
            cmd.vertices
                .iter()
                .map(|p| TriangleVertex { pos: [p.x, p.y], color }),
        );
        start..self.vertices.len() as u32
    }

    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if self.vertices.is_empty() {
            return;
        }
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            write_viewport_ubo(ctx, ubo);
        }
        self.vbo.write(ctx, &self.vertices);
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, range: Range<u32>) {
        if range.is_empty() {
            return;
        }
        let (Some(pipeline), Some(bind_group), Some(vbo)) =
            (self.pipeline.as_ref(), self.bind_group.as_ref(), self.vbo.get())
        else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(range, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mirage triangle bgl"),
            entries: &[viewport_layout_entry()],
        });
        let pipeline = shape_pipeline(
            ctx,
            "mirage triangle",
            include_str!("shaders/triangles.wgsl"),
            &bind_group_layout,
            &[TriangleVertex::layout()],
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = create_viewport_ubo(ctx, "mirage triangle viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mirage triangle bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TriangleVertex {
    pos: [f32; 2],
    color: [f32; 4],
}

impl TriangleVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TriangleVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    #[test]
    fn ranges_are_consecutive_vertex_spans() {
        let mut r = TriangleRenderer::new();
        let tri = TrianglesCmd {
            vertices: vec![Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
            color: Color::BLACK,
        };
        assert_eq!(r.push(&tri), 0..3);
        assert_eq!(r.push(&tri), 3..6);
        r.clear();
        assert_eq!(r.push(&tri), 0..3);
    }
}
