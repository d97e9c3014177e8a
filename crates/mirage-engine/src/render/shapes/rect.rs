use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::shapes::rect::RectCmd;

use super::common::{
    create_viewport_ubo, shape_pipeline, viewport_layout_entry, write_viewport_ubo,
    GrowableBuffer, QuadVertex, UnitQuad,
};

/// Rectangle renderer: solid, optionally bordered, optionally rotated.
///
/// One instance per rect. The fragment shader evaluates a box distance in
/// the rect's own frame, so rotated edges are anti-aliased the same way as
/// axis-aligned ones.
pub struct RectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    quad: Option<UnitQuad>,

    instances: Vec<RectInstance>,
    instance_vbo: GrowableBuffer,
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            quad: None,
            instances: Vec::new(),
            instance_vbo: GrowableBuffer::new("mirage rect instance vbo"),
        }
    }
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the previous frame's instances.
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Appends one rect and returns the instance range it occupies
    /// (empty for degenerate rects).
    pub fn push(&mut self, cmd: &RectCmd) -> Range<u32> {
        let start = self.instances.len() as u32;
        let r = cmd.rect.normalized();
        if r.is_empty() || !r.is_finite() || (cmd.color.a <= 0.0 && cmd.border.is_none()) {
            return start..start;
        }

        let (sin, cos) = cmd.rotation.sin_cos();
        let (border_color, border_width) = match cmd.border {
            Some(b) => (b.color.to_array(), b.width.max(0.0)),
            None => ([0.0; 4], 0.0),
        };
        let center = r.center();
        self.instances.push(RectInstance {
            center: [center.x, center.y],
            half_size: [r.size.x * 0.5, r.size.y * 0.5],
            rot: [cos, sin],
            color: cmd.color.to_array(),
            border_color,
            border_width,
        });
        start..start + 1
    }

    /// Creates GPU resources on first use and uploads this frame's instances.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if self.instances.is_empty() {
            return;
        }
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        if self.quad.is_none() {
            self.quad = Some(UnitQuad::new(ctx, "mirage rect"));
        }
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            write_viewport_ubo(ctx, ubo);
        }
        self.instance_vbo.write(ctx, &self.instances);
    }

    /// Draws `range` of the uploaded instances into an open pass.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, range: Range<u32>) {
        if range.is_empty() {
            return;
        }
        let (Some(pipeline), Some(bind_group), Some(quad), Some(vbo)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.quad.as_ref(),
            self.instance_vbo.get(),
        ) else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        quad.bind(rpass);
        rpass.set_vertex_buffer(1, vbo.slice(..));
        rpass.draw_indexed(0..UnitQuad::INDEX_COUNT, 0, range);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mirage rect bgl"),
            entries: &[viewport_layout_entry()],
        });
        let pipeline = shape_pipeline(
            ctx,
            "mirage rect",
            include_str!("shaders/rect.wgsl"),
            &bind_group_layout,
            &[QuadVertex::layout(), RectInstance::layout()],
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

        let viewport_ubo = create_viewport_ubo(ctx, "mirage rect viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mirage rect bind group"),
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

/// Instance layout (60 bytes):
///
///  offset  0  center        [f32; 2]  loc 1
///  offset  8  half_size     [f32; 2]  loc 2
///  offset 16  rot (cos,sin) [f32; 2]  loc 3
///  offset 24  color         [f32; 4]  loc 4
///  offset 40  border_color  [f32; 4]  loc 5
///  offset 56  border_width  f32       loc 6
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    center: [f32; 2],
    half_size: [f32; 2],
    rot: [f32; 2],
    color: [f32; 4],
    border_color: [f32; 4],
    border_width: f32,
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;

    #[test]
    fn degenerate_rects_take_no_instances() {
        let mut r = RectRenderer::new();
        let range = r.push(&RectCmd::new(Rect::new(0.0, 0.0, 0.0, 10.0), Color::WHITE));
        assert!(range.is_empty());
        let range = r.push(&RectCmd::new(Rect::new(0.0, 0.0, 5.0, 10.0), Color::WHITE));
        assert_eq!(range, 0..1);
    }

    #[test]
    fn instance_is_centre_based() {
        let mut r = RectRenderer::new();
        r.push(&RectCmd { rotation: std::f32::consts::FRAC_PI_2, ..RectCmd::new(Rect::new(10.0, 20.0, 4.0, 2.0), Color::BLACK) });
        let inst = r.instances[0];
        assert_eq!(inst.center, [12.0, 21.0]);
        assert_eq!(inst.half_size, [2.0, 1.0]);
        assert!(inst.rot[0].abs() < 1e-6 && (inst.rot[1] - 1.0).abs() < 1e-6);
    }
}
