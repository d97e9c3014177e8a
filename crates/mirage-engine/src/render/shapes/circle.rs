use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::paint::Paint;
use crate::render::RenderCtx;
use crate::scene::shapes::circle::CircleCmd;

use super::common::{
    create_viewport_ubo, shape_pipeline, viewport_layout_entry, write_viewport_ubo,
    GrowableBuffer, QuadVertex, UnitQuad,
};

const MODE_SOLID: f32 = 0.0;
const MODE_HUE_WHEEL: f32 = 1.0;

/// Renderer for `DrawCmd::Circle`: discs, rings and hue-wheel rings.
///
/// Supported paints:
/// - `Paint::Solid`
/// - `Paint::HueWheel`, evaluated per fragment so the wheel can spin
///   without rebuilding geometry
///
/// Borders are rendered as an AA band on the outer edge.
pub struct CircleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    quad: Option<UnitQuad>,

    instances: Vec<CircleInstance>,
    instance_vbo: GrowableBuffer,
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            quad: None,
            instances: Vec::new(),
            instance_vbo: GrowableBuffer::new("mirage circle instance vbo"),
        }
    }
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Appends one circle/ring and returns its instance range.
    pub fn push(&mut self, cmd: &CircleCmd) -> Range<u32> {
        let start = self.instances.len() as u32;
        if cmd.radius <= 0.0 || !cmd.center.is_finite() || cmd.inner_radius >= cmd.radius {
            return start..start;
        }

        let (color, mode, rotation) = match cmd.paint {
            Paint::Solid(c) => (c.to_array(), MODE_SOLID, 0.0),
            Paint::HueWheel { rotation } => ([1.0; 4], MODE_HUE_WHEEL, rotation),
        };
        let (border_color, border_width) = match cmd.border {
            Some(b) => (b.color.to_array(), b.width.max(0.0)),
            None => ([0.0; 4], 0.0),
        };

        self.instances.push(CircleInstance {
            center: [cmd.center.x, cmd.center.y],
            radii: [cmd.radius, cmd.inner_radius.max(0.0)],
            color,
            border_color,
            params: [border_width, mode, rotation, 0.0],
        });
        start..start + 1
    }

    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if self.instances.is_empty() {
            return;
        }
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        if self.quad.is_none() {
            self.quad = Some(UnitQuad::new(ctx, "mirage circle"));
        }
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            write_viewport_ubo(ctx, ubo);
        }
        self.instance_vbo.write(ctx, &self.instances);
    }

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
            label: Some("mirage circle bgl"),
            entries: &[viewport_layout_entry()],
        });
        let pipeline = shape_pipeline(
            ctx,
            "mirage circle",
            include_str!("shaders/circle.wgsl"),
            &bind_group_layout,
            &[QuadVertex::layout(), CircleInstance::layout()],
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

        let viewport_ubo = create_viewport_ubo(ctx, "mirage circle viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mirage circle bind group"),
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

/// Instance layout (64 bytes):
///
///  offset  0  center        [f32; 2]  loc 1
///  offset  8  radii         [f32; 2]  loc 2  (outer, inner)
///  offset 16  color         [f32; 4]  loc 3
///  offset 32  border_color  [f32; 4]  loc 4
///  offset 48  params        [f32; 4]  loc 5  (border width, mode, hue rotation, -)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CircleInstance {
    center: [f32; 2],
    radii: [f32; 2],
    color: [f32; 4],
    border_color: [f32; 4],
    params: [f32; 4],
}

impl CircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
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
    fn hue_wheel_sets_mode_and_rotation() {
        let mut r = CircleRenderer::new();
        let mut cmd = CircleCmd::new(Vec2::new(5.0, 5.0), 10.0, Paint::HueWheel { rotation: 0.25 }, None);
        cmd.inner_radius = 5.0;
        assert_eq!(r.push(&cmd), 0..1);
        assert_eq!(r.instances[0].params[1], MODE_HUE_WHEEL);
        assert_eq!(r.instances[0].params[2], 0.25);
        assert_eq!(r.instances[0].radii, [10.0, 5.0]);
    }

    #[test]
    fn inverted_ring_is_skipped() {
        let mut r = CircleRenderer::new();
        let mut cmd = CircleCmd::new(Vec2::zero(), 4.0, Paint::Solid(Color::BLACK), None);
        cmd.inner_radius = 4.0;
        assert!(r.push(&cmd).is_empty());
    }
}
