use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, Weak};

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::shapes::mesh::{Mesh, MeshCmd, MeshVertex, SurfacePattern};

use super::common::logical_clip_to_scissor;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Renderer for `DrawCmd::Mesh`.
///
/// Every command becomes its own render pass with a cleared depth buffer,
/// restricted to the command's rect. Scene and per-draw parameters live in two
/// uniform buffers addressed with dynamic offsets, so any number of passes
/// and draws share one bind group.
///
/// GPU copies of meshes are keyed by `Arc` identity and dropped once the last
/// strong reference on the CPU side goes away.
pub struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,

    depth: Option<(wgpu::TextureView, (u32, u32))>,

    scene_ubo: UniformArray<SceneUniform>,
    draw_ubo: UniformArray<DrawUniform>,

    meshes: HashMap<*const Mesh, GpuMesh>,
    passes: Vec<PreparedPass>,
}

struct GpuMesh {
    source: Weak<Mesh>,
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

struct PreparedPass {
    rect: Rect,
    clip: Option<Rect>,
    scene_slot: u32,
    draws: Vec<(*const Mesh, u32)>,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            depth: None,
            scene_ubo: UniformArray::new("mirage mesh scene ubo"),
            draw_ubo: UniformArray::new("mirage mesh draw ubo"),
            meshes: HashMap::new(),
            passes: Vec::new(),
        }
    }
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops last frame's passes and GPU meshes nobody references any more.
    pub fn clear(&mut self) {
        self.passes.clear();
        self.scene_ubo.clear();
        self.draw_ubo.clear();
        let before = self.meshes.len();
        self.meshes.retain(|_, m| m.source.strong_count() > 0);
        if self.meshes.len() != before {
            log::debug!("evicted {} GPU meshes", before - self.meshes.len());
        }
    }

    /// Records a pass and returns its index as a one-element range.
    pub fn push(&mut self, ctx: &RenderCtx<'_>, cmd: &MeshCmd, clip: Option<Rect>) -> Range<u32> {
        let index = self.passes.len() as u32;
        if cmd.rect.is_empty() || cmd.draws.is_empty() {
            return index..index;
        }

        let scene_slot = self.scene_ubo.push(SceneUniform::from_cmd(cmd));
        let mut draws = Vec::with_capacity(cmd.draws.len());
        for draw in &cmd.draws {
            let key = Arc::as_ptr(&draw.mesh);
            self.meshes
                .entry(key)
                .or_insert_with(|| GpuMesh::upload(ctx, &draw.mesh));
            let m = &draw.material;
            let slot = self.draw_ubo.push(DrawUniform {
                translation: draw.translation.extend(1.0).to_array(),
                base_color: straight(m.base_color),
                emissive: {
                    let [r, g, b] = m.emissive.to_linear_rgb();
                    let k = m.emissive_intensity;
                    [r * k, g * k, b * k, 0.0]
                },
                pattern: [pattern_id(m.pattern), m.uv_repeat[0], m.uv_repeat[1], 0.0],
            });
            draws.push((key, slot));
        }

        self.passes.push(PreparedPass { rect: cmd.rect, clip, scene_slot, draws });
        index..index + 1
    }

    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if self.passes.is_empty() {
            return;
        }
        self.ensure_pipeline(ctx);
        self.ensure_depth(ctx);

        let align = ctx.device.limits().min_uniform_buffer_offset_alignment;
        let grew = self.scene_ubo.write(ctx, align) | self.draw_ubo.write(ctx, align);
        if grew {
            self.bind_group = None;
        }
        self.ensure_bindings(ctx);
    }

    /// Encodes pass `index` as its own render pass over `target`.
    pub fn encode(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, index: u32) {
        let Some(pass) = self.passes.get(index as usize) else { return };
        let (Some(pipeline), Some(bind_group), Some((depth_view, _))) =
            (self.pipeline.as_ref(), self.bind_group.as_ref(), self.depth.as_ref())
        else {
            return;
        };

        let region = match pass.clip {
            Some(clip) => clip.intersect(pass.rect),
            None => Some(pass.rect),
        };
        let Some((sx, sy, sw, sh)) = region
            .and_then(|r| logical_clip_to_scissor(Some(r), ctx.viewport, ctx.scale_factor))
        else {
            return;
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("mirage mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        // The projection maps onto the whole rect; the scissor trims whatever
        // the clip hides.
        let s = ctx.scale_factor;
        rpass.set_viewport(
            pass.rect.origin.x * s,
            pass.rect.origin.y * s,
            pass.rect.size.x * s,
            pass.rect.size.y * s,
            0.0,
            1.0,
        );
        rpass.set_scissor_rect(sx, sy, sw, sh);
        rpass.set_pipeline(pipeline);

        let scene_offset = self.scene_ubo.offset(pass.scene_slot);
        for &(key, slot) in &pass.draws {
            let Some(mesh) = self.meshes.get(&key) else { continue };
            rpass.set_bind_group(0, bind_group, &[scene_offset, self.draw_ubo.offset(slot)]);
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mirage mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let uniform_entry = |binding: u32, size: usize| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(size as u64),
            },
            count: None,
        };
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mirage mesh bgl"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<SceneUniform>()),
                uniform_entry(1, std::mem::size_of::<DrawUniform>()),
            ],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mirage mesh pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3, // position
            1 => Float32x3, // normal
            2 => Float32x2  // uv
        ];

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mirage mesh pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &ATTRS,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Room faces are seen from inside; both sides are lit.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
    }

    fn ensure_depth(&mut self, ctx: &RenderCtx<'_>) {
        let size = (ctx.physical_size.0.max(1), ctx.physical_size.1.max(1));
        if matches!(&self.depth, Some((_, s)) if *s == size) {
            return;
        }
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("mirage mesh depth"),
            size: wgpu::Extent3d { width: size.0, height: size.1, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth = Some((view, size));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let (Some(bgl), Some(scene), Some(draw)) =
            (self.bind_group_layout.as_ref(), self.scene_ubo.buffer(), self.draw_ubo.buffer())
        else {
            return;
        };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mirage mesh bind group"),
            layout: bgl,
            entries: &[
                buffer_entry(0, scene, std::mem::size_of::<SceneUniform>()),
                buffer_entry(1, draw, std::mem::size_of::<DrawUniform>()),
            ],
        }));
    }
}

fn buffer_entry(binding: u32, buffer: &wgpu::Buffer, size: usize) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry {
        binding,
        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer,
            offset: 0,
            size: wgpu::BufferSize::new(size as u64),
        }),
    }
}

impl GpuMesh {
    fn upload(ctx: &RenderCtx<'_>, mesh: &Arc<Mesh>) -> Self {
        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mirage mesh vbo"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mirage mesh ibo"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            source: Arc::downgrade(mesh),
            vbo,
            ibo,
            index_count: mesh.indices.len() as u32,
        }
    }
}

// ── uniform arrays ────────────────────────────────────────────────────────

/// CPU staging + GPU buffer for an array of uniforms addressed by dynamic
/// offset. Elements are laid out at the device's offset alignment.
struct UniformArray<T: Pod> {
    label: &'static str,
    items: Vec<T>,
    buffer: Option<wgpu::Buffer>,
    capacity_bytes: u64,
    stride: u64,
}

impl<T: Pod> UniformArray<T> {
    const fn new(label: &'static str) -> Self {
        Self { label, items: Vec::new(), buffer: None, capacity_bytes: 0, stride: 0 }
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn push(&mut self, item: T) -> u32 {
        self.items.push(item);
        (self.items.len() - 1) as u32
    }

    fn offset(&self, slot: u32) -> u32 {
        (slot as u64 * self.stride) as u32
    }

    fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Uploads all items; returns `true` when the buffer was reallocated.
    fn write(&mut self, ctx: &RenderCtx<'_>, align: u32) -> bool {
        let size = std::mem::size_of::<T>() as u64;
        self.stride = size.div_ceil(align as u64) * align as u64;

        let needed = self.stride * self.items.len().max(1) as u64;
        let mut grew = false;
        if needed > self.capacity_bytes || self.buffer.is_none() {
            let cap = needed.next_power_of_two().max(self.stride * 8);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: cap,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity_bytes = cap;
            grew = true;
        }

        let mut staging = vec![0u8; needed as usize];
        for (i, item) in self.items.iter().enumerate() {
            let at = i * self.stride as usize;
            staging[at..at + size as usize].copy_from_slice(bytemuck::bytes_of(item));
        }
        if let Some(buffer) = self.buffer.as_ref() {
            ctx.queue.write_buffer(buffer, 0, &staging);
        }
        grew
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SceneUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    fog_color: [f32; 4],    // rgb, w = enabled
    fog_range: [f32; 4],    // near, far
    light_levels: [f32; 4], // ambient, hemisphere, point, point range
    hemi_sky: [f32; 4],
    hemi_ground: [f32; 4],
    point_position: [f32; 4],
    directional: [f32; 4],  // direction towards the light, w = intensity
}

impl SceneUniform {
    fn from_cmd(cmd: &MeshCmd) -> Self {
        let l = &cmd.lighting;
        let (fog_color, fog_range) = match cmd.fog {
            Some(f) => {
                let [r, g, b] = f.color.to_linear_rgb();
                ([r, g, b, 1.0], [f.near, f.far.max(f.near + 1e-3), 0.0, 0.0])
            }
            None => ([0.0; 4], [0.0, 1.0, 0.0, 0.0]),
        };
        Self {
            view_proj: cmd.view_proj.to_cols_array_2d(),
            eye: cmd.eye.extend(1.0).to_array(),
            fog_color,
            fog_range,
            light_levels: [
                l.ambient,
                l.hemisphere_intensity,
                l.point_intensity,
                l.point_range.max(1e-3),
            ],
            hemi_sky: straight(l.hemisphere_sky),
            hemi_ground: straight(l.hemisphere_ground),
            point_position: l.point_position.extend(1.0).to_array(),
            directional: l
                .directional_from
                .normalize_or_zero()
                .extend(l.directional_intensity)
                .to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DrawUniform {
    translation: [f32; 4],
    base_color: [f32; 4],
    emissive: [f32; 4],
    pattern: [f32; 4], // id, repeat u, repeat v
}

fn straight(c: crate::paint::Color) -> [f32; 4] {
    let [r, g, b] = c.to_linear_rgb();
    [r, g, b, 1.0]
}

fn pattern_id(p: SurfacePattern) -> f32 {
    match p {
        SurfacePattern::Plain => 0.0,
        SurfacePattern::Wood => 1.0,
        SurfacePattern::Plaster => 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::scene::shapes::mesh::{Fog, Lighting};
    use glam::{Mat4, Vec3};

    #[test]
    fn uniform_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<DrawUniform>() % 16, 0);
    }

    #[test]
    fn scene_uniform_carries_fog_and_lights() {
        let cmd = MeshCmd {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            view_proj: Mat4::IDENTITY,
            eye: Vec3::new(1.0, 2.0, 3.0),
            lighting: Lighting {
                directional_from: Vec3::new(0.0, 10.0, 0.0),
                directional_intensity: 0.5,
                ..Lighting::default()
            },
            fog: Some(Fog { color: Color::WHITE, near: 10.0, far: 50.0 }),
            draws: Vec::new(),
        };
        let u = SceneUniform::from_cmd(&cmd);
        assert_eq!(u.eye, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.fog_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(u.fog_range[..2], [10.0, 50.0]);
        assert_eq!(u.directional, [0.0, 1.0, 0.0, 0.5]);
    }
}
