/// One acquired swapchain image plus the encoder recording into it.
///
/// Short-lived: holding the surface texture blocks the next acquisition, so
/// hand it back through `Gpu::submit` as soon as drawing is done.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
