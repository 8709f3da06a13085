use crate::paint::Color;

/// One acquired surface frame.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// frame. Hand it back through `Gpu::submit`.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Records a pass that clears the whole surface to `color`.
    pub fn clear(&mut self, color: Color) {
        let _rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("goob clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
}

/// What the caller should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface reconfigured; try again next frame.
    Reconfigured,
    /// Transient; drop this frame.
    SkipFrame,
    /// Unrecoverable (out of memory); shut down.
    Fatal,
}
