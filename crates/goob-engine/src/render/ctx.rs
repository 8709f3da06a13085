use crate::coords::{Letterbox, Viewport};

/// Renderer-facing context for one frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Logical drawing space and where it sits on the surface.
    pub letterbox: Letterbox,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        letterbox: Letterbox,
    ) -> Self {
        Self { device, queue, surface_format, letterbox }
    }

    /// Logical size, in logical pixels.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.letterbox.logical()
    }

    /// Restricts `rpass` to the logical area of the surface.
    pub fn apply_viewport(&self, rpass: &mut wgpu::RenderPass<'_>) {
        let r = self.letterbox.physical_rect();
        rpass.set_viewport(r.origin.x, r.origin.y, r.size.x.max(1.0), r.size.y.max(1.0), 0.0, 1.0);
    }
}

/// Where to draw: the frame's encoder and colour view.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }

    /// Begins a pass that draws over the existing contents.
    pub fn begin_load_pass(&mut self, label: &str) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
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
        })
    }
}
