/// GPU/surface initialisation parameters.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when one is offered.
    pub prefer_srgb: bool,

    /// `Fifo` (vsync) is available everywhere; `Immediate` or `Mailbox` can be
    /// requested for uncapped FPS and fall back to `Fifo` when unsupported.
    pub present_mode: wgpu::PresentMode,

    /// Used only when the surface supports it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Vsync on or off.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.present_mode = if vsync { wgpu::PresentMode::Fifo } else { wgpu::PresentMode::AutoNoVsync };
        self
    }
}
