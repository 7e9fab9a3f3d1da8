/// Parameters for opening the GPU device that presents the engine surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB swapchain so the surface's sRGB bytes come out unchanged.
    pub prefer_srgb: bool,

    /// Swap behaviour. FIFO is vsync and available everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Requested alpha mode; an unsupported request falls back to the first supported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Latency hint for the swapchain.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
