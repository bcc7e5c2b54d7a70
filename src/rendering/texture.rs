use winit::dpi::PhysicalSize;

/// Samples per pixel of the scene pass; the color target is resolved into the
/// swapchain image.
pub const SAMPLE_COUNT: u32 = 4;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A multisampled render target that follows the window size.
pub struct RenderTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    label: String,
}

impl RenderTarget {
    pub fn new(
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        format: wgpu::TextureFormat,
        label: impl Into<String>,
    ) -> Self {
        let label: String = label.into();
        let texture = Self::create_wgpu_texture(device, size, format, &label);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        RenderTarget {
            _texture: texture,
            view,
            format,
            label,
        }
    }

    /// Depth buffer for the scene pass.
    pub fn depth(device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        Self::new(device, size, DEPTH_FORMAT, "Depth Texture")
    }

    fn create_wgpu_texture(
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: SAMPLE_COUNT,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        let label = std::mem::take(&mut self.label);
        *self = Self::new(device, size, self.format, label);
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_pass_is_multisampled() {
        assert!(SAMPLE_COUNT > 1 && SAMPLE_COUNT.is_power_of_two());
        assert!(DEPTH_FORMAT.has_depth_aspect());
    }
}
