use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Context;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    rendering::{
        global_uniform::{GlobalUniform, GlobalUniformState},
        imgui_renderer::ImguiRenderer,
        instance::{gather_instances, InstanceBuffer},
        render_model::RenderMesh,
        scene_pass::{ScenePass, ScenePassTextureViews},
        texture::RenderTarget,
    },
    scene_graph::{material::hex_to_linear, mesh_library::MeshId},
    viewer::ViewerState,
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    color_target: RenderTarget,
    depth_texture: RenderTarget,
    globals: GlobalUniform,
    scene_pass: ScenePass,
    instance_buffer: InstanceBuffer,
    render_meshes: HashMap<MeshId, RenderMesh>,

    imgui: ImguiRenderer,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        state: &ViewerState,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let color_target = RenderTarget::new(&device, size, surface_format, "Color Target");
        let depth_texture = RenderTarget::depth(&device, size);

        let globals = GlobalUniform::new(
            &device,
            GlobalUniformState::new(
                &state.camera,
                aspect_ratio(size),
                &state.scene.environment.lights,
            ),
        );

        let scene_pass = ScenePass::create(
            &device,
            surface_format,
            &globals,
            &state.scene.environment.grid,
        );
        let instance_buffer = InstanceBuffer::new(&device);
        let imgui = ImguiRenderer::new(&device, &queue, surface_format, imgui_context);

        log::info!("Renderer ready ({:?}, {:?})", adapter.get_info().backend, surface_format);

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            config,
            color_target,
            depth_texture,
            globals,
            scene_pass,
            instance_buffer,
            render_meshes: HashMap::new(),
            imgui,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.color_target.resize(&self.device, new_size);
            self.depth_texture.resize(&self.device, new_size);
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Uploads meshes new to the scene and releases the ones it dropped.
    fn sync_meshes(&mut self, state: &ViewerState) {
        let mut live = HashSet::new();

        for (id, mesh) in state.scene.meshes() {
            live.insert(id);
            if !self.render_meshes.contains_key(&id) {
                log::debug!("Uploading mesh {}", mesh.name);
                self.render_meshes
                    .insert(id, RenderMesh::from_mesh(&self.device, mesh));
            }
        }

        let before = self.render_meshes.len();
        self.render_meshes.retain(|id, _| live.contains(id));
        if self.render_meshes.len() < before {
            log::debug!("Released {} meshes", before - self.render_meshes.len());
        }
    }

    pub fn render(
        &mut self,
        state: &ViewerState,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.sync_meshes(state);

        self.globals.update(
            &self.queue,
            GlobalUniformState::new(
                &state.camera,
                aspect_ratio(self.size),
                &state.scene.environment.lights,
            ),
        );

        let (instances, batches) = gather_instances(&state.scene);
        self.instance_buffer
            .write(&self.device, &self.queue, &instances);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let background = hex_to_linear(state.scene.environment.background);
        let clear_color = wgpu::Color {
            r: background.x as f64,
            g: background.y as f64,
            b: background.z as f64,
            a: 1.0,
        };

        self.scene_pass.render(
            &ScenePassTextureViews {
                color: self.color_target.view(),
                resolve: &view,
                depth: self.depth_texture.view(),
            },
            &mut encoder,
            &self.globals,
            clear_color,
            |render_pass| {
                self.instance_buffer.bind(render_pass);

                for batch in &batches {
                    let Some(mesh) = self.render_meshes.get(&batch.mesh_id) else {
                        continue;
                    };

                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.num_indices, 0, batch.instances.clone());
                }
            },
        );

        self.imgui.render(
            &view,
            imgui_context,
            &self.device,
            &self.queue,
            &mut encoder,
        );

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}

fn aspect_ratio(size: PhysicalSize<u32>) -> f32 {
    size.width.max(1) as f32 / size.height.max(1) as f32
}
