use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::camera::OrbitCamera;
use crate::scene_graph::environment::LightRig;
use crate::scene_graph::material::hex_to_linear;

/// Per-frame camera and lighting state shared by every pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalUniformState {
    view_proj: Mat4,
    eye: Vec4,
    ambient: Vec4,
    sky: Vec4,
    ground: Vec4,
    sun_color: Vec4,
    sun_direction: Vec4,
}

impl GlobalUniformState {
    pub fn new(camera: &OrbitCamera, aspect_ratio: f32, lights: &LightRig) -> Self {
        let scaled = |color: u32, intensity: f32| (hex_to_linear(color) * intensity).extend(1.0);
        let sun_direction = lights
            .directional
            .position
            .try_normalize()
            .unwrap_or(Vec3::Y);

        Self {
            view_proj: camera.view_proj(aspect_ratio),
            eye: camera.eye().extend(1.0),
            ambient: scaled(lights.ambient.color, lights.ambient.intensity),
            sky: scaled(lights.hemisphere.sky_color, lights.hemisphere.intensity),
            ground: scaled(lights.hemisphere.ground_color, lights.hemisphere.intensity),
            sun_color: scaled(lights.directional.color, lights.directional.intensity),
            sun_direction: sun_direction.extend(0.0),
        }
    }
}

pub struct GlobalUniform {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl GlobalUniform {
    pub fn new(device: &wgpu::Device, initial_state: GlobalUniformState) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global uniform buffer"),
            contents: bytemuck::cast_slice(&[initial_state]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global uniform bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, state: GlobalUniformState) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[state]));
    }
}
