use std::ops::Range;

use glam::{Mat4, Vec4};
use itertools::Itertools;
use wgpu::BufferUsages;

use crate::scene_graph::mesh_library::MeshId;
use crate::scene_graph::scene::Scene;

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub model: Mat4,
    pub color: Vec4,
    /// x: metalness, y: roughness.
    pub surface: Vec4,
}

impl Instance {
    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
        ];

        wgpu::VertexBufferLayout {
            array_stride: size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// A run of instances in the instance buffer that share one mesh.
#[derive(Debug, Clone)]
pub struct DrawBatch {
    pub mesh_id: MeshId,
    pub instances: Range<u32>,
}

/// Flattens the scene into one instance list, grouped by mesh.
pub fn gather_instances(scene: &Scene) -> (Vec<Instance>, Vec<DrawBatch>) {
    let mut visuals = Vec::new();
    scene.visit_visuals(|visual, world_matrix| {
        let instance = Instance {
            model: world_matrix,
            color: visual.material.linear_color().extend(1.0),
            surface: Vec4::new(visual.material.metalness, visual.material.roughness, 0.0, 0.0),
        };
        visuals.push((visual.mesh_id, instance));
    });

    let mut instances = Vec::with_capacity(visuals.len());
    let mut batches = Vec::new();

    for (mesh_id, group) in visuals.into_iter().into_group_map() {
        let start = instances.len() as u32;
        instances.extend(group);
        batches.push(DrawBatch {
            mesh_id,
            instances: start..instances.len() as u32,
        });
    }

    (instances, batches)
}

/// Per-frame instance storage; grows to the largest frame seen so far.
pub struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl InstanceBuffer {
    const INITIAL_CAPACITY: u64 = 1024;

    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            buffer: Self::create_buffer(device, Self::INITIAL_CAPACITY),
            capacity: Self::INITIAL_CAPACITY,
        }
    }

    fn create_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance buffer"),
            size: size_of::<Instance>() as u64 * capacity,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[Instance]) {
        let needed = instances.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buffer = Self::create_buffer(device, self.capacity);
            log::debug!("Instance buffer grown to {} instances", self.capacity);
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(1, self.buffer.slice(..));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_layout;

    #[test]
    fn batches_cover_every_visual_exactly_once() {
        let mut scene = Scene::new();
        scene.load(&default_layout());

        let mut visuals = 0;
        scene.visit_visuals(|_, _| visuals += 1);

        let (instances, batches) = gather_instances(&scene);
        assert_eq!(instances.len(), visuals);

        let mut covered: Vec<_> = batches.iter().map(|batch| batch.instances.clone()).collect();
        covered.sort_by_key(|range| range.start);
        assert_eq!(covered.first().map(|range| range.start), Some(0));
        for pair in covered.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(covered.last().map(|range| range.end), Some(visuals as u32));

        let mesh_ids: Vec<_> = batches.iter().map(|batch| batch.mesh_id).unique().collect();
        assert_eq!(mesh_ids.len(), batches.len());
    }

    #[test]
    fn empty_scene_still_draws_the_ground() {
        let scene = Scene::new();
        let (instances, batches) = gather_instances(&scene);
        assert_eq!(instances.len(), 1);
        assert_eq!(batches.len(), 1);
    }
}
