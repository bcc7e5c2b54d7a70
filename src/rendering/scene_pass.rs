use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;
use wgpu::{
    DepthBiasState, MultisampleState, PipelineCompilationOptions, RenderPass,
    RenderPassDescriptor, ShaderSource, StencilState,
};

use crate::rendering::global_uniform::GlobalUniform;
use crate::rendering::instance::Instance;
use crate::rendering::render_model::MESH_VERTEX_LAYOUT;
use crate::rendering::texture::{DEPTH_FORMAT, SAMPLE_COUNT};
use crate::scene_graph::environment::GridHelper;
use crate::scene_graph::material::hex_to_linear;

const SCENE_SHADER: &str = include_str!("../shaders/scene.wgsl");
const GRID_SHADER: &str = include_str!("../shaders/grid.wgsl");
const GRID_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct LineVertex {
    position: Vec3,
    color: Vec3,
}

pub struct ScenePassTextureViews<'a> {
    /// Multisampled color target.
    pub color: &'a wgpu::TextureView,
    /// Single-sampled image the color target resolves into.
    pub resolve: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

/// Lit equipment meshes followed by the reference grid, in one depth-tested pass.
pub struct ScenePass {
    mesh_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    grid_vertices: wgpu::Buffer,
    grid_vertex_count: u32,
}

impl ScenePass {
    pub fn create(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        globals: &GlobalUniform,
        grid: &GridHelper,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene pipeline layout"),
            bind_group_layouts: &[&globals.bind_group_layout],
            push_constant_ranges: &[],
        });

        let mesh_pipeline = create_pipeline(
            device,
            &layout,
            format,
            PipelineSettings {
                label: "Mesh pipeline",
                source: SCENE_SHADER,
                buffers: &[MESH_VERTEX_LAYOUT, Instance::descriptor()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        let grid_layout = wgpu::VertexBufferLayout {
            array_stride: size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &GRID_ATTRIBUTES,
        };

        let grid_pipeline = create_pipeline(
            device,
            &layout,
            format,
            PipelineSettings {
                label: "Grid pipeline",
                source: GRID_SHADER,
                buffers: &[grid_layout],
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                // The grid shares the ground's plane.
                depth_compare: wgpu::CompareFunction::LessEqual,
            },
        );

        let line_vertices: Vec<LineVertex> = grid
            .lines()
            .into_iter()
            .flat_map(|(start, end, color)| {
                let color = hex_to_linear(color);
                [
                    LineVertex {
                        position: start,
                        color,
                    },
                    LineVertex {
                        position: end,
                        color,
                    },
                ]
            })
            .collect();

        let grid_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid vertex buffer"),
            contents: bytemuck::cast_slice(&line_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            mesh_pipeline,
            grid_pipeline,
            grid_vertices,
            grid_vertex_count: line_vertices.len() as u32,
        }
    }

    /// Clears the targets, lets `draw_meshes` record mesh draws with the mesh
    /// pipeline bound, then draws the grid on top.
    pub fn render<F>(
        &self,
        texture_views: &ScenePassTextureViews,
        encoder: &mut wgpu::CommandEncoder,
        globals: &GlobalUniform,
        clear_color: wgpu::Color,
        draw_meshes: F,
    ) where
        F: FnOnce(&mut RenderPass),
    {
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: texture_views.color,
                resolve_target: Some(texture_views.resolve),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Discard,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, &globals.bind_group, &[]);

        render_pass.set_pipeline(&self.mesh_pipeline);
        draw_meshes(&mut render_pass);

        render_pass.set_pipeline(&self.grid_pipeline);
        render_pass.set_vertex_buffer(0, self.grid_vertices.slice(..));
        render_pass.draw(0..self.grid_vertex_count, 0..1);
    }
}

struct PipelineSettings<'a> {
    label: &'a str,
    source: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    depth_compare: wgpu::CompareFunction,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    settings: PipelineSettings,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(settings.label),
        source: ShaderSource::Wgsl(settings.source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(settings.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: settings.buffers,
            compilation_options: PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: settings.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: settings.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: settings.depth_compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState {
            count: SAMPLE_COUNT,
            ..Default::default()
        },
        multiview: None,
        cache: None,
    })
}
