//! Procedural primitive meshes.
//!
//! Conventions match the usual scene-graph libraries so that placement code
//! can be written in their terms: boxes are centered on the origin, cylinders
//! run along +Y, tori lie in the XY plane around +Z and planes face +Z.

mod primitives;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Cylinder,
    Torus,
    Plane,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
}

/// Exact identity of a shape, including NaN payloads, usable as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeKey(ShapeKind, [u32; 4]);

impl Shape {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Shape::Box {
            width,
            height,
            depth,
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }
    }

    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        Shape::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Shape::Plane { width, height }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Box { .. } => ShapeKind::Box,
            Shape::Cylinder { .. } => ShapeKind::Cylinder,
            Shape::Torus { .. } => ShapeKind::Torus,
            Shape::Plane { .. } => ShapeKind::Plane,
        }
    }

    pub fn key(&self) -> ShapeKey {
        let params = match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => [width.to_bits(), height.to_bits(), depth.to_bits(), 0],
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => [
                radius_top.to_bits(),
                radius_bottom.to_bits(),
                height.to_bits(),
                radial_segments,
            ],
            Shape::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => [
                radius.to_bits(),
                tube.to_bits(),
                radial_segments,
                tubular_segments,
            ],
            Shape::Plane { width, height } => [width.to_bits(), height.to_bits(), 0, 0],
        };

        ShapeKey(self.kind(), params)
    }

    pub fn label(&self) -> String {
        match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => format!("Box {width}x{height}x{depth}"),
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => format!("Cylinder r{radius_top}/{radius_bottom} h{height} ({radial_segments})"),
            Shape::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => format!("Torus r{radius} t{tube} ({radial_segments}x{tubular_segments})"),
            Shape::Plane { width, height } => format!("Plane {width}x{height}"),
        }
    }

    pub fn generate(&self) -> MeshData {
        match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => primitives::generate_box(Vec3::new(width, height, depth)),
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => primitives::generate_cylinder(radius_top, radius_bottom, height, radial_segments),
            Shape::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => primitives::generate_torus(radius, tube, radial_segments, tubular_segments),
            Shape::Plane { width, height } => primitives::generate_plane(width, height),
        }
    }
}
