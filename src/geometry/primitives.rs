use std::f32::consts::TAU;

use glam::Vec3;

use super::{MeshData, Vertex};

// (normal, u, v) with u x v == normal so quads wind counter-clockwise from outside.
const BOX_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

pub fn generate_box(size: Vec3) -> MeshData {
    let half = size * 0.5;
    let mut mesh = MeshData::default();

    for (normal, u, v) in BOX_FACES {
        let base = mesh.vertices.len() as u32;
        let center = normal * half;
        let u = u * half;
        let v = v * half;

        for corner in [center - u - v, center + u - v, center + u + v, center - u + v] {
            mesh.vertices.push(Vertex::new(corner, normal));
        }

        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> MeshData {
    let mut mesh = MeshData::default();
    let half_height = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    // Side wall: row 0 is the top ring, row 1 the bottom ring.
    for (y, radius) in [(half_height, radius_top), (-half_height, radius_bottom)] {
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.vertices.push(Vertex::new(
                Vec3::new(radius * sin, y, radius * cos),
                Vec3::new(sin, slope, cos).normalize(),
            ));
        }
    }

    let row = radial_segments + 1;
    for x in 0..radial_segments {
        let a = x;
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    generate_cylinder_cap(&mut mesh, half_height, radius_top, radial_segments, true);
    generate_cylinder_cap(&mut mesh, -half_height, radius_bottom, radial_segments, false);

    mesh
}

fn generate_cylinder_cap(mesh: &mut MeshData, y: f32, radius: f32, radial_segments: u32, top: bool) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal));

    for x in 0..=radial_segments {
        let theta = x as f32 / radial_segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices
            .push(Vertex::new(Vec3::new(radius * sin, y, radius * cos), normal));
    }

    for x in 0..radial_segments {
        let current = center + 1 + x;
        let next = current + 1;
        if top {
            mesh.indices.extend_from_slice(&[center, current, next]);
        } else {
            mesh.indices.extend_from_slice(&[center, next, current]);
        }
    }
}

pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> MeshData {
    let mut mesh = MeshData::default();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let ring = radius + tube * v.cos();
            let position = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.vertices
                .push(Vertex::new(position, (position - center).normalize_or_zero()));
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

pub fn generate_plane(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);

    MeshData {
        vertices: vec![
            Vertex::new(Vec3::new(-hw, hh, 0.0), Vec3::Z),
            Vertex::new(Vec3::new(hw, hh, 0.0), Vec3::Z),
            Vertex::new(Vec3::new(-hw, -hh, 0.0), Vec3::Z),
            Vertex::new(Vec3::new(hw, -hh, 0.0), Vec3::Z),
        ],
        indices: vec![0, 2, 1, 2, 3, 1],
    }
}
