use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::geometry::Shape;
use crate::scene_graph::material;
use crate::scene_graph::mesh_library::MeshLibrary;
use crate::scene_graph::object3d::Object3D;

pub const BACKGROUND_COLOR: u32 = 0xf0f0f0;
const FLOOR_SIZE: f32 = 50.0;

#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: u32,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f32,
    /// The light shines from this point towards the origin.
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct HemisphereLight {
    pub sky_color: u32,
    pub ground_color: u32,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub hemisphere: HemisphereLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: 0xffffff,
                intensity: 0.6,
            },
            directional: DirectionalLight {
                color: 0xffffff,
                intensity: 0.8,
                position: Vec3::new(10.0, 10.0, 10.0),
            },
            hemisphere: HemisphereLight {
                sky_color: 0xffffff,
                ground_color: 0x080820,
                intensity: 0.5,
            },
        }
    }
}

/// Square reference grid on the XZ plane.
#[derive(Debug, Clone, Copy)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
    pub center_color: u32,
    pub line_color: u32,
}

impl GridHelper {
    /// Line segments as `(start, end, color)`.
    pub fn lines(&self) -> Vec<(Vec3, Vec3, u32)> {
        let half = self.size / 2.0;
        let step = self.size / self.divisions as f32;
        let center = self.divisions / 2;

        (0..=self.divisions)
            .flat_map(|i| {
                let k = -half + i as f32 * step;
                let color = if i == center {
                    self.center_color
                } else {
                    self.line_color
                };

                [
                    (Vec3::new(-half, 0.0, k), Vec3::new(half, 0.0, k), color),
                    (Vec3::new(k, 0.0, -half), Vec3::new(k, 0.0, half), color),
                ]
            })
            .collect()
    }
}

/// The persistent part of the scene. Reloading a layout never touches it.
pub struct Environment {
    pub background: u32,
    pub lights: LightRig,
    pub grid: GridHelper,
    pub ground: Object3D,
}

impl Environment {
    pub fn new(meshes: &mut MeshLibrary) -> Self {
        let ground = Object3D::mesh(
            "Ground",
            meshes,
            Shape::plane(FLOOR_SIZE, FLOOR_SIZE),
            material::GROUND,
        )
        .rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0));

        Self {
            background: BACKGROUND_COLOR,
            lights: LightRig::default(),
            grid: GridHelper {
                size: FLOOR_SIZE,
                divisions: 50,
                center_color: 0x888888,
                line_color: 0x888888,
            },
            ground,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;

    #[test]
    fn grid_covers_the_floor() {
        let mut meshes = MeshLibrary::new();
        let environment = Environment::new(&mut meshes);
        let lines = environment.grid.lines();

        assert_eq!(lines.len(), 2 * 51);
        assert_eq!(lines[0].0, Vec3::new(-25.0, 0.0, -25.0));
        assert_eq!(lines.last().map(|line| line.1), Some(Vec3::new(25.0, 0.0, 25.0)));
    }

    #[test]
    fn ground_faces_up() {
        let mut meshes = MeshLibrary::new();
        let environment = Environment::new(&mut meshes);

        let mut normals = Vec::new();
        environment.ground.visit_visuals(Mat4::IDENTITY, &mut |_, world| {
            normals.push(world.transform_vector3(Vec3::Z));
        });

        assert_eq!(normals.len(), 1);
        assert!(normals[0].abs_diff_eq(Vec3::Y, 1e-6));
    }
}
