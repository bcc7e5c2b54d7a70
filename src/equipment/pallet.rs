use glam::Vec3;

use crate::geometry::Shape;
use crate::scene_graph::material;
use crate::scene_graph::mesh_library::MeshLibrary;
use crate::scene_graph::object3d::Object3D;

/// Standard pallet footprint, across the travel direction.
pub const PALLET_WIDTH: f32 = 1.2;
/// Along the travel direction.
pub const PALLET_LENGTH: f32 = 0.8;
pub const PALLET_HEIGHT: f32 = 0.144;

const LATTE_THICKNESS: f32 = 0.1;

/// Deck plus three lattes, resting on the group's origin.
pub fn build_pallet(meshes: &mut MeshLibrary) -> Object3D {
    let mut pallet = Object3D::group("Pallet");

    pallet.add(
        Object3D::mesh(
            "Pallet deck",
            meshes,
            Shape::cuboid(PALLET_LENGTH, PALLET_HEIGHT, PALLET_WIDTH),
            material::PALLET_DECK,
        )
        .at(Vec3::new(0.0, PALLET_HEIGHT / 2.0, 0.0)),
    );

    let latte_shape = Shape::cuboid(PALLET_LENGTH, PALLET_HEIGHT / 3.0, LATTE_THICKNESS);
    for offset in [-PALLET_WIDTH / 3.0, 0.0, PALLET_WIDTH / 3.0] {
        pallet.add(
            Object3D::mesh("Pallet latte", meshes, latte_shape, material::PALLET_LATTE)
                .at(Vec3::new(0.0, PALLET_HEIGHT / 3.0, offset)),
        );
    }

    pallet
}
