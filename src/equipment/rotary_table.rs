use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::config::PlacementKind;
use crate::equipment::{pallet::build_pallet, Composite, Motion, DECK_HEIGHT};
use crate::geometry::Shape;
use crate::scene_graph::material;
use crate::scene_graph::mesh_library::MeshLibrary;
use crate::scene_graph::object3d::Object3D;

const PLATE_THICKNESS: f32 = 0.05;
const LEG_SIZE: f32 = 0.05;
const BRACE_SIZE: f32 = 0.03;
const MARKING_HEIGHT: f32 = DECK_HEIGHT + 0.03;

/// Builds a rotary table of the given `diameter`, centered on the group origin.
pub fn build_rotary_table(meshes: &mut MeshLibrary, diameter: f32) -> Composite {
    let mut group = Object3D::group("Rotary table");
    let radius = diameter / 2.0;

    group.add(
        Object3D::mesh(
            "Table plate",
            meshes,
            Shape::cylinder(radius, radius, PLATE_THICKNESS, 32),
            material::FRAME,
        )
        .at(Vec3::new(0.0, DECK_HEIGHT, 0.0)),
    );

    group.add(
        Object3D::mesh(
            "Table ring",
            meshes,
            Shape::torus(radius, 0.03, 16, 32),
            material::RAIL,
        )
        .at(Vec3::new(0.0, DECK_HEIGHT + 0.04, 0.0))
        .rotated(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
    );

    let offset = diameter / 3.0;
    let leg_shape = Shape::cuboid(LEG_SIZE, DECK_HEIGHT, LEG_SIZE);
    let center = Vec3::new(0.0, DECK_HEIGHT, 0.0);

    for (x, z) in [
        (offset, offset),
        (-offset, offset),
        (offset, -offset),
        (-offset, -offset),
    ] {
        group.add(
            Object3D::mesh("Leg", meshes, leg_shape, material::LEG)
                .at(Vec3::new(x, DECK_HEIGHT / 2.0, z)),
        );

        let brace_length = (x * x + z * z).sqrt();
        let mut brace = Object3D::mesh(
            "Leg brace",
            meshes,
            Shape::cuboid(BRACE_SIZE, brace_length, BRACE_SIZE),
            material::LEG,
        )
        .at(Vec3::new(x / 2.0, DECK_HEIGHT / 2.0, z / 2.0));
        brace.transform.look_at(center, Vec3::Y);
        group.add(brace);
    }

    group.add(
        Object3D::mesh(
            "Motor",
            meshes,
            Shape::cuboid(0.2, 0.15, 0.2),
            material::MOTOR,
        )
        .at(Vec3::new(0.0, DECK_HEIGHT - 0.15, 0.0)),
    );

    group.add(
        Object3D::mesh(
            "Rotation marker",
            meshes,
            Shape::cuboid(diameter * 0.8, 0.01, 0.05),
            material::MARKING,
        )
        .at(Vec3::new(0.0, MARKING_HEIGHT, 0.0)),
    );

    for i in 1..=3 {
        group.add(
            Object3D::mesh(
                "Rotation circle",
                meshes,
                Shape::torus(diameter * i as f32 / 8.0, 0.01, 8, 32),
                material::MARKING,
            )
            .at(Vec3::new(0.0, MARKING_HEIGHT, 0.0))
            .rotated(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
        );
    }

    let pallet = build_pallet(meshes).at(center);

    log::debug!("Built rotary table of diameter {diameter}");

    Composite {
        kind: PlacementKind::default(),
        root: group,
        pallet,
        motion: Motion::RotaryTable { rotation_angle: 0.0 },
    }
}
