use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::config::PlacementKind;
use crate::equipment::{pallet::build_pallet, Composite, Motion, DECK_HEIGHT};
use crate::geometry::Shape;
use crate::scene_graph::material;
use crate::scene_graph::mesh_library::MeshLibrary;
use crate::scene_graph::object3d::Object3D;

const BASE_THICKNESS: f32 = 0.05;
const RAIL_HEIGHT: f32 = 0.08;
const RAIL_THICKNESS: f32 = 0.03;
const LEG_SIZE: f32 = 0.05;
const ROLLER_PITCH: f64 = 0.15;
const ROLLER_RADIUS: f32 = 0.025;
const ROLLER_CLEARANCE: f32 = 0.1;
const ROLLER_SEGMENTS: u32 = 16;

/// Leg pairs: one per two meters, never fewer than two.
///
/// Degenerate lengths (NaN, negative) truncate to zero before the minimum applies.
pub fn leg_pair_count(length: f64) -> usize {
    ((length / 2.0).floor() as usize).max(2)
}

pub fn roller_count(length: f64) -> usize {
    (length / ROLLER_PITCH).floor() as usize
}

/// Builds a roller conveyor of `length` along X and `width` along Z.
///
/// Children are laid out symmetric about the origin, then the group itself
/// is shifted by `length / 2` so the belt starts at the group's placement.
/// The pallet starts at the entry end.
pub fn build_conveyor(meshes: &mut MeshLibrary, length: f64, width: f64) -> Composite {
    let leg_pairs = leg_pair_count(length);
    let rollers = roller_count(length);

    let (length, width) = (length as f32, width as f32);
    let mut group = Object3D::group("Conveyor");
    let half_length = length / 2.0;

    group.add(
        Object3D::mesh(
            "Conveyor base",
            meshes,
            Shape::cuboid(length, BASE_THICKNESS, width),
            material::FRAME,
        )
        .at(Vec3::new(0.0, DECK_HEIGHT, 0.0)),
    );

    let rail_shape = Shape::cuboid(length, RAIL_HEIGHT, RAIL_THICKNESS);
    for side in [1.0, -1.0] {
        group.add(
            Object3D::mesh("Side rail", meshes, rail_shape, material::RAIL).at(Vec3::new(
                0.0,
                DECK_HEIGHT + RAIL_HEIGHT / 2.0,
                side * width / 2.0,
            )),
        );
    }

    let leg_spacing = length / (leg_pairs - 1) as f32;
    let leg_shape = Shape::cuboid(LEG_SIZE, DECK_HEIGHT, LEG_SIZE);
    let brace_shape = Shape::cuboid(LEG_SIZE, LEG_SIZE, width);

    for i in 0..leg_pairs {
        let x = -half_length + i as f32 * leg_spacing;

        for side in [1.0, -1.0] {
            group.add(
                Object3D::mesh("Leg", meshes, leg_shape, material::LEG).at(Vec3::new(
                    x,
                    DECK_HEIGHT / 2.0,
                    side * (width / 2.0 - LEG_SIZE / 2.0),
                )),
            );
        }

        group.add(
            Object3D::mesh("Leg brace", meshes, brace_shape, material::LEG)
                .at(Vec3::new(x, DECK_HEIGHT / 4.0, 0.0)),
        );
    }

    let roller_shape = Shape::cylinder(
        ROLLER_RADIUS,
        ROLLER_RADIUS,
        width - ROLLER_CLEARANCE,
        ROLLER_SEGMENTS,
    );
    for i in 0..rollers {
        let x = -half_length + (i as f32 + 0.5) * (length / rollers as f32);
        group.add(
            Object3D::mesh("Roller", meshes, roller_shape, material::ROLLER)
                .at(Vec3::new(x, DECK_HEIGHT + 0.03, 0.0))
                .rotated(Vec3::new(0.0, 0.0, FRAC_PI_2)),
        );
    }

    group.add(
        Object3D::mesh(
            "Motor",
            meshes,
            Shape::cuboid(0.2, 0.15, 0.15),
            material::MOTOR,
        )
        .at(Vec3::new(-half_length + 0.1, DECK_HEIGHT, width / 2.0 + 0.1)),
    );

    group.transform.translation.x = half_length;

    let pallet = build_pallet(meshes).at(Vec3::new(-half_length, DECK_HEIGHT, 0.0));

    log::debug!("Built conveyor {length}x{width}: {leg_pairs} leg pairs, {rollers} rollers");

    Composite {
        kind: PlacementKind::default(),
        root: group,
        pallet,
        motion: Motion::Conveyor { length },
    }
}
