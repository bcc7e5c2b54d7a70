//! Conveyors and rotary tables, each carrying one pallet.

mod animation;
pub mod conveyor;
pub mod pallet;
pub mod rotary_table;

use glam::Mat4;

use crate::config::PlacementKind;
use crate::scene_graph::object3d::{Object3D, Visual};

pub use conveyor::build_conveyor;
pub use rotary_table::build_rotary_table;

/// Height of the carrying surface of every piece of equipment.
pub const DECK_HEIGHT: f32 = 0.4;

/// Animation state specific to each kind of equipment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Conveyor { length: f32 },
    RotaryTable { rotation_angle: f32 },
}

/// One placed piece of equipment.
///
/// The pallet is owned here rather than stored among `root.children`, and is
/// positioned in `root`'s local frame.
#[derive(Debug, Clone)]
pub struct Composite {
    pub kind: PlacementKind,
    pub root: Object3D,
    pub pallet: Object3D,
    pub motion: Motion,
}

impl Composite {
    pub fn visit_visuals<F>(&self, f: &mut F)
    where
        F: FnMut(&Visual, Mat4),
    {
        self.root.visit_visuals(Mat4::IDENTITY, f);
        self.pallet
            .visit_visuals(self.root.transform.local_matrix(), f);
    }
}
