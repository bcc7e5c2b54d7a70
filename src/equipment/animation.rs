use crate::config::PlacementKind;
use crate::equipment::{Composite, Motion};
use crate::geometry::ShapeKind;

/// Pallet travel speed on a conveyor, in meters per second.
pub const CONVEYOR_SPEED: f32 = 1.0;
/// Roller spin, in radians per second.
pub const ROLLER_SPIN_SPEED: f32 = 2.0;
/// Rotary table angular speed, in radians per second.
pub const TABLE_ROTATION_SPEED: f32 = 0.5;

impl Composite {
    /// Advances the pallet (and rollers) by `delta_time` seconds.
    ///
    /// Only tagged equipment moves; anything else is left untouched.
    pub fn animate(&mut self, delta_time: f32) {
        match (&self.kind, &mut self.motion) {
            (PlacementKind::Roller, Motion::Conveyor { length }) => {
                let half_length = *length / 2.0;
                let pallet = &mut self.pallet.transform.translation;

                pallet.x += CONVEYOR_SPEED * delta_time;
                // Hard reset rather than modulo: an overshoot still lands on the entry.
                if pallet.x > half_length {
                    pallet.x = -half_length;
                }

                for roller in self.root.children_of_kind_mut(ShapeKind::Cylinder) {
                    roller.transform.rotation.x += ROLLER_SPIN_SPEED * delta_time;
                }
            }
            (PlacementKind::Rotary, Motion::RotaryTable { rotation_angle }) => {
                *rotation_angle += TABLE_ROTATION_SPEED * delta_time;
                self.pallet.transform.rotation.y = *rotation_angle;
            }
            _ => {}
        }
    }
}
