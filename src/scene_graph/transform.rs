use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Local transform of a scene node.
///
/// Rotation is kept as XYZ-order Euler angles so animation code can spin a
/// single axis (`rotation.x += ...`) or overwrite one (`rotation.y = ...`)
/// without disturbing the others.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn set_quat(&mut self, rotation: Quat) {
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.translation)
    }

    /// Orients the node so that its local +Z axis points at `target`.
    ///
    /// `target` is expressed in the same frame as `translation`.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let Some(forward) = (target - self.translation).try_normalize() else {
            return;
        };

        let right = up
            .cross(forward)
            .try_normalize()
            .or_else(|| forward.any_orthonormal_vector().try_normalize())
            .unwrap_or(Vec3::X);
        let up = forward.cross(right);

        self.set_quat(Quat::from_mat3(&Mat3::from_cols(right, up, forward)));
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
