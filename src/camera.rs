use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec2, Vec3};

const MIN_POLAR: f32 = 1e-4;
const ZOOM_STEP: f32 = 0.95;

/// Orbit camera: spherical coordinates around a target, with damped input.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Angle around +Y, measured from +Z towards +X.
    pub azimuth: f32,
    /// Angle down from +Y.
    pub polar: f32,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub damping: f32,

    pending_azimuth: f32,
    pending_polar: f32,
    pending_pan: Vec3,
    pending_zoom: f32,
}

impl OrbitCamera {
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length();
        let polar = if distance > 0.0 {
            (offset.y / distance).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        Self {
            target,
            distance,
            azimuth: offset.x.atan2(offset.z),
            polar,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            damping: 0.05,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_pan: Vec3::ZERO,
            pending_zoom: 1.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();

        self.target
            + self.distance * Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn view_proj(&self, aspect_ratio: f32) -> Mat4 {
        let projection = Mat4::perspective_rh(self.fov_y, aspect_ratio, self.near, self.far);
        projection * self.view_matrix()
    }

    /// Queues a rotation from a mouse drag of `delta` pixels in a viewport
    /// `viewport_height` pixels tall.
    pub fn orbit(&mut self, delta: Vec2, viewport_height: f32) {
        self.pending_azimuth -= TAU * delta.x / viewport_height;
        self.pending_polar -= TAU * delta.y / viewport_height;
    }

    /// Queues a pan that keeps the point under the cursor under the cursor.
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32) {
        let view = self.view_matrix().inverse();
        let right = view.x_axis.truncate();
        let up = view.y_axis.truncate();
        let world_per_pixel = 2.0 * self.distance * (self.fov_y / 2.0).tan() / viewport_height;

        self.pending_pan += (-right * delta.x + up * delta.y) * world_per_pixel;
    }

    /// Positive `steps` move towards the target.
    pub fn zoom(&mut self, steps: f32) {
        self.pending_zoom *= ZOOM_STEP.powf(steps);
    }

    /// Applies a damped share of the queued input.
    pub fn update(&mut self) {
        self.azimuth += self.pending_azimuth * self.damping;
        self.polar = (self.polar + self.pending_polar * self.damping).clamp(MIN_POLAR, PI - MIN_POLAR);
        self.target += self.pending_pan * self.damping;
        self.distance = (self.distance * self.pending_zoom).clamp(self.near, self.far);

        self.pending_azimuth *= 1.0 - self.damping;
        self.pending_polar *= 1.0 - self.damping;
        self.pending_pan *= 1.0 - self.damping;
        self.pending_zoom = 1.0;
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(20.0, 20.0, 20.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_where_it_was_placed() {
        let camera = OrbitCamera::default();
        assert!(camera.eye().abs_diff_eq(Vec3::new(20.0, 20.0, 20.0), 1e-3));
    }

    #[test]
    fn orbiting_keeps_the_distance() {
        let mut camera = OrbitCamera::default();
        let distance = camera.distance;

        camera.orbit(Vec2::new(120.0, -40.0), 800.0);
        for _ in 0..200 {
            camera.update();
        }

        assert!((camera.eye().distance(camera.target) - distance).abs() < 1e-3);
        assert!(!camera.eye().abs_diff_eq(Vec3::new(20.0, 20.0, 20.0), 1e-1));
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let mut camera = OrbitCamera::default();
        camera.orbit(Vec2::new(0.0, 100_000.0), 800.0);
        for _ in 0..100 {
            camera.update();
        }

        assert!(camera.polar >= MIN_POLAR);
        assert!(camera.eye().y > camera.target.y);
    }

    #[test]
    fn zooming_in_moves_closer() {
        let mut camera = OrbitCamera::default();
        let distance = camera.distance;
        camera.zoom(3.0);
        camera.update();
        assert!(camera.distance < distance);
    }

    #[test]
    fn target_projects_to_the_screen_center() {
        let camera = OrbitCamera::default();
        let clip = camera.view_proj(16.0 / 9.0) * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
