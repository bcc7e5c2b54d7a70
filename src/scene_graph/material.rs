use glam::Vec3;

/// Flat-colored surface, described in the terms of a Phong material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
}

impl Material {
    pub const fn new(color: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            metalness,
            roughness,
        }
    }

    pub const fn matte(color: u32) -> Self {
        Self::new(color, 0.0, 1.0)
    }

    /// Linear-space RGB of the sRGB hex color.
    pub fn linear_color(&self) -> Vec3 {
        hex_to_linear(self.color)
    }
}

pub fn hex_to_linear(color: u32) -> Vec3 {
    let channel = |shift: u32| {
        let srgb = ((color >> shift) & 0xff) as f32 / 255.0;
        if srgb <= 0.04045 {
            srgb / 12.92
        } else {
            ((srgb + 0.055) / 1.055).powf(2.4)
        }
    };

    Vec3::new(channel(16), channel(8), channel(0))
}

// Equipment palette.
pub const FRAME: Material = Material::new(0x2c3e50, 0.7, 0.3);
pub const RAIL: Material = Material::new(0x7f8c8d, 0.8, 0.2);
pub const LEG: Material = Material::new(0x34495e, 0.6, 0.4);
pub const ROLLER: Material = Material::new(0x95a5a6, 0.9, 0.1);
pub const MOTOR: Material = Material::new(0xe74c3c, 0.5, 0.5);
pub const MARKING: Material = Material::matte(0xecf0f1);
pub const PALLET_DECK: Material = Material::new(0x8b4513, 0.2, 0.8);
pub const PALLET_LATTE: Material = Material::new(0x654321, 0.1, 0.9);
pub const GROUND: Material = Material::new(0xcccccc, 0.2, 0.8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_channels_are_linearized() {
        assert!(hex_to_linear(0xffffff).abs_diff_eq(Vec3::ONE, 1e-6));
        assert_eq!(hex_to_linear(0x000000), Vec3::ZERO);

        let grey = hex_to_linear(0x808080);
        assert!(grey.x > 0.2 && grey.x < 0.25);
        assert_eq!(grey.x, grey.y);
    }

    #[test]
    fn red_motor_is_mostly_red() {
        let color = MOTOR.linear_color();
        assert!(color.x > color.y && color.x > color.z);
    }
}
