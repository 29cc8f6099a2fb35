use glam::{Mat3, Vec3};

/// Orientation of a model, in radians.
///
/// Rotations are applied in a fixed order: yaw around Y, then pitch around X, then roll around Z.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Orientation {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

/// An orthographic camera looking down the Z axis at a rotated model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    rotation: Mat3,
    view_dir: Vec3,
}

impl Camera {
    pub fn new(orientation: Orientation) -> Self {
        let rotation = Mat3::from_rotation_z(orientation.roll)
            * Mat3::from_rotation_x(orientation.pitch)
            * Mat3::from_rotation_y(orientation.yaw);

        // the forward axis brought back into model space
        let view_dir = rotation.transpose() * Vec3::Z;

        Self { rotation, view_dir }
    }

    /// Direction towards the viewer, in model space.
    pub fn view_dir(&self) -> Vec3 {
        self.view_dir
    }

    /// Rotates a model space point into view space.
    pub fn rotate(&self, point: Vec3) -> Vec3 {
        self.rotation * point
    }

    /// How much a surface with the given normal faces the viewer. Positive values face towards the
    /// viewer, negative values face away.
    pub fn facing(&self, normal: Vec3) -> f32 {
        self.view_dir.dot(normal)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Orientation::default())
    }
}

#[cfg(test)]
mod test {
    use super::{Camera, Orientation};
    use glam::Vec3;

    #[test]
    fn identity() {
        let camera = Camera::default();
        assert_eq!(camera.view_dir(), Vec3::Z);
        assert_eq!(camera.rotate(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.facing(Vec3::Z), 1.0);
        assert_eq!(camera.facing(-Vec3::Z), -1.0);
    }

    #[test]
    fn view_dir_matches_rotation_order() {
        let (pitch, yaw) = (0.3f32, 0.5f32);
        let camera = Camera::new(Orientation::new(pitch, yaw, 0.7));

        let expected = Vec3::new(-yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos());
        assert!(camera.view_dir().abs_diff_eq(expected, 1e-6));

        // the view direction is whatever ends up pointing down the Z axis
        assert!(camera.rotate(camera.view_dir()).abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn yaw_then_pitch_then_roll() {
        let camera = Camera::new(Orientation::new(
            std::f32::consts::FRAC_PI_2,
            std::f32::consts::FRAC_PI_2,
            0.0,
        ));

        // yaw takes X to -Z, then pitch takes -Z to Y
        assert!(camera.rotate(Vec3::X).abs_diff_eq(Vec3::Y, 1e-6));
    }
}
