//! 16.16 fixed-point values, as stored in the game data.

use binrw::{BinRead, BinWrite};
use glam::Vec3;

/// A signed 16.16 fixed-point number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, BinRead, BinWrite)]
#[brw(little)]
pub struct Fix(pub i32);

impl Fix {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << 16);

    /// Converts a real number to the closest fixed-point value.
    pub fn from_f32(value: f32) -> Self {
        Self((value * 65536.0).round() as i32)
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 65536.0
    }
}

/// A vector of three [`Fix`] components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, BinRead, BinWrite)]
#[brw(little)]
pub struct FixVector {
    pub x: Fix,
    pub y: Fix,
    pub z: Fix,
}

impl FixVector {
    pub const ZERO: Self = Self::new(Fix::ZERO, Fix::ZERO, Fix::ZERO);

    pub const fn new(x: Fix, y: Fix, z: Fix) -> Self {
        Self { x, y, z }
    }

    pub fn from_vec3(value: Vec3) -> Self {
        Self::new(
            Fix::from_f32(value.x),
            Fix::from_f32(value.y),
            Fix::from_f32(value.z),
        )
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x.to_f32(), self.y.to_f32(), self.z.to_f32())
    }
}

impl From<FixVector> for Vec3 {
    fn from(value: FixVector) -> Self {
        value.to_vec3()
    }
}
