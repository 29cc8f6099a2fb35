//! The player ship record.

use crate::fix::{Fix, FixVector};
use crate::robot::MAX_GUNS;
use binrw::{BinRead, BinWrite};

/// Size of a [`PlayerShip`] record in the file.
pub const PLAYER_SHIP_LEN: usize = 132;

#[derive(Debug, Clone, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PlayerShip {
    /// Index of the polygon model of the ship.
    pub model_num: i32,
    pub expl_vclip_num: i32,
    pub mass: Fix,
    pub drag: Fix,
    pub max_thrust: Fix,
    pub reverse_thrust: Fix,
    pub brakes: Fix,
    pub wiggle: Fix,
    pub max_rotthrust: Fix,
    pub gun_points: [FixVector; MAX_GUNS],
}
