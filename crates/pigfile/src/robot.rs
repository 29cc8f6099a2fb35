//! Robot type definitions.

use crate::fix::{Fix, FixVector};
use binrw::{BinRead, BinWrite};

pub const MAX_GUNS: usize = 8;
/// Number of difficulty levels.
pub const NDL: usize = 5;
pub const N_ANIM_STATES: usize = 5;

/// Value of [`RobotInfo::checksum`] for every robot type in use.
pub const ROBOT_INFO_MAGIC: u32 = 0x0000_ABCD;
/// Size of a [`RobotInfo`] record in the file.
pub const ROBOT_INFO_LEN: usize = 486;

/// A range of joint positions used by an animation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct JointList {
    pub n_joints: i16,
    pub offset: i16,
}

/// Difficulty-dependent tuning values of a robot type.
#[derive(Debug, Clone, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct Difficulty {
    pub field_of_view: [Fix; NDL],
    pub firing_wait: [Fix; NDL],
    pub turn_time: [Fix; NDL],
    pub fire_power: [Fix; NDL],
    pub shield: [Fix; NDL],
    pub max_speed: [Fix; NDL],
    pub circle_distance: [Fix; NDL],
    pub rapidfire_count: [i8; NDL],
    pub evade_speed: [i8; NDL],
}

/// A robot type, as stored in the Descent 1 game data.
#[derive(Debug, Clone, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct RobotInfo {
    /// Index of the polygon model of this robot.
    pub model_num: i32,
    pub n_guns: i32,
    pub gun_points: [FixVector; MAX_GUNS],
    pub gun_submodels: [u8; MAX_GUNS],

    pub exp1_vclip_num: i16,
    pub exp1_sound_num: i16,
    pub exp2_vclip_num: i16,
    pub exp2_sound_num: i16,
    pub weapon_type: i16,

    pub contains_id: i8,
    pub contains_count: i8,
    pub contains_prob: i8,
    pub contains_type: i8,

    pub score_value: i32,
    pub lighting: Fix,
    pub strength: Fix,
    pub mass: Fix,
    pub drag: Fix,

    pub difficulty: Difficulty,

    pub cloak_type: i8,
    pub attack_type: i8,
    pub boss_flag: u8,
    pub see_sound: u8,
    pub attack_sound: u8,
    pub claw_sound: u8,

    pub anim_states: [[JointList; N_ANIM_STATES]; MAX_GUNS + 1],

    /// Structural check value. Equals [`ROBOT_INFO_MAGIC`] for robot types in use.
    pub checksum: u32,
}

impl RobotInfo {
    pub fn is_valid(&self) -> bool {
        self.checksum == ROBOT_INFO_MAGIC
    }
}

#[cfg(test)]
mod test {
    use super::{ROBOT_INFO_LEN, ROBOT_INFO_MAGIC, RobotInfo};
    use crate::cursor::Cursor;
    use binrw::{BinWrite, io::Cursor as IoCursor};

    #[test]
    fn record_layout() {
        let robot = RobotInfo {
            model_num: 3,
            checksum: ROBOT_INFO_MAGIC,
            ..Default::default()
        };

        let mut bytes = IoCursor::new(Vec::new());
        robot.write(&mut bytes).unwrap();
        let bytes = bytes.into_inner();
        assert_eq!(bytes.len(), ROBOT_INFO_LEN);
        assert_eq!(bytes[ROBOT_INFO_LEN - 4..], [0xCD, 0xAB, 0x00, 0x00]);

        let (decoded, len) = Cursor::new(&bytes).read_record::<RobotInfo>().unwrap();
        assert_eq!(len, ROBOT_INFO_LEN);
        assert!(decoded.is_valid());
        assert_eq!(decoded, robot);
    }
}
