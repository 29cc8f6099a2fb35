//! Construction of small synthetic `.pig` files with the exact table layout of the real thing.

use crate::{
    gamedata::{MAX_ROBOT_TYPES, Table},
    polymodel::PolymodelHeader,
    robot::{ROBOT_INFO_LEN, ROBOT_INFO_MAGIC, RobotInfo},
    ship::PlayerShip,
};
use binrw::{BinWrite, io::Cursor};

/// Byte used to fill robot type slots which are not in use.
const GARBAGE: u8 = 0xA5;

/// Builds a synthetic `.pig` file.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    robot_types: i32,
    corrupt_robots: Vec<usize>,
    polymodels: Vec<(PolymodelHeader, Vec<u8>)>,
    player_model: i32,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the amount of robot types in use.
    pub fn robot_types(mut self, count: i32) -> Self {
        self.robot_types = count;
        self
    }

    /// Gives the robot type at `index` a wrong checksum.
    pub fn corrupt_robot(mut self, index: usize) -> Self {
        self.corrupt_robots.push(index);
        self
    }

    /// Appends a polygon model. The data size in the header is set to the length of `data`.
    pub fn polymodel(mut self, (mut header, data): (PolymodelHeader, Vec<u8>)) -> Self {
        header.model_data_size = data.len() as u32;
        self.polymodels.push((header, data));
        self
    }

    /// Appends a polygon model with a single submodel starting at the beginning of `data`.
    pub fn bytecode(self, data: Vec<u8>) -> Self {
        let header = PolymodelHeader {
            n_models: 1,
            ..Default::default()
        };

        self.polymodel((header, data))
    }

    pub fn player_model(mut self, index: i32) -> Self {
        self.player_model = index;
        self
    }

    /// Offset of the first polygon model header in a built file.
    pub fn headers_offset() -> usize {
        let counted = [
            Table::BitmapIndices,
            Table::VClips,
            Table::EClips,
            Table::WallAnims,
            Table::RobotJoints,
            Table::WeaponInfo,
            Table::PowerupInfo,
        ];

        // prologue, the counts of every counted table, the robot count and the model count
        let counts = 4 + 4 * counted.len() + 4 + 4;
        let tables = [Table::BitmapIndices, Table::TmapInfo, Table::Sounds]
            .into_iter()
            .chain(counted.into_iter().skip(1))
            .map(Table::len)
            .sum::<usize>();

        counts + tables + MAX_ROBOT_TYPES * ROBOT_INFO_LEN
    }

    fn robot(&self, index: usize) -> Vec<u8> {
        if index as i64 >= self.robot_types as i64 {
            return vec![GARBAGE; ROBOT_INFO_LEN];
        }

        let checksum = if self.corrupt_robots.contains(&index) {
            0xDEAD_BEEF
        } else {
            ROBOT_INFO_MAGIC
        };

        let robot = RobotInfo {
            model_num: index as i32,
            checksum,
            ..Default::default()
        };

        let mut bytes = Cursor::new(Vec::with_capacity(ROBOT_INFO_LEN));
        robot.write(&mut bytes).unwrap();
        bytes.into_inner()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let count = |out: &mut Vec<u8>, count: i32| out.extend_from_slice(&count.to_le_bytes());
        let table = |out: &mut Vec<u8>, table: Table| out.resize(out.len() + table.len(), 0);

        out.extend_from_slice(b"PIG\x01");

        count(&mut out, 0);
        table(&mut out, Table::BitmapIndices);
        table(&mut out, Table::TmapInfo);
        table(&mut out, Table::Sounds);

        for kind in [Table::VClips, Table::EClips, Table::WallAnims] {
            count(&mut out, 0);
            table(&mut out, kind);
        }

        count(&mut out, self.robot_types);
        for index in 0..MAX_ROBOT_TYPES {
            out.extend(self.robot(index));
        }

        for kind in [Table::RobotJoints, Table::WeaponInfo, Table::PowerupInfo] {
            count(&mut out, 0);
            table(&mut out, kind);
        }

        count(&mut out, self.polymodels.len() as i32);
        let mut writer = Cursor::new(Vec::new());
        for (header, _) in &self.polymodels {
            header.write(&mut writer).unwrap();
        }
        out.extend(writer.into_inner());

        for (_, data) in &self.polymodels {
            out.extend_from_slice(data);
        }

        for kind in [
            Table::GaugeBitmaps,
            Table::DeathModels,
            Table::ObjBitmaps,
            Table::ObjBitmapPtrs,
        ] {
            table(&mut out, kind);
        }

        let ship = PlayerShip {
            model_num: self.player_model,
            ..Default::default()
        };

        let mut writer = Cursor::new(Vec::new());
        ship.write(&mut writer).unwrap();
        out.extend(writer.into_inner());

        out
    }
}
