//! The game data tables at the start of a Descent 1 `.pig` file.
//!
//! The tables are laid out back to back, each with a fixed capacity regardless of how many entries
//! are actually in use, so most of them can be skipped without being decoded. The only parts that
//! are decoded are the robot types (to check their integrity), the polygon models and the player
//! ship.

use crate::{
    cursor::{Cursor, CursorError},
    polymodel::{Polymodel, PolymodelHeader},
    robot::RobotInfo,
    ship::PlayerShip,
};
use easyerr::{Error, ResultExt};

pub const MAX_TEXTURES: usize = 800;
pub const MAX_SOUNDS: usize = 250;
pub const MAX_VCLIPS: usize = 70;
pub const MAX_EFFECTS: usize = 60;
pub const MAX_WALL_ANIMS: usize = 30;
pub const MAX_ROBOT_TYPES: usize = 30;
pub const MAX_ROBOT_JOINTS: usize = 600;
pub const MAX_WEAPON_TYPES: usize = 30;
pub const MAX_POWERUP_TYPES: usize = 29;
pub const MAX_GAUGE_BMS: usize = 80;
pub const MAX_POLYGON_MODELS: usize = 85;
pub const MAX_OBJ_BITMAPS: usize = 210;

/// Length of the prologue before the texture count.
const PROLOGUE_LEN: usize = 4;

/// A fixed-capacity table which is skipped without being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Table {
    BitmapIndices,
    TmapInfo,
    Sounds,
    VClips,
    EClips,
    WallAnims,
    RobotJoints,
    WeaponInfo,
    PowerupInfo,
    GaugeBitmaps,
    DeathModels,
    ObjBitmaps,
    ObjBitmapPtrs,
}

impl Table {
    fn record_len(self) -> usize {
        match self {
            Self::BitmapIndices => 2,
            Self::TmapInfo => 26,
            // a sound index and an alternate sound index
            Self::Sounds => 2,
            Self::VClips => 82,
            Self::EClips => 130,
            Self::WallAnims => 66,
            Self::RobotJoints => 8,
            Self::WeaponInfo => 115,
            Self::PowerupInfo => 16,
            Self::GaugeBitmaps => 2,
            // a dying model and a dead model
            Self::DeathModels => 8,
            Self::ObjBitmaps => 2,
            Self::ObjBitmapPtrs => 2,
        }
    }

    fn capacity(self) -> usize {
        match self {
            Self::BitmapIndices | Self::TmapInfo => MAX_TEXTURES,
            Self::Sounds => MAX_SOUNDS,
            Self::VClips => MAX_VCLIPS,
            Self::EClips => MAX_EFFECTS,
            Self::WallAnims => MAX_WALL_ANIMS,
            Self::RobotJoints => MAX_ROBOT_JOINTS,
            Self::WeaponInfo => MAX_WEAPON_TYPES,
            Self::PowerupInfo => MAX_POWERUP_TYPES,
            Self::GaugeBitmaps => MAX_GAUGE_BMS,
            Self::DeathModels => MAX_POLYGON_MODELS,
            Self::ObjBitmaps | Self::ObjBitmapPtrs => MAX_OBJ_BITMAPS,
        }
    }

    /// Length of the whole table in the file.
    pub(crate) fn len(self) -> usize {
        self.record_len() * self.capacity()
    }
}

#[derive(Debug, Error)]
pub enum GameDataError {
    #[error(transparent)]
    Cursor { source: CursorError },
    #[error("{table} count is negative ({count})")]
    NegativeCount { table: &'static str, count: i32 },
    #[error("robot type {index} has checksum 0x{found:08X}, expected 0x0000ABCD")]
    RobotChecksum { index: usize, found: u32 },
}

/// Entry counts of the tables, as declared in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub textures: i32,
    pub vclips: i32,
    pub effects: i32,
    pub wall_anims: i32,
    pub robot_types: i32,
    pub robot_joints: i32,
    pub weapon_types: i32,
    pub powerup_types: i32,
    pub polygon_models: i32,
}

/// The parsed game data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameData<'a> {
    pub counts: Counts,
    /// Polygon models, in the order they are stored.
    pub polymodels: Vec<Polymodel<'a>>,
    pub player_ship: PlayerShip,
}

impl<'a> GameData<'a> {
    /// Parses the game data tables from the contents of a `.pig` file.
    pub fn parse(pig: &'a [u8]) -> Result<Self, GameDataError> {
        let _span = tracing::info_span!("parsing game data", len = pig.len()).entered();
        Walker::new(pig).walk()
    }

    /// Index of the polygon model used for the player ship.
    pub fn player_model_num(&self) -> i32 {
        self.player_ship.model_num
    }

    /// The polygon model used for the player ship, if the index is in range.
    pub fn player_model(&self) -> Option<&Polymodel<'a>> {
        usize::try_from(self.player_model_num())
            .ok()
            .and_then(|index| self.polymodels.get(index))
    }
}

struct Walker<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Walker<'a> {
    fn new(pig: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(pig),
        }
    }

    fn count(&mut self, table: &'static str) -> Result<i32, GameDataError> {
        let count = self.cursor.read_i32().context(GameDataCtx::Cursor)?;
        tracing::debug!(offset = self.cursor.position() - 4, "{table}: {count}");
        Ok(count)
    }

    fn skip(&mut self, table: Table) -> Result<(), GameDataError> {
        self.cursor.skip(table.len()).context(GameDataCtx::Cursor)
    }

    fn robot_types(&mut self, n_robot_types: i32) -> Result<(), GameDataError> {
        for index in 0..MAX_ROBOT_TYPES {
            let (robot, _) = self
                .cursor
                .read_record::<RobotInfo>()
                .context(GameDataCtx::Cursor)?;

            // only the types in use are meaningful, the rest of the table is garbage
            let in_use = (index as i64) < n_robot_types as i64;
            if in_use && !robot.is_valid() {
                return Err(GameDataError::RobotChecksum {
                    index,
                    found: robot.checksum,
                });
            }
        }

        Ok(())
    }

    fn polymodels(&mut self, count: i32) -> Result<Vec<Polymodel<'a>>, GameDataError> {
        let count = usize::try_from(count).map_err(|_| GameDataError::NegativeCount {
            table: "polygon models",
            count,
        })?;

        let mut headers = Vec::with_capacity(count.min(MAX_POLYGON_MODELS));
        for _ in 0..count {
            let (header, _) = self
                .cursor
                .read_record::<PolymodelHeader>()
                .context(GameDataCtx::Cursor)?;

            headers.push(header);
        }

        // bytecode blobs come after all of the headers
        let mut polymodels = Vec::with_capacity(headers.len());
        for header in headers {
            let data = self
                .cursor
                .read_bytes(header.model_data_size as usize)
                .context(GameDataCtx::Cursor)?;

            polymodels.push(Polymodel { header, data });
        }

        Ok(polymodels)
    }

    fn walk(mut self) -> Result<GameData<'a>, GameDataError> {
        let mut counts = Counts::default();

        self.cursor
            .skip(PROLOGUE_LEN)
            .context(GameDataCtx::Cursor)?;

        counts.textures = self.count("textures")?;
        self.skip(Table::BitmapIndices)?;
        self.skip(Table::TmapInfo)?;
        self.skip(Table::Sounds)?;

        counts.vclips = self.count("vclips")?;
        self.skip(Table::VClips)?;

        counts.effects = self.count("effects")?;
        self.skip(Table::EClips)?;

        counts.wall_anims = self.count("wall animations")?;
        self.skip(Table::WallAnims)?;

        counts.robot_types = self.count("robot types")?;
        self.robot_types(counts.robot_types)?;

        counts.robot_joints = self.count("robot joints")?;
        self.skip(Table::RobotJoints)?;

        counts.weapon_types = self.count("weapon types")?;
        self.skip(Table::WeaponInfo)?;

        counts.powerup_types = self.count("powerup types")?;
        self.skip(Table::PowerupInfo)?;

        counts.polygon_models = self.count("polygon models")?;
        let polymodels = self.polymodels(counts.polygon_models)?;

        self.skip(Table::GaugeBitmaps)?;
        self.skip(Table::DeathModels)?;
        self.skip(Table::ObjBitmaps)?;
        self.skip(Table::ObjBitmapPtrs)?;

        let (player_ship, _) = self
            .cursor
            .read_record::<PlayerShip>()
            .context(GameDataCtx::Cursor)?;

        tracing::debug!(
            model_num = player_ship.model_num,
            offset = self.cursor.position(),
            "parsed player ship"
        );

        Ok(GameData {
            counts,
            polymodels,
            player_ship,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{GameData, GameDataError};
    use crate::{
        cursor::CursorError,
        polymodel::{POLYMODEL_HEADER_LEN, PolymodelHeader},
        testing::ArchiveBuilder,
    };

    fn model(n_models: u8, data: &[u8]) -> (PolymodelHeader, Vec<u8>) {
        let header = PolymodelHeader {
            n_models,
            model_data_size: data.len() as u32,
            ..Default::default()
        };

        (header, data.to_vec())
    }

    fn builder() -> ArchiveBuilder {
        ArchiveBuilder::new()
            .polymodel(model(1, &[1, 2, 3, 4]))
            .polymodel(model(2, &[5, 6]))
            .polymodel(model(1, &[7, 8, 9]))
            .player_model(2)
    }

    #[test]
    fn reads_polymodels_in_order() {
        let pig = builder().build();
        let data = GameData::parse(&pig).unwrap();

        assert_eq!(data.counts.polygon_models, 3);
        assert_eq!(data.polymodels.len(), 3);
        assert_eq!(data.polymodels[0].data, &[1, 2, 3, 4]);
        assert_eq!(data.polymodels[1].data, &[5, 6]);
        assert_eq!(data.polymodels[1].header.n_models, 2);
        assert_eq!(data.polymodels[2].data, &[7, 8, 9]);

        assert_eq!(data.player_model_num(), 2);
        assert_eq!(data.player_model().unwrap().data, &[7, 8, 9]);
    }

    #[test]
    fn parsing_is_deterministic() {
        let pig = builder().build();
        let first = GameData::parse(&pig).unwrap();
        let second = GameData::parse(&pig).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn player_model_out_of_range() {
        let pig = builder().player_model(3).build();
        let data = GameData::parse(&pig).unwrap();
        assert!(data.player_model().is_none());

        let pig = builder().player_model(-1).build();
        let data = GameData::parse(&pig).unwrap();
        assert!(data.player_model().is_none());
    }

    #[test]
    fn unused_robot_types_are_not_checked() {
        // every slot past the count holds garbage
        let pig = ArchiveBuilder::new().robot_types(4).build();
        let data = GameData::parse(&pig).unwrap();
        assert_eq!(data.counts.robot_types, 4);
    }

    #[test]
    fn bad_robot_checksum_is_detected_per_record() {
        let pig = ArchiveBuilder::new()
            .robot_types(4)
            .corrupt_robot(2)
            .build();

        let err = GameData::parse(&pig).unwrap_err();
        assert!(matches!(
            err,
            GameDataError::RobotChecksum { index: 2, found } if found != 0xABCD
        ));

        // corrupting a slot which is not in use is fine
        let pig = ArchiveBuilder::new()
            .robot_types(4)
            .corrupt_robot(4)
            .build();
        assert!(GameData::parse(&pig).is_ok());
    }

    #[test]
    fn truncated_archive_fails() {
        let pig = builder().build();

        // cut inside the bytecode blobs
        let blobs = ArchiveBuilder::headers_offset() + 3 * POLYMODEL_HEADER_LEN;
        let err = GameData::parse(&pig[..blobs + 5]).unwrap_err();
        assert!(matches!(
            err,
            GameDataError::Cursor {
                source: CursorError::OutOfBounds { need: 2, .. }
            }
        ));

        // cut inside the first header
        let err = GameData::parse(&pig[..ArchiveBuilder::headers_offset() + 100]).unwrap_err();
        assert!(matches!(
            err,
            GameDataError::Cursor {
                source: CursorError::TruncatedRecord { .. }
            }
        ));

        let err = GameData::parse(&pig[..2]).unwrap_err();
        assert!(matches!(
            err,
            GameDataError::Cursor {
                source: CursorError::OutOfBounds { .. }
            }
        ));
    }

    #[test]
    fn short_header_is_truncated() {
        let pig = builder().build();

        // the last header is one byte short, the blobs are gone
        let end = ArchiveBuilder::headers_offset() + 3 * POLYMODEL_HEADER_LEN;
        let err = GameData::parse(&pig[..end - 1]).unwrap_err();
        assert!(matches!(
            err,
            GameDataError::Cursor {
                source: CursorError::TruncatedRecord { .. }
            }
        ));
    }

    #[test]
    fn negative_model_count_fails() {
        let mut pig = builder().build();
        let offset = ArchiveBuilder::headers_offset() - 4;
        pig[offset..][..4].copy_from_slice(&(-1i32).to_le_bytes());

        let err = GameData::parse(&pig).unwrap_err();
        assert!(matches!(err, GameDataError::NegativeCount { count: -1, .. }));
    }

    #[test]
    fn headers_precede_blobs() {
        let pig = builder().build();
        let blobs = ArchiveBuilder::headers_offset() + 3 * POLYMODEL_HEADER_LEN;
        assert_eq!(pig[blobs..][..9], [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }
}
