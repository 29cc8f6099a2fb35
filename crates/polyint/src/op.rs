//! Decoding of polygon model instructions.
//!
//! Every instruction starts with a 16-bit opcode. Offsets stored in instructions are relative to
//! the start of the instruction that contains them.

use easyerr::{Error, ResultExt};
use pigfile::{
    cursor::{Cursor, CursorError},
    fix::FixVector,
};
use strum::FromRepr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u16)]
pub enum Opcode {
    Eof = 0,
    DefPoints = 1,
    FlatPoly = 2,
    TmapPoly = 3,
    SortNorm = 4,
    RodBitmap = 5,
    SubCall = 6,
    DefPointsStart = 7,
    Glow = 8,
}

const POLY_HEADER_LEN: usize = 30;
const UVL_LEN: usize = 12;
const SORT_NORM_LEN: usize = 32;
const ROD_BITMAP_LEN: usize = 36;
const SUB_CALL_LEN: usize = 20;
const GLOW_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown opcode {f0}")]
    UnknownOpcode(u16),
    #[error(transparent)]
    Truncated { source: CursorError },
}

/// A polygon, shared by the flat and texture mapped variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    /// A point on the polygon's plane.
    pub point: FixVector,
    pub normal: FixVector,
    /// Color of a flat polygon or bitmap of a texture mapped one.
    pub material: u16,
    /// Indices into the point table.
    pub vertices: Vec<u16>,
}

impl Polygon {
    /// Length of the fixed part plus the index list, which is padded to a multiple of 4 bytes.
    fn base_len(&self) -> usize {
        POLY_HEADER_LEN + ((self.vertices.len() & !1) + 1) * 2
    }
}

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Eof,
    /// Replaces the point table.
    DefPoints { points: Vec<FixVector> },
    /// Writes points into the point table starting at `start`.
    DefPointsStart { start: u16, points: Vec<FixVector> },
    FlatPoly(Polygon),
    /// Like [`Op::FlatPoly`], followed by per-vertex texture coordinates which are not decoded.
    TmapPoly(Polygon),
    /// A BSP node splitting space by a plane.
    SortNorm {
        normal: FixVector,
        point: FixVector,
        front: u16,
        back: u16,
    },
    RodBitmap,
    /// A call into a submodel.
    SubCall {
        anim: u16,
        offset: FixVector,
        target: u16,
    },
    Glow { index: u16 },
}

fn read_points(cursor: &mut Cursor, count: u16) -> Result<Vec<FixVector>, CursorError> {
    (0..count).map(|_| cursor.read_vector()).collect()
}

fn read_polygon(cursor: &mut Cursor, count: u16) -> Result<Polygon, CursorError> {
    let point = cursor.read_vector()?;
    let normal = cursor.read_vector()?;
    let material = cursor.read_u16()?;
    let vertices = (0..count)
        .map(|_| cursor.read_u16())
        .collect::<Result<_, _>>()?;

    Ok(Polygon {
        point,
        normal,
        material,
        vertices,
    })
}

impl Op {
    /// Decodes the instruction at `offset` in `data`.
    pub fn decode(data: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::at(data, offset);
        let raw = cursor.read_u16().context(DecodeCtx::Truncated)?;
        let opcode = Opcode::from_repr(raw).ok_or(DecodeError::UnknownOpcode(raw))?;

        let op = match opcode {
            Opcode::Eof => Op::Eof,
            Opcode::DefPoints => {
                let count = cursor.read_u16().context(DecodeCtx::Truncated)?;
                let points = read_points(&mut cursor, count).context(DecodeCtx::Truncated)?;
                Op::DefPoints { points }
            }
            Opcode::DefPointsStart => {
                let count = cursor.read_u16().context(DecodeCtx::Truncated)?;
                let start = cursor.read_u16().context(DecodeCtx::Truncated)?;
                cursor.skip(2).context(DecodeCtx::Truncated)?;
                let points = read_points(&mut cursor, count).context(DecodeCtx::Truncated)?;
                Op::DefPointsStart { start, points }
            }
            Opcode::FlatPoly | Opcode::TmapPoly => {
                let count = cursor.read_u16().context(DecodeCtx::Truncated)?;
                let polygon = read_polygon(&mut cursor, count).context(DecodeCtx::Truncated)?;
                if opcode == Opcode::FlatPoly {
                    Op::FlatPoly(polygon)
                } else {
                    Op::TmapPoly(polygon)
                }
            }
            Opcode::SortNorm => {
                cursor.skip(2).context(DecodeCtx::Truncated)?;
                let normal = cursor.read_vector().context(DecodeCtx::Truncated)?;
                let point = cursor.read_vector().context(DecodeCtx::Truncated)?;
                let front = cursor.read_u16().context(DecodeCtx::Truncated)?;
                let back = cursor.read_u16().context(DecodeCtx::Truncated)?;
                Op::SortNorm {
                    normal,
                    point,
                    front,
                    back,
                }
            }
            Opcode::RodBitmap => Op::RodBitmap,
            Opcode::SubCall => {
                let anim = cursor.read_u16().context(DecodeCtx::Truncated)?;
                let offset = cursor.read_vector().context(DecodeCtx::Truncated)?;
                let target = cursor.read_u16().context(DecodeCtx::Truncated)?;
                Op::SubCall {
                    anim,
                    offset,
                    target,
                }
            }
            Opcode::Glow => Op::Glow {
                index: cursor.read_u16().context(DecodeCtx::Truncated)?,
            },
        };

        Ok(op)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Op::Eof => Opcode::Eof,
            Op::DefPoints { .. } => Opcode::DefPoints,
            Op::DefPointsStart { .. } => Opcode::DefPointsStart,
            Op::FlatPoly(_) => Opcode::FlatPoly,
            Op::TmapPoly(_) => Opcode::TmapPoly,
            Op::SortNorm { .. } => Opcode::SortNorm,
            Op::RodBitmap => Opcode::RodBitmap,
            Op::SubCall { .. } => Opcode::SubCall,
            Op::Glow { .. } => Opcode::Glow,
        }
    }

    /// Length of this instruction in bytes, i.e. the distance to the next one.
    pub fn len(&self) -> usize {
        match self {
            Op::Eof => 2,
            Op::DefPoints { points } => 4 + points.len() * 12,
            Op::DefPointsStart { points, .. } => 8 + points.len() * 12,
            Op::FlatPoly(polygon) => polygon.base_len(),
            Op::TmapPoly(polygon) => polygon.base_len() + polygon.vertices.len() * UVL_LEN,
            Op::SortNorm { .. } => SORT_NORM_LEN,
            Op::RodBitmap => ROD_BITMAP_LEN,
            Op::SubCall { .. } => SUB_CALL_LEN,
            Op::Glow { .. } => GLOW_LEN,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{DecodeError, Op, Opcode, Polygon};
    use crate::testing::Assembler;
    use glam::Vec3;
    use pigfile::fix::FixVector;

    #[test]
    fn polygon_lengths() {
        let mut asm = Assembler::new();
        asm.flat_poly(Vec3::Z, &[0, 1, 2]);
        asm.flat_poly(Vec3::Z, &[0, 1, 2, 3]);
        asm.tmap_poly(Vec3::Z, &[0, 1, 2]);
        asm.eof();
        let code = asm.finish();

        let first = Op::decode(&code, 0).unwrap();
        assert_eq!(first.len(), 36);
        let Op::FlatPoly(Polygon { normal, vertices, .. }) = &first else {
            panic!("expected a flat polygon, got {first:?}");
        };
        assert_eq!(*normal, FixVector::from_vec3(Vec3::Z));
        assert_eq!(vertices, &[0, 1, 2]);

        let second = Op::decode(&code, 36).unwrap();
        assert_eq!(second.len(), 40);

        let third = Op::decode(&code, 76).unwrap();
        assert_eq!(third.opcode(), Opcode::TmapPoly);
        assert_eq!(third.len(), 36 + 3 * 12);

        assert_eq!(Op::decode(&code, 76 + 72).unwrap(), Op::Eof);
    }

    #[test]
    fn fixed_lengths() {
        let mut asm = Assembler::new();
        let node = asm.sort_norm(Vec3::X);
        let call = asm.sub_call();
        asm.rod_bitmap();
        asm.glow(3);
        asm.def_points_start(5, &[Vec3::ONE]);
        asm.patch_sort_norm(node, 0x40, 0x80);
        asm.patch_sub_call(call, 0x100);
        let code = asm.finish();

        let mut offset = 0;
        let mut ops = Vec::new();
        while offset < code.len() {
            let op = Op::decode(&code, offset).unwrap();
            offset += op.len();
            ops.push(op);
        }

        assert_eq!(offset, 32 + 20 + 36 + 4 + 20);
        assert!(matches!(
            ops[0],
            Op::SortNorm {
                front: 0x40,
                back: 0x80,
                ..
            }
        ));
        assert!(matches!(ops[1], Op::SubCall { target: 0xE0, .. }));
        assert_eq!(ops[2], Op::RodBitmap);
        assert_eq!(ops[3], Op::Glow { index: 3 });
        assert!(matches!(&ops[4], Op::DefPointsStart { start: 5, points } if points.len() == 1));
    }

    #[test]
    fn malformed() {
        let err = Op::decode(&[9, 0], 0).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownOpcode(9)));

        // a polygon whose index list runs past the end
        let mut asm = Assembler::new();
        asm.flat_poly(Vec3::Z, &[0, 1, 2]);
        let code = asm.finish();
        let err = Op::decode(&code[..32], 0).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));

        let err = Op::decode(&[1], 0).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }
}
