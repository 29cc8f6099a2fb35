use crate::{
    Camera, DrawList, DrawPolygon,
    op::{DecodeError, Op, Polygon},
};
use easyerr::Error;
use glam::Vec3;
use pigfile::polymodel::Polymodel;

/// Maximum nesting of BSP nodes and submodel calls.
pub const MAX_DEPTH: usize = 256;

/// Light received by a polygon regardless of where it faces.
const AMBIENT: f32 = 0.75;
/// Extra light received by a polygon facing the viewer head on.
const DIRECTIONAL: f32 = 0.25;

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("bytecode nests deeper than {limit} levels at offset 0x{offset:X}")]
    TooDeep { limit: usize, offset: usize },
}

/// Walks the bytecode of a model, collecting visible polygons in back-to-front order.
pub struct Interpreter<'a> {
    code: &'a [u8],
    camera: &'a Camera,
    points: Vec<Vec3>,
    draw_list: DrawList,
}

impl<'a> Interpreter<'a> {
    pub fn new(code: &'a [u8], camera: &'a Camera) -> Self {
        Self {
            code,
            camera,
            points: Vec::new(),
            draw_list: DrawList::default(),
        }
    }

    /// Interprets the bytecode starting at `entry` and returns the resulting draw list.
    pub fn run(mut self, entry: usize) -> Result<DrawList, InterpretError> {
        self.exec(entry, 0)?;
        Ok(self.draw_list)
    }

    fn polygon(&mut self, polygon: &Polygon) {
        let facing = self.camera.facing(polygon.normal.to_vec3());

        // indices past the point table are dropped
        let vertices = polygon
            .vertices
            .iter()
            .filter_map(|&index| self.points.get(index as usize).copied())
            .collect::<Vec<_>>();

        if vertices.len() < 3 || facing <= 0.0 {
            return;
        }

        let vertices = vertices
            .into_iter()
            .map(|v| self.camera.rotate(v))
            .collect();

        self.draw_list.push(DrawPolygon {
            vertices,
            brightness: AMBIENT + DIRECTIONAL * facing,
        });
    }

    fn exec(&mut self, mut offset: usize, depth: usize) -> Result<(), InterpretError> {
        if depth > MAX_DEPTH {
            return Err(InterpretError::TooDeep {
                limit: MAX_DEPTH,
                offset,
            });
        }

        loop {
            let op = match Op::decode(self.code, offset) {
                Ok(op) => op,
                Err(DecodeError::Truncated { .. }) if offset + 2 > self.code.len() => {
                    // ran off the end of the bytecode
                    return Ok(());
                }
                Err(err) => {
                    tracing::warn!("stopping at offset 0x{offset:X}: {err}");
                    return Ok(());
                }
            };

            match &op {
                Op::Eof => return Ok(()),
                Op::DefPoints { points } => {
                    self.points.clear();
                    self.points.extend(points.iter().map(|p| p.to_vec3()));
                }
                Op::DefPointsStart { start, points } => {
                    let start = *start as usize;
                    let end = start + points.len();
                    if self.points.len() < end {
                        self.points.resize(end, Vec3::ZERO);
                    }

                    for (slot, point) in self.points[start..end].iter_mut().zip(points) {
                        *slot = point.to_vec3();
                    }
                }
                Op::FlatPoly(polygon) | Op::TmapPoly(polygon) => self.polygon(polygon),
                Op::SortNorm {
                    normal,
                    front,
                    back,
                    ..
                } => {
                    let front = offset + *front as usize;
                    let back = offset + *back as usize;

                    // paint whatever is on the far side of the plane first
                    if self.camera.facing(normal.to_vec3()) > 0.0 {
                        self.exec(back, depth + 1)?;
                        self.exec(front, depth + 1)?;
                    } else {
                        self.exec(front, depth + 1)?;
                        self.exec(back, depth + 1)?;
                    }
                }
                Op::SubCall { target, .. } => {
                    self.exec(offset + *target as usize, depth + 1)?;
                }
                Op::RodBitmap | Op::Glow { .. } => (),
            }

            offset += op.len();
        }
    }
}

/// Interprets `code` starting at the first submodel entry point.
///
/// An empty or malformed program is not an error: it just yields fewer (or no) polygons.
pub fn interpret(
    code: &[u8],
    entry_points: &[i32],
    camera: &Camera,
) -> Result<DrawList, InterpretError> {
    let Some(&entry) = entry_points.first() else {
        return Ok(DrawList::default());
    };

    let entry = match usize::try_from(entry) {
        Ok(entry) if entry < code.len() => entry,
        _ => {
            tracing::warn!("entry point {entry} is outside of the bytecode");
            return Ok(DrawList::default());
        }
    };

    let _span = tracing::info_span!("interpreting", entry, len = code.len()).entered();
    let draw_list = Interpreter::new(code, camera).run(entry)?;
    tracing::debug!("{} polygons visible", draw_list.len());

    Ok(draw_list)
}

/// Interprets the bytecode of a polygon model.
pub fn interpret_model(model: &Polymodel, camera: &Camera) -> Result<DrawList, InterpretError> {
    interpret(model.data, model.header.entry_points(), camera)
}
