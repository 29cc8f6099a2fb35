//! Polygon models: a fixed-size header plus a blob of interpreter bytecode.

use crate::fix::{Fix, FixVector};
use binrw::{BinRead, BinWrite};

pub const MAX_SUBMODELS: usize = 10;
/// Size of a [`PolymodelHeader`] record in the file.
pub const POLYMODEL_HEADER_LEN: usize = 734;

/// Parent index marking a submodel without a parent.
const NO_PARENT: u8 = 0xFF;

/// The header of a polygon model.
///
/// Every field has a fixed width, so a decoded header always spans [`POLYMODEL_HEADER_LEN`]
/// bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PolymodelHeader {
    /// Number of submodels in use.
    #[brw(pad_after = 3)]
    pub n_models: u8,
    /// Length of the bytecode blob of this model.
    #[brw(pad_after = 4)]
    pub model_data_size: u32,
    /// Entry point of each submodel, as an offset into the bytecode blob.
    pub submodel_ptrs: [i32; MAX_SUBMODELS],
    pub submodel_offsets: [FixVector; MAX_SUBMODELS],
    pub submodel_norms: [FixVector; MAX_SUBMODELS],
    pub submodel_pnts: [FixVector; MAX_SUBMODELS],
    pub submodel_rads: [Fix; MAX_SUBMODELS],
    pub submodel_parents: [u8; MAX_SUBMODELS],
    pub submodel_mins: [FixVector; MAX_SUBMODELS],
    pub submodel_maxs: [FixVector; MAX_SUBMODELS],
    pub mins: FixVector,
    pub maxs: FixVector,
    /// Radius of the bounding sphere.
    pub rad: Fix,
    pub first_texture: u16,
    pub n_textures: u8,
    pub simpler_model: u8,
}

impl PolymodelHeader {
    /// Number of submodels in use, clamped to [`MAX_SUBMODELS`].
    pub fn submodel_count(&self) -> usize {
        (self.n_models as usize).min(MAX_SUBMODELS)
    }

    /// Entry points of the submodels in use.
    pub fn entry_points(&self) -> &[i32] {
        &self.submodel_ptrs[..self.submodel_count()]
    }

    pub fn submodel_tree(&self) -> SubmodelTree {
        SubmodelTree::new(&self.submodel_parents[..self.submodel_count()])
    }
}

/// A polygon model along with its bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polymodel<'a> {
    pub header: PolymodelHeader,
    pub data: &'a [u8],
}

/// The submodel hierarchy of a model, stored as a forest of parent indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmodelTree {
    parents: Vec<Option<usize>>,
}

impl SubmodelTree {
    /// Builds the forest from a flat parent array. A parent that is [`NO_PARENT`], out of range or
    /// equal to the submodel itself makes that submodel a root.
    pub fn new(parents: &[u8]) -> Self {
        let len = parents.len();
        let parents = parents
            .iter()
            .enumerate()
            .map(|(index, &parent)| {
                let parent = parent as usize;
                (parent != NO_PARENT as usize && parent < len && parent != index).then_some(parent)
            })
            .collect();

        Self { parents }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    pub fn roots(&self) -> impl Iterator<Item = usize> {
        self.parents
            .iter()
            .enumerate()
            .filter_map(|(index, parent)| parent.is_none().then_some(index))
    }

    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> {
        self.parents
            .iter()
            .enumerate()
            .filter_map(move |(child, parent)| (*parent == Some(index)).then_some(child))
    }
}
