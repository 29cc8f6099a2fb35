//! A tiny assembler for polygon model bytecode.

use crate::op::Opcode;
use glam::Vec3;
use pigfile::fix::FixVector;

#[derive(Debug, Clone, Default)]
pub struct Assembler {
    code: Vec<u8>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the next instruction.
    pub fn offset(&self) -> usize {
        self.code.len()
    }

    pub fn u16(&mut self, value: u16) {
        self.code.extend_from_slice(&value.to_le_bytes());
    }

    fn vector(&mut self, value: Vec3) {
        let FixVector { x, y, z } = FixVector::from_vec3(value);
        for fix in [x, y, z] {
            self.code.extend_from_slice(&fix.0.to_le_bytes());
        }
    }

    fn opcode(&mut self, opcode: Opcode) -> usize {
        let offset = self.offset();
        self.u16(opcode as u16);
        offset
    }

    fn patch(&mut self, at: usize, node: usize, target: usize) {
        let relative = u16::try_from(target - node).unwrap();
        self.code[at..][..2].copy_from_slice(&relative.to_le_bytes());
    }

    pub fn eof(&mut self) {
        self.opcode(Opcode::Eof);
    }

    pub fn def_points(&mut self, points: &[Vec3]) {
        self.opcode(Opcode::DefPoints);
        self.u16(points.len() as u16);
        for &point in points {
            self.vector(point);
        }
    }

    pub fn def_points_start(&mut self, start: u16, points: &[Vec3]) {
        self.opcode(Opcode::DefPointsStart);
        self.u16(points.len() as u16);
        self.u16(start);
        self.u16(0);
        for &point in points {
            self.vector(point);
        }
    }

    fn polygon(&mut self, opcode: Opcode, normal: Vec3, vertices: &[u16]) {
        self.opcode(opcode);
        self.u16(vertices.len() as u16);
        self.vector(Vec3::ZERO);
        self.vector(normal);
        self.u16(0);
        for &index in vertices {
            self.u16(index);
        }

        if vertices.len() % 2 == 0 {
            self.u16(0);
        }
    }

    pub fn flat_poly(&mut self, normal: Vec3, vertices: &[u16]) {
        self.polygon(Opcode::FlatPoly, normal, vertices);
    }

    pub fn tmap_poly(&mut self, normal: Vec3, vertices: &[u16]) {
        self.polygon(Opcode::TmapPoly, normal, vertices);
        for _ in vertices {
            // u, v, l
            self.vector(Vec3::new(0.5, 0.5, 1.0));
        }
    }

    /// Emits a BSP node with both children at offset zero. Returns the offset of the node, to be
    /// given to [`Assembler::patch_sort_norm`].
    pub fn sort_norm(&mut self, normal: Vec3) -> usize {
        let node = self.opcode(Opcode::SortNorm);
        self.u16(0);
        self.vector(normal);
        self.vector(Vec3::ZERO);
        self.u16(0);
        self.u16(0);
        node
    }

    /// Points the children of the node at `node` to the given absolute offsets.
    pub fn patch_sort_norm(&mut self, node: usize, front: usize, back: usize) {
        self.patch(node + 28, node, front);
        self.patch(node + 30, node, back);
    }

    /// Emits a submodel call. Returns the offset of the call, to be given to
    /// [`Assembler::patch_sub_call`].
    pub fn sub_call(&mut self) -> usize {
        let node = self.opcode(Opcode::SubCall);
        self.u16(0);
        self.vector(Vec3::ZERO);
        self.u16(0);
        self.u16(0);
        node
    }

    pub fn patch_sub_call(&mut self, node: usize, target: usize) {
        self.patch(node + 16, node, target);
    }

    pub fn rod_bitmap(&mut self) {
        self.opcode(Opcode::RodBitmap);
        self.code.resize(self.code.len() + 34, 0);
    }

    pub fn glow(&mut self, index: u16) {
        self.opcode(Opcode::Glow);
        self.u16(index);
    }

    pub fn finish(self) -> Vec<u8> {
        self.code
    }
}
