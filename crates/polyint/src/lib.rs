//! An interpreter for polygon model bytecode.
//!
//! The bytecode of a model is a BSP tree. Interpreting it for a given camera yields the visible
//! polygons of the model, already rotated into view space, in back-to-front order.

pub mod camera;
pub mod interpreter;
pub mod op;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use camera::{Camera, Orientation};
pub use interpreter::{InterpretError, Interpreter, interpret, interpret_model};

use glam::Vec3;

/// A visible polygon, ready to be painted.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPolygon {
    /// Vertices in view space.
    pub vertices: Vec<Vec3>,
    /// Light intensity, where `1.0` is fully lit.
    pub brightness: f32,
}

/// Polygons in the order they must be painted, i.e. back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    polygons: Vec<DrawPolygon>,
}

impl DrawList {
    pub fn push(&mut self, polygon: DrawPolygon) {
        self.polygons.push(polygon);
    }

    pub fn polygons(&self) -> &[DrawPolygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawPolygon> {
        self.polygons.iter()
    }

    /// Iterates over every vertex of every polygon.
    pub fn vertices(&self) -> impl Iterator<Item = Vec3> {
        self.polygons.iter().flat_map(|p| p.vertices.iter().copied())
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawPolygon;
    type IntoIter = std::slice::Iter<'a, DrawPolygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
