//! Scanline polygon filling.
//!
//! Pixels are sampled at their centers: a pixel is filled if its center lies inside the polygon,
//! using the non-zero winding rule. Top and left edges are inclusive, bottom and right edges are
//! not, so polygons sharing an edge never overlap.
//!
//! Polygons thinner than a pixel may cover no pixel center at all. [`stroke_polygon`] paints the
//! pixels the outline passes through, so they stay visible.

use glam::Vec2;
use image::{Rgba, RgbaImage};

/// A non-horizontal polygon edge, stored top to bottom.
#[derive(Debug, Clone, Copy)]
struct Edge {
    top: Vec2,
    bottom: Vec2,
    winding: i32,
}

impl Edge {
    fn new(a: Vec2, b: Vec2) -> Option<Self> {
        if a.y == b.y {
            return None;
        }

        Some(if a.y < b.y {
            Self {
                top: a,
                bottom: b,
                winding: 1,
            }
        } else {
            Self {
                top: b,
                bottom: a,
                winding: -1,
            }
        })
    }

    /// X coordinate where the edge crosses the horizontal line at `y`, if it does.
    fn crossing(&self, y: f32) -> Option<f32> {
        if y < self.top.y || y >= self.bottom.y {
            return None;
        }

        let t = (y - self.top.y) / (self.bottom.y - self.top.y);
        Some(self.top.x + t * (self.bottom.x - self.top.x))
    }
}

/// Fills a polygon with a solid color, overwriting whatever is below it.
pub fn fill_polygon(image: &mut RgbaImage, points: &[Vec2], color: Rgba<u8>) {
    if points.len() < 3 {
        return;
    }

    let edges = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .filter_map(|(&a, &b)| Edge::new(a, b))
        .collect::<Vec<_>>();

    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), p| {
            (min.min(p.y), max.max(p.y))
        });

    let (width, height) = image.dimensions();
    let first_row = (min_y - 0.5).ceil().max(0.0) as u32;
    let last_row = (max_y - 0.5).ceil().clamp(0.0, height as f32) as u32;

    let mut crossings = Vec::with_capacity(edges.len());
    for row in first_row..last_row {
        let y = row as f32 + 0.5;

        crossings.clear();
        crossings.extend(
            edges
                .iter()
                .filter_map(|edge| edge.crossing(y).map(|x| (x, edge.winding))),
        );
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0;
        for pair in crossings.windows(2) {
            let [(start, w), (end, _)] = [pair[0], pair[1]];
            winding += w;
            if winding == 0 {
                continue;
            }

            let first_col = (start - 0.5).ceil().max(0.0) as u32;
            let last_col = (end - 0.5).ceil().clamp(0.0, width as f32) as u32;
            for col in first_col..last_col {
                image.put_pixel(col, row, color);
            }
        }
    }
}

/// Paints every pixel the outline of a polygon passes through, closing edge included.
pub fn stroke_polygon(image: &mut RgbaImage, points: &[Vec2], color: Rgba<u8>) {
    let (width, height) = image.dimensions();
    let size = Vec2::new(width as f32, height as f32);

    for (&a, &b) in points.iter().zip(points.iter().cycle().skip(1)) {
        let delta = b - a;
        if !delta.is_finite() {
            continue;
        }

        // at most one pixel per step on either axis
        let steps = delta.abs().max_element().ceil().max(1.0) as u32;
        for step in 0..=steps {
            let p = a.lerp(b, step as f32 / steps as f32).floor();
            if p.cmpge(Vec2::ZERO).all() && p.cmplt(size).all() {
                image.put_pixel(p.x as u32, p.y as u32, color);
            }
        }
    }
}
