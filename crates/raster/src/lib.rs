//! Orthographic projection and rasterization of draw lists.
//!
//! The draw list is projected onto the XY plane, scaled uniformly to fit a square canvas with a
//! margin and painted in order with flat gray shading. Each polygon is filled and its outline
//! stroked, so polygons seen edge-on still leave a line of pixels.

pub mod fill;

use glam::{Vec2, Vec3, Vec3Swizzles};
use image::{Rgba, RgbaImage, imageops};
use polyint::DrawList;

pub use fill::{fill_polygon, stroke_polygon};

/// Margin around the model, as a fraction of the canvas size.
pub const MARGIN: f32 = 0.08;

/// Axis aligned bounds of projected vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Bounds of every vertex in the draw list, ignoring depth. Returns `None` if the draw list has
    /// no vertices.
    pub fn of(draw_list: &DrawList) -> Option<Self> {
        draw_list.vertices().map(|v| v.xy()).fold(None, |bounds, p| {
            Some(match bounds {
                None => Self { min: p, max: p },
                Some(Self { min, max }) => Self {
                    min: min.min(p),
                    max: max.max(p),
                },
            })
        })
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Size of the bounds. Axes with no extent count as having an extent of 1.
    pub fn extent(&self) -> Vec2 {
        let extent = self.max - self.min;
        Vec2::select(extent.cmpeq(Vec2::ZERO), Vec2::ONE, extent)
    }
}

/// Maps view space to canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub scale: f32,
    pub offset: Vec2,
}

impl Fit {
    /// Computes the uniform scale and offset that center `bounds` in a `size` sized canvas with a
    /// [`MARGIN`] on every side.
    pub fn new(bounds: Bounds, size: u32) -> Self {
        let size = size as f32;
        let usable = size - 2.0 * size * MARGIN;
        let scale = (Vec2::splat(usable) / bounds.extent()).min_element();
        let offset = Vec2::splat(size / 2.0) - bounds.center() * scale;

        Self { scale, offset }
    }

    pub fn apply(&self, vertex: Vec3) -> Vec2 {
        vertex.xy() * self.scale + self.offset
    }
}

/// The opaque gray a polygon of the given brightness is painted with.
pub fn shade(brightness: f32) -> Rgba<u8> {
    let value = (255.0 * brightness).clamp(0.0, 255.0) as u8;
    Rgba([value, value, value, 255])
}

/// Paints a draw list into a transparent `size` by `size` canvas.
///
/// Polygons are painted in draw list order, later ones covering earlier ones. The Y axis points up,
/// so the first row of the result is the top of the model.
pub fn rasterize(draw_list: &DrawList, size: u32) -> RgbaImage {
    let mut image = RgbaImage::new(size, size);
    let Some(bounds) = Bounds::of(draw_list) else {
        tracing::debug!("nothing to rasterize");
        return image;
    };

    let fit = Fit::new(bounds, size);
    tracing::debug!(?bounds, ?fit, "rasterizing {} polygons", draw_list.len());

    let mut points = Vec::new();
    for polygon in draw_list {
        points.clear();
        points.extend(polygon.vertices.iter().map(|&v| fit.apply(v)));
        let color = shade(polygon.brightness);
        fill_polygon(&mut image, &points, color);
        stroke_polygon(&mut image, &points, color);
    }

    imageops::flip_vertical_in_place(&mut image);
    image
}

#[cfg(test)]
mod test {
    use super::{Bounds, Fit, rasterize, shade};
    use glam::{Vec2, Vec3};
    use image::{Rgba, RgbaImage};
    use polyint::{DrawList, DrawPolygon};

    fn square(center: Vec2, half: f32, brightness: f32) -> DrawPolygon {
        let vertices = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .into_iter()
            .map(|(x, y)| (center + Vec2::new(x, y) * half).extend(0.0))
            .collect();

        DrawPolygon {
            vertices,
            brightness,
        }
    }

    fn draw_list(polygons: impl IntoIterator<Item = DrawPolygon>) -> DrawList {
        let mut list = DrawList::default();
        for polygon in polygons {
            list.push(polygon);
        }
        list
    }

    /// Inclusive bounds of the opaque pixels, as (min x, min y, max x, max y).
    fn opaque_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
        image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] != 0)
            .fold(None, |acc, (x, y, _)| {
                Some(match acc {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                })
            })
    }

    #[test]
    fn empty_draw_list_is_transparent() {
        let image = rasterize(&DrawList::default(), 64);
        assert_eq!(image.dimensions(), (64, 64));
        assert!(image.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn shading() {
        assert_eq!(shade(1.0), Rgba([255, 255, 255, 255]));
        assert_eq!(shade(0.5), Rgba([127, 127, 127, 255]));
        assert_eq!(shade(1.5), Rgba([255, 255, 255, 255]));
        assert_eq!(shade(-0.5), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        let bounds = Bounds {
            min: Vec2::new(-4.0, -1.0),
            max: Vec2::new(4.0, 1.0),
        };

        let fit = Fit::new(bounds, 100);
        assert!((fit.scale - 84.0 / 8.0).abs() < 1e-4);
        assert!(fit.apply(Vec3::new(-4.0, 0.0, 7.0)).abs_diff_eq(Vec2::new(8.0, 50.0), 1e-4));
        assert!(fit.apply(Vec3::new(4.0, 1.0, 0.0)).abs_diff_eq(Vec2::new(92.0, 60.5), 1e-4));
    }

    #[test]
    fn flat_bounds_do_not_divide_by_zero() {
        let bounds = Bounds {
            min: Vec2::new(2.0, 3.0),
            max: Vec2::new(2.0, 3.0),
        };

        assert_eq!(bounds.extent(), Vec2::ONE);
        let fit = Fit::new(bounds, 10);
        assert!(fit.scale.is_finite());
        assert!(fit.apply(Vec3::new(2.0, 3.0, 0.0)).abs_diff_eq(Vec2::splat(5.0), 1e-4));
    }

    #[test]
    fn square_is_centered_with_margin() {
        let image = rasterize(&draw_list([square(Vec2::new(10.0, -3.0), 2.0, 1.0)]), 64);

        // the margin is 5.12 pixels on every side
        assert_eq!(opaque_bounds(&image), Some((5, 5, 58, 58)));
        assert_eq!(*image.get_pixel(32, 32), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn later_polygons_cover_earlier_ones() {
        let list = draw_list([
            square(Vec2::ZERO, 1.0, 0.5),
            square(Vec2::ZERO, 0.5, 1.0),
        ]);

        let image = rasterize(&list, 64);
        assert_eq!(image.get_pixel(32, 32).0[0], 255);
        assert_eq!(image.get_pixel(8, 8).0[0], 127);
    }

    #[test]
    fn thin_polygons_survive() {
        // a sliver between two pixel columns, in front of a gray square
        let sliver = DrawPolygon {
            vertices: vec![
                Vec3::new(0.52, -1.0, 0.0),
                Vec3::new(0.53, -1.0, 0.0),
                Vec3::new(0.53, 1.0, 0.0),
                Vec3::new(0.52, 1.0, 0.0),
            ],
            brightness: 1.0,
        };

        let image = rasterize(&draw_list([square(Vec2::ZERO, 1.0, 0.5), sliver]), 64);
        let white = image.pixels().filter(|p| p.0[0] == 255).count();
        assert!(white >= 50);
        assert_eq!(image.get_pixel(32, 32).0[0], 127);
    }

    #[test]
    fn y_points_up() {
        // a wide bar along the top of the model and a small square in the middle to set the bounds
        let list = draw_list([
            square(Vec2::new(0.0, -1.0), 0.1, 1.0),
            DrawPolygon {
                vertices: vec![
                    Vec3::new(-1.0, 0.8, 0.0),
                    Vec3::new(1.0, 0.8, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                    Vec3::new(-1.0, 1.0, 0.0),
                ],
                brightness: 1.0,
            },
        ]);

        let image = rasterize(&list, 64);
        assert_eq!(image.get_pixel(10, 6).0[3], 255);
        assert_eq!(image.get_pixel(10, 57).0[3], 0);
    }
}
