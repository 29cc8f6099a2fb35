//! Launcher icon composition.

use eyre_pretty::{Context, Result};
use image::{
    Pixel, Rgba, RgbaImage,
    imageops::{self, FilterType},
};
use std::path::{Path, PathBuf};

/// Size the ship is rendered at before being scaled down into icons.
pub const RENDER_SIZE: u32 = 512;

/// Size of the ship relative to the icon.
const SHIP_SCALE: f64 = 0.84;

/// Android density buckets and their launcher icon sizes.
pub const DENSITIES: [(&str, u32); 5] = [
    ("mipmap-mdpi", 48),
    ("mipmap-hdpi", 72),
    ("mipmap-xhdpi", 96),
    ("mipmap-xxhdpi", 144),
    ("mipmap-xxxhdpi", 192),
];

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const MARK_OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 220]);
const MARK_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// The plain ship.
    Descent,
    /// The ship with a "II" mark in the lower right corner.
    Descent2,
}

impl Variant {
    fn suffix(self) -> &'static str {
        match self {
            Variant::Descent => "",
            Variant::Descent2 => "_d2",
        }
    }

    pub fn default_preview(self) -> &'static Path {
        Path::new(match self {
            Variant::Descent => "/tmp/ship_icon_preview.png",
            Variant::Descent2 => "/tmp/ship_icon_d2_preview.png",
        })
    }
}

/// `size * factor`, rounded towards zero.
fn scaled(size: u32, factor: f64) -> i64 {
    (size as f64 * factor) as i64
}

/// A rectangle, inclusive of both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Rect {
    /// Replaces the pixels covered by the rectangle, clipped to the image.
    fn fill(self, image: &mut RgbaImage, color: Rgba<u8>) {
        let (width, height) = image.dimensions();
        let xs = self.x0.max(0)..=self.x1.min(width as i64 - 1);
        let ys = self.y0.max(0)..=self.y1.min(height as i64 - 1);

        for y in ys {
            for x in xs.clone() {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Layout of the "II" mark for a given icon size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomanTwo {
    pub height: i64,
    pub stroke: i64,
    pub serif: i64,
    pub serif_height: i64,
    pub gap: i64,
    pub outline: i64,
    /// Top left corner of the mark.
    pub x: i64,
    pub y: i64,
}

impl RomanTwo {
    pub fn new(size: u32) -> Self {
        let height = scaled(size, 0.38);
        let stroke = scaled(size, 0.07).max(2);
        let serif = ((stroke as f64 * 0.6) as i64).max(1);
        let serif_height = ((height as f64 * 0.08) as i64).max(1);
        let gap = scaled(size, 0.08).max(2);

        let mut mark = Self {
            height,
            stroke,
            serif,
            serif_height,
            gap,
            outline: scaled(size, 0.015).max(1),
            x: 0,
            y: 0,
        };

        mark.x = size as i64 - scaled(size, 0.10) - mark.width();
        mark.y = size as i64 - scaled(size, 0.08) - height;
        mark
    }

    pub fn width(&self) -> i64 {
        2 * (self.stroke + 2 * self.serif) + self.gap
    }

    /// The stroke and both serifs of a single "I" centered at `center`, grown by `expand` on
    /// every side.
    fn glyph(&self, center: i64, expand: i64) -> [Rect; 3] {
        let half = self.stroke / 2;
        let top = self.y;
        let bottom = self.y + self.height;

        let stroke = Rect {
            x0: center - half - expand,
            y0: top - expand,
            x1: center + half + expand,
            y1: bottom + expand,
        };

        let serif_x0 = center - half - self.serif - expand;
        let serif_x1 = center + half + self.serif + expand;

        [
            stroke,
            Rect {
                x0: serif_x0,
                y0: top - expand,
                x1: serif_x1,
                y1: top + self.serif_height + expand,
            },
            Rect {
                x0: serif_x0,
                y0: bottom - self.serif_height - expand,
                x1: serif_x1,
                y1: bottom + expand,
            },
        ]
    }

    /// Draws the mark onto a layer: a translucent dark outline with the white glyphs on top.
    pub fn draw(&self, layer: &mut RgbaImage) {
        for i in 0..2 {
            let center =
                self.x + i * (self.stroke + 2 * self.serif + self.gap) + self.serif + self.stroke / 2;

            for rect in self.glyph(center, self.outline) {
                rect.fill(layer, MARK_OUTLINE);
            }

            for rect in self.glyph(center, 0) {
                rect.fill(layer, MARK_FILL);
            }
        }
    }
}

/// Blends `top` over `bottom` with its top left corner at (`x`, `y`). Pixels of `bottom` that were
/// opaque stay fully opaque.
fn composite_over(bottom: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (tx, ty, pixel) in top.enumerate_pixels() {
        let Some(below) = bottom.get_pixel_mut_checked(x + tx, y + ty) else {
            continue;
        };

        let opaque = below.0[3] == u8::MAX;
        below.blend(pixel);
        if opaque {
            below.0[3] = u8::MAX;
        }
    }
}

fn add_mark(image: &mut RgbaImage) {
    let mut layer = RgbaImage::new(image.width(), image.height());
    RomanTwo::new(image.width()).draw(&mut layer);
    composite_over(image, &layer, 0, 0);
}

/// The render on an opaque black background, at its own size.
pub fn preview(render: &RgbaImage, variant: Variant) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(render.width(), render.height(), BACKGROUND);
    composite_over(&mut image, render, 0, 0);

    if variant == Variant::Descent2 {
        add_mark(&mut image);
    }

    image
}

/// A `size` by `size` launcher icon: the render scaled down and centered on black.
pub fn icon(render: &RgbaImage, size: u32, variant: Variant) -> RgbaImage {
    let ship_size = scaled(size, SHIP_SCALE) as u32;
    let ship = imageops::resize(render, ship_size, ship_size, FilterType::Lanczos3);
    let offset = (size - ship_size) / 2;

    let mut image = RgbaImage::from_pixel(size, size, BACKGROUND);
    composite_over(&mut image, &ship, offset, offset);

    if variant == Variant::Descent2 {
        add_mark(&mut image);
    }

    image
}

/// Every icon to generate for an Android resource directory, as (path, size) pairs.
pub fn targets(res: &Path, variant: Variant) -> Vec<(PathBuf, u32)> {
    let suffix = variant.suffix();
    let mut targets = DENSITIES
        .iter()
        .map(|&(folder, size)| (res.join(folder).join(format!("ic_launcher{suffix}.png")), size))
        .collect::<Vec<_>>();

    targets.push((
        res.join("..").join(format!("ic_launcher{suffix}_512.png")),
        RENDER_SIZE,
    ));

    targets
}

/// Writes an image as PNG, creating parent directories as needed.
pub fn save(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(
        "generated {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(())
}
