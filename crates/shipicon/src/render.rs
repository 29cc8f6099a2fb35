use eyre_pretty::{Context, ContextCompat, Result};
use image::RgbaImage;
use pigfile::{gamedata::GameData, polymodel::Polymodel};
use polyint::{Camera, InterpretError, Orientation};
use std::path::Path;

/// Reads the whole `.pig` file into memory.
pub fn read_pig(path: &Path) -> Result<Vec<u8>> {
    tracing::info!("reading {}", path.display());
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Picks the model to render: the one at `index` if given, the player ship otherwise.
pub fn select_model<'a, 'b>(
    data: &'b GameData<'a>,
    index: Option<usize>,
) -> Result<&'b Polymodel<'a>> {
    let model = match index {
        Some(index) => data
            .polymodels
            .get(index)
            .with_context(|| format!("no polygon model {index}"))?,
        None => data.player_model().with_context(|| {
            format!(
                "player ship model {} is out of range ({} models)",
                data.player_model_num(),
                data.polymodels.len()
            )
        })?,
    };

    tracing::info!(
        "model has {} submodels, {} bytes of bytecode",
        model.header.n_models,
        model.data.len()
    );

    Ok(model)
}

/// Renders a model into a transparent `size` by `size` canvas.
pub fn render_model(
    model: &Polymodel,
    orientation: Orientation,
    size: u32,
) -> Result<RgbaImage, InterpretError> {
    let camera = Camera::new(orientation);
    let draw_list = polyint::interpret_model(model, &camera)?;
    tracing::info!("{} polygons visible", draw_list.len());

    Ok(raster::rasterize(&draw_list, size))
}

#[cfg(test)]
mod test {
    use super::{render_model, select_model};
    use glam::Vec3;
    use pigfile::{gamedata::GameData, testing::ArchiveBuilder};
    use polyint::{Camera, Orientation, testing::Assembler};

    const TRIANGLE: [Vec3; 3] = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];

    fn triangle_program() -> Vec<u8> {
        let mut asm = Assembler::new();
        asm.def_points(&TRIANGLE);
        asm.flat_poly(Vec3::Z, &[0, 1, 2]);
        asm.eof();
        asm.finish()
    }

    #[test]
    fn triangle_end_to_end() {
        let pig = ArchiveBuilder::new()
            .robot_types(2)
            .bytecode(vec![0, 0])
            .bytecode(triangle_program())
            .player_model(1)
            .build();

        let data = GameData::parse(&pig).unwrap();
        let model = select_model(&data, None).unwrap();

        let draw_list = polyint::interpret_model(model, &Camera::default()).unwrap();
        assert_eq!(draw_list.len(), 1);
        assert_eq!(draw_list.polygons()[0].brightness, 1.0);

        let image = render_model(model, Orientation::default(), 64).unwrap();
        let opaque = image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] == 255)
            .map(|(x, y, _)| (x, y))
            .collect::<Vec<_>>();
        assert!(!opaque.is_empty());

        let min_x = opaque.iter().map(|p| p.0).min().unwrap();
        let max_x = opaque.iter().map(|p| p.0).max().unwrap();
        let min_y = opaque.iter().map(|p| p.1).min().unwrap();
        let max_y = opaque.iter().map(|p| p.1).max().unwrap();

        // inside the 8% margin, which is 5.12 pixels
        assert!(min_x >= 5 && min_y >= 5);
        assert!(max_x <= 58 && max_y <= 58);

        // and centered
        assert!((min_x + max_x + 1).abs_diff(64) <= 2);
        assert!((min_y + max_y + 1).abs_diff(64) <= 2);

        // the apex points up
        assert_eq!(image.get_pixel(32, 8).0[3], 255);
        assert_eq!(image.get_pixel(8, 8).0[3], 0);
        assert_eq!(image.get_pixel(8, 56).0[3], 255);
    }

    #[test]
    fn sort_norm_with_viewer_behind_plane() {
        let mut asm = Assembler::new();
        asm.def_points(&TRIANGLE);
        let node = asm.sort_norm(-Vec3::Z);
        asm.eof();

        let front = asm.offset();
        asm.flat_poly(Vec3::Z, &[0, 1, 2]);
        asm.eof();

        let back = asm.offset();
        asm.flat_poly(Vec3::new(0.0, 0.6, 0.8), &[2, 1, 0]);
        asm.eof();
        asm.patch_sort_norm(node, front, back);

        let pig = ArchiveBuilder::new().bytecode(asm.finish()).build();
        let data = GameData::parse(&pig).unwrap();
        let model = select_model(&data, Some(0)).unwrap();

        let draw_list = polyint::interpret_model(model, &Camera::default()).unwrap();
        let order = draw_list
            .iter()
            .map(|p| p.vertices[0])
            .collect::<Vec<_>>();

        // front child first, then back child
        assert_eq!(order, [TRIANGLE[0], TRIANGLE[2]]);
    }

    #[test]
    fn empty_program_renders_transparent() {
        let pig = ArchiveBuilder::new().bytecode(vec![0, 0]).build();
        let data = GameData::parse(&pig).unwrap();
        let model = select_model(&data, None).unwrap();

        let image = render_model(model, Orientation::new(0.3, 0.5, 0.0), 64).unwrap();
        assert_eq!(image.dimensions(), (64, 64));
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn missing_model() {
        let pig = ArchiveBuilder::new()
            .bytecode(vec![0, 0])
            .player_model(5)
            .build();
        let data = GameData::parse(&pig).unwrap();

        assert!(select_model(&data, None).is_err());
        assert!(select_model(&data, Some(1)).is_err());
        assert!(select_model(&data, Some(0)).is_ok());
    }
}
