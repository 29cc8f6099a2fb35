mod icon;
mod inspect;
mod paths;
mod render;

use clap::{Args as ClapArgs, Parser, Subcommand};
use eyre_pretty::{Context, Result, bail};
use icon::Variant;
use pigfile::gamedata::GameData;
use polyint::Orientation;
use std::path::PathBuf;

#[derive(Debug, ClapArgs)]
struct Source {
    /// Path to the .pig file
    ///
    /// Defaults to /build/descent/data/descent.pig, or ~/descent/descent/data/descent.pig if that
    /// does not exist.
    #[arg(long)]
    pig: Option<PathBuf>,
}

#[derive(Debug, ClapArgs)]
struct View {
    /// Rotation around the X axis, in radians
    #[arg(long, default_value_t = 0.3, allow_hyphen_values = true)]
    pitch: f32,
    /// Rotation around the Y axis, in radians
    #[arg(long, default_value_t = 0.5, allow_hyphen_values = true)]
    yaw: f32,
    /// Rotation around the Z axis, in radians
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    roll: f32,
}

impl View {
    fn orientation(&self) -> Orientation {
        Orientation::new(self.pitch, self.yaw, self.roll)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a polygon model into a transparent PNG
    Render {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        view: View,
        /// Path to the output file
        #[arg(short, long)]
        output: PathBuf,
        /// Width and height of the output, in pixels
        #[arg(long, default_value_t = icon::RENDER_SIZE)]
        size: u32,
        /// Index of the model to render. Defaults to the player ship
        #[arg(long)]
        model: Option<usize>,
    },
    /// Generate Android launcher icons from the player ship
    Icons {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        view: View,
        /// Generate the Descent II variant, with a "II" mark
        #[arg(long, default_value_t = false)]
        d2: bool,
        /// Path for the 512px preview image
        #[arg(long)]
        preview: Option<PathBuf>,
        /// Android resource directory
        ///
        /// Defaults to /build/dxx-android/app/src/main/res, or
        /// ~/descent/dxx-android/app/src/main/res if /build/dxx-android does not exist.
        #[arg(long)]
        res: Option<PathBuf>,
    },
    /// List the polygon models of a .pig file
    Inspect {
        #[command(flatten)]
        source: Source,
    },
}

/// Renders the player ship of Descent into app icons.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Action to take
    #[command(subcommand)]
    command: Command,
}

fn setup_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new(
        "shipicon=info,pigfile=info,polyint=info,raster=info",
    ));

    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter);

    subscriber.init();
}

fn render_to_file(
    source: Source,
    view: View,
    output: PathBuf,
    size: u32,
    model: Option<usize>,
) -> Result<()> {
    if size == 0 {
        bail!("output size must be at least one pixel");
    }

    let pig = render::read_pig(&paths::pig(source.pig))?;
    let data = GameData::parse(&pig).context("parsing game data")?;
    let model = render::select_model(&data, model)?;

    let image = render::render_model(model, view.orientation(), size).context("rendering model")?;
    icon::save(&image, &output)
}

fn generate_icons(
    source: Source,
    view: View,
    variant: Variant,
    preview: Option<PathBuf>,
    res: Option<PathBuf>,
) -> Result<()> {
    let pig = render::read_pig(&paths::pig(source.pig))?;
    let data = GameData::parse(&pig).context("parsing game data")?;
    let model = render::select_model(&data, None)?;

    let ship = render::render_model(model, view.orientation(), icon::RENDER_SIZE)
        .context("rendering player ship")?;

    let preview = preview.unwrap_or_else(|| variant.default_preview().to_owned());
    icon::save(&icon::preview(&ship, variant), &preview)?;

    let res = paths::res(res);
    let _span = tracing::info_span!("icons", res = %res.display()).entered();
    for (path, size) in icon::targets(&res, variant) {
        icon::save(&icon::icon(&ship, size, variant), &path)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    eyre_pretty::install()?;
    setup_tracing();

    let args = Args::parse();
    match args.command {
        Command::Render {
            source,
            view,
            output,
            size,
            model,
        } => render_to_file(source, view, output, size, model),
        Command::Icons {
            source,
            view,
            d2,
            preview,
            res,
        } => {
            let variant = if d2 { Variant::Descent2 } else { Variant::Descent };
            generate_icons(source, view, variant, preview, res)
        }
        Command::Inspect { source } => {
            let pig = render::read_pig(&paths::pig(source.pig))?;
            let data = GameData::parse(&pig).context("parsing game data")?;
            inspect::inspect(&data);

            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::Args;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }
}
