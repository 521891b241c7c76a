use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tiled_tileset::{ImageCheck, LoadOptions, TileSet};

#[derive(Parser, Debug)]
#[command(version, about = "Inspect and convert Tiled image-collection tilesets", long_about = None)]
struct Args {
    /// How to validate referenced images while loading
    #[arg(long, value_enum, default_value_t = Check::Exists, global = true)]
    check: Check,

    /// Accept tilesets whose `tilecount` disagrees with their tiles
    #[arg(long, global = true)]
    lenient_count: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print tileset attributes and every tile
    Show {
        /// Tileset file (.tsx, .tsj or .json)
        path: PathBuf,
    },
    /// Print the image of one tile
    Lookup {
        /// Tileset file
        path: PathBuf,
        /// Tile id
        id: u32,
    },
    /// Re-write a tileset, converting between TSX and JSON by extension
    Convert {
        /// Source tileset
        input: PathBuf,
        /// Destination tileset
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Check {
    Skip,
    Exists,
    Dimensions,
}

impl From<Check> for ImageCheck {
    fn from(check: Check) -> Self {
        match check {
            Check::Skip => ImageCheck::Skip,
            Check::Exists => ImageCheck::Exists,
            Check::Dimensions => ImageCheck::Dimensions,
        }
    }
}

fn load(path: &Path, opts: &LoadOptions) -> anyhow::Result<TileSet> {
    TileSet::load_with(path, opts).with_context(|| format!("Loading tileset {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();
    let opts = LoadOptions::new()
        .image_check(args.check.into())
        .strict_tile_count(!args.lenient_count);

    match args.command {
        Command::Show { path } => {
            let tileset = load(&path, &opts)?;
            let (tile_w, tile_h) = tileset.tile_size();
            let grid = tileset.grid();
            println!("name:     {}", tileset.name());
            println!("tiles:    {} (declared {})", tileset.len(), tileset.declared_tile_count());
            println!("size:     {tile_w}x{tile_h}");
            println!("grid:     {} {}x{}", grid.orientation, grid.width, grid.height);
            for (name, value) in tileset.properties().iter() {
                println!("property: {name} = {}", value.to_text());
            }
            for tile in tileset.tiles() {
                println!(
                    "{:>5}  {:>5}x{:<5}  {}",
                    tile.id, tile.image.width, tile.image.height, tile.image.source
                );
            }
        }
        Command::Lookup { path, id } => {
            let tileset = load(&path, &opts)?;
            let image = tileset
                .lookup(id)
                .with_context(|| format!("Looking up tile {id}"))?;
            println!("{} {}x{}", image.source, image.width, image.height);
            println!("{}", image.resolve(tileset.base_dir()).display());
        }
        Command::Convert { input, output } => {
            let tileset = load(&input, &opts)?;
            tileset
                .save(&output)
                .with_context(|| format!("Writing tileset {}", output.display()))?;
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                tiles = tileset.len(),
                "converted tileset"
            );
        }
    }

    Ok(())
}
