use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::TilesetError;
use crate::ir_tileset::{IrGrid, IrTileset};
use crate::loader::{json_loader, tsx_loader};
use crate::options::{ImageCheck, LoadOptions};
use crate::properties::Properties;

/// Grid orientation of a tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Rectangular cells
    #[default]
    Orthogonal,
    /// Diamond cells
    Isometric,
}

impl Orientation {
    /// Name used in Tiled documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Orthogonal => "orthogonal",
            Orientation::Isometric => "isometric",
        }
    }
}

impl FromStr for Orientation {
    type Err = TilesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orthogonal" => Ok(Orientation::Orthogonal),
            "isometric" => Ok(Orientation::Isometric),
            other => Err(TilesetError::InvalidTileset(format!(
                "unknown grid orientation '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How tile images relate to map placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Cell orientation
    pub orientation: Orientation,
    /// Cell width in pixels
    pub width: u32,
    /// Cell height in pixels
    pub height: u32,
}

/// One whole image referenced by a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Path exactly as written in the document, relative to it
    pub source: String,
    /// Declared pixel width
    pub width: u32,
    /// Declared pixel height
    pub height: u32,
}

impl ImageReference {
    /// Path of the image resolved against the directory of its tileset.
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.source)
    }
}

/// A catalog entry: an id paired with its image.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDefinition {
    /// Id, unique within the tileset
    pub id: u32,
    /// The tile's image
    pub image: ImageReference,
    /// Tiled class (`type` attribute), if any
    pub class: Option<String>,
    /// Custom properties
    pub properties: Properties,
}

/// An image-collection tileset, immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSet {
    name: String,
    version: Option<String>,
    tiled_version: Option<String>,
    tile_w: u32,
    tile_h: u32,
    tilecount: u32,
    columns: u32,
    grid: Option<Grid>,
    properties: Properties,
    tiles: Vec<TileDefinition>, // sorted by id
    base_dir: PathBuf,
}

enum Format {
    Tsx,
    Json,
}

fn format_for(path: &Path) -> Result<Format, TilesetError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tsx") | Some("xml") => Ok(Format::Tsx),
        Some("json") | Some("tsj") => Ok(Format::Json),
        _ => Err(TilesetError::UnsupportedFormat(path.display().to_string())),
    }
}

fn base_dir_of(path: &Path) -> PathBuf {
    path.parent()
        .filter(|d| !d.as_os_str().is_empty())
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"))
}

impl TileSet {
    /// Loads a `.tsx` or `.json`/`.tsj` tileset with default [`LoadOptions`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TilesetError> {
        Self::load_with(path, &LoadOptions::default())
    }

    /// Loads a tileset file; the format follows the file extension.
    pub fn load_with<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<Self, TilesetError> {
        let path = path.as_ref();
        let format = format_for(path)?;

        let txt = std::fs::read_to_string(path).map_err(|source| TilesetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ir = match format {
            Format::Tsx => tsx_loader::decode_tsx_to_ir(&txt, path)?,
            Format::Json => json_loader::decode_json_to_ir(&txt, path)?,
        };

        let tileset = Self::from_ir(ir, &base_dir_of(path), opts)?;
        tracing::debug!(
            path = %path.display(),
            name = %tileset.name,
            tiles = tileset.tiles.len(),
            "loaded tileset"
        );
        Ok(tileset)
    }

    /// Parses an in-memory TSX document; images resolve against `base_dir`.
    pub fn from_tsx_str<P: AsRef<Path>>(
        xml: &str,
        base_dir: P,
        opts: &LoadOptions,
    ) -> Result<Self, TilesetError> {
        let ir = tsx_loader::decode_tsx_to_ir(xml, Path::new("<inline>"))?;
        Self::from_ir(ir, base_dir.as_ref(), opts)
    }

    /// Parses an in-memory JSON tileset; images resolve against `base_dir`.
    pub fn from_json_str<P: AsRef<Path>>(
        json: &str,
        base_dir: P,
        opts: &LoadOptions,
    ) -> Result<Self, TilesetError> {
        let ir = json_loader::decode_json_to_ir(json, Path::new("<inline>"))?;
        Self::from_ir(ir, base_dir.as_ref(), opts)
    }

    pub(crate) fn from_ir(
        ir: IrTileset,
        base_dir: &Path,
        opts: &LoadOptions,
    ) -> Result<Self, TilesetError> {
        if let Some(image) = ir.atlas_image {
            return Err(TilesetError::InvalidTileset(format!(
                "'{}' is an atlas tileset (image {image}); only image collections are supported",
                ir.name
            )));
        }

        let grid = ir
            .grid
            .map(|IrGrid { orientation, width, height }| -> Result<Grid, TilesetError> {
                Ok(Grid {
                    orientation: orientation.parse()?,
                    width,
                    height,
                })
            })
            .transpose()?;

        let mut seen = HashSet::with_capacity(ir.tiles.len());
        let mut tiles = Vec::with_capacity(ir.tiles.len());
        for (index, tile) in ir.tiles.into_iter().enumerate() {
            let id = tile.id.ok_or(TilesetError::MissingTileId { index })?;
            if !seen.insert(id) {
                return Err(TilesetError::DuplicateTileId { id });
            }

            let image = tile.image.ok_or(TilesetError::MissingImage { id })?;
            if image.source.is_empty() {
                return Err(TilesetError::EmptyImageSource { id });
            }
            let width = image.width.unwrap_or(0);
            let height = image.height.unwrap_or(0);
            if width == 0 || height == 0 {
                return Err(TilesetError::InvalidImageSize { id, width, height });
            }

            tiles.push(TileDefinition {
                id,
                image: ImageReference {
                    source: image.source,
                    width,
                    height,
                },
                class: tile.class,
                properties: tile.properties,
            });
        }

        if ir.tilecount as usize != tiles.len() {
            if opts.strict_tile_count {
                return Err(TilesetError::TileCountMismatch {
                    declared: ir.tilecount,
                    found: tiles.len(),
                });
            }
            tracing::warn!(
                tileset = %ir.name,
                declared = ir.tilecount,
                found = tiles.len(),
                "tilecount disagrees with tile entries"
            );
        }

        // Tiled writes tiles in id order; sort anyway so lookup can bisect
        tiles.sort_unstable_by_key(|t| t.id);

        for tile in &tiles {
            check_image(tile, base_dir, opts.image_check)?;
        }

        Ok(Self {
            name: ir.name,
            version: ir.version,
            tiled_version: ir.tiled_version,
            tile_w: ir.tile_w,
            tile_h: ir.tile_h,
            tilecount: ir.tilecount,
            columns: ir.columns,
            grid,
            properties: ir.properties,
            tiles,
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Image of tile `id`.
    ///
    /// Fails with [`TilesetError::TileOutOfRange`] past the largest id and
    /// [`TilesetError::UnknownTileId`] for a gap inside the id range.
    pub fn lookup(&self, id: u32) -> Result<&ImageReference, TilesetError> {
        match self.tiles.binary_search_by_key(&id, |t| t.id) {
            Ok(idx) => Ok(&self.tiles[idx].image),
            Err(idx) if idx == self.tiles.len() => Err(TilesetError::TileOutOfRange {
                id,
                tileset: self.name.clone(),
                count: self.tiles.len(),
            }),
            Err(_) => Err(TilesetError::UnknownTileId {
                id,
                tileset: self.name.clone(),
            }),
        }
    }

    /// Full definition of tile `id`.
    pub fn tile(&self, id: u32) -> Option<&TileDefinition> {
        self.tiles
            .binary_search_by_key(&id, |t| t.id)
            .ok()
            .map(|idx| &self.tiles[idx])
    }

    /// Image path of tile `id`, resolved against the tileset's directory.
    pub fn image_path(&self, id: u32) -> Result<PathBuf, TilesetError> {
        Ok(self.lookup(id)?.resolve(&self.base_dir))
    }

    /// Tiles in ascending id order.
    pub fn tiles(&self) -> impl Iterator<Item = &TileDefinition> {
        self.tiles.iter()
    }

    /// Tile ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// `true` for a tileset without tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tileset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tiled format version, if declared.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Version of the Tiled editor that wrote the document, if declared.
    pub fn tiled_version(&self) -> Option<&str> {
        self.tiled_version.as_deref()
    }

    /// Maximum tile size in pixels, as `(width, height)`.
    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_w, self.tile_h)
    }

    /// Declared `tilecount`.
    pub fn declared_tile_count(&self) -> u32 {
        self.tilecount
    }

    /// Declared `columns` (0 for image collections).
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Effective grid; orthogonal at tile size when the document has none.
    pub fn grid(&self) -> Grid {
        self.grid.unwrap_or(Grid {
            orientation: Orientation::Orthogonal,
            width: self.tile_w,
            height: self.tile_h,
        })
    }

    /// Grid exactly as declared in the document.
    pub fn declared_grid(&self) -> Option<Grid> {
        self.grid
    }

    /// Tileset-level custom properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Directory that relative image paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Serialises as a TSX document.
    pub fn to_tsx_string(&self) -> Result<String, TilesetError> {
        tsx_loader::encode_tsx(self)
    }

    /// Serialises as a Tiled JSON tileset.
    pub fn to_json_string(&self) -> Result<String, TilesetError> {
        json_loader::encode_json(self)
    }

    /// Writes the tileset; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TilesetError> {
        let path = path.as_ref();
        let txt = match format_for(path)? {
            Format::Tsx => self.to_tsx_string()?,
            Format::Json => self.to_json_string()?,
        };
        std::fs::write(path, txt).map_err(|source| TilesetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), tiles = self.tiles.len(), "saved tileset");
        Ok(())
    }
}

fn check_image(
    tile: &TileDefinition,
    base_dir: &Path,
    check: ImageCheck,
) -> Result<(), TilesetError> {
    if check == ImageCheck::Skip {
        return Ok(());
    }

    let path = tile.image.resolve(base_dir);
    if !path.is_file() {
        return Err(TilesetError::ImageNotFound { id: tile.id, path });
    }

    if check == ImageCheck::Dimensions {
        let actual = image::image_dimensions(&path)
            .map_err(|source| TilesetError::Image { path: path.clone(), source })?;
        let declared = (tile.image.width, tile.image.height);
        if actual != declared {
            return Err(TilesetError::ImageSizeMismatch {
                id: tile.id,
                declared,
                actual,
            });
        }
        tracing::debug!(id = tile.id, path = %path.display(), "image size verified");
    }
    Ok(())
}
