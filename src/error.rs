use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for loading, querying and writing tilesets
#[derive(Debug, Error)]
pub enum TilesetError {
    /// File I/O error
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The TSX document is not well-formed or does not match the tileset schema
    #[error("Failed to parse TSX {}: {source}", .path.display())]
    Xml {
        /// Document origin
        path: PathBuf,
        /// Underlying error
        source: quick_xml::DeError,
    },

    /// The JSON document is not well-formed or does not match the tileset schema
    #[error("Failed to parse JSON {}: {source}", .path.display())]
    Json {
        /// Document origin
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// Unsupported file format (neither TSX nor JSON)
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Structurally valid document describing something this crate does not model
    #[error("Invalid tileset: {0}")]
    InvalidTileset(String),

    /// A `<tile>` entry without an `id`
    #[error("Tile entry #{index} has no id")]
    MissingTileId {
        /// Position of the entry in the document
        index: usize,
    },

    /// Two tile entries share an id
    #[error("Duplicate tile id {id}")]
    DuplicateTileId {
        /// Offending id
        id: u32,
    },

    /// A tile entry without an image
    #[error("Tile {id} has no image")]
    MissingImage {
        /// Tile id
        id: u32,
    },

    /// A tile whose image source is empty
    #[error("Tile {id} has an empty image source")]
    EmptyImageSource {
        /// Tile id
        id: u32,
    },

    /// Declared image size is missing or zero
    #[error("Tile {id} declares invalid image size {width}x{height}")]
    InvalidImageSize {
        /// Tile id
        id: u32,
        /// Declared width (0 when absent)
        width: u32,
        /// Declared height (0 when absent)
        height: u32,
    },

    /// `tilecount` disagrees with the number of tile entries
    #[error("Tileset declares {declared} tiles but contains {found}")]
    TileCountMismatch {
        /// Value of the `tilecount` attribute
        declared: u32,
        /// Number of tile entries
        found: usize,
    },

    /// Referenced image file does not exist
    #[error("Image for tile {id} not found: {}", .path.display())]
    ImageNotFound {
        /// Tile id
        id: u32,
        /// Resolved image path
        path: PathBuf,
    },

    /// Referenced image file could not be inspected
    #[error("Failed to read image {}: {source}", .path.display())]
    Image {
        /// Resolved image path
        path: PathBuf,
        /// Underlying error
        source: image::ImageError,
    },

    /// Declared image size differs from the image file
    #[error("Tile {id} declares size {declared:?} but image is {actual:?}")]
    ImageSizeMismatch {
        /// Tile id
        id: u32,
        /// Declared (width, height)
        declared: (u32, u32),
        /// Actual (width, height)
        actual: (u32, u32),
    },

    /// Custom property with a type name Tiled does not define
    #[error("Unsupported property type '{kind}' for property '{name}'")]
    UnsupportedPropertyType {
        /// Property name
        name: String,
        /// Declared type
        kind: String,
    },

    /// Custom property whose value cannot be parsed as its declared type
    #[error("Invalid value '{value}' for {kind} property '{name}'")]
    InvalidPropertyValue {
        /// Property name
        name: String,
        /// Declared type
        kind: String,
        /// Raw value
        value: String,
    },

    /// Lookup past the largest id of the tileset
    #[error("Tile id {id} is out of range for tileset '{tileset}' ({count} tiles)")]
    TileOutOfRange {
        /// Requested id
        id: u32,
        /// Tileset name
        tileset: String,
        /// Number of tiles in the set
        count: usize,
    },

    /// Lookup of an id inside the range that has no tile
    #[error("Unknown tile id {id} in tileset '{tileset}'")]
    UnknownTileId {
        /// Requested id
        id: u32,
        /// Tileset name
        tileset: String,
    },

    /// TSX serialisation failed
    #[error("Failed to encode TSX: {0}")]
    EncodeXml(#[source] quick_xml::DeError),

    /// JSON serialisation failed
    #[error("Failed to encode JSON: {0}")]
    EncodeJson(#[source] serde_json::Error),
}
