#![warn(missing_docs)]

//! Loader, validator and writer for Tiled image-collection tilesets.
//!
//! A tileset maps small integer ids to whole images. Both of Tiled's formats
//! are read: TSX (XML) and the JSON tileset format.
//!
//! ```no_run
//! use tiled_tileset::TileSet;
//!
//! let tileset = TileSet::load("map/objects.tsx")?;
//! let castle = tileset.lookup(0)?;
//! println!("{} {}x{}", castle.source, castle.width, castle.height);
//! # Ok::<(), tiled_tileset::TilesetError>(())
//! ```

mod error;
mod ir_tileset;
mod loader {
    pub mod json_loader;
    pub mod tsx_loader;
}
mod options;
mod properties;
mod tileset;

pub use error::TilesetError;
pub use options::{ImageCheck, LoadOptions};
pub use properties::{Properties, PropertyValue};
pub use tileset::{Grid, ImageReference, Orientation, TileDefinition, TileSet};
