// Format-agnostic tileset, produced by both loaders before validation.
use crate::properties::Properties;

pub struct IrTileset {
    pub name: String,
    pub version: Option<String>,
    pub tiled_version: Option<String>,
    pub tile_w: u32,
    pub tile_h: u32,
    pub tilecount: u32,
    pub columns: u32,
    pub grid: Option<IrGrid>,
    /// Source of a tileset-wide image, present only for atlas tilesets.
    pub atlas_image: Option<String>,
    pub properties: Properties,
    pub tiles: Vec<IrTile>, // document order
}

pub struct IrGrid {
    pub orientation: String,
    pub width: u32,
    pub height: u32,
}

pub struct IrTile {
    pub id: Option<u32>,
    pub class: Option<String>,
    pub image: Option<IrImage>,
    pub properties: Properties,
}

pub struct IrImage {
    pub source: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}
