// src/loader/json_loader.rs
use crate::error::TilesetError;
use crate::ir_tileset::*;
use crate::properties::{Properties, PropertyValue};
use crate::tileset::TileSet;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::Path;

#[derive(Deserialize, Serialize)]
struct JsonTileset {
    #[serde(rename = "type", default = "tileset_kind")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tiledversion: Option<String>,
    name: String,
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    #[serde(default)]
    columns: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid: Option<JsonGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>, // atlas tilesets only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

fn tileset_kind() -> String {
    "tileset".to_owned()
}

#[derive(Deserialize, Serialize)]
struct JsonGrid {
    orientation: String,
    width: u32,
    height: u32,
}

#[derive(Deserialize, Serialize)]
struct JsonTile {
    #[serde(default)]
    id: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    imagewidth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    imageheight: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize, Serialize)]
struct JsonProperty {
    name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    value: JsonValue,
}

fn json_property_to_ir(prop: JsonProperty) -> Result<Option<(String, PropertyValue)>, TilesetError> {
    let JsonProperty { name, kind, value } = prop;

    let parsed = match kind.as_deref() {
        Some("bool") => value.as_bool().map(PropertyValue::Bool),
        Some("int") | Some("object") => value.as_i64().map(PropertyValue::I64),
        Some("float") => value.as_f64().map(|n| PropertyValue::F32(n as f32)),
        Some("string") => value.as_str().map(|s| PropertyValue::String(s.to_owned())),
        Some("color") => value.as_str().map(|s| PropertyValue::Color(s.to_owned())),
        Some("file") => value.as_str().map(|s| PropertyValue::File(s.to_owned())),
        // class values are nested objects
        Some("class") => None,
        Some(other) => {
            return Err(TilesetError::UnsupportedPropertyType {
                name,
                kind: other.to_owned(),
            });
        }
        None => {
            if let Some(v) = value.as_bool() {
                Some(PropertyValue::Bool(v))
            } else if let Some(v) = value.as_i64() {
                Some(PropertyValue::I64(v))
            } else if let Some(v) = value.as_f64() {
                Some(PropertyValue::F32(v as f32))
            } else {
                value.as_str().map(|s| PropertyValue::String(s.to_owned()))
            }
        }
    };

    match (&kind, parsed) {
        (_, Some(value)) => Ok(Some((name, value))),
        (Some(k), None) if k != "class" => Err(TilesetError::InvalidPropertyValue {
            name,
            kind: k.clone(),
            value: value.to_string(),
        }),
        _ => Ok(None),
    }
}

fn properties_from_json(props: Vec<JsonProperty>) -> Result<Properties, TilesetError> {
    let mut out = Properties::new();
    for p in props {
        if let Some((name, value)) = json_property_to_ir(p)? {
            out.insert(name, value);
        }
    }
    Ok(out)
}

fn properties_to_json(props: &Properties) -> Vec<JsonProperty> {
    props
        .iter()
        .map(|(name, value)| JsonProperty {
            name: name.to_owned(),
            kind: Some(value.type_name().unwrap_or("string").to_owned()),
            value: match value {
                PropertyValue::Bool(v) => JsonValue::from(*v),
                PropertyValue::I64(v) => JsonValue::from(*v),
                PropertyValue::F32(v) => JsonValue::from(*v),
                PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => {
                    JsonValue::from(s.as_str())
                }
            },
        })
        .collect()
}

/// Parses a Tiled JSON tileset into the format-agnostic IR; `origin` only labels errors.
pub fn decode_json_to_ir(json: &str, origin: &Path) -> Result<IrTileset, TilesetError> {
    let j: JsonTileset = serde_json::from_str(json).map_err(|source| TilesetError::Json {
        path: origin.to_path_buf(),
        source,
    })?;

    if j.kind != "tileset" {
        return Err(TilesetError::InvalidTileset(format!(
            "expected a tileset document, found type '{}'",
            j.kind
        )));
    }

    let tiles = j
        .tiles
        .into_iter()
        .map(|tile| -> Result<IrTile, TilesetError> {
            Ok(IrTile {
                id: tile.id,
                class: tile.kind,
                image: tile.image.map(|source| IrImage {
                    source,
                    width: tile.imagewidth,
                    height: tile.imageheight,
                }),
                properties: properties_from_json(tile.properties)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IrTileset {
        name: j.name,
        version: j.version,
        tiled_version: j.tiledversion,
        tile_w: j.tilewidth,
        tile_h: j.tileheight,
        tilecount: j.tilecount,
        columns: j.columns,
        grid: j.grid.map(|g| IrGrid {
            orientation: g.orientation,
            width: g.width,
            height: g.height,
        }),
        atlas_image: j.image,
        properties: properties_from_json(j.properties)?,
        tiles,
    })
}

/// Serialises a tileset in Tiled's JSON tileset format.
pub fn encode_json(tileset: &TileSet) -> Result<String, TilesetError> {
    let (tile_w, tile_h) = tileset.tile_size();
    let doc = JsonTileset {
        kind: tileset_kind(),
        version: tileset.version().map(str::to_owned),
        tiledversion: tileset.tiled_version().map(str::to_owned),
        name: tileset.name().to_owned(),
        tilewidth: tile_w,
        tileheight: tile_h,
        tilecount: tileset.declared_tile_count(),
        columns: tileset.columns(),
        grid: tileset.declared_grid().map(|g| JsonGrid {
            orientation: g.orientation.as_str().to_owned(),
            width: g.width,
            height: g.height,
        }),
        image: None,
        properties: properties_to_json(tileset.properties()),
        tiles: tileset
            .tiles()
            .map(|tile| JsonTile {
                id: Some(tile.id),
                kind: tile.class.clone(),
                image: Some(tile.image.source.clone()),
                imagewidth: Some(tile.image.width),
                imageheight: Some(tile.image.height),
                properties: properties_to_json(&tile.properties),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&doc).map_err(TilesetError::EncodeJson)
}
