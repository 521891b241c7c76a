// src/loader/tsx_loader.rs
use crate::error::TilesetError;
use crate::ir_tileset::*;
use crate::properties::{Properties, PropertyValue};
use crate::tileset::TileSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Attribute fields ("@...") must precede child elements for the serializer.

#[derive(Deserialize, Serialize)]
struct TsxTileset {
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(rename = "@tiledversion", default, skip_serializing_if = "Option::is_none")]
    tiledversion: Option<String>,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@tilewidth")]
    tilewidth: u32,
    #[serde(rename = "@tileheight")]
    tileheight: u32,
    #[serde(rename = "@tilecount")]
    tilecount: u32,
    #[serde(rename = "@columns", default)]
    columns: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid: Option<TsxGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<TsxProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<TsxImage>, // atlas tilesets only
    #[serde(rename = "tile", default)]
    tiles: Vec<TsxTile>,
}

#[derive(Deserialize, Serialize)]
struct TsxGrid {
    #[serde(rename = "@orientation")]
    orientation: String,
    #[serde(rename = "@width")]
    width: u32,
    #[serde(rename = "@height")]
    height: u32,
}

#[derive(Deserialize, Serialize)]
struct TsxTile {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    id: Option<u32>,
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<TsxProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<TsxImage>,
}

#[derive(Deserialize, Serialize)]
struct TsxImage {
    #[serde(rename = "@source")]
    source: String,
    #[serde(rename = "@width", default, skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(rename = "@height", default, skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
}

#[derive(Deserialize, Serialize, Default)]
struct TsxProperties {
    #[serde(rename = "property", default)]
    property: Vec<TsxProperty>,
}

#[derive(Deserialize, Serialize)]
struct TsxProperty {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(rename = "@value", default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    // multi-line strings are written as element text
    #[serde(rename = "$text", default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

fn properties_from_tsx(props: Option<TsxProperties>) -> Result<Properties, TilesetError> {
    let mut out = Properties::new();
    for p in props.map(|p| p.property).unwrap_or_default() {
        let Some(raw) = p.value.or(p.text) else {
            tracing::debug!(property = %p.name, "skipping property without value");
            continue;
        };
        if let Some(value) = PropertyValue::parse(&p.name, p.kind.as_deref(), &raw)? {
            out.insert(p.name, value);
        }
    }
    Ok(out)
}

fn properties_to_tsx(props: &Properties) -> Option<TsxProperties> {
    if props.is_empty() {
        return None;
    }
    Some(TsxProperties {
        property: props
            .iter()
            .map(|(name, value)| {
                let text = value.to_text();
                let multi_line = text.contains('\n');
                TsxProperty {
                    name: name.to_owned(),
                    kind: value.type_name().map(str::to_owned),
                    value: (!multi_line).then(|| text.clone()),
                    text: multi_line.then_some(text),
                }
            })
            .collect(),
    })
}

/// Parses a TSX document into the format-agnostic IR; `origin` only labels errors.
pub fn decode_tsx_to_ir(xml: &str, origin: &Path) -> Result<IrTileset, TilesetError> {
    let t: TsxTileset = quick_xml::de::from_str(xml).map_err(|source| TilesetError::Xml {
        path: origin.to_path_buf(),
        source,
    })?;

    let tiles = t
        .tiles
        .into_iter()
        .map(|tile| -> Result<IrTile, TilesetError> {
            Ok(IrTile {
                id: tile.id,
                class: tile.kind,
                image: tile.image.map(|img| IrImage {
                    source: img.source,
                    width: img.width,
                    height: img.height,
                }),
                properties: properties_from_tsx(tile.properties)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IrTileset {
        name: t.name,
        version: t.version,
        tiled_version: t.tiledversion,
        tile_w: t.tilewidth,
        tile_h: t.tileheight,
        tilecount: t.tilecount,
        columns: t.columns,
        grid: t.grid.map(|g| IrGrid {
            orientation: g.orientation,
            width: g.width,
            height: g.height,
        }),
        atlas_image: t.image.map(|img| img.source),
        properties: properties_from_tsx(t.properties)?,
        tiles,
    })
}

/// Serialises a tileset as a TSX document with an XML declaration.
pub fn encode_tsx(tileset: &TileSet) -> Result<String, TilesetError> {
    let (tile_w, tile_h) = tileset.tile_size();
    let doc = TsxTileset {
        version: tileset.version().map(str::to_owned),
        tiledversion: tileset.tiled_version().map(str::to_owned),
        name: tileset.name().to_owned(),
        tilewidth: tile_w,
        tileheight: tile_h,
        tilecount: tileset.declared_tile_count(),
        columns: tileset.columns(),
        grid: tileset.declared_grid().map(|g| TsxGrid {
            orientation: g.orientation.as_str().to_owned(),
            width: g.width,
            height: g.height,
        }),
        properties: properties_to_tsx(tileset.properties()),
        image: None,
        tiles: tileset
            .tiles()
            .map(|tile| TsxTile {
                id: Some(tile.id),
                kind: tile.class.clone(),
                properties: properties_to_tsx(&tile.properties),
                image: Some(TsxImage {
                    source: tile.image.source.clone(),
                    width: Some(tile.image.width),
                    height: Some(tile.image.height),
                }),
            })
            .collect(),
    };

    let mut body = String::new();
    let mut ser = quick_xml::se::Serializer::with_root(&mut body, Some("tileset"))
        .map_err(TilesetError::EncodeXml)?;
    ser.indent(' ', 1);
    doc.serialize(ser).map_err(TilesetError::EncodeXml)?;

    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_EXTRAS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.10" tiledversion="1.11.2" name="props" tilewidth="32" tileheight="32" tilecount="2" columns="0">
 <tileoffset x="0" y="4"/>
 <grid orientation="isometric" width="2" height="1"/>
 <properties>
  <property name="biome" value="forest"/>
  <property name="gravity" type="float" value="9.8"/>
  <property name="nested" type="class" propertytype="Stats">
   <properties>
    <property name="hp" type="int" value="3"/>
   </properties>
  </property>
 </properties>
 <tile id="0" type="prop">
  <properties>
   <property name="solid" type="bool" value="true"/>
   <property name="damage" type="int" value="10"/>
  </properties>
  <image source="a.png" width="32" height="16"/>
 </tile>
 <tile id="1">
  <image source="sub/b.png" width="8" height="8"/>
  <animation>
   <frame tileid="0" duration="100"/>
  </animation>
 </tile>
</tileset>
"#;

    #[test]
    fn parses_properties_class_and_grid() {
        let ir = decode_tsx_to_ir(WITH_EXTRAS, Path::new("props.tsx")).expect("decode");

        assert_eq!(ir.name, "props");
        assert_eq!(ir.version.as_deref(), Some("1.10"));
        assert_eq!(ir.properties.get_string("biome"), Some("forest"));
        assert_eq!(ir.properties.get_f32("gravity"), Some(9.8));
        assert!(ir.properties.get("nested").is_none());

        let grid = ir.grid.as_ref().expect("grid");
        assert_eq!((grid.orientation.as_str(), grid.width, grid.height), ("isometric", 2, 1));

        assert_eq!(ir.tiles.len(), 2);
        assert_eq!(ir.tiles[0].class.as_deref(), Some("prop"));
        assert_eq!(ir.tiles[0].properties.get_bool("solid"), Some(true));
        assert_eq!(ir.tiles[0].properties.get_i32("damage"), Some(10));
        let img = ir.tiles[1].image.as_ref().expect("image");
        assert_eq!((img.source.as_str(), img.width, img.height), ("sub/b.png", Some(8), Some(8)));
    }

    #[test]
    fn returns_typed_error_for_malformed_xml() {
        let err = decode_tsx_to_ir("<tileset name=\"x\"", Path::new("bad.tsx"))
            .err()
            .expect("expected decode error");
        assert!(matches!(err, TilesetError::Xml { .. }));
    }

    #[test]
    fn returns_typed_error_for_non_numeric_id() {
        let xml = r#"<tileset name="x" tilewidth="1" tileheight="1" tilecount="1">
 <tile id="zero"><image source="a.png" width="1" height="1"/></tile>
</tileset>"#;
        let err = decode_tsx_to_ir(xml, Path::new("bad.tsx")).err().expect("expected decode error");
        assert!(matches!(err, TilesetError::Xml { .. }));
    }

    #[test]
    fn keeps_missing_id_for_validation() {
        let xml = r#"<tileset name="x" tilewidth="1" tileheight="1" tilecount="1">
 <tile><image source="a.png" width="1" height="1"/></tile>
</tileset>"#;
        let ir = decode_tsx_to_ir(xml, Path::new("x.tsx")).expect("decode");
        assert_eq!(ir.tiles[0].id, None);
    }

    #[test]
    fn accepts_tiles_split_by_other_elements() {
        let xml = r#"<tileset name="split" tilewidth="8" tileheight="8" tilecount="2">
 <tile id="0"><image source="a.png" width="8" height="8"/></tile>
 <wangsets/>
 <tile id="1"><image source="b.png" width="8" height="8"/></tile>
</tileset>"#;
        let ir = decode_tsx_to_ir(xml, Path::new("split.tsx")).expect("decode");
        let ids: Vec<_> = ir.tiles.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![Some(0), Some(1)]);
    }

    #[test]
    fn detects_atlas_image() {
        let xml = r#"<tileset name="atlas" tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="atlas.png" width="32" height="32"/>
</tileset>"#;
        let ir = decode_tsx_to_ir(xml, Path::new("atlas.tsx")).expect("decode");
        assert_eq!(ir.atlas_image.as_deref(), Some("atlas.png"));
    }

    #[test]
    fn returns_typed_error_for_unknown_property_type() {
        let xml = r#"<tileset name="x" tilewidth="1" tileheight="1" tilecount="0">
 <properties><property name="mystery" type="not_supported" value="x"/></properties>
</tileset>"#;
        let err = decode_tsx_to_ir(xml, Path::new("x.tsx")).err().expect("expected decode error");
        assert!(matches!(err, TilesetError::UnsupportedPropertyType { .. }));
    }
}
