// tests/roundtrip_tests.rs

use std::path::PathBuf;
use tiled_tileset::{ImageCheck, LoadOptions, TileSet};

fn opts() -> LoadOptions {
    LoadOptions::new().image_check(ImageCheck::Skip)
}

fn fixture() -> TileSet {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures/objects.tsx");
    TileSet::load_with(&path, &opts()).expect("fixture should load")
}

fn tuples(tileset: &TileSet) -> Vec<(u32, String, u32, u32)> {
    tileset
        .tiles()
        .map(|t| (t.id, t.image.source.clone(), t.image.width, t.image.height))
        .collect()
}

#[test]
fn tsx_round_trip_preserves_tiles() {
    let original = fixture();
    let xml = original.to_tsx_string().expect("encode");
    assert!(xml.starts_with("<?xml"));

    let reparsed = TileSet::from_tsx_str(&xml, original.base_dir(), &opts()).expect("reparse");
    assert_eq!(tuples(&reparsed), tuples(&original));
    assert_eq!(reparsed, original);
}

#[test]
fn json_round_trip_preserves_tiles() {
    let original = fixture();
    let json = original.to_json_string().expect("encode");

    let reparsed = TileSet::from_json_str(&json, original.base_dir(), &opts()).expect("reparse");
    assert_eq!(reparsed, original);
}

const WITH_PROPERTIES: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.10" name="props" tilewidth="16" tileheight="16" tilecount="1" columns="0">
 <properties>
  <property name="biome" value="forest"/>
  <property name="tint" type="color" value="#ff102030"/>
  <property name="speed" type="float" value="1.5"/>
 </properties>
 <tile id="7" type="door">
  <properties>
   <property name="locked" type="bool" value="true"/>
   <property name="key" type="object" value="12"/>
   <property name="script" type="file" value="door.lua"/>
  </properties>
  <image source="door.png" width="16" height="32"/>
 </tile>
</tileset>
"##;

#[test]
fn properties_and_classes_survive_both_formats() {
    let original = TileSet::from_tsx_str(WITH_PROPERTIES, ".", &opts()).expect("parse");
    assert_eq!(original.properties().get_string("tint"), Some("#ff102030"));

    let tile = original.tile(7).expect("tile 7");
    assert_eq!(tile.class.as_deref(), Some("door"));
    assert_eq!(tile.properties.get_bool("locked"), Some(true));
    assert_eq!(tile.properties.get_i64("key"), Some(12));

    let via_tsx = TileSet::from_tsx_str(&original.to_tsx_string().expect("tsx"), ".", &opts())
        .expect("reparse tsx");
    assert_eq!(via_tsx, original);

    let via_json = TileSet::from_json_str(&original.to_json_string().expect("json"), ".", &opts())
        .expect("reparse json");
    assert_eq!(via_json, original);
}

#[test]
fn save_and_reload_by_extension() {
    let original = fixture();
    let dir = tempfile::tempdir().expect("temp dir");

    let tsx_path = dir.path().join("objects.tsx");
    original.save(&tsx_path).expect("save tsx");
    let from_tsx = TileSet::load_with(&tsx_path, &opts()).expect("load tsx");
    assert_eq!(tuples(&from_tsx), tuples(&original));
    assert_eq!(from_tsx.base_dir(), dir.path());

    let json_path = dir.path().join("objects.tsj");
    from_tsx.save(&json_path).expect("save json");
    let from_json = TileSet::load_with(&json_path, &opts()).expect("load json");
    assert_eq!(tuples(&from_json), tuples(&original));
    assert_eq!(from_json.grid(), original.grid());
}

const MULTI_LINE: &str = "<tileset name=\"notes\" tilewidth=\"8\" tileheight=\"8\" tilecount=\"0\" columns=\"0\">
 <properties>
  <property name=\"note\">line1
line2</property>
  <property name=\"title\" value=\"one line\"/>
 </properties>
</tileset>
";

#[test]
fn multi_line_string_properties_use_element_text() {
    let original = TileSet::from_tsx_str(MULTI_LINE, ".", &opts()).expect("parse");
    assert_eq!(original.properties().get_string("note"), Some("line1\nline2"));
    assert_eq!(original.properties().get_string("title"), Some("one line"));

    let xml = original.to_tsx_string().expect("tsx");
    assert!(xml.contains("line1\nline2"));
    assert!(!xml.contains("value=\"line1"));
    assert!(xml.contains("value=\"one line\""));

    let via_tsx = TileSet::from_tsx_str(&xml, ".", &opts()).expect("reparse tsx");
    assert_eq!(via_tsx, original);

    let via_json = TileSet::from_json_str(&original.to_json_string().expect("json"), ".", &opts())
        .expect("reparse json");
    assert_eq!(via_json, original);
}
