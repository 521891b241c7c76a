use std::collections::BTreeMap;

use crate::error::TilesetError;

/// A typed Tiled custom property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `bool`
    Bool(bool),
    /// `int` and `object` (object references are ids)
    I64(i64),
    /// `float`
    F32(f32),
    /// `string` (also the type of untyped properties)
    String(String),
    /// `color`, kept in Tiled's `#AARRGGBB` text form
    Color(String),
    /// `file`, a path relative to the document
    File(String),
}

impl PropertyValue {
    /// Tiled type name written back on save; `None` for plain strings.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            PropertyValue::Bool(_) => Some("bool"),
            PropertyValue::I64(_) => Some("int"),
            PropertyValue::F32(_) => Some("float"),
            PropertyValue::String(_) => None,
            PropertyValue::Color(_) => Some("color"),
            PropertyValue::File(_) => Some("file"),
        }
    }

    /// Parses a textual value (TSX attribute form) according to its declared type.
    ///
    /// Returns `Ok(None)` for types whose value has no text form (`class`).
    pub(crate) fn parse(
        name: &str,
        kind: Option<&str>,
        raw: &str,
    ) -> Result<Option<Self>, TilesetError> {
        let invalid = |kind: &str| TilesetError::InvalidPropertyValue {
            name: name.to_owned(),
            kind: kind.to_owned(),
            value: raw.to_owned(),
        };

        let value = match kind {
            None | Some("string") => PropertyValue::String(raw.to_owned()),
            Some("bool") => match raw {
                "true" => PropertyValue::Bool(true),
                "false" => PropertyValue::Bool(false),
                _ => return Err(invalid("bool")),
            },
            Some(k @ ("int" | "object")) => {
                PropertyValue::I64(raw.parse().map_err(|_| invalid(k))?)
            }
            Some("float") => PropertyValue::F32(raw.parse().map_err(|_| invalid("float"))?),
            Some("color") => PropertyValue::Color(raw.to_owned()),
            Some("file") => PropertyValue::File(raw.to_owned()),
            Some("class") => return Ok(None),
            Some(other) => {
                return Err(TilesetError::UnsupportedPropertyType {
                    name: name.to_owned(),
                    kind: other.to_owned(),
                })
            }
        };
        Ok(Some(value))
    }

    /// Value in TSX attribute form.
    pub fn to_text(&self) -> String {
        match self {
            PropertyValue::Bool(v) => v.to_string(),
            PropertyValue::I64(v) => v.to_string(),
            PropertyValue::F32(v) => v.to_string(),
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => {
                s.clone()
            }
        }
    }
}

/// Custom properties of a tileset or tile, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
    /// Empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, value: PropertyValue) {
        self.0.insert(name, value);
    }

    /// Raw value by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// `bool` property by name.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// `int`/`object` property by name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer property narrowed to `i32`; `None` if it does not fit.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get_i64(name).and_then(|v| i32::try_from(v).ok())
    }

    /// `float` property by name.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            PropertyValue::F32(v) => Some(*v),
            _ => None,
        }
    }

    /// Text of a `string`, `color` or `file` property.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
