//! Tiled JSON document model
//!
//! Only the parts the simulation consumes are modelled. Tile layer data
//! must be stored as a plain array (the editor's CSV layer format); other
//! layer kinds such as image layers are accepted and ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::game_data::{Properties, PropertyValue};

#[derive(Debug, Clone, Deserialize)]
pub struct TiledMap {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub properties: Vec<TiledProperty>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    TileLayer(TileLayer),
    ObjectGroup(ObjectGroup),
    #[serde(other)]
    Other,
}

impl Layer {
    pub fn name(&self) -> Option<&str> {
        match self {
            Layer::TileLayer(layer) => Some(&layer.name),
            Layer::ObjectGroup(group) => Some(&group.name),
            Layer::Other => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Global tile ids, row-major from the top row; 0 is empty
    #[serde(default)]
    pub data: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectGroup {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<TiledObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledObject {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub object_type: String,
    /// Newer editor versions write the type here instead
    #[serde(default)]
    pub class: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub point: bool,
    /// Corner points relative to `x`/`y`
    #[serde(default)]
    pub polygon: Option<Vec<TiledPoint>>,
    #[serde(default)]
    pub properties: Vec<TiledProperty>,
}

impl TiledObject {
    /// Lower-cased type tag, None when the object has none
    pub fn kind(&self) -> Option<String> {
        [&self.object_type, &self.class]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_ascii_lowercase)
    }

    /// Bounding box in editor pixels: (left, top, width, height)
    ///
    /// Polygons are reduced to the box around their corner points.
    pub fn editor_bounds(&self) -> (f32, f32, f32, f32) {
        match self.polygon.as_deref() {
            Some(points) if !points.is_empty() => {
                let xs = points.iter().map(|p| self.x + p.x);
                let ys = points.iter().map(|p| self.y + p.y);
                let left = xs.clone().fold(f32::INFINITY, f32::min);
                let right = xs.fold(f32::NEG_INFINITY, f32::max);
                let top = ys.clone().fold(f32::INFINITY, f32::min);
                let bottom = ys.fold(f32::NEG_INFINITY, f32::max);
                (left, top, right - left, bottom - top)
            }
            _ => (self.x, self.y, self.width, self.height),
        }
    }

    pub fn property_bag(&self) -> Properties {
        to_properties(&self.properties)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TiledPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledProperty {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub value: Value,
}

impl TiledProperty {
    pub fn to_value(&self) -> PropertyValue {
        match &self.value {
            Value::Bool(v) => PropertyValue::Bool(*v),
            Value::Number(n) if self.kind != "float" && n.is_i64() => {
                PropertyValue::Int(n.as_i64().unwrap_or_default())
            }
            Value::Number(n) => PropertyValue::Float(n.as_f64().unwrap_or_default()),
            Value::String(s) => PropertyValue::Str(s.clone()),
            other => PropertyValue::Str(other.to_string()),
        }
    }
}

pub fn to_properties(properties: &[TiledProperty]) -> Properties {
    properties
        .iter()
        .map(|p| (p.name.clone(), p.to_value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_by_type_tag() {
        let json = r#"{
            "width": 2, "height": 2, "tilewidth": 16, "tileheight": 16,
            "layers": [
                {"type": "tilelayer", "name": "collisions", "width": 2, "height": 2, "data": [1, 0, 0, 1]},
                {"type": "objectgroup", "name": "zones", "objects": []},
                {"type": "imagelayer", "name": "sky"}
            ]
        }"#;
        let map: TiledMap = serde_json::from_str(json).unwrap();

        assert_eq!(map.layers.len(), 3);
        assert!(matches!(&map.layers[0], Layer::TileLayer(l) if l.data == vec![1, 0, 0, 1]));
        assert_eq!(map.layers[1].name(), Some("zones"));
        assert!(matches!(map.layers[2], Layer::Other));
    }

    #[test]
    fn test_property_conversion() {
        let json = r#"[
            {"name": "damage", "type": "int", "value": 7},
            {"name": "speed", "type": "float", "value": 2},
            {"name": "boss", "type": "bool", "value": true},
            {"name": "loot", "type": "string", "value": "bug_shell:2"}
        ]"#;
        let props: Vec<TiledProperty> = serde_json::from_str(json).unwrap();
        let bag = to_properties(&props);

        assert_eq!(bag["damage"], PropertyValue::Int(7));
        assert_eq!(bag["speed"], PropertyValue::Float(2.0));
        assert_eq!(bag["boss"], PropertyValue::Bool(true));
        assert_eq!(bag["loot"], PropertyValue::from("bug_shell:2"));
    }

    #[test]
    fn test_polygon_bounds() {
        let json = r#"{
            "x": 100, "y": 50,
            "polygon": [{"x": 0, "y": 0}, {"x": 64, "y": 0}, {"x": 64, "y": 32}, {"x": 0, "y": 32}]
        }"#;
        let object: TiledObject = serde_json::from_str(json).unwrap();

        assert_eq!(object.editor_bounds(), (100.0, 50.0, 64.0, 32.0));
        assert_eq!(object.kind(), None);
    }
}
