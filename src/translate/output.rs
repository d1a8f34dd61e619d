//! Translated playback schema.
//!
//! Every optional field is omitted on serialization when absent, so the serialized schema never
//! carries placeholder values for fields the source did not provide.

use crate::foundation::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslatedSchema {
    pub shapes: BTreeMap<String, ShapeRecord>,
    pub containers: BTreeMap<String, ContainerRecord>,
    pub animations: BTreeMap<String, AnimationRecord>,
}

impl TranslatedSchema {
    pub fn to_json(&self) -> SchemaResult<Value> {
        serde_json::to_value(self).map_err(|e| SchemaError::serde(e.to_string()))
    }

    pub fn to_json_string(&self, pretty: bool) -> SchemaResult<String> {
        let s = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        s.map_err(|e| SchemaError::serde(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    /// Graphics payload copied from the source shape.
    #[serde(flatten)]
    pub graphics: Map<String, Value>,
    /// `[x, y]` translation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<[Value; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Value>,
    #[serde(
        default,
        rename = "frameBounds",
        skip_serializing_if = "Option::is_none"
    )]
    pub frame_bounds: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub c: Vec<ContainerChild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<Value>,
}

/// Shapes are emitted as their bare id; nested containers as `{gn, t?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContainerChild {
    Shape(String),
    Container {
        gn: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t: Option<Value>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationRecord {
    /// Movie clip construction blocks.
    pub animations: Vec<MovieClipBlock>,
    pub shapes: Vec<ShapeBlock>,
    pub containers: Vec<ContainerBlock>,
    pub tweens: Vec<Vec<Instruction>>,
    /// Reserved slot; always empty.
    pub graphics: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Value>,
    #[serde(
        default,
        rename = "frameBounds",
        skip_serializing_if = "Option::is_none"
    )]
    pub frame_bounds: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieClipBlock {
    pub bn: String,
    pub gn: String,
    /// Constructor arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeBlock {
    pub bn: String,
    pub gn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerBlock {
    pub bn: String,
    pub gn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<Value>,
    /// Initially off. Only set when the container was claimed as a tween target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o: Option<bool>,
}

/// One step of a tween: `n` is the operation, `a` its resolved arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub n: String,
    pub a: Vec<Value>,
}

impl Instruction {
    pub const GET: &'static str = "get";

    pub fn get(target: Value) -> Self {
        Self {
            n: Self::GET.to_owned(),
            a: vec![target],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_optionals_are_omitted() {
        let rec = AnimationRecord {
            animations: vec![MovieClipBlock {
                bn: "bn_M_0".to_string(),
                gn: "M".to_string(),
                a: None,
                t: None,
            }],
            containers: vec![ContainerBlock {
                bn: "bn_C_0".to_string(),
                gn: "C".to_string(),
                t: None,
                o: Some(false),
            }],
            ..AnimationRecord::default()
        };
        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            json!({
                "animations": [{ "bn": "bn_M_0", "gn": "M" }],
                "shapes": [],
                "containers": [{ "bn": "bn_C_0", "gn": "C", "o": false }],
                "tweens": [],
                "graphics": []
            })
        );
    }

    #[test]
    fn shape_record_flattens_graphics() {
        let mut graphics = Map::new();
        graphics.insert("f".to_string(), json!("#ff0000"));
        let rec = ShapeRecord {
            graphics,
            t: Some([json!(1), json!(2)]),
            bounds: None,
            frame_bounds: Some(json!([0, 0, 4, 4])),
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            v,
            json!({ "f": "#ff0000", "t": [1, 2], "frameBounds": [0, 0, 4, 4] })
        );
        let back: ShapeRecord = serde_json::from_value(v).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn container_children_are_untagged() {
        let rec = ContainerRecord {
            c: vec![
                ContainerChild::Shape("S1".to_string()),
                ContainerChild::Container {
                    gn: "C2".to_string(),
                    t: None,
                },
            ],
            b: None,
        };
        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            json!({ "c": ["S1", { "gn": "C2" }] })
        );
    }
}
