use crate::foundation::ids::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Boundary form of a scene graph document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDef {
    /// Every node of the graph, in document order.
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    /// Shapes to translate.
    #[serde(default)]
    pub shapes: Vec<NodeRef>,
    /// Containers to translate.
    #[serde(default)]
    pub containers: Vec<NodeRef>,
    /// Movie clips whose tweens are translated as animations.
    #[serde(default)]
    pub animations: Vec<NodeRef>,
}

/// Boundary form of one node; `data` is interpreted according to `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Value>,
    #[serde(
        default,
        rename = "frameBounds",
        skip_serializing_if = "Option::is_none"
    )]
    pub frame_bounds: Option<Value>,
}

/// Reference held in a typed slot: either a bare id or `{"$ref": id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NodeRef(pub NodeId);

impl<'de> Deserialize<'de> for NodeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Id(String),
            Ref {
                #[serde(rename = "$ref")]
                id: String,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Id(id) | Repr::Ref { id } => Ok(Self(NodeId::new(id))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Vec2Def {
    pub(crate) x: Number,
    pub(crate) y: Number,
}

impl<'de> Deserialize<'de> for Vec2Def {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([Number; 2]),
            Obj { x: Number, y: Number },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing field is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShapeDataDef {
    #[serde(default)]
    pub(crate) graphics: Option<Map<String, Value>>,
    #[serde(default)]
    pub(crate) transform: Option<Vec2Def>,
    #[serde(default)]
    pub(crate) bounds: Option<Value>,
    #[serde(default)]
    pub(crate) frame_bounds: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContainerDataDef {
    #[serde(default)]
    pub(crate) children: Vec<NodeRef>,
    #[serde(default)]
    pub(crate) transform: Option<Value>,
    #[serde(default)]
    pub(crate) off: Option<Value>,
    #[serde(default)]
    pub(crate) bounds: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MovieClipDataDef {
    #[serde(default, deserialize_with = "present")]
    pub(crate) constructor_args: Option<Value>,
    #[serde(default)]
    pub(crate) transform: Option<Value>,
    #[serde(default)]
    pub(crate) off: Option<Value>,
    #[serde(default)]
    pub(crate) tweens: Vec<NodeRef>,
    #[serde(default)]
    pub(crate) bounds: Option<Value>,
    #[serde(default)]
    pub(crate) frame_bounds: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NativeObjectDataDef {
    pub(crate) object: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TweenDataDef {
    pub(crate) target: NodeRef,
    pub(crate) tween_calls: NodeRef,
}
