use crate::foundation::error::{SchemaError, SchemaResult};
use crate::foundation::ids::{NodeId, NodeKind};
use crate::scene::datum::Datum;
use crate::scene::load::load_graph;
use crate::scene::model::GraphDef;
use anyhow::Context as _;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::path::Path;

/// Arena of scene graph nodes addressed by [`NodeId`].
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: HashMap<NodeId, usize>,
    pub(crate) shapes: Vec<NodeId>,
    pub(crate) containers: Vec<NodeId>,
    pub(crate) animations: Vec<NodeId>,
}

/// One resolved node.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub data: NodeData,
    /// Untouched `data` payload as it appeared in the document.
    pub raw: Value,
    pub bounds: Option<Value>,
    pub frame_bounds: Option<Value>,
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Shape(ShapeData),
    Container(ContainerData),
    MovieClip(MovieClipData),
    NativeObject(NativeObjectData),
    Tween(TweenData),
    Bounds,
}

#[derive(Debug, Clone, Default)]
pub struct ShapeData {
    pub graphics: Option<Map<String, Value>>,
    pub transform: Option<Position>,
    pub bounds: Option<Datum>,
    pub frame_bounds: Option<Datum>,
}

/// Shape placement; numbers are kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub x: Number,
    pub y: Number,
}

#[derive(Debug, Clone, Default)]
pub struct ContainerData {
    pub children: Vec<NodeId>,
    pub transform: Option<Value>,
    pub off: bool,
    pub bounds: Option<Datum>,
}

#[derive(Debug, Clone, Default)]
pub struct MovieClipData {
    pub constructor_args: Option<Value>,
    pub transform: Option<Value>,
    pub off: bool,
    pub tweens: Vec<NodeId>,
    pub bounds: Option<Datum>,
    pub frame_bounds: Option<Datum>,
}

#[derive(Debug, Clone)]
pub struct NativeObjectData {
    /// Always a [`Datum::Array`] or [`Datum::Object`].
    pub object: Datum,
}

#[derive(Debug, Clone)]
pub struct TweenData {
    pub target: NodeId,
    pub tween_calls: NodeId,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Shape(_) => NodeKind::Shape,
            NodeData::Container(_) => NodeKind::Container,
            NodeData::MovieClip(_) => NodeKind::MovieClip,
            NodeData::NativeObject(_) => NodeKind::NativeObject,
            NodeData::Tween(_) => NodeKind::Tween,
            NodeData::Bounds => NodeKind::Bounds,
        }
    }
}

impl SceneGraph {
    /// Validate a boundary document and build the arena.
    #[tracing::instrument(skip(def), fields(nodes = def.nodes.len()))]
    pub fn from_def(def: &GraphDef) -> SchemaResult<Self> {
        Ok(load_graph(def)?)
    }

    pub fn from_json_value(value: Value) -> SchemaResult<Self> {
        let def: GraphDef =
            serde_json::from_value(value).map_err(|e| SchemaError::serde(e.to_string()))?;
        Self::from_def(&def)
    }

    pub fn from_json_str(s: &str) -> SchemaResult<Self> {
        let def: GraphDef =
            serde_json::from_str(s).map_err(|e| SchemaError::serde(e.to_string()))?;
        Self::from_def(&def)
    }

    pub fn from_path(path: &Path) -> SchemaResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read scene graph '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Resolve a reference.
    pub fn node(&self, id: &NodeId) -> SchemaResult<&Node> {
        self.index
            .get(id)
            .map(|&i| &self.nodes[i])
            .ok_or_else(|| SchemaError::DanglingReference(id.clone()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn shapes(&self) -> &[NodeId] {
        &self.shapes
    }

    pub fn containers(&self) -> &[NodeId] {
        &self.containers
    }

    pub fn animations(&self) -> &[NodeId] {
        &self.animations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nodes_by_id() {
        let graph = SceneGraph::from_json_value(json!({
            "nodes": [
                { "id": "S1", "type": "shape", "data": { "transform": { "x": 1, "y": 2 } } },
                { "id": "B1", "type": "bounds", "data": [0, 0, 10, 10] }
            ],
            "shapes": ["S1"]
        }))
        .unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.shapes(), &[NodeId::from("S1")]);

        let s1 = graph.node(&NodeId::from("S1")).unwrap();
        assert_eq!(s1.kind(), NodeKind::Shape);
        let NodeData::Shape(shape) = &s1.data else {
            panic!("expected shape");
        };
        let t = shape.transform.as_ref().unwrap();
        assert_eq!(t.x, Number::from(1));
        assert_eq!(t.y, Number::from(2));

        let b1 = graph.node(&NodeId::from("B1")).unwrap();
        assert_eq!(b1.raw, json!([0, 0, 10, 10]));
    }

    #[test]
    fn unknown_id_is_a_dangling_reference() {
        let graph = SceneGraph::default();
        let err = graph.node(&NodeId::from("nope")).unwrap_err();
        assert!(matches!(err, SchemaError::DanglingReference(_)));
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let err = SceneGraph::from_json_str("{ nodes: ").unwrap_err();
        assert!(err.to_string().contains("serialization error:"));
    }
}
