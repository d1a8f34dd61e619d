use crate::foundation::ids::{NodeId, NodeKind};
use crate::scene::datum::Datum;
use crate::scene::graph::{
    ContainerData, MovieClipData, NativeObjectData, Node, NodeData, Position, SceneGraph,
    ShapeData, TweenData,
};
use crate::scene::model::{
    ContainerDataDef, GraphDef, MovieClipDataDef, NativeObjectDataDef, NodeDef, NodeRef,
    ShapeDataDef, TweenDataDef,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphPathElem {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone)]
pub struct GraphError {
    pub path: Vec<GraphPathElem>,
    pub message: String,
}

impl GraphError {
    fn at(path: &[GraphPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[GraphPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            GraphPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            GraphPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

/// Every structural problem found while loading a graph document.
#[derive(Debug, Clone)]
pub struct GraphErrors {
    pub errors: Vec<GraphError>,
}

impl fmt::Display for GraphErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for GraphErrors {}

pub(crate) fn load_graph(def: &GraphDef) -> Result<SceneGraph, GraphErrors> {
    let mut errors = Vec::new();

    // Pass 1: ids are unique across the document.
    let mut index = HashMap::<NodeId, usize>::with_capacity(def.nodes.len());
    for (i, n) in def.nodes.iter().enumerate() {
        let id = NodeId::new(n.id.as_str());
        if index.contains_key(&id) {
            errors.push(GraphError::at(
                &node_path(i, &[GraphPathElem::Field("id")]),
                format!("duplicate node id '{id}'"),
            ));
            continue;
        }
        index.insert(id, i);
    }

    // Pass 2: tag dispatch into typed payloads.
    let mut nodes = Vec::with_capacity(def.nodes.len());
    for (i, n) in def.nodes.iter().enumerate() {
        if let Some(node) = convert_node(i, n, &mut errors) {
            nodes.push(node);
        }
    }

    // Pass 3: every reference resolves. Only meaningful once all nodes converted,
    // since arena positions shift when a node is dropped.
    if errors.is_empty() {
        for (i, node) in nodes.iter().enumerate() {
            validate_node_refs(i, node, &index, &mut errors);
        }
        for (field, refs) in [
            ("shapes", &def.shapes),
            ("containers", &def.containers),
            ("animations", &def.animations),
        ] {
            for (i, r) in refs.iter().enumerate() {
                check_ref(
                    &[GraphPathElem::Field(field), GraphPathElem::Index(i)],
                    &r.0,
                    &index,
                    &mut errors,
                );
            }
        }
    }

    if !errors.is_empty() {
        return Err(GraphErrors { errors });
    }

    Ok(SceneGraph {
        nodes,
        index,
        shapes: ref_ids(&def.shapes),
        containers: ref_ids(&def.containers),
        animations: ref_ids(&def.animations),
    })
}

fn convert_node(i: usize, n: &NodeDef, errors: &mut Vec<GraphError>) -> Option<Node> {
    let Some(kind) = NodeKind::from_tag(&n.kind) else {
        errors.push(GraphError::at(
            &node_path(i, &[GraphPathElem::Field("type")]),
            format!("invalid target type '{}' on node '{}'", n.kind, n.id),
        ));
        return None;
    };

    let data_path = node_path(i, &[GraphPathElem::Field("data")]);
    let data = match kind {
        NodeKind::Shape => {
            let d: ShapeDataDef = parse_payload(kind, &n.data, &data_path, errors)?;
            NodeData::Shape(ShapeData {
                graphics: d.graphics,
                transform: d.transform.map(|t| Position { x: t.x, y: t.y }),
                bounds: d.bounds.as_ref().map(Datum::from_json),
                frame_bounds: d.frame_bounds.as_ref().map(Datum::from_json),
            })
        }
        NodeKind::Container => {
            let d: ContainerDataDef = parse_payload(kind, &n.data, &data_path, errors)?;
            NodeData::Container(ContainerData {
                children: ref_ids(&d.children),
                transform: d.transform,
                off: off_flag(d.off.as_ref()),
                bounds: d.bounds.as_ref().map(Datum::from_json),
            })
        }
        NodeKind::MovieClip => {
            let d: MovieClipDataDef = parse_payload(kind, &n.data, &data_path, errors)?;
            NodeData::MovieClip(MovieClipData {
                constructor_args: d.constructor_args,
                transform: d.transform,
                off: off_flag(d.off.as_ref()),
                tweens: ref_ids(&d.tweens),
                bounds: d.bounds.as_ref().map(Datum::from_json),
                frame_bounds: d.frame_bounds.as_ref().map(Datum::from_json),
            })
        }
        NodeKind::NativeObject => {
            let d: NativeObjectDataDef = parse_payload(kind, &n.data, &data_path, errors)?;
            let object = Datum::from_json(&d.object);
            if !object.is_collection() {
                errors.push(GraphError::at(
                    &node_path(
                        i,
                        &[GraphPathElem::Field("data"), GraphPathElem::Field("object")],
                    ),
                    "native object must wrap a mapping or a sequence",
                ));
                return None;
            }
            NodeData::NativeObject(NativeObjectData { object })
        }
        NodeKind::Tween => {
            let d: TweenDataDef = parse_payload(kind, &n.data, &data_path, errors)?;
            NodeData::Tween(TweenData {
                target: d.target.0,
                tween_calls: d.tween_calls.0,
            })
        }
        NodeKind::Bounds => NodeData::Bounds,
    };

    Some(Node {
        id: NodeId::new(n.id.as_str()),
        data,
        raw: n.data.clone(),
        bounds: n.bounds.clone(),
        frame_bounds: n.frame_bounds.clone(),
    })
}

fn parse_payload<T: DeserializeOwned>(
    kind: NodeKind,
    data: &Value,
    path: &[GraphPathElem],
    errors: &mut Vec<GraphError>,
) -> Option<T> {
    // A missing payload reads as an empty object so all-optional kinds still load.
    let data = if data.is_null() {
        Value::Object(Default::default())
    } else {
        data.clone()
    };
    match serde_json::from_value(data) {
        Ok(d) => Some(d),
        Err(e) => {
            errors.push(GraphError::at(path, format!("invalid {kind} payload: {e}")));
            None
        }
    }
}

fn validate_node_refs(
    i: usize,
    node: &Node,
    index: &HashMap<NodeId, usize>,
    errors: &mut Vec<GraphError>,
) {
    let data = |field: &'static str| {
        node_path(
            i,
            &[GraphPathElem::Field("data"), GraphPathElem::Field(field)],
        )
    };
    let check_datum = |field: &'static str, d: &Option<Datum>, errors: &mut Vec<GraphError>| {
        if let Some(d) = d {
            let path = data(field);
            d.for_each_ref(&mut |id| check_ref(&path, id, index, errors));
        }
    };

    match &node.data {
        NodeData::Shape(s) => {
            check_datum("bounds", &s.bounds, errors);
            check_datum("frameBounds", &s.frame_bounds, errors);
        }
        NodeData::Container(c) => {
            for (j, child) in c.children.iter().enumerate() {
                let mut path = data("children");
                path.push(GraphPathElem::Index(j));
                check_ref(&path, child, index, errors);
            }
            check_datum("bounds", &c.bounds, errors);
        }
        NodeData::MovieClip(m) => {
            for (j, tween) in m.tweens.iter().enumerate() {
                let mut path = data("tweens");
                path.push(GraphPathElem::Index(j));
                check_ref(&path, tween, index, errors);
            }
            check_datum("bounds", &m.bounds, errors);
            check_datum("frameBounds", &m.frame_bounds, errors);
        }
        NodeData::NativeObject(o) => {
            let path = data("object");
            o.object
                .for_each_ref(&mut |id| check_ref(&path, id, index, errors));
        }
        NodeData::Tween(t) => {
            check_ref(&data("target"), &t.target, index, errors);
            check_ref(&data("tweenCalls"), &t.tween_calls, index, errors);
        }
        NodeData::Bounds => {}
    }
}

fn check_ref(
    path: &[GraphPathElem],
    id: &NodeId,
    index: &HashMap<NodeId, usize>,
    errors: &mut Vec<GraphError>,
) {
    if !index.contains_key(id) {
        errors.push(GraphError::at(path, format!("reference to unknown node '{id}'")));
    }
}

fn node_path(i: usize, rest: &[GraphPathElem]) -> Vec<GraphPathElem> {
    let mut path = vec![GraphPathElem::Field("nodes"), GraphPathElem::Index(i)];
    path.extend_from_slice(rest);
    path
}

/// Only a literal `true` switches a node off; any other value reads as false.
fn off_flag(off: Option<&Value>) -> bool {
    matches!(off, Some(Value::Bool(true)))
}

fn ref_ids(refs: &[NodeRef]) -> Vec<NodeId> {
    refs.iter().map(|r| r.0.clone()).collect()
}
