use crate::foundation::error::{SchemaError, SchemaResult};
use crate::foundation::ids::{NodeId, NodeKind};
use crate::scene::graph::{MovieClipData, Node, NodeData, SceneGraph};
use crate::translate::bounds::translate_bounds;
use crate::translate::names::BlockNameAllocator;
use crate::translate::output::{
    AnimationRecord, ContainerChild, ContainerRecord, Instruction, ShapeRecord, TranslatedSchema,
};
use crate::translate::scope::AnimationScope;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Translate a scene graph with a fresh block-name allocator.
///
/// Output is fully determined by the graph.
pub fn translate(graph: &SceneGraph) -> SchemaResult<TranslatedSchema> {
    translate_with(graph, &mut BlockNameAllocator::new())
}

/// Translate a scene graph, drawing block names from `names`.
///
/// On error `names` may have advanced; [`Translator`] restores it.
#[tracing::instrument(skip(graph, names), fields(nodes = graph.len()))]
pub fn translate_with(
    graph: &SceneGraph,
    names: &mut BlockNameAllocator,
) -> SchemaResult<TranslatedSchema> {
    let shapes = translate_shapes(graph)?;
    let containers = translate_containers(graph)?;
    let animations = translate_animations(graph, names)?;

    tracing::debug!(
        shapes = shapes.len(),
        containers = containers.len(),
        animations = animations.len(),
        "translated scene graph"
    );

    Ok(TranslatedSchema {
        shapes,
        containers,
        animations,
    })
}

/// Translation session that keeps its block-name allocator across calls.
///
/// Names issued by one session never repeat, which keeps construction blocks from separate
/// translations distinct when their schemas are merged downstream.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    names: BlockNameAllocator,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering from previously persisted allocator state.
    pub fn with_allocator(names: BlockNameAllocator) -> Self {
        Self { names }
    }

    pub fn allocator(&self) -> &BlockNameAllocator {
        &self.names
    }

    pub fn into_allocator(self) -> BlockNameAllocator {
        self.names
    }

    pub fn reset(&mut self) {
        self.names.reset();
    }

    /// Translate `graph`. A failed translation leaves the allocator untouched.
    pub fn translate(&mut self, graph: &SceneGraph) -> SchemaResult<TranslatedSchema> {
        let mut names = self.names.clone();
        let schema = translate_with(graph, &mut names)?;
        self.names = names;
        Ok(schema)
    }
}

fn translate_shapes(graph: &SceneGraph) -> SchemaResult<BTreeMap<String, ShapeRecord>> {
    let mut out = BTreeMap::new();
    for id in graph.shapes() {
        let node = graph.node(id)?;
        let NodeData::Shape(shape) = &node.data else {
            return Err(SchemaError::unexpected_kind(id, NodeKind::Shape, node.kind()));
        };

        let mut rec = ShapeRecord {
            graphics: shape.graphics.clone().unwrap_or_default(),
            ..ShapeRecord::default()
        };
        // Translated fields take precedence over same-named graphics keys.
        if let Some(t) = &shape.transform {
            rec.graphics.remove("t");
            rec.t = Some([Value::Number(t.x.clone()), Value::Number(t.y.clone())]);
        }
        if let Some(b) = &shape.bounds {
            rec.graphics.remove("bounds");
            rec.bounds = Some(translate_bounds(graph, b)?);
        }
        if let Some(b) = &shape.frame_bounds {
            rec.graphics.remove("frameBounds");
            rec.frame_bounds = Some(translate_bounds(graph, b)?);
        }

        out.insert(node.id.to_string(), rec);
    }
    Ok(out)
}

fn translate_containers(graph: &SceneGraph) -> SchemaResult<BTreeMap<String, ContainerRecord>> {
    let mut out = BTreeMap::new();
    for id in graph.containers() {
        let node = graph.node(id)?;
        let NodeData::Container(container) = &node.data else {
            return Err(SchemaError::unexpected_kind(id, NodeKind::Container, node.kind()));
        };

        let mut c = Vec::with_capacity(container.children.len());
        for child_id in &container.children {
            let child = graph.node(child_id)?;
            let entry = match &child.data {
                NodeData::Shape(_) => ContainerChild::Shape(child.id.to_string()),
                NodeData::Container(nested) => ContainerChild::Container {
                    gn: child.id.to_string(),
                    t: nested.transform.clone(),
                },
                _ => {
                    return Err(SchemaError::UnsupportedContainerChild {
                        container: node.id.clone(),
                        child: child.id.clone(),
                        kind: child.kind(),
                    });
                }
            };
            c.push(entry);
        }

        let b = container
            .bounds
            .as_ref()
            .map(|b| translate_bounds(graph, b))
            .transpose()?;

        out.insert(node.id.to_string(), ContainerRecord { c, b });
    }
    Ok(out)
}

fn translate_animations(
    graph: &SceneGraph,
    names: &mut BlockNameAllocator,
) -> SchemaResult<BTreeMap<String, AnimationRecord>> {
    let mut out = BTreeMap::new();
    for id in graph.animations() {
        let node = graph.node(id)?;
        let NodeData::MovieClip(clip) = &node.data else {
            return Err(SchemaError::unexpected_kind(id, NodeKind::MovieClip, node.kind()));
        };
        let rec = translate_animation(graph, node, clip, names)?;
        out.insert(node.id.to_string(), rec);
    }
    Ok(out)
}

fn translate_animation(
    graph: &SceneGraph,
    node: &Node,
    clip: &MovieClipData,
    names: &mut BlockNameAllocator,
) -> SchemaResult<AnimationRecord> {
    let mut scope = AnimationScope::new(graph, names);
    let mut tweens = Vec::with_capacity(clip.tweens.len());

    for tween_id in &clip.tweens {
        let tween_node = graph.node(tween_id)?;
        let NodeData::Tween(tween) = &tween_node.data else {
            return Err(SchemaError::unexpected_kind(
                tween_id,
                NodeKind::Tween,
                tween_node.kind(),
            ));
        };

        let target = graph.node(&tween.target)?;
        let get = match &target.data {
            NodeData::MovieClip(target_clip) => {
                Value::String(scope.claim_movie_clip(target, target_clip))
            }
            NodeData::Container(container) => {
                Value::String(scope.claim_container(target, Some(container)))
            }
            NodeData::Shape(_) => Value::String(scope.claim_shape(target)),
            NodeData::NativeObject(_) => scope.inline_target(&target.id)?,
            NodeData::Tween(_) | NodeData::Bounds => {
                return Err(SchemaError::invalid_target(&target.id, target.kind()));
            }
        };

        let mut instructions = vec![Instruction::get(get)];
        let calls = scope.dereference(&tween.tween_calls)?;
        instructions.extend(method_calls(&tween_node.id, calls)?);
        tweens.push(instructions);
    }

    let refs = scope.into_refs();
    let bounds = match &clip.bounds {
        Some(b) => Some(translate_bounds(graph, b)?),
        None => node.bounds.clone(),
    };
    let frame_bounds = match &clip.frame_bounds {
        Some(b) => Some(translate_bounds(graph, b)?),
        None => node.frame_bounds.clone(),
    };

    tracing::debug!(
        animation = %node.id,
        tweens = tweens.len(),
        movie_clips = refs.movie_clips.len(),
        shapes = refs.shapes.len(),
        containers = refs.containers.len(),
        "translated animation"
    );

    Ok(AnimationRecord {
        animations: refs.movie_clips,
        shapes: refs.shapes,
        containers: refs.containers,
        tweens,
        graphics: Vec::new(),
        bounds,
        frame_bounds,
    })
}

/// Turn dereferenced tween calls into instructions, preserving call order.
fn method_calls(tween: &NodeId, calls: Value) -> SchemaResult<Vec<Instruction>> {
    let calls = match calls {
        Value::Array(items) => items,
        Value::Object(map) => mapping_entry_order(map),
        _ => return Err(SchemaError::malformed_call(tween, "tween calls must be a collection")),
    };

    calls
        .into_iter()
        .enumerate()
        .map(|(i, call)| {
            let Value::Object(mut call) = call else {
                return Err(SchemaError::malformed_call(
                    tween,
                    format!("call {i} is not an object"),
                ));
            };
            let n = match call.remove("name") {
                Some(Value::String(name)) => name,
                _ => {
                    return Err(SchemaError::malformed_call(
                        tween,
                        format!("call {i} has no string `name`"),
                    ));
                }
            };
            let a = match call.remove("args") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(args)) => args,
                Some(_) => {
                    return Err(SchemaError::malformed_call(
                        tween,
                        format!("call {i} (`{n}`) has non-sequence `args`"),
                    ));
                }
            };
            Ok(Instruction { n, a })
        })
        .collect()
}

/// Values of a call mapping in replay order: array-index keys ascending, then the remaining keys
/// in document order.
fn mapping_entry_order(map: Map<String, Value>) -> Vec<Value> {
    let (mut indexed, named): (Vec<_>, Vec<_>) = map
        .into_iter()
        .map(|(k, v)| (array_index(&k), v))
        .partition(|(i, _)| i.is_some());
    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().chain(named).map(|(_, v)| v).collect()
}

/// Canonical decimal `u32` below `u32::MAX`, without leading zeros.
fn array_index(key: &str) -> Option<u32> {
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&i| i != u32::MAX)
}
