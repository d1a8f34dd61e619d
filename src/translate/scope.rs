use crate::foundation::error::{SchemaError, SchemaResult};
use crate::foundation::ids::NodeId;
use crate::scene::datum::Datum;
use crate::scene::graph::{ContainerData, MovieClipData, Node, NodeData, SceneGraph};
use crate::translate::names::{BlockNameAllocator, BlockScope};
use crate::translate::output::{ContainerBlock, MovieClipBlock, ShapeBlock};
use serde_json::{Map, Value};

/// Construction blocks accumulated while translating one animation, in first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct ConstructionRefs {
    pub movie_clips: Vec<MovieClipBlock>,
    pub shapes: Vec<ShapeBlock>,
    pub containers: Vec<ContainerBlock>,
}

/// Per-animation translation state.
///
/// Every reference claimed through a scope yields exactly one block name and one construction
/// block, no matter how many tweens or nested native objects mention it.
pub struct AnimationScope<'a> {
    graph: &'a SceneGraph,
    names: &'a mut BlockNameAllocator,
    scope: BlockScope,
    refs: ConstructionRefs,
    // Native objects currently being walked.
    active: Vec<NodeId>,
}

impl<'a> AnimationScope<'a> {
    pub fn new(graph: &'a SceneGraph, names: &'a mut BlockNameAllocator) -> Self {
        Self {
            graph,
            names,
            scope: BlockScope::new(),
            refs: ConstructionRefs::default(),
            active: Vec::new(),
        }
    }

    pub fn block_scope(&self) -> &BlockScope {
        &self.scope
    }

    pub fn into_refs(self) -> ConstructionRefs {
        self.refs
    }

    pub fn claim_movie_clip(&mut self, node: &Node, clip: &MovieClipData) -> String {
        if let Some(bn) = self.scope.get(&node.id) {
            return bn.to_owned();
        }
        let bn = self.names.allocate(&node.id, &mut self.scope);
        self.refs.movie_clips.push(MovieClipBlock {
            bn: bn.clone(),
            gn: node.id.to_string(),
            a: clip.constructor_args.clone(),
            t: clip.transform.clone(),
        });
        bn
    }

    pub fn claim_shape(&mut self, node: &Node) -> String {
        if let Some(bn) = self.scope.get(&node.id) {
            return bn.to_owned();
        }
        let bn = self.names.allocate(&node.id, &mut self.scope);
        self.refs.shapes.push(ShapeBlock {
            bn: bn.clone(),
            gn: node.id.to_string(),
        });
        bn
    }

    /// `placement` carries the container's transform and off flag; it is only given when the
    /// container is a tween target.
    pub fn claim_container(
        &mut self,
        node: &Node,
        placement: Option<&ContainerData>,
    ) -> String {
        if let Some(bn) = self.scope.get(&node.id) {
            let bn = bn.to_owned();
            // Claimed from call arguments first; the target claim supplies the placement.
            if let Some(c) = placement
                && let Some(block) = self
                    .refs
                    .containers
                    .iter_mut()
                    .find(|b| b.bn == bn && b.o.is_none())
            {
                block.t = c.transform.clone();
                block.o = Some(c.off);
            }
            return bn;
        }
        let bn = self.names.allocate(&node.id, &mut self.scope);
        self.refs.containers.push(ContainerBlock {
            bn: bn.clone(),
            gn: node.id.to_string(),
            t: placement.and_then(|c| c.transform.clone()),
            o: placement.map(|c| c.off),
        });
        bn
    }

    /// Resolve a native object into plain JSON, substituting block names for every movie clip,
    /// container and shape it references and recursing into nested native objects.
    ///
    /// The result is a sequence when the source object is a sequence, a mapping otherwise.
    pub fn dereference(&mut self, native: &NodeId) -> SchemaResult<Value> {
        self.walk(native, Walk::Claim)
    }

    /// Resolve a native tween target into plain JSON.
    ///
    /// Targets are addressed directly and never create construction blocks: nested native
    /// objects are inlined, and a reference to any other kind is an invalid target type.
    pub fn inline_target(&mut self, native: &NodeId) -> SchemaResult<Value> {
        self.walk(native, Walk::Inline)
    }

    fn walk(&mut self, native: &NodeId, mode: Walk) -> SchemaResult<Value> {
        let graph = self.graph;
        let node = graph.node(native)?;
        let NodeData::NativeObject(obj) = &node.data else {
            return Err(SchemaError::invalid_target(&node.id, node.kind()));
        };
        if self.active.contains(&node.id) {
            return Err(SchemaError::CyclicReference(node.id.clone()));
        }

        self.active.push(node.id.clone());
        let out = self.resolve(&obj.object, mode);
        self.active.pop();
        out
    }

    fn resolve(&mut self, datum: &Datum, mode: Walk) -> SchemaResult<Value> {
        match datum {
            Datum::Ref(id) => self.resolve_ref(id, mode),
            Datum::Array(items) => items
                .iter()
                .map(|d| self.resolve(d, mode))
                .collect::<SchemaResult<Vec<_>>>()
                .map(Value::Array),
            Datum::Object(entries) => {
                let mut out = Map::with_capacity(entries.len());
                for (k, d) in entries {
                    out.insert(k.clone(), self.resolve(d, mode)?);
                }
                Ok(Value::Object(out))
            }
            plain => Ok(plain.to_json()),
        }
    }

    fn resolve_ref(&mut self, id: &NodeId, mode: Walk) -> SchemaResult<Value> {
        let graph = self.graph;
        let node = graph.node(id)?;
        let bn = match (&node.data, mode) {
            (NodeData::NativeObject(_), _) => return self.walk(id, mode),
            (NodeData::MovieClip(clip), Walk::Claim) => self.claim_movie_clip(node, clip),
            (NodeData::Container(_), Walk::Claim) => self.claim_container(node, None),
            (NodeData::Shape(_), Walk::Claim) => self.claim_shape(node),
            _ => return Err(SchemaError::invalid_target(&node.id, node.kind())),
        };
        Ok(Value::String(bn))
    }
}

#[derive(Debug, Clone, Copy)]
enum Walk {
    /// Substitute block names, emitting construction blocks.
    Claim,
    /// Inline nested native objects only.
    Inline,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ids::NodeKind;
    use serde_json::json;

    fn graph() -> SceneGraph {
        SceneGraph::from_json_value(json!({
            "nodes": [
                { "id": "M", "type": "movie_clip",
                  "data": { "constructorArgs": [5], "transform": { "x": 1, "y": 2 } } },
                { "id": "S", "type": "shape", "data": {} },
                { "id": "C", "type": "container", "data": { "children": ["S"], "off": true } },
                { "id": "Inner", "type": "native_object",
                  "data": { "object": { "shape": { "$ref": "S" }, "clip": { "$ref": "M" } } } },
                { "id": "Outer", "type": "native_object",
                  "data": { "object": [
                      { "$ref": "C" },
                      { "$ref": "Inner" },
                      { "nested": [{ "$ref": "S" }], "n": 3 }
                  ] } },
                { "id": "T", "type": "tween", "data": { "target": "S", "tweenCalls": "Outer" } },
                { "id": "BadArg", "type": "native_object", "data": { "object": [{ "$ref": "T" }] } },
                { "id": "Loop", "type": "native_object", "data": { "object": [{ "$ref": "Loop" }] } }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn substitutes_block_names_and_recurses() {
        let g = graph();
        let mut names = BlockNameAllocator::new();
        let mut scope = AnimationScope::new(&g, &mut names);

        let out = scope.dereference(&NodeId::from("Outer")).unwrap();
        assert_eq!(
            out,
            json!([
                "bn_C_0",
                { "shape": "bn_S_0", "clip": "bn_M_0" },
                { "nested": ["bn_S_0"], "n": 3 }
            ])
        );

        let refs = scope.into_refs();
        assert_eq!(
            refs.movie_clips,
            [MovieClipBlock {
                bn: "bn_M_0".to_string(),
                gn: "M".to_string(),
                a: Some(json!([5])),
                t: Some(json!({ "x": 1, "y": 2 })),
            }]
        );
        assert_eq!(
            refs.shapes,
            [ShapeBlock {
                bn: "bn_S_0".to_string(),
                gn: "S".to_string(),
            }]
        );
        assert_eq!(
            refs.containers,
            [ContainerBlock {
                bn: "bn_C_0".to_string(),
                gn: "C".to_string(),
                t: None,
                o: None,
            }]
        );
    }

    #[test]
    fn second_pass_reuses_names() {
        let g = graph();
        let mut names = BlockNameAllocator::new();
        let mut scope = AnimationScope::new(&g, &mut names);

        let first = scope.dereference(&NodeId::from("Inner")).unwrap();
        let second = scope.dereference(&NodeId::from("Inner")).unwrap();
        assert_eq!(first, second);
        assert_eq!(scope.block_scope().len(), 2);

        let refs = scope.into_refs();
        assert_eq!(refs.shapes.len(), 1);
        assert_eq!(refs.movie_clips.len(), 1);
        assert_eq!(names.issued(&NodeId::from("S")), 1);
    }

    #[test]
    fn tween_reference_is_an_invalid_target() {
        let g = graph();
        let mut names = BlockNameAllocator::new();
        let mut scope = AnimationScope::new(&g, &mut names);

        let err = scope.dereference(&NodeId::from("BadArg")).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidTargetType {
                kind: NodeKind::Tween,
                ..
            }
        ));
        assert!(err.to_string().starts_with("invalid target type"));
    }

    #[test]
    fn non_native_root_is_an_invalid_target() {
        let g = graph();
        let mut names = BlockNameAllocator::new();
        let mut scope = AnimationScope::new(&g, &mut names);
        let err = scope.dereference(&NodeId::from("S")).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidTargetType { .. }));
    }

    #[test]
    fn container_target_after_argument_claim_gains_placement() {
        let g = graph();
        let mut names = BlockNameAllocator::new();
        let mut scope = AnimationScope::new(&g, &mut names);

        let c = g.node(&NodeId::from("C")).unwrap();
        let NodeData::Container(placement) = &c.data else {
            panic!("expected container");
        };
        let from_args = scope.claim_container(c, None);
        let as_target = scope.claim_container(c, Some(placement));
        assert_eq!(from_args, as_target);

        let refs = scope.into_refs();
        assert_eq!(
            refs.containers,
            [ContainerBlock {
                bn: "bn_C_0".to_string(),
                gn: "C".to_string(),
                t: None,
                o: Some(true),
            }]
        );
    }

    #[test]
    fn inlined_target_resolves_nested_natives_without_blocks() {
        let g = SceneGraph::from_json_value(json!({
            "nodes": [
                { "id": "S", "type": "shape" },
                { "id": "Opts", "type": "native_object", "data": { "object": { "alpha": 1 } } },
                { "id": "Stage", "type": "native_object",
                  "data": { "object": { "name": "stage", "opts": { "$ref": "Opts" } } } },
                { "id": "Holder", "type": "native_object",
                  "data": { "object": { "root": { "$ref": "S" } } } }
            ]
        }))
        .unwrap();
        let mut names = BlockNameAllocator::new();
        let mut scope = AnimationScope::new(&g, &mut names);

        let out = scope.inline_target(&NodeId::from("Stage")).unwrap();
        assert_eq!(out, json!({ "name": "stage", "opts": { "alpha": 1 } }));

        let err = scope.inline_target(&NodeId::from("Holder")).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidTargetType {
                kind: NodeKind::Shape,
                ..
            }
        ));
        assert!(scope.block_scope().is_empty());
        assert!(names.is_empty());
    }

    #[test]
    fn self_reference_is_rejected() {
        let g = graph();
        let mut names = BlockNameAllocator::new();
        let mut scope = AnimationScope::new(&g, &mut names);
        let err = scope.dereference(&NodeId::from("Loop")).unwrap_err();
        assert!(matches!(err, SchemaError::CyclicReference(id) if id.as_str() == "Loop"));
    }
}
