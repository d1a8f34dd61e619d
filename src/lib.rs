//! tweenschema translates a vector-animation scene graph into a flat playback schema.
//!
//! The source graph is a set of cross-referencing nodes (shapes, containers, movie clips,
//! tweens and native data objects). Translation produces three id-keyed tables:
//!
//! - shapes with their graphics payload, translation and bounds
//! - containers as ordered child lists
//! - animations as construction blocks plus per-tween instruction lists
//!
//! Within one animation every referenced node gets exactly one synthetic block name and one
//! construction block, however often it is mentioned.
//!
//! ```no_run
//! let graph = tweenschema::SceneGraph::from_path("scene.json".as_ref())?;
//! let schema = tweenschema::translate(&graph)?;
//! println!("{}", schema.to_json_string(true)?);
//! # Ok::<(), tweenschema::SchemaError>(())
//! ```
#![forbid(unsafe_code)]

mod foundation;
mod scene;
mod translate;

pub use crate::foundation::error::{SchemaError, SchemaResult};
pub use crate::foundation::ids::{NodeId, NodeKind};

pub use crate::scene::datum::{Datum, REF_KEY};
pub use crate::scene::graph::{
    ContainerData, MovieClipData, NativeObjectData, Node, NodeData, Position, SceneGraph,
    ShapeData, TweenData,
};
pub use crate::scene::load::{GraphError, GraphErrors, GraphPathElem};
pub use crate::scene::model::{GraphDef, NodeDef, NodeRef};

pub use crate::translate::bounds::translate_bounds;
pub use crate::translate::builder::{Translator, translate, translate_with};
pub use crate::translate::names::{BlockNameAllocator, BlockScope};
pub use crate::translate::output::{
    AnimationRecord, ContainerBlock, ContainerChild, ContainerRecord, Instruction, MovieClipBlock,
    ShapeBlock, ShapeRecord, TranslatedSchema,
};
pub use crate::translate::scope::{AnimationScope, ConstructionRefs};
