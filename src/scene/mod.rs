//! Source scene graph.
//!
//! The graph arrives as an untyped JSON document ([`model`]); loading converts it into a typed
//! arena of tagged-union nodes addressed by id ([`graph`]), failing with path-annotated errors
//! when the document is structurally malformed ([`load`]).

pub(crate) mod datum;
pub(crate) mod graph;
pub(crate) mod load;
pub(crate) mod model;
