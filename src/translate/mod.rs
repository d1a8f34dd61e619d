//! Scene graph to playback schema translation.

pub(crate) mod bounds;
pub(crate) mod builder;
pub(crate) mod names;
pub(crate) mod output;
pub(crate) mod scope;
