use std::fmt;

/// Stable identifier of a node in the source scene graph.
///
/// Identity comparison between two references is id equality.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Closed set of node kinds a scene graph can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Vector shape with graphics primitives.
    Shape,
    /// Ordered group of shapes and child containers.
    Container,
    /// Animated symbol instance; also the unit of animation.
    MovieClip,
    /// Opaque data payload that may embed further references.
    NativeObject,
    /// One animation segment (target plus method calls).
    Tween,
    /// Raw bounds value referenced from shapes or animations.
    Bounds,
}

impl NodeKind {
    /// Parse the `type` tag used by the graph document.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "shape" => Some(Self::Shape),
            "container" => Some(Self::Container),
            "movie_clip" => Some(Self::MovieClip),
            "native_object" => Some(Self::NativeObject),
            "tween" => Some(Self::Tween),
            "bounds" => Some(Self::Bounds),
            _ => None,
        }
    }

    /// The `type` tag used by the graph document.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Shape => "shape",
            Self::Container => "container",
            Self::MovieClip => "movie_clip",
            Self::NativeObject => "native_object",
            Self::Tween => "tween",
            Self::Bounds => "bounds",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
