use crate::foundation::ids::NodeId;
use serde_json::{Map, Number, Value};

/// Key of the single-entry object that marks a reference inside arbitrary data.
pub const REF_KEY: &str = "$ref";

/// Arbitrary node payload in which `{"$ref": id}` objects are references to other nodes.
///
/// Object entries keep document order; the dereferencer walks them in that order.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Datum>),
    Object(Vec<(String, Datum)>),
    Ref(NodeId),
}

impl Datum {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => {
                if let Some(id) = ref_target(map) {
                    return Self::Ref(NodeId::new(id));
                }
                Self::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), Self::from_json(v)))
                        .collect(),
                )
            }
        }
    }

    /// Render back to JSON; references keep their `{"$ref": id}` form.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Ref(id) => {
                let mut map = Map::with_capacity(1);
                map.insert(REF_KEY.to_owned(), Value::String(id.as_str().to_owned()));
                Value::Object(map)
            }
        }
    }

    pub fn as_ref_id(&self) -> Option<&NodeId> {
        match self {
            Self::Ref(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Visit every reference in depth-first document order.
    pub fn for_each_ref(&self, f: &mut impl FnMut(&NodeId)) {
        match self {
            Self::Ref(id) => f(id),
            Self::Array(items) => {
                for d in items {
                    d.for_each_ref(f);
                }
            }
            Self::Object(entries) => {
                for (_, d) in entries {
                    d.for_each_ref(f);
                }
            }
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => {}
        }
    }
}

fn ref_target(map: &Map<String, Value>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    map.get(REF_KEY).and_then(Value::as_str)
}
