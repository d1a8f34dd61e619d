use crate::foundation::error::SchemaResult;
use crate::scene::datum::Datum;
use crate::scene::graph::SceneGraph;
use serde_json::Value;

/// Unwrap a bounds descriptor.
///
/// Sequences translate element-wise; a reference yields the referenced node's raw data; any
/// other value passes through unchanged.
pub fn translate_bounds(graph: &SceneGraph, bounds: &Datum) -> SchemaResult<Value> {
    match bounds {
        Datum::Array(items) => items
            .iter()
            .map(|b| translate_bounds(graph, b))
            .collect::<SchemaResult<Vec<_>>>()
            .map(Value::Array),
        Datum::Ref(id) => Ok(graph.node(id)?.raw.clone()),
        other => Ok(other.to_json()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ids::NodeId;
    use serde_json::json;

    fn graph() -> SceneGraph {
        SceneGraph::from_json_value(json!({
            "nodes": [
                { "id": "B0", "type": "bounds", "data": [0, 0, 10, 20] },
                { "id": "B1", "type": "bounds", "data": { "x": 1, "y": 1, "w": 5, "h": 5 } }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn reference_yields_raw_data() {
        let g = graph();
        let out = translate_bounds(&g, &Datum::Ref(NodeId::from("B1"))).unwrap();
        assert_eq!(out, json!({ "x": 1, "y": 1, "w": 5, "h": 5 }));
    }

    #[test]
    fn sequences_keep_length_and_order() {
        let g = graph();
        let input = Datum::from_json(&json!([
            { "$ref": "B1" },
            [1, 2, 3, 4],
            { "$ref": "B0" }
        ]));
        let out = translate_bounds(&g, &input).unwrap();
        assert_eq!(
            out,
            json!([
                { "x": 1, "y": 1, "w": 5, "h": 5 },
                [1, 2, 3, 4],
                [0, 0, 10, 20]
            ])
        );
    }

    #[test]
    fn plain_values_pass_through() {
        let g = graph();
        let input = json!({ "x": 0, "y": 0, "w": 1, "h": 1 });
        assert_eq!(translate_bounds(&g, &Datum::from_json(&input)).unwrap(), input);
        assert_eq!(translate_bounds(&g, &Datum::Null).unwrap(), Value::Null);
    }
}
