//! Copy-and-mutate schema transforms.
//!
//! Every transform produces a new node; the original is never touched. These
//! are conveniences over the data model, not part of the validation
//! algorithm.

use serde_json::{Map, Value};

use super::{SchemaBuildError, SchemaNode, SubSchema};

impl SchemaNode {
    /// Returns a new node with `attrs` deep-merged over this node's
    /// attributes. Objects merge key-wise; any other value replaces.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::SchemaNode;
    /// use serde_json::json;
    ///
    /// let base = SchemaNode::from_value(&json!({
    ///     "type": "object",
    ///     "properties": {"name": {"type": "string"}}
    /// }))
    /// .unwrap();
    ///
    /// let extended = base
    ///     .extend(&json!({"properties": {"age": {"type": "number"}}}))
    ///     .unwrap();
    ///
    /// assert!(extended.get_property("name").is_some());
    /// assert!(extended.get_property("age").is_some());
    /// assert!(base.get_property("age").is_none());
    /// ```
    pub fn extend(&self, attrs: &Value) -> Result<SchemaNode, SchemaBuildError> {
        let mut merged = self.to_attributes();
        merge_into(&mut merged, attrs);
        SchemaNode::from_value(&merged)
    }

    /// Returns a new node keeping only the named properties.
    ///
    /// `required` is filtered to the kept names.
    pub fn pick_properties(&self, keys: &[&str]) -> SchemaNode {
        let mut node = self.clone();
        if let Some(props) = &mut node.properties {
            props.retain(|name, _| keys.contains(&name.as_str()));
        }
        if let Some(required) = &mut node.required {
            required.retain(|name| keys.contains(&name.as_str()));
        }
        node
    }

    /// Returns a new node without the named properties.
    ///
    /// `required` entries for the dropped names are removed too.
    pub fn omit_properties(&self, keys: &[&str]) -> SchemaNode {
        let mut node = self.clone();
        if let Some(props) = &mut node.properties {
            props.retain(|name, _| !keys.contains(&name.as_str()));
        }
        if let Some(required) = &mut node.required {
            required.retain(|name| !keys.contains(&name.as_str()));
        }
        node
    }

    /// Returns a new node with `required` dropped.
    pub fn partial(&self) -> SchemaNode {
        let mut node = self.clone();
        node.required = None;
        node
    }

    /// Returns a new node with `required` set to every declared property.
    pub fn required_all(&self) -> SchemaNode {
        let mut node = self.clone();
        node.required = self
            .properties
            .as_ref()
            .map(|props| props.keys().cloned().collect());
        node
    }

    /// Returns a copy of `value` stripped of keys and array elements the
    /// schema does not declare, recursively.
    ///
    /// Keys survive when named by `properties` (unless declared `false`) or
    /// matched by a `patternProperties` pattern. Nodes without declared
    /// properties leave objects untouched.
    pub fn remove_unknown_properties(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let Some(props) = &self.properties else {
                    return value.clone();
                };
                let mut out = Map::new();
                for (key, v) in map {
                    let declared = match props.get(key) {
                        Some(SubSchema::Bool(false)) | None => None,
                        Some(sub) => Some(sub),
                    };
                    let pattern = self.pattern_properties.as_ref().and_then(|patterns| {
                        patterns
                            .iter()
                            .find(|p| p.pattern.is_match(key))
                            .map(|p| &p.schema)
                    });
                    match declared.or(pattern) {
                        Some(SubSchema::Node(node)) => {
                            out.insert(key.clone(), node.remove_unknown_properties(v));
                        }
                        Some(SubSchema::Bool(_)) => {
                            out.insert(key.clone(), v.clone());
                        }
                        None => {}
                    }
                }
                Value::Object(out)
            }
            Value::Array(items) => match self.items.as_ref().and_then(SubSchema::as_node) {
                Some(item_node) => Value::Array(
                    items
                        .iter()
                        .map(|v| item_node.remove_unknown_properties(v))
                        .collect(),
                ),
                None => value.clone(),
            },
            _ => value.clone(),
        }
    }
}

/// Deep-merges `overlay` into `base`: objects merge key-wise, everything
/// else replaces.
fn merge_into(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> SchemaNode {
        SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "number"},
                "email": {"type": "string", "format": "email"}
            },
            "required": ["name", "age"]
        }))
        .unwrap()
    }

    #[test]
    fn test_pick_properties() {
        let picked = user_schema().pick_properties(&["name"]);
        assert!(picked.get_property("name").is_some());
        assert!(picked.get_property("age").is_none());
        assert_eq!(picked.required, Some(vec!["name".to_string()]));
    }

    #[test]
    fn test_omit_properties() {
        let omitted = user_schema().omit_properties(&["age"]);
        assert!(omitted.get_property("age").is_none());
        assert!(omitted.get_property("name").is_some());
        assert_eq!(omitted.required, Some(vec!["name".to_string()]));
    }

    #[test]
    fn test_partial_drops_required() {
        let partial = user_schema().partial();
        assert!(partial.required.is_none());
        assert!(partial.get_property("name").is_some());
    }

    #[test]
    fn test_required_all_lists_every_property() {
        let required = user_schema().required_all();
        assert_eq!(
            required.required,
            Some(vec![
                "name".to_string(),
                "age".to_string(),
                "email".to_string()
            ])
        );
    }

    #[test]
    fn test_transforms_do_not_mutate_original() {
        let original = user_schema();
        let _ = original.pick_properties(&["name"]);
        let _ = original.partial();
        assert!(original.get_property("age").is_some());
        assert_eq!(original.required.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_extend_merges_properties() {
        let extended = user_schema()
            .extend(&json!({
                "properties": {"role": {"type": "string"}},
                "required": ["name"]
            }))
            .unwrap();

        assert!(extended.get_property("role").is_some());
        assert!(extended.get_property("name").is_some());
        assert_eq!(extended.required, Some(vec!["name".to_string()]));
    }

    #[test]
    fn test_remove_unknown_properties() {
        let schema = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "address": {
                    "type": "object",
                    "properties": {"city": {"type": "string"}}
                },
                "tags": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"label": {"type": "string"}}
                    }
                }
            }
        }))
        .unwrap();

        let cleaned = schema.remove_unknown_properties(&json!({
            "name": "Ada",
            "extra": true,
            "address": {"city": "London", "planet": "Earth"},
            "tags": [{"label": "x", "noise": 1}]
        }));

        assert_eq!(
            cleaned,
            json!({
                "name": "Ada",
                "address": {"city": "London"},
                "tags": [{"label": "x"}]
            })
        );
    }

    #[test]
    fn test_remove_unknown_keeps_pattern_matches() {
        let schema = SchemaNode::from_value(&json!({
            "properties": {"id": {"type": "string"}},
            "patternProperties": {"^x_": {"type": "number"}}
        }))
        .unwrap();

        let cleaned = schema.remove_unknown_properties(&json!({
            "id": "a",
            "x_count": 3,
            "other": true
        }));

        assert_eq!(cleaned, json!({"id": "a", "x_count": 3}));
    }

    #[test]
    fn test_remove_unknown_without_declared_properties_is_identity() {
        let schema = SchemaNode::from_value(&json!({"type": "object"})).unwrap();
        let value = json!({"anything": [1, 2, 3]});
        assert_eq!(schema.remove_unknown_properties(&value), value);
    }
}
