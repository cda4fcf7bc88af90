use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Types that can be requested as schema-constrained JSON output.
///
/// Automatically implemented for any `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// OpenAI strict mode wants every object closed (`additionalProperties:
    /// false`), every property listed in `required`, and no `$ref`s.
    fn openai_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        let definitions = match &mut value {
            Value::Object(map) => {
                map.remove("$schema");
                map.remove("definitions")
            }
            _ => None,
        };
        if let Some(defs) = definitions {
            inline_refs(&mut value, &defs);
        }
        close_objects(&mut value);

        value
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("object") {
                close_object(map);
            }
            for (_, v) in map.iter_mut() {
                close_objects(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}

fn close_object(map: &mut Map<String, Value>) {
    map.insert("additionalProperties".to_string(), Value::Bool(false));
    let required: Vec<Value> = match map.get("properties") {
        Some(Value::Object(props)) => props.keys().cloned().map(Value::String).collect(),
        _ => return,
    };
    map.insert("required".to_string(), Value::Array(required));
}

fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(path)) = map.get("$ref") {
                if let Some(def) = path
                    .strip_prefix("#/definitions/")
                    .and_then(|name| definitions.get(name))
                {
                    *value = def.clone();
                    inline_refs(value, definitions);
                    return;
                }
            }

            // schemars wraps documented $refs as a single-element allOf.
            if let Some(Value::Array(all_of)) = map.get("allOf") {
                if let [only] = all_of.as_slice() {
                    let mut inner = only.clone();
                    inline_refs(&mut inner, definitions);
                    if let (Value::Object(inner_map), Some(desc)) =
                        (&mut inner, map.get("description").cloned())
                    {
                        inner_map.entry("description").or_insert(desc);
                    }
                    *value = inner;
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "lowercase")]
    #[allow(dead_code)]
    enum Kind {
        Video,
        News,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Body {
        data: String,
        image: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Hit {
        title: String,
        /// What the hit is.
        kind: Kind,
        body: Body,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Hits {
        results: Vec<Hit>,
    }

    #[test]
    fn test_root_is_closed_object() {
        let schema = Hits::openai_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert!(schema.get("definitions").is_none());
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn test_optional_fields_still_required() {
        let schema = Body::openai_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"data"));
        assert!(required.contains(&"image"));
    }

    #[test]
    fn test_nested_types_inlined() {
        let schema = Hits::openai_schema();
        let text = serde_json::to_string(&schema).unwrap();
        assert!(!text.contains("$ref"));

        let hit = &schema["properties"]["results"]["items"];
        assert_eq!(hit["additionalProperties"], false);
        assert_eq!(hit["properties"]["body"]["type"], "object");
        assert_eq!(hit["properties"]["body"]["additionalProperties"], false);
        assert_eq!(hit["properties"]["kind"]["enum"][0], "video");
        assert_eq!(hit["properties"]["kind"]["description"], "What the hit is.");
    }
}
