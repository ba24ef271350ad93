use anyhow::{bail, Context};
use serde_json::{Map, Value};

/// A JSON Schema for the extraction target, normalized into the strict form
/// constrained generation requires.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    schema: Value,
}

impl SchemaDocument {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let value: Value = serde_json::from_str(text.trim())
            .with_context(|| format!("Schema is not valid JSON: {}", text))?;

        SchemaDocument::from_value(value)
    }

    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        let mut schema = unwrap_envelope(value);
        if !schema.is_object() {
            bail!("Schema must be a JSON object, got: {}", schema);
        }

        make_strict(&mut schema);

        Ok(SchemaDocument { schema })
    }

    pub fn as_value(&self) -> &Value {
        &self.schema
    }

    pub fn into_value(self) -> Value {
        self.schema
    }
}

// Models often wrap the schema in a `{name, schema}` envelope.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map)
            if !map.contains_key("type")
                && !map.contains_key("properties")
                && map.get("schema").is_some_and(Value::is_object) =>
        {
            map.remove("schema").unwrap_or(Value::Object(Map::new()))
        }
        other => other,
    }
}

pub fn make_strict(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let is_object_schema = match map.get("type") {
                Some(Value::String(t)) => t == "object",
                Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
                _ => map.contains_key("properties"),
            };

            if is_object_schema {
                let required: Vec<Value> = match map.get("properties") {
                    Some(Value::Object(props)) => {
                        props.keys().map(|k| Value::String(k.clone())).collect()
                    }
                    _ => vec![],
                };
                map.insert("required".to_string(), Value::Array(required));
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            for (key, child) in map.iter_mut() {
                match (key.as_str(), child) {
                    (
                        "properties" | "patternProperties" | "$defs" | "definitions",
                        Value::Object(schemas),
                    ) => schemas.values_mut().for_each(make_strict),
                    // Plain data, never nested schemas.
                    ("required" | "enum" | "const" | "default" | "examples", _) => {}
                    (_, child) => make_strict(child),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(make_strict),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::SchemaDocument;

    #[test]
    fn nested_objects_become_strict() {
        let schema = SchemaDocument::parse(
            r#"{
                "type": "object",
                "properties": {
                    "job_categories": {"type": "array", "items": {"type": "string"}},
                    "jobs": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "company_name": {"type": "string"},
                                "role": {"type": "string"}
                            }
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let value = schema.as_value();
        assert_eq!(value["additionalProperties"], json!(false));
        assert_eq!(value["required"], json!(["job_categories", "jobs"]));

        let job = &value["properties"]["jobs"]["items"];
        assert_eq!(job["additionalProperties"], json!(false));
        assert_eq!(job["required"], json!(["company_name", "role"]));

        let category = &value["properties"]["job_categories"]["items"];
        assert!(category.get("additionalProperties").is_none());
    }

    #[test]
    fn already_strict_schema_is_unchanged() {
        let strict = json!({
            "type": "object",
            "properties": {"title": {"type": "string"}},
            "required": ["title"],
            "additionalProperties": false
        });

        let schema = SchemaDocument::from_value(strict.clone()).unwrap();

        assert_eq!(schema.into_value(), strict);
    }

    #[test]
    fn envelope_is_unwrapped() {
        let schema = SchemaDocument::parse(
            r#"{"name": "Products", "schema": {"type": "object", "properties": {"price": {"type": "number"}}}}"#,
        )
        .unwrap();

        assert_eq!(schema.as_value()["required"], json!(["price"]));
        assert!(schema.as_value().get("name").is_none());
    }

    #[test]
    fn property_named_required_is_still_a_schema() {
        let schema = SchemaDocument::from_value(json!({
            "type": "object",
            "properties": {
                "required": {"type": "object", "properties": {"flag": {"type": "boolean"}}}
            }
        }))
        .unwrap();

        let nested = &schema.as_value()["properties"]["required"];
        assert_eq!(nested["required"], json!(["flag"]));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = SchemaDocument::parse("{ not json").unwrap_err();

        assert!(err.to_string().contains("Schema is not valid JSON"));
    }

    #[test]
    fn non_object_schema_is_an_error() {
        assert!(SchemaDocument::parse(r#"["title"]"#).is_err());
    }
}
