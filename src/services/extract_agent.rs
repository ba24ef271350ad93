use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

use crate::{configuration::AgentSettings, domain::SchemaDocument};

use super::{structured_request, ChatCompletion};

#[async_trait]
pub trait StructuredExtractor: Send + Sync {
    async fn extract(&self, content: &str, schema: &SchemaDocument) -> anyhow::Result<Value>;

    async fn extract_with_schema_text(
        &self,
        content: &str,
        schema: &str,
    ) -> anyhow::Result<Value> {
        let schema = SchemaDocument::parse(schema)?;
        self.extract(content, &schema).await
    }

    async fn extract_with_schema_value(
        &self,
        content: &str,
        schema: Value,
    ) -> anyhow::Result<Value> {
        let schema = SchemaDocument::from_value(schema)?;
        self.extract(content, &schema).await
    }
}

pub struct ExtractAgent {
    backend: Arc<dyn ChatCompletion>,
    settings: AgentSettings,
}

impl ExtractAgent {
    pub fn new(backend: Arc<dyn ChatCompletion>, settings: AgentSettings) -> Self {
        ExtractAgent { backend, settings }
    }
}

#[async_trait]
impl StructuredExtractor for ExtractAgent {
    async fn extract(&self, content: &str, schema: &SchemaDocument) -> anyhow::Result<Value> {
        let request = structured_request(
            &self.settings,
            content,
            "ExtractedData",
            schema.as_value().clone(),
        )?;

        let output = self.backend.complete(request).await?;

        serde_json::from_str(&output).context("Structured output was not valid JSON")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_openai::types::CreateChatCompletionRequest;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::{ExtractAgent, StructuredExtractor};
    use crate::{
        configuration::{AgentSettings, PromptSettings, ReasoningEffort},
        services::ChatCompletion,
    };

    /// Fills every property with the first sentence of the page, which is
    /// enough for a title-only schema.
    struct TitleModel {
        requests: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl ChatCompletion for TitleModel {
        async fn complete(&self, request: CreateChatCompletionRequest) -> anyhow::Result<String> {
            let body = serde_json::to_value(&request)?;
            let text = body["messages"][1]["content"].as_str().unwrap_or_default();
            let title = text.split('.').next().unwrap_or_default().trim().to_string();

            let mut output = serde_json::Map::new();
            if let Some(props) =
                body["response_format"]["json_schema"]["schema"]["properties"].as_object()
            {
                for name in props.keys() {
                    output.insert(name.clone(), Value::String(title.clone()));
                }
            }

            self.requests.lock().unwrap().push(body);
            Ok(Value::Object(output).to_string())
        }
    }

    struct GarbageModel;

    #[async_trait]
    impl ChatCompletion for GarbageModel {
        async fn complete(&self, _request: CreateChatCompletionRequest) -> anyhow::Result<String> {
            Ok("Sure! Here is the data you asked for".to_string())
        }
    }

    fn settings() -> AgentSettings {
        AgentSettings {
            model: "gpt-5-mini".to_string(),
            temperature: None,
            reasoning_effort: ReasoningEffort::Minimal,
            prompt: PromptSettings {
                system_message: "Extract data.".to_string(),
            },
        }
    }

    fn title_model() -> Arc<TitleModel> {
        Arc::new(TitleModel {
            requests: Mutex::new(vec![]),
        })
    }

    #[tokio::test]
    async fn title_schema_round_trip() {
        let model = title_model();
        let agent = ExtractAgent::new(model.clone(), settings());
        let schema = json!({
            "type": "object",
            "properties": {"title": {"type": "string"}},
            "required": ["title"],
            "additionalProperties": false
        });

        let result = agent
            .extract_with_schema_value(
                "The Rust Programming Language. An introductory book about Rust.",
                schema.clone(),
            )
            .await
            .unwrap();

        assert_eq!(result, json!({"title": "The Rust Programming Language"}));
        let object = result.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object["title"].is_string());

        let requests = model.requests.lock().unwrap();
        let format = &requests[0]["response_format"]["json_schema"];
        assert_eq!(format["strict"], true);
        assert_eq!(format["schema"], schema);
        assert_eq!(requests[0]["reasoning_effort"], "minimal");
    }

    #[tokio::test]
    async fn schema_text_is_parsed_and_made_strict() {
        let model = title_model();
        let agent = ExtractAgent::new(model.clone(), settings());

        agent
            .extract_with_schema_text(
                "Weekly Digest. Items follow.",
                r#"{"type": "object", "properties": {"headline": {"type": "string"}}}"#,
            )
            .await
            .unwrap();

        let requests = model.requests.lock().unwrap();
        let schema = &requests[0]["response_format"]["json_schema"]["schema"];
        assert_eq!(schema["required"], json!(["headline"]));
        assert_eq!(schema["additionalProperties"], json!(false));
    }

    #[tokio::test]
    async fn invalid_schema_text_propagates_before_model_call() {
        let model = title_model();
        let agent = ExtractAgent::new(model.clone(), settings());

        let result = agent.extract_with_schema_text("text", "title, price").await;

        assert!(result.is_err());
        assert!(model.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_json_output_is_a_parse_error() {
        let agent = ExtractAgent::new(Arc::new(GarbageModel), settings());

        let err = agent
            .extract_with_schema_value("text", json!({"type": "object", "properties": {}}))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Structured output was not valid JSON"));
    }
}
