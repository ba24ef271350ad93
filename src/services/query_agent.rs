use std::sync::Arc;

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::configuration::AgentSettings;

use super::{structured_request, ChatCompletion};

#[async_trait]
pub trait SchemaSynthesizer: Send + Sync {
    async fn synthesize(&self, query: &str) -> anyhow::Result<String>;
}

#[derive(Deserialize)]
struct AgentOutput {
    json_schema: String,
}

fn agent_output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "json_schema": {"type": "string"}
        },
        "required": ["json_schema"],
        "additionalProperties": false
    })
}

pub struct QueryAgent {
    backend: Arc<dyn ChatCompletion>,
    settings: AgentSettings,
}

impl QueryAgent {
    pub fn new(backend: Arc<dyn ChatCompletion>, settings: AgentSettings) -> Self {
        QueryAgent { backend, settings }
    }
}

#[async_trait]
impl SchemaSynthesizer for QueryAgent {
    async fn synthesize(&self, query: &str) -> anyhow::Result<String> {
        let request =
            structured_request(&self.settings, query, "AgentOutput", agent_output_schema())?;

        let content = self.backend.complete(request).await?;
        let output: AgentOutput = serde_json::from_str(&content)
            .context("Query agent returned output without a json_schema field")?;

        if output.json_schema.trim().is_empty() {
            bail!("Query agent returned an empty schema");
        }

        log::info!("Generated schema of {} chars", output.json_schema.len());

        Ok(output.json_schema)
    }
}
