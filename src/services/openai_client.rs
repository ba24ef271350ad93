use anyhow::{anyhow, bail, Context};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::Value;

use crate::configuration::AgentSettings;

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: CreateChatCompletionRequest) -> anyhow::Result<String>;
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
}

impl OpenaiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url.trim_end_matches('/'));
        OpenaiClient {
            client: Client::with_config(config),
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenaiClient {
    async fn complete(&self, request: CreateChatCompletionRequest) -> anyhow::Result<String> {
        log::debug!(
            "Sending chat completion to model {} with {} messages",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("OpenAI chat completion failed")?;

        first_choice_content(response)
    }
}

pub fn structured_request(
    settings: &AgentSettings,
    user_content: &str,
    schema_name: &str,
    schema: Value,
) -> anyhow::Result<CreateChatCompletionRequest> {
    let messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(settings.prompt.system_message.as_str())
            .build()?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(user_content)
            .build()?
            .into(),
    ];

    let mut builder = CreateChatCompletionRequestArgs::default();
    builder
        .model(settings.model.as_str())
        .messages(messages)
        .reasoning_effort(async_openai::types::ReasoningEffort::from(settings.reasoning_effort))
        .response_format(ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: None,
                name: schema_name.to_string(),
                schema: Some(schema),
                strict: Some(true),
            },
        });

    if let Some(temperature) = settings.temperature {
        builder.temperature(temperature);
    }

    Ok(builder.build()?)
}

fn first_choice_content(response: CreateChatCompletionResponse) -> anyhow::Result<String> {
    let message = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No choices in Openai response"))?
        .message;

    if let Some(refusal) = message.refusal {
        bail!("Model refused the request: {}", refusal);
    }

    message.content.ok_or_else(|| anyhow!("No content"))
}
