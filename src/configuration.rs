use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment as EnvSource, File, FileFormat};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::ScreenshotOptions;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub openai: OpenaiSettings,
    pub browser: BrowserSettings,
    pub agents: AgentPaths,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct OpenaiSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
}

impl OpenaiSettings {
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match self.api_key.as_ref().filter(|key| !key.is_empty()) {
            Some(key) => Ok(key.clone()),
            None => std::env::var("OPENAI_API_KEY").map_err(|_| {
                ConfigError::Message(
                    "OpenAI API key missing: set openai.api_key or OPENAI_API_KEY".to_string(),
                )
            }),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_timeout_seconds: u64,
    pub screenshot: ScreenshotOptions,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AgentPaths {
    pub query_config: PathBuf,
    pub extract_config: PathBuf,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct AgentSettings {
    #[serde(rename = "DEFAULT_QUERY_MODEL", alias = "default_query_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub reasoning_effort: ReasoningEffort,
    pub prompt: PromptSettings,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PromptSettings {
    pub system_message: String,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    #[default]
    Minimal,
    Low,
    Medium,
    High,
}

impl From<ReasoningEffort> for async_openai::types::ReasoningEffort {
    fn from(value: ReasoningEffort) -> Self {
        match value {
            ReasoningEffort::Minimal => async_openai::types::ReasoningEffort::Minimal,
            ReasoningEffort::Low => async_openai::types::ReasoningEffort::Low,
            ReasoningEffort::Medium => async_openai::types::ReasoningEffort::Medium,
            ReasoningEffort::High => async_openai::types::ReasoningEffort::High,
        }
    }
}

impl AgentSettings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?
            .try_deserialize::<AgentSettings>()?;

        if settings.prompt.system_message.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "prompt.system_message is empty in {}",
                path.display()
            )));
        }

        Ok(settings)
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Environment::Local)
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_environment() -> Result<Environment, ConfigError> {
    std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");
    let environment = get_environment()?;

    let mut builder = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")))
        .add_source(File::from(
            configuration_directory.join(format!("{}.yaml", environment.as_str())),
        ))
        .add_source(
            EnvSource::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );

    // Hosting platforms hand out the port as a bare PORT variable.
    if let Ok(port) = std::env::var("PORT") {
        builder = builder.set_override("application.port", port)?;
    }

    let mut settings = builder.build()?.try_deserialize::<Settings>()?;

    settings.agents.query_config = resolve(&base_path, &settings.agents.query_config);
    settings.agents.extract_config = resolve(&base_path, &settings.agents.extract_config);

    Ok(settings)
}

fn resolve(base_path: &Path, path: &Path) -> PathBuf {
    match path.is_absolute() {
        true => path.to_path_buf(),
        false => base_path.join(path),
    }
}
