use std::{sync::Arc, time::Duration};

use serde_json::Value;
use thiserror::Error;

use crate::domain::{FetchResult, ScreenshotOptions};

use super::{ContentFetcher, SchemaSynthesizer, StructuredExtractor, VisualCapture};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to scrape webpage: {0}")]
    Scrape(String),
    #[error("Failed to take screenshot: {0}")]
    Screenshot(String),
    #[error("{0}")]
    Unexpected(#[from] anyhow::Error),
}

pub struct ExtractionRequest {
    pub url: String,
    pub schema_query: String,
    pub preloaded_content: Option<FetchResult>,
}

pub struct Pipeline {
    fetcher: Arc<dyn ContentFetcher>,
    capture: Arc<dyn VisualCapture>,
    synthesizer: Arc<dyn SchemaSynthesizer>,
    extractor: Arc<dyn StructuredExtractor>,
    fetch_timeout: Duration,
    screenshot_options: ScreenshotOptions,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        capture: Arc<dyn VisualCapture>,
        synthesizer: Arc<dyn SchemaSynthesizer>,
        extractor: Arc<dyn StructuredExtractor>,
    ) -> Self {
        Pipeline {
            fetcher,
            capture,
            synthesizer,
            extractor,
            fetch_timeout: super::DEFAULT_FETCH_TIMEOUT,
            screenshot_options: ScreenshotOptions::default(),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_screenshot_options(mut self, options: ScreenshotOptions) -> Self {
        self.screenshot_options = options;
        self
    }

    pub async fn generate_schema(&self, query: &str) -> Result<String, PipelineError> {
        Ok(self.synthesizer.synthesize(query).await?)
    }

    pub async fn prefetch(&self, url: &str) -> Result<FetchResult, PipelineError> {
        let result = self.fetcher.fetch(url, self.fetch_timeout).await;

        match result.success {
            true => Ok(result),
            false => Err(PipelineError::Scrape(result.error)),
        }
    }

    /// Schema from the query, then content (preloaded or fresh), then
    /// extraction. The first failing step aborts the rest.
    pub async fn extract(&self, request: ExtractionRequest) -> Result<Value, PipelineError> {
        let schema = self.synthesizer.synthesize(&request.schema_query).await?;

        let content = match request.preloaded_content {
            Some(preloaded) if preloaded.success => {
                log::info!("Using preloaded content for {}", request.url);
                preloaded
            }
            _ => self.fetcher.fetch(&request.url, self.fetch_timeout).await,
        };

        if !content.success {
            return Err(PipelineError::Scrape(content.error));
        }

        Ok(self
            .extractor
            .extract_with_schema_text(&content.content, &schema)
            .await?)
    }

    pub async fn screenshot(&self, url: &str) -> Result<String, PipelineError> {
        let result = self.capture.capture(url, &self.screenshot_options).await;

        match result.success {
            true => Ok(result.image_data),
            false => Err(PipelineError::Screenshot(result.error)),
        }
    }
}
