use serde::{Deserialize, Serialize};

/// Outcome of loading a page and reducing it to text.
///
/// Either `success` is set with non-empty `content`, or `error` carries the
/// reason and `content`/`title` stay empty. Callers may send a previous result
/// back as preloaded content, so every field defaults when missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchResult {
    pub success: bool,
    pub content: String,
    pub title: String,
    #[serde(rename = "url", alias = "final_url", alias = "finalUrl")]
    pub final_url: String,
    pub error: String,
}

impl FetchResult {
    pub fn from_page(content: String, title: String, final_url: String) -> Self {
        match content.is_empty() {
            true => FetchResult::failure(final_url, "No content extracted"),
            false => FetchResult {
                success: true,
                content,
                title,
                final_url,
                error: String::new(),
            },
        }
    }

    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        let error = match error.trim().is_empty() {
            true => "Crawl failed".to_string(),
            false => error,
        };

        FetchResult {
            success: false,
            content: String::new(),
            title: String::new(),
            final_url: url.into(),
            error,
        }
    }
}
