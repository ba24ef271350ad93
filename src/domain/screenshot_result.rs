use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotResult {
    pub success: bool,
    #[serde(rename = "screenshot")]
    pub image_data: String,
    pub error: String,
}

impl ScreenshotResult {
    pub fn from_png(bytes: &[u8]) -> Self {
        match bytes.is_empty() {
            true => ScreenshotResult::failure("Screenshot returned no image data"),
            false => ScreenshotResult {
                success: true,
                image_data: STANDARD.encode(bytes),
                error: String::new(),
            },
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = match error.trim().is_empty() {
            true => "Screenshot failed".to_string(),
            false => error,
        };

        ScreenshotResult {
            success: false,
            image_data: String::new(),
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScreenshotOptions {
    pub timeout_ms: u64,
    pub full_page: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub settle_ms: u64,
}

impl Default for ScreenshotOptions {
    fn default() -> Self {
        ScreenshotOptions {
            timeout_ms: 30_000,
            full_page: true,
            viewport_width: 1280,
            viewport_height: 1024,
            settle_ms: 2_000,
        }
    }
}
