use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use thirtyfour::{extensions::cdp::ChromeDevTools, WebDriver};

use crate::domain::{ScreenshotOptions, ScreenshotResult};

use super::{Droid, DroidOptions};

#[async_trait]
pub trait VisualCapture: Send + Sync {
    async fn capture(&self, url: &str, options: &ScreenshotOptions) -> ScreenshotResult;
}

pub struct Screenshotter {
    webdriver_url: String,
}

impl Screenshotter {
    pub fn new(webdriver_url: String) -> Self {
        Screenshotter { webdriver_url }
    }
}

#[async_trait]
impl VisualCapture for Screenshotter {
    async fn capture(&self, url: &str, options: &ScreenshotOptions) -> ScreenshotResult {
        if url.trim().is_empty() {
            return ScreenshotResult::failure("URL is required");
        }

        log::info!(
            "Taking screenshot of {} ({}x{}, full page: {})",
            url,
            options.viewport_width,
            options.viewport_height,
            options.full_page
        );

        let droid_options = DroidOptions {
            window_width: options.viewport_width,
            window_height: options.viewport_height,
            page_load_timeout: Duration::from_millis(options.timeout_ms),
            eager: true,
        };

        let droid = match Droid::launch(&self.webdriver_url, &droid_options).await {
            Ok(droid) => droid,
            Err(e) => {
                log::error!("Could not start browser for {}: {:?}", url, e);
                return ScreenshotResult::failure(e.to_string());
            }
        };

        let png = take_png(droid.driver(), url, options).await;
        droid.close().await;

        match png {
            Ok(bytes) => ScreenshotResult::from_png(&bytes),
            Err(e) => {
                log::error!("Screenshot of {} failed: {:?}", url, e);
                ScreenshotResult::failure(e.to_string())
            }
        }
    }
}

async fn take_png(
    driver: &WebDriver,
    url: &str,
    options: &ScreenshotOptions,
) -> anyhow::Result<Vec<u8>> {
    driver.goto(url).await?;

    // Late scripts and lazy images keep painting after DOMContentLoaded.
    tokio::time::sleep(Duration::from_millis(options.settle_ms)).await;

    if !options.full_page {
        return Ok(driver.screenshot_as_png().await?);
    }

    let dev_tools = ChromeDevTools::new(driver.handle.clone());
    let metrics = dev_tools.execute_cdp("Page.getLayoutMetrics").await?;
    let params = full_page_params(&metrics, options);
    let capture = dev_tools
        .execute_cdp_with_params("Page.captureScreenshot", params)
        .await?;

    decode_capture(&capture)
}

fn full_page_params(metrics: &Value, options: &ScreenshotOptions) -> Value {
    let size = match metrics.get("cssContentSize") {
        Some(size) => size,
        None => &metrics["contentSize"],
    };
    let width = size["width"]
        .as_f64()
        .unwrap_or(0.0)
        .max(options.viewport_width as f64);
    let height = size["height"]
        .as_f64()
        .unwrap_or(0.0)
        .max(options.viewport_height as f64);

    json!({
        "format": "png",
        "captureBeyondViewport": true,
        "clip": {"x": 0, "y": 0, "width": width, "height": height, "scale": 1}
    })
}

fn decode_capture(capture: &Value) -> anyhow::Result<Vec<u8>> {
    let data = capture["data"]
        .as_str()
        .ok_or_else(|| anyhow!("Screenshot response had no image data"))?;

    Ok(STANDARD.decode(data)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{decode_capture, full_page_params};
    use crate::domain::ScreenshotOptions;

    #[test]
    fn clip_covers_the_whole_document() {
        let metrics = json!({
            "cssContentSize": {"x": 0, "y": 0, "width": 1280.0, "height": 18250.5},
            "contentSize": {"x": 0, "y": 0, "width": 2560.0, "height": 36501.0}
        });

        let params = full_page_params(&metrics, &ScreenshotOptions::default());

        assert_eq!(params["captureBeyondViewport"], true);
        assert_eq!(params["clip"]["width"], 1280.0);
        assert_eq!(params["clip"]["height"], 18250.5);
    }

    #[test]
    fn short_page_is_padded_to_viewport() {
        let metrics = json!({"contentSize": {"width": 800.0, "height": 300.0}});

        let params = full_page_params(&metrics, &ScreenshotOptions::default());

        assert_eq!(params["clip"]["width"], 1280.0);
        assert_eq!(params["clip"]["height"], 1024.0);
    }

    #[test]
    fn capture_data_is_decoded() {
        let bytes = decode_capture(&json!({"data": "iVBORw0KGgo="})).unwrap();

        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn missing_or_corrupt_data_is_an_error() {
        assert!(decode_capture(&json!({})).is_err());
        assert!(decode_capture(&json!({"data": "not base64!"})).is_err());
    }
}
