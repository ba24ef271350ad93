use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::{error::WebDriverResult, WebDriver};

use crate::domain::{clean_page_text, normalize_whitespace, page_title, FetchResult};

use super::{Droid, DroidOptions};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult;
}

pub struct PageScraper {
    webdriver_url: String,
}

struct RenderedPage {
    html: String,
    title: String,
    final_url: String,
}

impl PageScraper {
    pub fn new(webdriver_url: String) -> Self {
        PageScraper { webdriver_url }
    }
}

#[async_trait]
impl ContentFetcher for PageScraper {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult {
        if url.trim().is_empty() {
            return FetchResult::failure(url, "URL is required");
        }

        log::info!("Scraping {} (timeout {:?})", url, timeout);

        let options = DroidOptions {
            window_width: 1280,
            window_height: 1024,
            page_load_timeout: timeout,
            eager: false,
        };

        let droid = match Droid::launch(&self.webdriver_url, &options).await {
            Ok(droid) => droid,
            Err(e) => {
                log::error!("Could not start browser for {}: {:?}", url, e);
                return FetchResult::failure(url, e.to_string());
            }
        };

        let page = render_page(droid.driver(), url).await;
        droid.close().await;

        match page {
            Ok(page) => {
                let result = page_to_result(url, page);
                match result.success {
                    true => log::info!("Scraped {} chars from {}", result.content.len(), url),
                    false => log::warn!("Scrape of {} failed: {}", url, result.error),
                }
                result
            }
            Err(e) => {
                log::error!("Failed to render {}: {:?}", url, e);
                FetchResult::failure(url, e.to_string())
            }
        }
    }
}

async fn render_page(driver: &WebDriver, url: &str) -> WebDriverResult<RenderedPage> {
    driver.goto(url).await?;

    let title = driver.title().await.unwrap_or_default();
    let final_url = match driver.current_url().await {
        Ok(current) => current.to_string(),
        Err(_) => url.to_string(),
    };
    let html = driver.source().await?;

    Ok(RenderedPage {
        html,
        title,
        final_url,
    })
}

fn page_to_result(requested_url: &str, page: RenderedPage) -> FetchResult {
    if page.html.trim().is_empty() {
        return FetchResult::failure(requested_url, "No HTML content retrieved");
    }

    let title = match normalize_whitespace(&page.title) {
        t if t.is_empty() => page_title(&page.html).unwrap_or_default(),
        t => t,
    };
    let final_url = match page.final_url.is_empty() {
        true => requested_url.to_string(),
        false => page.final_url,
    };

    FetchResult::from_page(clean_page_text(&page.html), title, final_url)
}
