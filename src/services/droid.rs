use std::time::Duration;

use thirtyfour::{
    error::WebDriverResult, CapabilitiesHelper, ChromiumLikeCapabilities, DesiredCapabilities,
    PageLoadStrategy, WebDriver,
};

#[derive(Debug, Clone)]
pub struct DroidOptions {
    pub window_width: u32,
    pub window_height: u32,
    pub page_load_timeout: Duration,
    pub eager: bool,
}

/// A single headless browser session. Each request gets its own and must
/// `close` it on every path.
pub struct Droid {
    driver: WebDriver,
}

impl Droid {
    pub async fn launch(webdriver_url: &str, options: &DroidOptions) -> WebDriverResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--headless=new")?;
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            options.window_width, options.window_height
        ))?;
        if options.eager {
            caps.set_page_load_strategy(PageLoadStrategy::Eager)?;
        }

        let driver = WebDriver::new(webdriver_url, caps).await?;
        let droid = Droid { driver };

        // The session exists from here on, so failures must still tear it down.
        if let Err(e) = droid
            .driver
            .set_page_load_timeout(options.page_load_timeout)
            .await
        {
            droid.close().await;
            return Err(e);
        }

        log::debug!("Opened browser session on {}", webdriver_url);

        Ok(droid)
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// Ends the session. A session that already died is not an error here.
    pub async fn close(self) {
        match self.driver.quit().await {
            Ok(_) => log::debug!("Closed browser session"),
            Err(e) => log::warn!("Failed to close browser session: {:?}", e),
        }
    }
}
