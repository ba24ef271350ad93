use std::{net::TcpListener, sync::Arc, time::Duration};

use env_logger::Env;
use siphon::{
    configuration::{get_configuration, get_environment, AgentSettings},
    services::{ExtractAgent, OpenaiClient, PageScraper, Pipeline, QueryAgent, Screenshotter},
    startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = get_environment()?;
    let default_filter = match environment.is_debug() {
        true => "debug",
        false => "info",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let configuration = get_configuration()?;

    let query_settings = AgentSettings::load(&configuration.agents.query_config)?;
    let extract_settings = AgentSettings::load(&configuration.agents.extract_config)?;

    let openai_client = Arc::new(OpenaiClient::new(
        configuration.openai.api_key()?,
        configuration.openai.base_url.clone(),
    ));
    let webdriver_url = configuration.browser.webdriver_url.clone();

    let pipeline = Pipeline::new(
        Arc::new(PageScraper::new(webdriver_url.clone())),
        Arc::new(Screenshotter::new(webdriver_url)),
        Arc::new(QueryAgent::new(openai_client.clone(), query_settings)),
        Arc::new(ExtractAgent::new(openai_client, extract_settings)),
    )
    .with_fetch_timeout(Duration::from_secs(
        configuration.browser.page_timeout_seconds,
    ))
    .with_screenshot_options(configuration.browser.screenshot.clone());

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    log::info!(
        "Listening on {} ({} environment)",
        address,
        environment.as_str()
    );

    run(listener, pipeline)?.await?;

    Ok(())
}
