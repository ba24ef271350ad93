use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::services::Pipeline;

use super::{require, ApiError};

#[derive(Deserialize)]
pub struct ScrapeContentBody {
    #[serde(default)]
    pub url: String,
}

/// Fetches page content ahead of extraction so the caller can cache it and
/// send it back as `preloaded_content`.
#[post("/scrape")]
pub async fn scrape_content(
    pipeline: web::Data<Pipeline>,
    body: web::Json<ScrapeContentBody>,
) -> Result<HttpResponse, ApiError> {
    require(&body.url, "URL")?;

    let result = pipeline
        .prefetch(&body.url)
        .await
        .map_err(|e| ApiError::logged("scrape_content", e))?;

    Ok(HttpResponse::Ok().json(result))
}
