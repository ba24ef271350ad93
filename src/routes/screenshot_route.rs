use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::services::Pipeline;

use super::{require, ApiError};

#[derive(Deserialize)]
pub struct ScreenshotBody {
    #[serde(default)]
    pub url: String,
}

#[post("/screenshot")]
pub async fn get_screenshot(
    pipeline: web::Data<Pipeline>,
    body: web::Json<ScreenshotBody>,
) -> Result<HttpResponse, ApiError> {
    require(&body.url, "URL")?;

    let screenshot = pipeline
        .screenshot(&body.url)
        .await
        .map_err(|e| ApiError::logged("get_screenshot", e))?;

    Ok(HttpResponse::Ok().json(json!({ "screenshot": screenshot })))
}
