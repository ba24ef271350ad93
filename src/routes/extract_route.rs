use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::{
    domain::FetchResult,
    services::{ExtractionRequest, Pipeline},
};

use super::{require, ApiError};

#[derive(Deserialize)]
pub struct ExtractDataBody {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub preloaded_content: Option<FetchResult>,
}

#[post("/extract")]
pub async fn extract_data(
    pipeline: web::Data<Pipeline>,
    body: web::Json<ExtractDataBody>,
) -> Result<HttpResponse, ApiError> {
    require(&body.url, "URL")?;
    require(&body.schema, "Schema")?;

    let body = body.into_inner();
    let request = ExtractionRequest {
        url: body.url,
        schema_query: body.schema,
        preloaded_content: body.preloaded_content,
    };

    let result = pipeline
        .extract(request)
        .await
        .map_err(|e| ApiError::logged("extract_data", e))?;

    Ok(HttpResponse::Ok().json(result))
}
