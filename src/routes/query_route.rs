use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::services::Pipeline;

use super::{require, ApiError};

#[derive(Deserialize)]
pub struct GenerateSchemaBody {
    #[serde(default)]
    pub query: String,
}

#[post("/query")]
pub async fn generate_schema(
    pipeline: web::Data<Pipeline>,
    body: web::Json<GenerateSchemaBody>,
) -> Result<HttpResponse, ApiError> {
    require(&body.query, "Query")?;

    let schema = pipeline
        .generate_schema(&body.query)
        .await
        .map_err(|e| ApiError::logged("generate_schema", e))?;

    Ok(HttpResponse::Ok().json(json!({ "schema": schema })))
}
