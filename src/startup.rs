use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    error::InternalError,
    middleware::Logger,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use serde_json::json;

use crate::{
    routes::{extract_route, health_route, query_route, scrape_route, screenshot_route},
    services::Pipeline,
};

// Scraped pages come back as `preloaded_content`, so bodies can be large.
const MAX_JSON_BODY: usize = 32 * 1024 * 1024;

pub fn run(listener: TcpListener, pipeline: Pipeline) -> Result<Server, std::io::Error> {
    let pipeline = Data::new(pipeline);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(Logger::default())
            .configure(configure_routes)
            .app_data(pipeline.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .service(query_route::generate_schema)
            .service(scrape_route::scrape_content)
            .service(extract_route::extract_data)
            .service(screenshot_route::get_screenshot)
            .service(health_route::health_check),
    );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY)
        .error_handler(|err, req| {
            let message = err.to_string();
            log::error!("Unreadable JSON body on {}: {}", req.path(), message);

            InternalError::from_response(
                err,
                HttpResponse::InternalServerError().json(json!({ "error": message })),
            )
            .into()
        })
}
