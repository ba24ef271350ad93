pub mod api_error;
pub mod extract_route;
pub mod health_route;
pub mod query_route;
pub mod scrape_route;
pub mod screenshot_route;

pub use api_error::*;
