pub mod droid;
pub mod extract_agent;
pub mod openai_client;
pub mod page_scraper;
pub mod pipeline;
pub mod query_agent;
pub mod screenshotter;

pub use droid::*;
pub use extract_agent::*;
pub use openai_client::*;
pub use page_scraper::*;
pub use pipeline::*;
pub use query_agent::*;
pub use screenshotter::*;
