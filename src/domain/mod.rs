pub mod fetch_result;
pub mod page_text;
pub mod schema_document;
pub mod screenshot_result;

pub use fetch_result::*;
pub use page_text::*;
pub use schema_document::*;
pub use screenshot_result::*;
