pub mod markdown;
pub mod json;
pub mod html;

pub use markdown::MarkdownFormatter;
pub use json::JsonFormatter;
pub use html::{escape_html, HtmlFormatter};
