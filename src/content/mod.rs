//! Content module - turns a directory of markdown files into blog posts

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use loader::ContentPipeline;
pub use markdown::{MarkdownRenderer, DARK_MODE_CSS};
pub use post::{reading_time, Post};
