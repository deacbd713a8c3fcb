mod render;
mod wizard;

pub use render::{outcome_summary, MarkdownRenderer};
pub use wizard::{ask_article_details, ArticleDetails};
