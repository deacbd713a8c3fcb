use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;

const MAX_TOPIC_CHARS: usize = 50;

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("valid regex"))
}

/// `generated_article_<topic>.md`, spaces replaced by underscores and the
/// topic cut to its first 50 characters.
pub fn article_filename(topic: &str) -> String {
    let slug: String = topic
        .trim()
        .replace(' ', "_")
        .chars()
        .take(MAX_TOPIC_CHARS)
        .collect();
    let slug = unsafe_chars().replace_all(&slug, "");
    format!("generated_article_{}.md", slug)
}

/// Writes the article as Markdown into `dir` and returns the file path.
pub async fn save_article(dir: &Path, topic: &str, text: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(article_filename(topic));
    tokio::fs::write(&path, text.as_bytes()).await?;
    tracing::info!("Saved article to {}", path.display());
    Ok(path)
}
