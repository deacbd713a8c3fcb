pub mod credentials;
pub mod export;
pub mod ingest;

pub use credentials::resolve_api_key;
pub use export::save_article;
pub use ingest::ingest_paths;
