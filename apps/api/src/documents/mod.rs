// Document intake: upload storage, docx extraction, prompts, and the
// summarize / query pipelines behind the HTTP handlers.

pub mod analysis;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod upload;
