use crate::config::Config;
use crate::documents::upload::UploadStore;
use crate::llm_client::InferenceClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: InferenceClient,
    pub uploads: UploadStore,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, llm: InferenceClient) -> Self {
        Self {
            llm,
            uploads: UploadStore::new(config.upload_dir.clone()),
            config,
        }
    }
}
