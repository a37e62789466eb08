//! Application state shared by all handlers.

use crate::services::UploadService;
use dropzone_core::Config;
use dropzone_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub uploads: UploadService,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let uploads = UploadService::new(
            Arc::new(config.policy.clone()),
            storage.clone(),
            config.analysis_path.clone(),
        );
        Self {
            config,
            storage,
            uploads,
        }
    }
}
