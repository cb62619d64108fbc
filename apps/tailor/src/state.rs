use std::sync::Arc;

use crate::analysis::JobAnalyzer;
use crate::config::Config;
use crate::extraction::JobExtractor;
use crate::llm_client::Gateway;
use crate::optimization::ContentOptimizer;
use crate::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: JobStore,
    /// The one gateway every generative call goes through.
    pub gateway: Arc<Gateway>,
    pub analyzer: Arc<JobAnalyzer>,
    pub optimizer: Arc<ContentOptimizer>,
    pub extractor: Arc<JobExtractor>,
}

impl AppState {
    pub fn new(config: Config, gateway: Gateway) -> Self {
        let gateway = Arc::new(gateway);
        Self {
            store: JobStore::new(config.jobs_dir.clone()),
            analyzer: Arc::new(JobAnalyzer::new(Some(gateway.clone()))),
            optimizer: Arc::new(ContentOptimizer::new(
                Some(gateway.clone()),
                config.rewrite_max_length_ratio,
            )),
            extractor: Arc::new(JobExtractor::new(Some(gateway.clone()))),
            gateway,
            config,
        }
    }
}
