pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use config::VoteConfig;
use services::VoteStore;
use std::sync::Arc;

/// Display settings for the ballot page.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub option_a: String,
    pub option_b: String,
    pub hostname: String,
}

impl From<&VoteConfig> for PageSettings {
    fn from(config: &VoteConfig) -> Self {
        Self {
            option_a: config.ballot.option_a.clone(),
            option_b: config.ballot.option_b.clone(),
            hostname: config.hostname.clone(),
        }
    }
}

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub page: Arc<PageSettings>,
    pub store: Arc<dyn VoteStore>,
}

impl AppState {
    pub fn new(page: PageSettings, store: Arc<dyn VoteStore>) -> Self {
        Self {
            page: Arc::new(page),
            store,
        }
    }
}
