pub mod cli;
pub mod config;
pub mod gateway;
pub mod store;
pub mod task;
pub mod ui;
pub mod validate;
pub mod view;

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};

use config::AppConfig;
use gateway::RestGateway;
use store::TaskStore;

/// Shared application state: the resolved config and the one task store.
/// Built once in `main` and passed down explicitly — the store is the only
/// cache in the process and nothing reaches it through a global.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub store: Arc<TaskStore>,
}

impl AppContext {
    /// Wire config → REST gateway → store.
    pub fn new(config: AppConfig) -> Result<Self> {
        if !config.has_remote() {
            bail!(
                "no remote store configured — set --base-url / TASKDECK_BASE_URL \
                 or base_url in {}",
                config.data_dir.join("config.toml").display()
            );
        }
        let gateway = RestGateway::new(&config).context("failed to build HTTP client")?;
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(TaskStore::new(Arc::new(gateway))),
        })
    }
}
