use std::path::Path;

use anyhow::{anyhow, Context};
use waymark_core::decode::StandardDecoder;
use waymark_core::{MemoryStore, SiteContext, WaymarkConfig};

/// Configuration and content loaded once per invocation
pub struct AppState {
    pub config: WaymarkConfig,
    pub decoder: StandardDecoder,
    store: Option<MemoryStore>,
}

impl AppState {
    pub fn new(config: WaymarkConfig, store: Option<MemoryStore>) -> Self {
        let decoder = config.link_provider.decoder();
        Self {
            config,
            decoder,
            store,
        }
    }

    /// Load the optional config and tree files
    pub fn load(config: Option<&Path>, tree: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => WaymarkConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => WaymarkConfig::default(),
        };

        let store = match tree {
            Some(path) => Some(
                MemoryStore::load(config.store.clone(), path)
                    .with_context(|| format!("loading content tree {}", path.display()))?,
            ),
            None => None,
        };

        Ok(Self::new(config, store))
    }

    pub fn store(&self) -> anyhow::Result<&MemoryStore> {
        self.store
            .as_ref()
            .ok_or_else(|| anyhow!("this command needs a content tree, pass --tree <file>"))
    }

    pub fn site(&self, name: &str) -> anyhow::Result<&SiteContext> {
        Ok(self.config.site(name)?)
    }

    /// Default log filter, `debug` when verbose
    pub fn log_level(&self, verbose: bool) -> &str {
        if verbose {
            "debug"
        } else {
            &self.config.logging.level
        }
    }
}
