// Re-export modules
pub mod config;
pub mod crawlers;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{RunMode, SnapshotConfig};
pub use pipeline::SnapshotError;
pub use results::{FetchRecord, HtmlHints};
pub use state::PersistedState;

use crawlers::HttpFetcher;
use parsers::PageInspector;
use std::path::{Path, PathBuf};

/// Main builder for a snapshot run
pub struct Snapshot {
    config: SnapshotConfig,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    /// Create a builder with the built-in sources, headers and output path
    pub fn new() -> Self {
        Self {
            config: SnapshotConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: SnapshotConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let config = SnapshotConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set the source URLs to fetch, in order
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.config.sources = sources;
        self
    }

    /// Set where the state document is read from and written to
    pub fn with_out_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.out_path = path.into();
        self
    }

    /// Set the run mode (debug fetch or timestamp only)
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Configuration the run will use
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Run the pipeline once and return the state that was written
    pub async fn run(self) -> Result<PersistedState, SnapshotError> {
        let config = self.config;
        config.validate()?;
        ::log::info!(
            "Starting {:?} run for {} source(s) into {}",
            config.mode,
            config.sources.len(),
            config.out_path.display()
        );

        match config.mode {
            RunMode::Debug => {
                let fetcher = HttpFetcher::from_config(&config)?;
                let inspector = PageInspector::new()?;
                pipeline::run_debug(&config.out_path, &config.sources, &fetcher, &inspector).await
            }
            RunMode::Timestamp => pipeline::run_timestamp(&config.out_path, &config.sources),
        }
    }
}
