use std::path::PathBuf;

use clap::Parser;
use study_core::{ConfigStorage, StudyConfig};

#[derive(Parser, Debug)]
#[command(name = "study-tui")]
#[command(about = "Terminal study browser with tab groups")]
pub struct Cli {
    /// Path to a JSON config file (defaults to the platform config directory)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Locale passed to title formatting
    #[arg(long)]
    pub locale: Option<String>,

    /// How long to hover over a tab before a drop groups instead of reorders
    #[arg(long, value_name = "MS")]
    pub hover_delay_ms: Option<u64>,

    /// Write debug logs to this file (also settable with STUDY_LOG_FILE)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Start with no demo studies open
    #[arg(long)]
    pub empty: bool,
}

impl Cli {
    pub fn storage(&self) -> ConfigStorage {
        match &self.config {
            Some(path) => ConfigStorage::from_file(path),
            None => ConfigStorage::open_default(),
        }
    }

    /// File values with command-line flags applied on top.
    pub fn apply(&self, mut config: StudyConfig) -> StudyConfig {
        if let Some(locale) = &self.locale {
            config.locale = locale.clone();
        }
        if let Some(ms) = self.hover_delay_ms {
            config.hover_group_delay_ms = ms;
        }
        if self.empty {
            config.seed_demo_studies = false;
        }
        config
    }
}
