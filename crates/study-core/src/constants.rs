/// How long a drag must rest on another tab before it arms grouping.
pub const HOVER_GROUP_DELAY_MS: u64 = 500;

/// Locale used when no configuration overrides it.
pub const DEFAULT_LOCALE: &str = "en";

/// Title width in the tab bar before truncation kicks in.
pub const DEFAULT_MAX_TITLE_WIDTH: usize = 18;

/// Separator between item titles in a derived group title.
pub const GROUP_TITLE_SEPARATOR: &str = " + ";

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "study-browser";

/// Environment variable naming a log file for tracing output.
pub const LOG_FILE_ENV: &str = "STUDY_LOG_FILE";

/// Environment variable carrying a tracing filter directive.
pub const LOG_FILTER_ENV: &str = "STUDY_LOG";
