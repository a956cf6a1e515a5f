//! Configuration loading and management.

use std::path::{Path, PathBuf};

use codetime_core::{
    DEFAULT_ACTIVITY_COUNT, DEFAULT_AVG_MINUTES_PER_SESSION, DEFAULT_SESSION_GAP_MINUTES,
};
use codetime_github::{DEFAULT_API_URL, FetchLimits};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

/// Project config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "codetime.config.yml";

/// Report file written in the working directory.
pub const DEFAULT_REPORT_FILE: &str = "STATS.md";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// GitHub username.
    pub user: Option<String>,
    /// Repository to analyze.
    pub repo: Option<String>,
    /// Catalog mode used for activity suggestions.
    pub mode: String,
    /// Analyze every public repository of `user`.
    pub all: bool,
    /// GitHub API base URL.
    pub api_url: String,
    pub session_gap_minutes: f64,
    pub avg_minutes_per_session: f64,
    pub activity_count: usize,
    pub per_page: u32,
    pub max_pages: u32,
    pub max_commits: usize,
    /// Directory of `activities_<mode>.json` files. Built-in catalogs when unset.
    pub catalog_dir: Option<PathBuf>,
    /// Where the Markdown report is written.
    pub report_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let limits = FetchLimits::default();
        Self {
            user: None,
            repo: None,
            mode: "fun".to_string(),
            all: false,
            api_url: DEFAULT_API_URL.to_string(),
            session_gap_minutes: DEFAULT_SESSION_GAP_MINUTES,
            avg_minutes_per_session: DEFAULT_AVG_MINUTES_PER_SESSION,
            activity_count: DEFAULT_ACTIVITY_COUNT,
            per_page: limits.per_page,
            max_pages: limits.max_pages,
            max_commits: limits.max_commits,
            catalog_dir: None,
            report_path: PathBuf::from(DEFAULT_REPORT_FILE),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific project file.
    ///
    /// Precedence, lowest first: defaults, the global `config.toml`, the
    /// project file, then `CODETIME_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let project = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        layered(dirs_config_path().as_deref(), project)
            .merge(Env::prefixed("CODETIME_"))
            .extract()
    }

    /// Commit paging limits for the GitHub client.
    pub const fn fetch_limits(&self) -> FetchLimits {
        FetchLimits {
            per_page: self.per_page,
            max_pages: self.max_pages,
            max_commits: self.max_commits,
        }
    }
}

/// Defaults, then the global TOML file, then the project file.
///
/// The project file is read as TOML when it has a `.toml` extension and as
/// YAML otherwise. Missing files are skipped.
fn layered(global_dir: Option<&Path>, project: &Path) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(dir) = global_dir {
        figment = figment.merge(Toml::file(dir.join("config.toml")));
    }

    let is_toml = project
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        figment.merge(Toml::file(project))
    } else {
        figment.merge(Yaml::file(project))
    }
}

/// Returns the platform-specific config directory for codetime.
///
/// On Linux: `~/.config/codetime`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("codetime"))
}
