//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Estimate how much time you wasted coding.
///
/// Groups the commit timestamps of GitHub repositories into work sessions and
/// tells you what else you could have done with that time.
#[derive(Debug, Parser)]
#[command(name = "codetime", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file (default: ./codetime.config.yml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GitHub username.
    #[arg(long)]
    pub user: Option<String>,

    /// Repository name (required unless --all is used).
    #[arg(long)]
    pub repo: Option<String>,

    /// Analyze all public repositories of the user.
    #[arg(long)]
    pub all: bool,

    /// Output tone: fun, guilty, inspirational, corporate, or any catalog in --catalog-dir.
    #[arg(long)]
    pub mode: Option<String>,

    /// Write the given options to the config file and exit.
    #[arg(long)]
    pub init: bool,

    /// Gap between commits that starts a new session.
    #[arg(long, value_name = "MINUTES")]
    pub gap_minutes: Option<f64>,

    /// Minutes credited to each session.
    #[arg(long, value_name = "MINUTES")]
    pub session_minutes: Option<f64>,

    /// Maximum number of activities to suggest.
    #[arg(long, value_name = "N")]
    pub activities: Option<usize>,

    /// Seed for the activity shuffle, for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory containing `activities_<mode>.json` catalogs.
    #[arg(long, value_name = "DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// Where to write the Markdown report (default: STATS.md).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Skip writing the Markdown report.
    #[arg(long)]
    pub no_report: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Applies flags on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(user) = &self.user {
            config.user = Some(user.clone());
        }
        if let Some(repo) = &self.repo {
            config.repo = Some(repo.clone());
        }
        if self.all {
            config.all = true;
        }
        if let Some(mode) = &self.mode {
            config.mode.clone_from(mode);
        }
        if let Some(minutes) = self.gap_minutes {
            config.session_gap_minutes = minutes;
        }
        if let Some(minutes) = self.session_minutes {
            config.avg_minutes_per_session = minutes;
        }
        if let Some(count) = self.activities {
            config.activity_count = count;
        }
        if let Some(dir) = &self.catalog_dir {
            config.catalog_dir = Some(dir.clone());
        }
        if let Some(path) = &self.output {
            config.report_path.clone_from(path);
        }
    }
}
