//! Init command for writing a project config file.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

/// Keys persisted by `--init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    pub user: String,
    pub repo: Option<String>,
    pub mode: String,
    pub all: bool,
}

/// Runs the init command, writing `project` to `path`.
pub fn run<W: Write>(writer: &mut W, path: &Path, project: &ProjectConfig) -> Result<()> {
    save_to(path, project)?;
    writeln!(writer, "Config file saved to {}", path.display())?;
    Ok(())
}

/// Builds the project config from flags.
///
/// Requires a user and either a repository or `all`.
pub fn project_from_flags(
    user: Option<&str>,
    repo: Option<&str>,
    mode: Option<&str>,
    all: bool,
) -> Result<ProjectConfig> {
    let Some(user) = user.filter(|u| !u.trim().is_empty()) else {
        bail!("--init requires at least --user and --repo or --all");
    };
    if repo.is_none() && !all {
        bail!("--init requires at least --user and --repo or --all");
    }

    Ok(ProjectConfig {
        user: user.to_string(),
        repo: repo.map(str::to_string),
        mode: mode.unwrap_or("fun").to_string(),
        all,
    })
}

fn save_to(path: &Path, project: &ProjectConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    let yaml = serde_yaml::to_string(project).context("failed to serialize config")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved project config");
    Ok(())
}
