//! Analyze command: fetch commits, infer sessions, suggest activities.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset};
use codetime_core::{
    CatalogProvider, EstimateOptions, EstimationResult, SessionConfig, count_sessions,
    estimate_activities,
};
use codetime_github::Client;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::Config;
use crate::catalog::provider_for;
use crate::report::{Report, format_hours, write_report};

/// Which repositories to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Repo(String),
    AllRepos,
}

/// Output switches that are not part of the persisted config.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunFlags {
    /// Seed for the activity shuffle.
    pub seed: Option<u64>,
    /// Print JSON instead of text.
    pub json: bool,
    /// Skip the Markdown report.
    pub no_report: bool,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    user: &'a str,
    repos: &'a [String],
    #[serde(flatten)]
    result: &'a EstimationResult,
}

/// Resolves the user and repository selection from config.
pub fn resolve_target(config: &Config) -> Result<(String, Target)> {
    let user = config.user.as_deref().map(str::trim).unwrap_or_default();
    if user.is_empty() {
        bail!("missing required user; pass --user or generate a config with --init");
    }

    match config.repo.as_deref().map(str::trim) {
        Some(repo) if !repo.is_empty() => {
            if config.all {
                tracing::warn!(repo, "repo is specified, ignoring `all` and using only that repo");
            }
            Ok((user.to_string(), Target::Repo(repo.to_string())))
        }
        _ if config.all => Ok((user.to_string(), Target::AllRepos)),
        _ => bail!("missing required repo; pass --repo or --all, or generate a config with --init"),
    }
}

/// Runs the full analysis against the GitHub API.
pub fn run<W: Write>(writer: &mut W, config: &Config, flags: RunFlags) -> Result<()> {
    let (user, target) = resolve_target(config)?;
    let client = Client::new(config.api_url.as_str()).context("failed to create GitHub client")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let (repos, timestamps) =
        runtime.block_on(fetch_timestamps(writer, &client, config, &user, &target, flags.json))?;

    let provider = provider_for(config.catalog_dir.as_deref());
    let mut rng = flags
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let report_path = (!flags.no_report).then_some(config.report_path.as_path());

    analyze(
        writer,
        config,
        &Analysis {
            user: &user,
            repos: &repos,
            timestamps: &timestamps,
        },
        provider.as_ref(),
        &mut rng,
        flags.json,
        report_path,
    )?;
    Ok(())
}

/// Fetches every selected repository in turn and concatenates their timestamps.
async fn fetch_timestamps<W: Write>(
    writer: &mut W,
    client: &Client,
    config: &Config,
    user: &str,
    target: &Target,
    quiet: bool,
) -> Result<(Vec<String>, Vec<DateTime<FixedOffset>>)> {
    let repos = match target {
        Target::Repo(repo) => vec![repo.clone()],
        Target::AllRepos => client
            .list_user_repos(user)
            .await
            .with_context(|| format!("failed to list repositories for {user}"))?,
    };
    tracing::debug!(user, count = repos.len(), "selected repositories");

    let limits = config.fetch_limits();
    let mut timestamps = Vec::new();
    for repo in &repos {
        let commits = client
            .fetch_commits(user, repo, &limits)
            .await
            .with_context(|| format!("failed to fetch commits for {user}/{repo}"))?;
        if quiet {
            tracing::info!(repo, count = commits.len(), "fetched commits");
        } else {
            writeln!(writer, "Fetched {} commits from {repo}.", commits.len())?;
        }
        timestamps.extend(commits);
    }

    Ok((repos, timestamps))
}

/// Commit data gathered for one user.
#[derive(Debug, Clone, Copy)]
pub struct Analysis<'a> {
    pub user: &'a str,
    pub repos: &'a [String],
    pub timestamps: &'a [DateTime<FixedOffset>],
}

/// Turns fetched timestamps into output and, optionally, a report file.
///
/// Returns the estimation, or `None` when there were no commits to analyze.
pub fn analyze<W, R>(
    writer: &mut W,
    config: &Config,
    analysis: &Analysis<'_>,
    provider: &dyn CatalogProvider,
    rng: &mut R,
    json: bool,
    report_path: Option<&Path>,
) -> Result<Option<EstimationResult>>
where
    W: Write,
    R: Rng + ?Sized,
{
    if analysis.timestamps.is_empty() {
        if json {
            let empty = EstimationResult {
                session_count: 0,
                total_hours: 0.0,
                activity_lines: Vec::new(),
            };
            write_json(writer, analysis, &empty)?;
        } else {
            writeln!(writer, "No commits found. Skipping analysis.")?;
        }
        return Ok(None);
    }

    let session_config = SessionConfig::from_minutes(config.session_gap_minutes)?;
    let sessions = count_sessions(analysis.timestamps, &session_config);

    let options = EstimateOptions {
        avg_minutes_per_session: config.avg_minutes_per_session,
        activity_count: config.activity_count,
    };
    let result = estimate_activities(sessions, &options, &config.mode, provider, rng)
        .with_context(|| format!("failed to suggest activities for mode '{}'", config.mode))?;

    if json {
        write_json(writer, analysis, &result)?;
    } else {
        write_summary(writer, &result)?;
    }

    if let Some(path) = report_path {
        let report = Report {
            user: analysis.user,
            repos: analysis.repos,
            result: &result,
        };
        write_report(path, &report)?;
    }

    Ok(Some(result))
}

fn write_json<W: Write>(
    writer: &mut W,
    analysis: &Analysis<'_>,
    result: &EstimationResult,
) -> Result<()> {
    let output = JsonOutput {
        user: analysis.user,
        repos: analysis.repos,
        result,
    };
    writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn write_summary<W: Write>(writer: &mut W, result: &EstimationResult) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Estimated coding sessions: {}", result.session_count)?;
    writeln!(
        writer,
        "Total time wasted: {} hours",
        format_hours(result.total_hours)
    )?;
    writeln!(writer)?;

    if result.activity_lines.is_empty() {
        writeln!(writer, "Not enough time to do anything else. Keep coding!")?;
        return Ok(());
    }
    writeln!(writer, "Instead, you could have:")?;
    for line in &result.activity_lines {
        writeln!(writer, "- {line}")?;
    }
    Ok(())
}
