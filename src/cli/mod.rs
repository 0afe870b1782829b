use crate::api::{ReportSource, TogglClient, BASE_URL};
use crate::config::{is_unset, AppConfig, FileConfig, Settings};
use crate::error::{StatsError, StatsResult};
use crate::logging::enable_logging;
use crate::output::{render, OutputFormat};
use crate::report::{aggregate, DuplicatePolicy, ReportWindow};
use atty::Stream;
use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::{debug, info};

const USAGE: &str = "
You must provide a token or workspace ID.

  Usage: ts --workspace=000 --token=a4d5e6f7

Alternatively, you can create a file called .toggl-stats.json in your home directory containing \"workspace\" and \"token\".
";

#[derive(Parser, Debug)]
#[command(name = "ts")]
#[command(about = "Show this week's Toggl hours by project", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Toggl API token
    #[arg(long, env = "TOGGL_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Toggl workspace ID
    #[arg(long, env = "TOGGL_WORKSPACE_ID")]
    workspace: Option<String>,

    /// Config file to use instead of ~/.toggl-stats.json
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, env = "TOGGL_API_URL", default_value = BASE_URL, hide = true)]
    api_url: String,

    #[arg(long, default_value = "human")]
    output: OutputFormat,

    /// Sum hours of records that share a client and project instead of keeping the last one
    #[arg(long)]
    merge_duplicates: bool,

    #[arg(long)]
    no_color: bool,

    /// Print diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.merge_duplicates {
            DuplicatePolicy::Merge
        } else {
            DuplicatePolicy::Overwrite
        }
    }

    fn needs_config_file(&self) -> bool {
        is_unset(self.token.as_deref()) || is_unset(self.workspace.as_deref())
    }
}

/// Resolves settings, fetches the week so far and renders it. Settings are
/// checked before `source` is touched.
pub async fn weekly_stats<S>(
    cli: &Cli,
    file: Option<FileConfig>,
    source: &S,
    today: NaiveDate,
    styled: bool,
) -> StatsResult<String>
where
    S: ReportSource + ?Sized,
{
    let settings = Settings::resolve(cli.token.clone(), cli.workspace.clone(), file)?;
    let window = ReportWindow::current_week(today);
    debug!(since = %window.start, until = %window.end, "requesting weekly report");

    let records = source
        .weekly_report(&settings, window.start)
        .await?
        .into_records()?;

    let report = aggregate(&records, cli.duplicate_policy());
    if report.is_empty() {
        debug!("no time logged this week");
    }
    info!(
        records = records.len(),
        projects = report.projects().len(),
        total_hours = report.total_hours(),
        "aggregated report"
    );

    render(&report, &window, &cli.output, styled).map_err(StatsError::Output)
}

pub fn describe_error(err: &StatsError, styled: bool) -> String {
    match err {
        StatsError::MissingSettings => USAGE.to_string(),
        other => {
            let prefix = "An error occurred:";
            if styled {
                format!("{} {}", prefix.red().bold(), other)
            } else {
                format!("{} {}", prefix, other)
            }
        }
    }
}

pub async fn run() -> StatsResult<()> {
    let cli = Cli::parse();
    enable_logging(cli.verbose);

    let styled = !cli.no_color && atty::is(Stream::Stdout);
    colored::control::set_override(styled);

    let file = if cli.needs_config_file() {
        let app_config = AppConfig::new(cli.config.clone())?;
        debug!(path = %app_config.config_file_path().display(), "reading config file");
        app_config.load()?
    } else {
        None
    };

    let client = TogglClient::new(cli.api_url.as_str())?;
    let today = Local::now().date_naive();

    let rendered = weekly_stats(&cli, file, &client, today, styled).await?;
    println!("{}", rendered);
    Ok(())
}

pub fn report_error(err: &StatsError) {
    let styled = atty::is(Stream::Stderr);
    colored::control::set_override(styled);
    eprintln!("{}", describe_error(err, styled));
}
