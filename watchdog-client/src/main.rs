use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use watchdog_core::{WatchdogConfig, WorkflowFileRequest, DEFAULT_WORKFLOW_PATH};
use watchdog_github::{fetch_workflow_file, GitHubApiSite};

#[derive(Parser)]
#[command(name = "watchdog")]
#[command(about = "Fetch CI workflow files from a source-hosting site", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Hosting site base URL (overrides config and WATCHDOG_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a workflow file at a given commit and print it
    Fetch {
        #[command(flatten)]
        target: FileTarget,

        /// Print a JSON document instead of the raw file
        #[arg(long)]
        json: bool,
    },

    /// Print the raw file URL without contacting the site
    Url {
        #[command(flatten)]
        target: FileTarget,
    },
}

#[derive(Args)]
struct FileTarget {
    /// Organization or user owning the repository
    org: String,

    /// Repository name
    repo: String,

    /// Commit hash (or any ref the site accepts)
    #[arg(value_name = "REF")]
    git_ref: String,

    /// File path inside the repository
    #[arg(default_value = DEFAULT_WORKFLOW_PATH)]
    path: String,
}

impl FileTarget {
    fn into_request(self) -> WorkflowFileRequest {
        WorkflowFileRequest::new(self.org, self.repo, self.git_ref, self.path)
    }
}

#[derive(Serialize)]
struct FetchedFile {
    url: String,
    #[serde(flatten)]
    request: WorkflowFileRequest,
    content: String,
    fetched_at: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = WatchdogConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }
    debug!(base_url = %config.base_url, timeout_secs = ?config.timeout_secs, "Config loaded");

    let site = GitHubApiSite::from_config(&config)?;

    let stdout = std::io::stdout();
    if !run(cli.command, &site, &mut stdout.lock()).await? {
        process::exit(1);
    }

    Ok(())
}

/// Runs one subcommand, writing results to `out`.
/// Returns `false` when the fetch itself failed.
async fn run(command: Commands, site: &GitHubApiSite, out: &mut dyn Write) -> anyhow::Result<bool> {
    match command {
        Commands::Fetch { target, json } => {
            let request = target.into_request();
            let url = site.raw_file_url(&request)?;

            match fetch_workflow_file(site, &request).await {
                Ok(content) if json => {
                    let fetched = FetchedFile {
                        url: url.to_string(),
                        request,
                        content,
                        fetched_at: Utc::now(),
                    };
                    writeln!(out, "{}", serde_json::to_string_pretty(&fetched)?)?;
                }
                Ok(content) => {
                    write!(out, "{}", content)?;
                }
                Err(e) => {
                    eprintln!("❌ {}", e);
                    return Ok(false);
                }
            }
        }
        Commands::Url { target } => {
            let url = site.raw_file_url(&target.into_request())?;
            writeln!(out, "{}", url)?;
        }
    }

    Ok(true)
}
