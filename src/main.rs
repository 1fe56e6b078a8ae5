use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cvetrace::config::Config;
use cvetrace::service::VulnService;

#[derive(Parser)]
#[command(name = "cvetrace")]
#[command(about = "Correlate CVEs with GitHub releases and pull requests", long_about = None)]
#[command(version)]
struct Cli {
    /// GitHub API token (anonymous access is heavily rate limited)
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Output format: json or summary
    #[arg(short, long, default_value = "summary", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List CVE identifiers affecting a repository
    Cves {
        /// Repository URL or owner/name reference
        repo: String,
    },
    /// Predict the introducing and fixing commit/PR for a CVE
    Predict {
        /// CVE identifier, e.g. CVE-2023-2727
        cve: String,
        /// Repository URL or owner/name reference; derived from the
        /// vulnerability record when omitted
        repo: Option<String>,
    },
    /// List merged pull requests inside the CVE's introduction window
    Suspects {
        /// CVE identifier, e.g. CVE-2023-2727
        cve: String,
        /// Repository URL or owner/name reference; derived from the
        /// vulnerability record when omitted
        repo: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env();
    if cli.token.is_some() {
        config.github_token = cli.token.clone();
    }

    let service = VulnService::new(&config).context("failed to construct API clients")?;
    let json = cli.output == "json";

    match cli.command {
        Commands::Cves { repo } => {
            let cve_ids = service
                .list_cve_ids_by_github_url(&repo)
                .await
                .with_context(|| format!("failed to list CVEs for {repo}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cve_ids)?);
            } else if cve_ids.is_empty() {
                println!("No CVEs recorded for {repo}");
            } else {
                for id in &cve_ids {
                    println!("{id}");
                }
            }
        }
        Commands::Predict { cve, repo } => {
            let predicted = match &repo {
                Some(repo) => service.build_prediction(repo, &cve).await,
                None => service.build_prediction_for_cve(&cve).await,
            }
            .with_context(|| format!("failed to build a prediction for {cve}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&predicted)?);
            } else {
                print_prediction(&cve, &predicted);
            }
        }
        Commands::Suspects { cve, repo } => {
            let suspected = match &repo {
                Some(repo) => service.find_suspected_pull_requests(repo, &cve).await,
                None => service.find_suspected_pull_requests_for_cve(&cve).await,
            }
            .with_context(|| format!("failed to collect suspects for {cve}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&suspected)?);
            } else {
                print_suspected(&cve, &suspected);
            }
        }
    }

    Ok(())
}

fn print_prediction(cve: &str, predicted: &cvetrace::correlate::Predicted) {
    println!("Prediction for {cve}\n");

    for (label, side) in [
        ("Introduced", predicted.introduced.as_ref()),
        ("Fixed", predicted.fixed.as_ref()),
    ] {
        match side {
            None => println!("  {label}: unknown"),
            Some(m) => {
                println!(
                    "  {label}: commit {}",
                    m.commit_hash.as_deref().unwrap_or("<none>")
                );
                if let Some(pr) = &m.pull_request {
                    println!(
                        "    via PR #{} {}",
                        pr.number,
                        pr.title.as_deref().unwrap_or("")
                    );
                }
                if let Some(commit) = &m.commit {
                    if let Some(line) = commit.commit.message.lines().next() {
                        println!("    {line}");
                    }
                }
            }
        }
    }
}

fn print_suspected(cve: &str, suspected: &cvetrace::correlate::Suspected) {
    if suspected.pull_requests.is_empty() {
        println!("No suspected pull requests found for {cve}");
        return;
    }

    println!(
        "{} suspected pull requests for {cve}\n",
        suspected.pull_requests.len()
    );
    for pr in &suspected.pull_requests {
        println!("  #{} {}", pr.number, pr.title.as_deref().unwrap_or(""));
    }
    if !suspected.commits.is_empty() {
        println!("\nMerge commits:");
        for commit in &suspected.commits {
            println!(
                "  {} {}",
                commit.sha,
                commit.commit.message.lines().next().unwrap_or("")
            );
        }
    }
}
