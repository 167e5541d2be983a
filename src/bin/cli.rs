//! Growthdash CLI
//!
//! Command-line interface for Growthdash:
//! - Compare two chains directly against the TokenGuard API
//! - Inspect and change the selection of a running server
//! - Check server status
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use growthdash::chains::Chain;
use growthdash::config::{generate_default_config, Config};
use growthdash::dashboard::{DashboardView, Selection};
use growthdash::logging;
use growthdash::timeline::{to_csv, DisplayedTimeline, Granularity};
use growthdash::tokenguard::TokenGuardClient;

#[derive(Parser)]
#[command(name = "growthdash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compare blockchain growth index timelines")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and compare two chains without a server
    Compare {
        /// Chain on the left of the comparison
        from: Chain,
        /// Chain to compare with
        to: Chain,
        /// Weeks per displayed point (1, 2 or 4)
        #[arg(short, long, default_value = "1")]
        granularity: u32,
        /// TokenGuard endpoint (default: from config)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// List supported chains
    Chains,

    /// Show the server's current dashboard view
    Show,

    /// Change the server's selection
    Select {
        #[arg(long)]
        from: Option<Chain>,
        #[arg(long)]
        to: Option<Chain>,
        /// Weeks per displayed point (1, 2 or 4)
        #[arg(short, long)]
        granularity: Option<u32>,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let http = reqwest::Client::new();

    match cli.command {
        Commands::Compare {
            from,
            to,
            granularity,
            endpoint,
        } => {
            let granularity = Granularity::try_from(granularity)?;

            if !Selection::new(from, to).is_comparable() {
                println!("{} compared with itself: nothing to fetch.", from);
                return Ok(());
            }

            let mut config = logging::with_bootstrap("warn", Config::load_default).tokenguard;
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }

            let client = TokenGuardClient::new(config.client_config())?;
            let response = client
                .fetch_timeline(from, to)
                .await
                .with_context(|| format!("Failed to fetch {} vs {}", from, to))?;

            let timeline = DisplayedTimeline::from_response(&response, granularity);
            print_timeline(&timeline, cli.format, &format!("{} vs {} ({})", from, to, granularity))?;
        }

        Commands::Chains => match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&Chain::ALL)?),
            _ => {
                for chain in Chain::ALL {
                    println!("{}", chain);
                }
            }
        },

        Commands::Show => {
            let response = http
                .get(format!("{}/api/v1/dashboard", cli.api_url))
                .send()
                .await
                .with_context(|| format!("Cannot connect to Growthdash API at {}", cli.api_url))?;

            let view: DashboardView = read_json(response).await?;
            print_view(&view, cli.format)?;
        }

        Commands::Select {
            from,
            to,
            granularity,
        } => {
            if from.is_none() && to.is_none() && granularity.is_none() {
                bail!("Nothing to change: pass --from, --to and/or --granularity");
            }

            let body = serde_json::json!({
                "chain_from": from.map(|c| c.as_str()),
                "chain_to": to.map(|c| c.as_str()),
                "granularity": granularity,
            });

            let response = http
                .put(format!("{}/api/v1/selection", cli.api_url))
                .json(&body)
                .send()
                .await
                .with_context(|| format!("Cannot connect to Growthdash API at {}", cli.api_url))?;

            let view: DashboardView = read_json(response).await?;
            print_view(&view, cli.format)?;
        }

        Commands::Status => {
            let response = http
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    if cli.format == OutputFormat::Json {
                        println!("{}", serde_json::to_string_pretty(&health)?);
                        return Ok(());
                    }

                    println!("Growthdash v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!("Dashboard:  {}", health["dashboard"].as_str().unwrap_or("unknown"));
                    println!("Timeline:   {}", health["timeline"].as_str().unwrap_or("unknown"));
                    println!(
                        "WebSocket clients: {}",
                        health["ws_connections"].as_u64().unwrap_or(0)
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => bail!("API returned error: {}", resp.status()),
                Err(e) => {
                    eprintln!("Cannot connect to Growthdash API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Growthdash server is running:");
                    eprintln!("  cargo run --bin growthdash");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", config),
            }
        }
    }

    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> anyhow::Result<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        bail!("Request failed ({}): {}", status, text);
    }
    Ok(response.json().await?)
}

fn print_view(view: &DashboardView, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    let title = format!(
        "{} vs {} ({}) [{}]",
        view.chain_from,
        view.chain_to,
        view.granularity,
        view.status.as_str()
    );

    match &view.timeline {
        Some(timeline) => print_timeline(timeline, format, &title),
        None => {
            if format == OutputFormat::Table {
                println!("{}", title);
                println!("Loading...");
            }
            Ok(())
        }
    }
}

fn print_timeline(
    timeline: &DisplayedTimeline,
    format: OutputFormat,
    title: &str,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(timeline)?),
        OutputFormat::Csv => print!("{}", to_csv(timeline)?),
        OutputFormat::Table => print_table(timeline, title),
    }
    Ok(())
}

fn print_table(timeline: &DisplayedTimeline, title: &str) {
    println!("{}", title);
    println!();

    if timeline.is_empty() {
        println!("No data");
        return;
    }

    println!("{:<12} | {:>12} | {:>12}", "Date", "Blockchain", "Cumulative");
    println!("{}", "-".repeat(42));

    let cell = |value: Option<f64>| {
        value
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string())
    };

    for row in timeline.rows() {
        println!(
            "{:<12} | {:>12} | {:>12}",
            row.date,
            cell(row.blockchain),
            cell(row.cumulative)
        );
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
