use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use lc_migrator::app::MigrateUseCase;
use lc_migrator::config::{Config, DEFAULT_CONFIG_PATH};
use lc_migrator::domain::LegacyChain;
use lc_migrator::infra::{HttpLegacySource, HttpRegisterSink, TracingErrorReporter};
use lc_migrator::transform::{DefaultTextRules, NameDecoder, PunctuationScheme, TransformEngine};
use lc_migrator::{logging, metrics};

#[derive(Parser)]
#[command(name = "lc_migrator")]
#[command(about = "Migrates legacy land charges register records into the register store")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate every registration touched between two dates (inclusive)
    Migrate {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
        /// Serve Prometheus metrics on this address while running
        #[arg(long)]
        metrics_addr: Option<SocketAddr>,
    },
    /// Transform legacy chains from a JSON file and print the registrations
    Transform {
        /// A LegacyChain or a list of them
        #[arg(long)]
        input: PathBuf,
    },
    /// Decode a packed legacy name
    DecodeName {
        #[arg(long, default_value = "")]
        punctuation: String,
        #[arg(long, default_value = "")]
        remainder: String,
        #[arg(long, default_value = "")]
        reverse: String,
        /// keyed or narrow
        #[arg(long)]
        scheme: Option<PunctuationScheme>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let _guard = logging::init_logging(&config.logging);

    match cli.command {
        Commands::Migrate { start, end, metrics_addr } => {
            config.validate()?;
            if let Some(addr) = metrics_addr {
                metrics::init_metrics(addr);
            }

            let timeout = Duration::from_secs(config.request_timeout_secs);
            let source = Arc::new(HttpLegacySource::new(&config.legacy_url, timeout)?);
            let sink = Arc::new(HttpRegisterSink::new(&config.register_url, timeout)?);
            let engine = TransformEngine::new(&config.decoder, Arc::new(DefaultTextRules));

            let use_case = MigrateUseCase::new(source, sink, Arc::new(TracingErrorReporter), engine)
                .with_subsystem(config.application_name.clone())
                .with_batch_size(config.batch_size);

            match use_case.run(start, end).await {
                Ok(report) => {
                    for line in report.summary_lines() {
                        println!("{}", line);
                    }
                    if report.errors > 0 {
                        info!("{} errors recorded during the run", report.errors);
                    }
                }
                Err(e) => {
                    error!("Migration aborted: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Transform { input } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)?;
            let chains: Vec<LegacyChain> = if value.is_array() {
                serde_json::from_value(value)?
            } else {
                vec![serde_json::from_value(value)?]
            };

            let engine = TransformEngine::new(&config.decoder, Arc::new(DefaultTextRules));
            let mut output = Vec::with_capacity(chains.len());
            for chain in &chains {
                output.push(engine.assemble_chain(chain)?);
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::DecodeName { punctuation, remainder, reverse, scheme } => {
            if punctuation.is_empty() && remainder.is_empty() && reverse.is_empty() {
                bail!("nothing to decode");
            }
            let decoder = NameDecoder::new(scheme.unwrap_or(config.decoder.punctuation_scheme));
            let name = decoder.decode(&punctuation, &remainder, &reverse)?;
            println!("Name:      {}", name.full_name);
            println!("Forenames: {}", name.forenames.join(" "));
            println!("Surname:   {}", name.surname);
        }
    }
    Ok(())
}
