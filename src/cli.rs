///
/// This module implements the CLI interface for datastore-export: command parsing,
/// config resolution, and printing of the typed results the library returns.
///
/// All fetching, flattening and lookup logic lives in the library modules; this module
/// is strictly glue. It is also the only place that writes to stdout.
///
/// ## How To Use
/// - For command-line users: run the `datastore-export` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`], or
///   [`execute`] with an explicit lister, throttle and output sink.
use crate::client::DiscoveryEngineClient;
use crate::config::Location;
use crate::contract::{DocumentLister, Throttle, TokioThrottle};
use crate::export::{default_destination, export_csv, write_scratch_json, ExportOutcome};
use crate::load_config::{load_config, resolve, Overrides, ResolvedConfig};
use crate::paginate::{fetch_all, Pagination};
use crate::query::{
    estimate_size_for_documents, list_indexed_urls, search_doc_id, search_url, DocIdLookup,
    BYTES_PER_WEBSITE_PAGE,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// CLI for datastore-export: dump and inspect the documents of a data store.
#[derive(Parser)]
#[clap(
    name = "datastore-export",
    version,
    about = "Export the documents of a Discovery Engine data store to CSV and inspect its index"
)]
pub struct Cli {
    /// Path to an optional YAML config file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project that owns the data store
    #[clap(long, env = "DATASTORE_PROJECT_ID", global = true)]
    pub project_id: Option<String>,

    /// Data store location: global, us or eu
    #[clap(long, env = "DATASTORE_LOCATION", global = true)]
    pub location: Option<Location>,

    /// Data store identifier
    #[clap(long, env = "DATASTORE_ID", global = true)]
    pub datastore_id: Option<String>,

    /// Directory for the CSV export when --output is not given
    #[clap(long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every document and write them to a CSV file
    Export {
        /// Destination CSV file
        /// (defaults to <output-dir>/datastore-<project>-<location>-<datastore>.csv)
        #[clap(long)]
        output: Option<PathBuf>,
        /// Also write the raw documents as a JSON array to this file
        #[clap(long)]
        scratch_json: Option<PathBuf>,
    },
    /// Print the content URL of every indexed document
    Urls,
    /// Print every indexed URL containing the given text
    SearchUrl {
        needle: String,
    },
    /// Print every document whose parent document id matches
    SearchDoc {
        doc_id: String,
    },
    /// Estimate the size of an advanced website data store
    EstimateSize {
        #[clap(long, default_value_t = BYTES_PER_WEBSITE_PAGE)]
        bytes_per_page: u64,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let scratch_json = match &self.command {
            Commands::Export { scratch_json, .. } => scratch_json.clone(),
            _ => None,
        };
        Overrides {
            project_id: self.project_id.clone(),
            location: self.location,
            datastore_id: self.datastore_id.clone(),
            output_dir: self.output_dir.clone(),
            scratch_json,
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let file_config = match &cli.config {
        Some(path) => Some(load_config(path)?),
        None => None,
    };
    let resolved = resolve(file_config, cli.overrides())?;

    let client = DiscoveryEngineClient::new_from_env(
        &resolved.datastore,
        resolved.settings.api_endpoint.as_deref(),
    )
    .context("Failed to construct document listing client")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(cli.command, &resolved, &client, &TokioThrottle, &mut out).await
}

/// Run one command against an explicit lister and throttle, printing to `out`.
pub async fn execute<L, T, W>(
    command: Commands,
    config: &ResolvedConfig,
    lister: &L,
    throttle: &T,
    out: &mut W,
) -> Result<()>
where
    L: DocumentLister + ?Sized,
    T: Throttle + ?Sized,
    W: Write,
{
    let pagination = Pagination::from(&config.settings);
    tracing::info!(datastore = %config.datastore.branch_path(), "Fetching documents");
    let documents = fetch_all(lister, throttle, &pagination)
        .await
        .context("Failed to list documents")?;

    match command {
        Commands::Export {
            output,
            scratch_json,
        } => {
            let scratch = scratch_json.or_else(|| config.settings.scratch_json.clone());
            if let Some(scratch) = &scratch {
                write_scratch_json(&documents, scratch).with_context(|| {
                    format!("Failed to write scratch JSON {}", scratch.display())
                })?;
            }
            let destination = output.unwrap_or_else(|| {
                default_destination(&config.datastore, &config.settings.output_dir)
            });
            let outcome = export_csv(&documents, &destination)
                .with_context(|| format!("Failed to export CSV {}", destination.display()))?;
            match &outcome {
                ExportOutcome::Written { .. } => {
                    tracing::info!(command = "export", "Export complete")
                }
                ExportOutcome::EmptyResult => {
                    tracing::warn!(command = "export", "Data store returned no documents")
                }
            }
            writeln!(out, "{outcome}")?;
        }
        Commands::Urls => {
            for url in list_indexed_urls(&documents) {
                writeln!(out, "{url}")?;
            }
        }
        Commands::SearchUrl { needle } => {
            let urls = list_indexed_urls(&documents);
            let matches = search_url(&urls, &needle);
            if matches.is_empty() {
                writeln!(out, "No indexed url contains `{needle}`")?;
            }
            for url in matches {
                writeln!(out, "{url}")?;
            }
        }
        Commands::SearchDoc { doc_id } => match search_doc_id(&doc_id, &documents) {
            DocIdLookup::Found(docs) => {
                for doc in docs {
                    writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
                }
            }
            not_found @ DocIdLookup::NotFound { .. } => writeln!(out, "{not_found}")?,
        },
        Commands::EstimateSize { bytes_per_page } => {
            let estimate = estimate_size_for_documents(&documents, bytes_per_page);
            writeln!(out, "{estimate}")?;
        }
    }

    Ok(())
}
