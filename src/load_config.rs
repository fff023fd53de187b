/// `load_config` module: loads an optional static YAML config file and merges it with
/// command-line overrides into the explicit [`DatastoreConfig`] and [`ExportSettings`]
/// every operation receives.
///
/// # Precedence
/// Command-line flags (and their environment fallbacks) win over the file, the file wins
/// over built-in defaults. Secrets never live in the file: the access token is read by
/// the client from the environment.
///
/// # Errors
/// All errors in this module use `anyhow::Error` for context-rich diagnostics and are
/// surfaced at the CLI boundary.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

use crate::config::{DatastoreConfig, ExportSettings, Location};

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub datastore: DatastoreSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct DatastoreSection {
    pub project_id: Option<String>,
    pub location: Option<Location>,
    pub datastore_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportSection {
    pub output_dir: Option<PathBuf>,
    pub scratch_json: Option<PathBuf>,
    pub page_size: Option<u32>,
    pub rate_limit_ms: Option<u64>,
    pub api_endpoint: Option<String>,
}

/// Values given on the command line; `None` defers to the file or the defaults.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub project_id: Option<String>,
    pub location: Option<Location>,
    pub datastore_id: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub scratch_json: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub datastore: DatastoreConfig,
    pub settings: ExportSettings,
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    match serde_yaml::from_str::<FileConfig>(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Merge the optional file config with command-line overrides.
pub fn resolve(file: Option<FileConfig>, overrides: Overrides) -> Result<ResolvedConfig> {
    let file = file.unwrap_or_default();
    let defaults = ExportSettings::default();

    let project_id = overrides
        .project_id
        .or(file.datastore.project_id)
        .filter(|s| !s.trim().is_empty())
        .context(
            "project_id is required (--project-id, DATASTORE_PROJECT_ID or datastore.project_id)",
        )?;
    let datastore_id = overrides
        .datastore_id
        .or(file.datastore.datastore_id)
        .filter(|s| !s.trim().is_empty())
        .context(
            "datastore_id is required (--datastore-id, DATASTORE_ID or datastore.datastore_id)",
        )?;
    let location = overrides
        .location
        .or(file.datastore.location)
        .unwrap_or(Location::Global);

    let page_size = file.export.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        anyhow::bail!("export.page_size must be greater than zero");
    }

    let settings = ExportSettings {
        page_size,
        rate_limit: file
            .export
            .rate_limit_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.rate_limit),
        output_dir: overrides
            .output_dir
            .or(file.export.output_dir)
            .unwrap_or(defaults.output_dir),
        scratch_json: overrides.scratch_json.or(file.export.scratch_json),
        api_endpoint: file.export.api_endpoint,
    };

    let datastore = DatastoreConfig {
        project_id,
        location,
        datastore_id,
    };
    datastore.trace_loaded();
    settings.trace_loaded();

    Ok(ResolvedConfig {
        datastore,
        settings,
    })
}
