use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_RATE_LIMIT_MS: u64 = 500;

const GLOBAL_ENDPOINT: &str = "https://discoveryengine.googleapis.com";

/// Location of a data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Global,
    Us,
    Eu,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Global => "global",
            Location::Us => "us",
            Location::Eu => "eu",
        }
    }

    /// Base URL of the API serving this location. Regional data stores are only
    /// reachable through their regional host.
    pub fn endpoint(&self) -> String {
        match self {
            Location::Global => GLOBAL_ENDPOINT.to_string(),
            regional => format!("https://{}-discoveryengine.googleapis.com", regional.as_str()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported location `{0}` (expected one of: global, us, eu)")]
pub struct UnknownLocation(pub String);

impl FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Location::Global),
            "us" => Ok(Location::Us),
            "eu" => Ok(Location::Eu),
            _ => Err(UnknownLocation(s.to_string())),
        }
    }
}

/// Identifies the data store every operation runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreConfig {
    pub project_id: String,
    pub location: Location,
    pub datastore_id: String,
}

impl DatastoreConfig {
    pub fn trace_loaded(&self) {
        info!(
            project_id = %self.project_id,
            location = %self.location,
            datastore_id = %self.datastore_id,
            "Loaded data store config"
        );
    }

    /// Resource name of the default branch holding the data store's documents.
    pub fn branch_path(&self) -> String {
        format!(
            "projects/{}/locations/{}/dataStores/{}/branches/default_branch",
            self.project_id, self.location, self.datastore_id
        )
    }

    /// File name of the CSV export for this data store.
    pub fn csv_file_name(&self) -> String {
        format!(
            "datastore-{}-{}-{}.csv",
            self.project_id, self.location, self.datastore_id
        )
    }
}

/// Tunables for fetching and exporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub page_size: u32,
    /// Pause between two consecutive listing calls.
    pub rate_limit: Duration,
    pub output_dir: PathBuf,
    /// Where to leave the JSON array text of all documents, if anywhere.
    pub scratch_json: Option<PathBuf>,
    /// Overrides the location-derived API base URL.
    pub api_endpoint: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            rate_limit: Duration::from_millis(DEFAULT_RATE_LIMIT_MS),
            output_dir: std::env::temp_dir(),
            scratch_json: None,
            api_endpoint: None,
        }
    }
}

impl ExportSettings {
    pub fn trace_loaded(&self) {
        info!(
            page_size = self.page_size,
            rate_limit_ms = self.rate_limit.as_millis() as u64,
            output_dir = %self.output_dir.display(),
            "Loaded export settings"
        );
        debug!(?self, "Export settings loaded (full debug)");
    }
}
