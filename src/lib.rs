#![doc = "datastore-export: dump the documents of a Discovery Engine data store to CSV."]

//! The crate fetches every document of a data store through a paginated listing API,
//! flattens them into a table and writes a CSV. A few independent helpers list, search
//! and size the fetched collection.
//!
//! # Layout
//! - [`contract`]: documents, the listing and throttle seams, error types
//! - [`paginate`]: fetch-all loop with a fixed pause between pages
//! - [`flatten`] and [`export`]: in-memory flattening and CSV output
//! - [`query`]: URL and parent-id lookups, website size estimate
//! - [`client`]: the HTTP implementation of the listing seam
//! - [`config`], [`load_config`], [`cli`]: configuration and command-line glue

pub mod cli;
pub mod client;
pub mod config;
pub mod contract;
pub mod export;
pub mod flatten;
pub mod load_config;
pub mod paginate;
pub mod query;

pub use cli::{run, Cli, Commands};
