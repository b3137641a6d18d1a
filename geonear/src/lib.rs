//! GeoNear - Geodesic distance and nearest-neighbor table augmentation
//!
//! This library augments tabular point data (rows with `lat`/`lon` columns)
//! with derived distance columns:
//!
//! - distance from each row to a fixed target point
//! - identifier of and distance to each row's nearest neighbor within a
//!   reference table, with the row itself excluded when the two tables
//!   describe the same points
//!
//! # High-Level API
//!
//! ```ignore
//! use geonear::augment;
//! use geonear::table::Table;
//!
//! let mut table = Table::from_path("cities.csv")?;
//! augment::append_distance_column(&mut table, 40.0, -75.0, "d_philly")?;
//!
//! let reference = Table::from_path("stations.tsv")?;
//! augment::append_neighbor_columns(&mut table, &reference, "nearest", "d_nearest")?;
//!
//! table.write_to_path("cities_out.csv")?;
//! ```

pub mod augment;
pub mod geodesic;
pub mod index;
pub mod table;

/// Version of the GeoNear library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
