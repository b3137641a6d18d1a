//! Table augmentation: derived geodesic distance and neighbor columns.
//!
//! Two operations, composed from [`crate::geodesic`] and [`crate::index`]:
//!
//! - [`append_distance_column`] - distance from each row to a fixed target
//!   point
//! - [`append_neighbor_columns`] - identifier of and distance to each row's
//!   nearest neighbor within a reference table, excluding the row itself by
//!   identifier (safe for self-joins)
//!
//! Both are all-or-nothing: every derived value is computed before any
//! column is appended, so a malformed row leaves the table untouched. The
//! per-row scan is independent across rows and runs on the rayon pool; the
//! results are collected back in input row order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;

use crate::geodesic;
use crate::index::{IndexError, Point, SpatialIndex};
use crate::table::{Table, TableError};

/// Column holding each row's latitude.
pub const LAT_COLUMN: &str = "lat";
/// Column holding each row's longitude.
pub const LON_COLUMN: &str = "lon";
/// Column holding each row's integer identifier.
pub const ID_COLUMN: &str = "id";

/// Rows between progress log records during long scans.
const PROGRESS_INTERVAL: usize = 1000;

/// Errors that can occur while augmenting a table.
#[derive(Debug, Error)]
pub enum AugmentError {
    /// A row's field cannot be parsed as the expected numeric type.
    /// Fatal for the whole run; rows are never skipped.
    #[error("row {row}: column '{column}' value '{value}' is not a valid number")]
    MalformedValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Append a column with each row's distance to a fixed target point.
///
/// Reads every row's `lat`/`lon` fields, computes the great-circle distance
/// to `(latitude, longitude)`, and appends it formatted with exactly four
/// decimal places. Row order is preserved.
///
/// # Errors
///
/// - [`TableError::ColumnCollision`] if `column` already exists (checked
///   before anything else)
/// - [`TableError::MissingColumn`] if the table lacks `lat`/`lon` columns
/// - [`AugmentError::MalformedValue`] if any row's coordinate fails to parse
///
/// On error the table is unchanged.
pub fn append_distance_column(
    table: &mut Table,
    latitude: f64,
    longitude: f64,
    column: &str,
) -> Result<(), AugmentError> {
    table.check_new_column(column)?;
    let lat_at = table.require_column(LAT_COLUMN)?;
    let lon_at = table.require_column(LON_COLUMN)?;

    let start = Instant::now();
    let scanned = AtomicUsize::new(0);

    let values = table
        .rows()
        .par_iter()
        .enumerate()
        .map(|(position, fields)| {
            let row_lat = parse_coordinate(position, LAT_COLUMN, &fields[lat_at])?;
            let row_lon = parse_coordinate(position, LON_COLUMN, &fields[lon_at])?;

            log_progress(&scanned);
            Ok(format_distance(geodesic::distance_km(
                row_lat, row_lon, latitude, longitude,
            )))
        })
        .collect::<Result<Vec<_>, AugmentError>>()?;

    table.push_column(column, values)?;

    tracing::debug!(
        column,
        rows = table.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "appended point-distance column"
    );
    Ok(())
}

/// Append each row's nearest neighbor within a reference table.
///
/// Builds one [`SpatialIndex`] from the reference table's `id`/`lat`/`lon`
/// columns, then for every row reads `lat`/`lon`/`id`, finds the nearest
/// reference point whose identifier differs from the row's own, and appends
/// two columns: the neighbor's identifier and the great-circle distance to
/// it, four-decimal formatted. Because exclusion is by identifier, the
/// reference table may be the table itself (self-join) without every row
/// trivially matching itself at distance zero.
///
/// # Errors
///
/// - [`TableError::ColumnCollision`] if either new name exists already, or
///   the two names are equal (checked before anything else)
/// - [`TableError::MissingColumn`] if either table lacks a required column
/// - [`AugmentError::MalformedValue`] if any field fails to parse
/// - [`IndexError::DuplicateIdentifier`] if the reference set repeats an
///   identifier
/// - [`IndexError::EmptyIndex`] if a row has no eligible neighbor
///
/// On error the table is unchanged.
pub fn append_neighbor_columns(
    table: &mut Table,
    reference: &Table,
    id_column: &str,
    dist_column: &str,
) -> Result<(), AugmentError> {
    table.check_new_column(id_column)?;
    table.check_new_column(dist_column)?;
    if id_column == dist_column {
        return Err(TableError::ColumnCollision(dist_column.to_string()).into());
    }

    let index = SpatialIndex::build(reference_points(reference)?)?;

    let lat_at = table.require_column(LAT_COLUMN)?;
    let lon_at = table.require_column(LON_COLUMN)?;
    let id_at = table.require_column(ID_COLUMN)?;

    let start = Instant::now();
    let scanned = AtomicUsize::new(0);

    let derived = table
        .rows()
        .par_iter()
        .enumerate()
        .map(|(position, fields)| {
            let row_lat = parse_coordinate(position, LAT_COLUMN, &fields[lat_at])?;
            let row_lon = parse_coordinate(position, LON_COLUMN, &fields[lon_at])?;
            let row_id = parse_identifier(position, ID_COLUMN, &fields[id_at])?;

            let neighbor = index.nearest(row_lat, row_lon, Some(row_id))?;
            let (neighbor_lat, neighbor_lon) = index
                .coordinates_of(neighbor)
                .ok_or(IndexError::UnknownIdentifier(neighbor))?;
            let dist = geodesic::distance_km(row_lat, row_lon, neighbor_lat, neighbor_lon);

            log_progress(&scanned);
            Ok((neighbor.to_string(), format_distance(dist)))
        })
        .collect::<Result<Vec<_>, AugmentError>>()?;

    let (neighbor_ids, neighbor_dists): (Vec<_>, Vec<_>) = derived.into_iter().unzip();
    table.push_column(id_column, neighbor_ids)?;
    table.push_column(dist_column, neighbor_dists)?;

    tracing::debug!(
        id_column,
        dist_column,
        rows = table.len(),
        reference = index.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "appended nearest-neighbor columns"
    );
    Ok(())
}

/// Extract the identified points of a reference table.
fn reference_points(reference: &Table) -> Result<Vec<Point>, AugmentError> {
    let lat_at = reference.require_column(LAT_COLUMN)?;
    let lon_at = reference.require_column(LON_COLUMN)?;
    let id_at = reference.require_column(ID_COLUMN)?;

    reference
        .rows()
        .iter()
        .enumerate()
        .map(|(position, fields)| {
            Ok(Point {
                identifier: parse_identifier(position, ID_COLUMN, &fields[id_at])?,
                latitude: parse_coordinate(position, LAT_COLUMN, &fields[lat_at])?,
                longitude: parse_coordinate(position, LON_COLUMN, &fields[lon_at])?,
            })
        })
        .collect()
}

/// Distances are serialized with exactly four decimal places.
fn format_distance(km: f64) -> String {
    format!("{:.4}", km)
}

fn parse_coordinate(position: usize, column: &str, value: &str) -> Result<f64, AugmentError> {
    value
        .trim()
        .parse()
        .map_err(|_| malformed(position, column, value))
}

fn parse_identifier(position: usize, column: &str, value: &str) -> Result<i64, AugmentError> {
    value
        .trim()
        .parse()
        .map_err(|_| malformed(position, column, value))
}

fn malformed(position: usize, column: &str, value: &str) -> AugmentError {
    // Report 1-based data row numbers
    AugmentError::MalformedValue {
        row: position + 1,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn log_progress(scanned: &AtomicUsize) {
    let rows = scanned.fetch_add(1, Ordering::Relaxed) + 1;
    if rows % PROGRESS_INTERVAL == 0 {
        tracing::debug!(rows, "scan progress");
    }
}
