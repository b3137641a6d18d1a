//! Parsing of the repeatable `--distance` and `--neighbor` payloads.
//!
//! Each payload is a comma-separated triple. Coordinate ranges are checked
//! here so a typo'd request fails before any table is loaded.

use std::path::PathBuf;

/// One `--distance NAME,LAT,LON` request.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRequest {
    pub column: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One `--neighbor ID_NAME,DIST_NAME,FILE` request.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborRequest {
    pub id_column: String,
    pub dist_column: String,
    pub filename: PathBuf,
}

/// Parse a `--distance` payload.
pub fn parse_distance(raw: &str) -> Result<DistanceRequest, String> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "--distance expects NAME,LAT,LON but received '{}'",
            raw
        ));
    }

    let latitude: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("--distance latitude '{}' is not a number", parts[1]))?;
    let longitude: f64 = parts[2]
        .trim()
        .parse()
        .map_err(|_| format!("--distance longitude '{}' is not a number", parts[2]))?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude {} is outside [-90, 90]", latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("longitude {} is outside [-180, 180]", longitude));
    }

    Ok(DistanceRequest {
        column: parts[0].to_string(),
        latitude,
        longitude,
    })
}

/// Parse a `--neighbor` payload.
///
/// The reference file must already exist; a missing file is reported here
/// rather than mid-run.
pub fn parse_neighbor(raw: &str) -> Result<NeighborRequest, String> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "--neighbor expects ID_NAME,DIST_NAME,FILE but received '{}'",
            raw
        ));
    }

    let filename = PathBuf::from(parts[2]);
    if !filename.exists() {
        return Err(format!(
            "--neighbor reference file '{}' does not exist",
            filename.display()
        ));
    }

    Ok(NeighborRequest {
        id_column: parts[0].to_string(),
        dist_column: parts[1].to_string(),
        filename,
    })
}
