//! End-to-end tests for the geonear binary.
//!
//! These tests run the compiled binary against temporary input files and
//! inspect the written output.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn geonear() -> Command {
    Command::new(env!("CARGO_BIN_EXE_geonear"))
}

#[test]
fn augments_distance_and_neighbor_columns() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("points.csv");
    fs::write(&input, "id,lat,lon\n1,0.0,0.0\n2,0.0,1.0\n3,0.0,10.0\n").unwrap();
    let output = dir.path().join("out.csv");

    let result = geonear()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--distance")
        .arg("d_origin,0.0,0.0")
        .arg("--neighbor")
        .arg(format!("nn,nn_dist,{}", input.display()))
        .arg("--verbose")
        .arg("--timeit")
        .output()
        .unwrap();
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    // --timeit prints wall-clock time to stdout
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("seconds"), "stdout: {}", stdout);

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "id,lat,lon,d_origin,nn,nn_dist");
    assert!(lines[1].starts_with("1,0.0,0.0,0.0000,2,"));
    assert!(lines[2].starts_with("2,0.0,1.0,"));
    assert!(lines[3].starts_with("3,0.0,10.0,"));
    // Self-join: the row never matches itself
    assert!(lines[3].contains(",2,"), "line: {}", lines[3]);
}

#[test]
fn computation_runs_without_verbose() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("points.csv");
    fs::write(&input, "id,lat,lon\n1,40.0,-75.0\n").unwrap();
    let output = dir.path().join("out.tsv");

    let status = geonear()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-d")
        .arg("d,40.0,-75.0")
        .status()
        .unwrap();
    assert!(status.success());

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("0.0000"), "got: {}", written);
}

#[test]
fn rejects_unsupported_output_extension() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("points.csv");
    fs::write(&input, "id,lat,lon\n1,40.0,-75.0\n").unwrap();

    let result = geonear()
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.txt"))
        .output()
        .unwrap();
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("unsupported output extension"), "stderr: {}", stderr);
}

#[test]
fn rejects_out_of_range_distance_request() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("points.csv");
    fs::write(&input, "id,lat,lon\n1,40.0,-75.0\n").unwrap();

    let result = geonear()
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.csv"))
        .arg("-d")
        .arg("d,99.0,0.0")
        .output()
        .unwrap();
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("outside [-90, 90]"), "stderr: {}", stderr);
}

#[test]
fn rejects_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let result = geonear()
        .arg(dir.path().join("absent.csv"))
        .arg("-o")
        .arg(dir.path().join("out.csv"))
        .output()
        .unwrap();
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {}", stderr);
}

#[test]
fn neighbour_alias_is_accepted() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("points.csv");
    fs::write(&input, "id,lat,lon\n1,0.0,0.0\n2,0.0,1.0\n").unwrap();
    let output = dir.path().join("out.csv");

    let status = geonear()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--neighbour")
        .arg(format!("nn,nn_dist,{}", input.display()))
        .status()
        .unwrap();
    assert!(status.success());

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("id,lat,lon,nn,nn_dist"));
}
