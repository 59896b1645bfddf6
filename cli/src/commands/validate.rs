use std::path::Path;

use anyhow::{bail, ensure, Result};
use parcelsplit::{validate_all, SessionConfig, ValidationError};
use tracing::{debug, info};

use crate::cli::{Cli, ValidateArgs};
use crate::commands::{read_parent, read_subdivisions};

pub fn run(_cli: &Cli, args: &ValidateArgs) -> Result<()> {
    let errors = collect(args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&errors)?);
    } else {
        for error in &errors {
            println!("{:?}\t{}\t{}", error.kind, error.message, join_ids(error));
        }
    }

    if !errors.is_empty() {
        bail!("[validate] {} validation error(s)", errors.len());
    }
    println!("[validate] ok");
    Ok(())
}

/// Load the inputs named by `args` and return every validation finding.
pub(crate) fn collect(args: &ValidateArgs) -> Result<Vec<ValidationError>> {
    let config = load_config(args.config.as_deref(), args)?;
    debug!(?config, "resolved configuration");

    let parent = read_parent(&args.parent)?;
    let subdivisions = read_subdivisions(&args.subdivisions, &parent)?;
    info!(parent = %parent.id, count = subdivisions.len(), "validating subdivisions");

    Ok(validate_all(&subdivisions, &parent, &config.validation))
}

fn load_config(path: Option<&Path>, args: &ValidateArgs) -> Result<SessionConfig> {
    let mut config = match path {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };

    if let Some(test) = args.overlap_test { config.validation.overlap_test = test.into() }
    if let Some(tolerance) = args.area_tolerance {
        ensure!(tolerance.is_finite() && tolerance >= 0.0, "[validate] area tolerance must be a non-negative number, got {tolerance}");
        config.validation.area_tolerance = tolerance;
    }
    Ok(config)
}

fn join_ids(error: &ValidationError) -> String {
    error.features.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use parcelsplit::{ErrorKind, OverlapTest};
    use tempfile::TempDir;

    use super::*;
    use crate::cli::OverlapTestArg;

    const PARENT: &str = r#"{"type": "Feature", "id": "p1", "properties": {},
        "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [20, 0], [20, 20], [0, 20], [0, 0]]]}}"#;

    fn crossing_bars() -> String {
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": "h", "properties": {"allocations": [{"partyId": "1", "name": "Ana", "share": 100}]},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 8], [20, 8], [20, 12], [0, 12], [0, 8]]]}},
            {"type": "Feature", "id": "v", "properties": {"allocations": [{"partyId": "2", "name": "Ben", "share": 100}]},
             "geometry": {"type": "Polygon", "coordinates": [[[8, 0], [12, 0], [12, 20], [8, 20], [8, 0]]]}}
        ]}"#.to_string()
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn args(dir: &TempDir) -> ValidateArgs {
        ValidateArgs {
            parent: write(dir, "parent.geojson", PARENT),
            subdivisions: write(dir, "subdivisions.geojson", &crossing_bars()),
            config: None,
            overlap_test: None,
            area_tolerance: None,
            json: false,
        }
    }

    #[test]
    fn reports_crossing_overlap_by_default() {
        let dir = TempDir::new().unwrap();
        let errors = collect(&args(&dir)).unwrap();
        assert_eq!(errors.iter().filter(|e| e.kind == ErrorKind::Overlap).count(), 2);
    }

    #[test]
    fn flag_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir);
        args.config = Some(write(&dir, "config.json", r#"{"validation": {"overlapTest": "interiors"}}"#));
        args.overlap_test = Some(OverlapTestArg::Vertices);

        let config = load_config(args.config.as_deref(), &args).unwrap();
        assert_eq!(config.validation.overlap_test, OverlapTest::Vertices);
        assert!(collect(&args).unwrap().iter().all(|e| e.kind != ErrorKind::Overlap));
    }

    #[test]
    fn negative_tolerance_is_refused() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir);
        args.area_tolerance = Some(-1.0);
        assert!(collect(&args).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir);
        args.parent = dir.path().join("nope.geojson");
        let err = collect(&args).unwrap_err();
        assert!(format!("{err:#}").contains("nope.geojson"));
    }
}
