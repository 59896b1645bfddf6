use std::path::PathBuf;

use parcelsplit::OverlapTest;

/// Parcel subdivision validation CLI
#[derive(clap::Parser, Debug)]
#[command(name = "parcelsplit", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Check a subdivision set against its parent parcel
    Validate(ValidateArgs),

    /// Print planar areas of a parent parcel and its subdivisions
    Area(AreaArgs),
}

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// GeoJSON Feature (or single-feature collection) holding the parent parcel
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub parent: PathBuf,

    /// GeoJSON FeatureCollection of subdivisions
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub subdivisions: PathBuf,

    /// JSON session config; flags below override it
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Overlap and containment test to apply
    #[arg(long, value_enum)]
    pub overlap_test: Option<OverlapTestArg>,

    /// Relative tolerance for area conservation, e.g. 0.001
    #[arg(long)]
    pub area_tolerance: Option<f64>,

    /// Print findings as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct AreaArgs {
    /// GeoJSON Feature holding the parent parcel
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub parent: PathBuf,

    /// GeoJSON FeatureCollection of subdivisions
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub subdivisions: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapTestArg {
    Interiors,
    Vertices,
}

impl From<OverlapTestArg> for OverlapTest {
    fn from(arg: OverlapTestArg) -> Self {
        match arg {
            OverlapTestArg::Interiors => OverlapTest::Interiors,
            OverlapTestArg::Vertices => OverlapTest::Vertices,
        }
    }
}
