pub mod area;
pub mod validate;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use parcelsplit::{read_parent_from_geojson_bytes, read_subdivisions_from_geojson_bytes, ParentParcel, SubdivisionFeature};

pub(crate) fn read_parent(path: &Path) -> Result<ParentParcel> {
    let bytes = fs::read(path).with_context(|| format!("[io] failed to read {}", path.display()))?;
    read_parent_from_geojson_bytes(&bytes).with_context(|| format!("[io] invalid parent parcel in {}", path.display()))
}

pub(crate) fn read_subdivisions(path: &Path, parent: &ParentParcel) -> Result<Vec<SubdivisionFeature>> {
    let bytes = fs::read(path).with_context(|| format!("[io] failed to read {}", path.display()))?;
    read_subdivisions_from_geojson_bytes(&bytes, parent)
        .with_context(|| format!("[io] invalid subdivisions in {}", path.display()))
}
