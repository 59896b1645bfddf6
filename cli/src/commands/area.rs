use anyhow::Result;
use parcelsplit::geom::polygon_area;
use parcelsplit::{ParentParcel, SubdivisionFeature};

use crate::cli::{AreaArgs, Cli};
use crate::commands::{read_parent, read_subdivisions};

pub fn run(cli: &Cli, args: &AreaArgs) -> Result<()> {
    let parent = read_parent(&args.parent)?;
    let subdivisions = match &args.subdivisions {
        Some(path) => Some(read_subdivisions(path, &parent)?),
        None => None,
    };

    for line in report(&parent, subdivisions.as_deref(), cli.verbose > 0) {
        println!("{line}");
    }
    Ok(())
}

/// Tab-separated area lines: the parent, optionally each of its polygons,
/// then each subdivision and the total with its gap to the parent.
fn report(parent: &ParentParcel, subdivisions: Option<&[SubdivisionFeature]>, per_polygon: bool) -> Vec<String> {
    let parent_area = parent.area();
    let mut lines = vec![format!("{}\t{parent_area}", parent.id)];

    if per_polygon {
        for (i, polygon) in parent.geometry.iter().enumerate() {
            lines.push(format!("  polygon {i}\t{}", polygon_area(polygon)));
        }
    }

    let Some(subdivisions) = subdivisions else { return lines };

    let mut total = 0.0;
    for subdivision in subdivisions {
        lines.push(format!("{}\t{}\t{}", subdivision.id, subdivision.title, subdivision.size));
        total += subdivision.size;
    }
    lines.push(format!("total\t{total}\t(difference {})", (parent_area - total).abs()));
    lines
}
