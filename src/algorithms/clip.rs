use std::fs;
use std::path::Path;
use std::path::PathBuf;

use geo_types::MultiPolygon;

use crate::errors::CommandError;
use crate::geometry::unary_union;
use crate::progress::ProgressObserver;
use crate::progress::WatchableIterator as _;
use crate::projection::reproject_table;
use crate::table::layers::read_spatial_table;
use crate::table::layers::write_spatial_table;
use crate::table::spatial::SpatialFeatureTable;
use crate::utils::extent::Extent;
use crate::utils::same_file;
use crate::utils::sibling_path;

/// The directory clipped files are written to when no output path is given.
pub(crate) const DEFAULT_CLIP_DIRECTORY: &str = "clipped";

#[derive(Debug,PartialEq,Eq)]
pub(crate) enum ClipOutcome {
    Written(PathBuf),
    /// Nothing in the target overlaps the clip area, so nothing was written.
    NoFeaturesInClipArea,
    /// The target and the clip source are the same file.
    SameSource
}

/// Intersects every feature with the rectangle. Features outside it are kept, with an empty geometry.
pub(crate) fn clip_to_rectangle<Progress: ProgressObserver>(table: &SpatialFeatureTable, extent: &Extent, progress: &mut Progress) -> SpatialFeatureTable {
    let rectangle = MultiPolygon::new(vec![extent.create_polygon()]);
    let rows = table.rows().iter().watch(progress,"Clipping features to rectangle.","Features clipped.").map(|row| {
        match &row.geometry {
            Some(geometry) => row.with_geometry(geometry.intersection(&rectangle)),
            None => row.clone()
        }
    }).collect();
    let mut result = table.with_rows(rows);
    result.set_crs(table.crs().cloned());
    result
}

pub(crate) fn clip_rectangle_file<Progress: ProgressObserver>(input_path: &Path, extent: &Extent, output_path: &Path, progress: &mut Progress) -> Result<(),CommandError> {
    let table = read_spatial_table(input_path,progress)?;
    let clipped = clip_to_rectangle(&table,extent,progress);
    write_spatial_table(&clipped,output_path,progress)
}

/// Keeps the features intersecting any clip feature, cut down to the area they share with the clip features. Both
/// tables must be in the same CRS.
pub(crate) fn clip_to_area<Progress: ProgressObserver>(target: &SpatialFeatureTable, clip: &SpatialFeatureTable, progress: &mut Progress) -> SpatialFeatureTable {
    progress.start_unknown_endpoint(|| "Merging clip area.");
    let area = unary_union(clip.rows().iter().filter_map(|row| row.geometry.as_ref()));
    progress.finish(|| "Clip area merged.");

    let mut rows = Vec::new();
    for row in target.rows().iter().watch(progress,"Clipping features.","Features clipped.") {
        if let Some(geometry) = &row.geometry {
            if geometry.intersects(&area) {
                rows.push(row.with_geometry(geometry.intersection(&area)))
            }
        }
    }
    target.with_rows(rows)
}

// Brings the clip table into the target's CRS. geometries can't be compared if only one of them has a CRS.
fn align_clip_table(target: &SpatialFeatureTable, target_path: &Path, clip: SpatialFeatureTable, clip_path: &Path) -> Result<SpatialFeatureTable,CommandError> {
    match (target.crs(),clip.crs()) {
        (Some(target_crs),Some(clip_crs)) => if target_crs.is_same(clip_crs)? {
            Ok(clip)
        } else {
            reproject_table(&clip,target_crs,clip_path)
        },
        (Some(_),None) => Err(CommandError::MissingSpatialReference(clip_path.to_path_buf())),
        (None,Some(_)) => Err(CommandError::MissingSpatialReference(target_path.to_path_buf())),
        (None,None) => Ok(clip)
    }
}

/**
Clips the features of `target_path` to the area covered by the features of `clip_path`. The clip features are
reprojected to the target's CRS if needed. Without an `output_path` the result goes to `clipped/<target name>.shp`.
*/
pub(crate) fn clip<Progress: ProgressObserver>(target_path: &Path, clip_path: &Path, output_path: Option<&Path>, progress: &mut Progress) -> Result<ClipOutcome,CommandError> {
    if same_file(target_path,clip_path) {
        progress.message(|| format!("{}: Clip source is the target itself, nothing to do.",target_path.display()));
        return Ok(ClipOutcome::SameSource)
    }

    let target = read_spatial_table(target_path,progress)?;
    let clip = read_spatial_table(clip_path,progress)?;
    let clip = align_clip_table(&target,target_path,clip,clip_path)?;

    let clipped = clip_to_area(&target,&clip,progress);
    if clipped.is_empty() {
        progress.message(|| format!("{}: No features in clip area",target_path.display()));
        return Ok(ClipOutcome::NoFeaturesInClipArea)
    }

    let output_path = if let Some(output_path) = output_path {
        output_path.to_path_buf()
    } else {
        let directory = Path::new(DEFAULT_CLIP_DIRECTORY);
        fs::create_dir_all(directory)?;
        sibling_path(directory,target_path,"shp")
    };
    write_spatial_table(&clipped,&output_path,progress)?;
    progress.announce(|| format!("{}: Clipping successful",target_path.display()));
    Ok(ClipOutcome::Written(output_path))
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use geo_types::Polygon;
    use geo_types::polygon;

    use super::ClipOutcome;
    use super::clip;
    use super::clip_to_area;
    use super::clip_to_rectangle;
    use crate::geometry::ArealGeometry;
    use crate::table::fields::AttributeValue;
    use crate::table::spatial::SpatialFeatureTable;
    use crate::table::spatial::SpatialRow;
    use crate::utils::extent::Extent;

    fn square(x: f64, y: f64, side: f64) -> Polygon {
        polygon![(x: x, y: y), (x: x + side, y: y), (x: x + side, y: y + side), (x: x, y: y + side), (x: x, y: y)]
    }

    fn table_of(polygons: Vec<Polygon>) -> SpatialFeatureTable {
        SpatialFeatureTable::new(None,vec!["id".to_owned()],polygons.into_iter().enumerate().map(|(i,polygon)| {
            SpatialRow::new(Some(ArealGeometry::Polygon(polygon)),vec![AttributeValue::Integer(i as i64)])
        }).collect())
    }

    fn area(row: &SpatialRow) -> f64 {
        row.geometry.as_ref().map_or(0.0, ArealGeometry::area)
    }

    #[test]
    fn test_rectangle_clip_keeps_rows_outside() {
        let table = table_of(vec![square(0.0,0.0,2.0),square(10.0,10.0,1.0)]);
        let result = clip_to_rectangle(&table,&Extent::new(1.0,1.0,5.0,5.0),&mut ());
        assert_eq!(result.len(),2);
        assert!((area(&result.rows()[0]) - 1.0).abs() < 1e-9);
        assert!(result.rows()[1].geometry.as_ref().is_some_and(ArealGeometry::is_empty));
        assert_eq!(result.rows()[1].values,vec![AttributeValue::Integer(1)]);
    }

    #[test]
    fn test_area_clip_uses_union_of_clip_features() {
        let target = table_of(vec![square(0.0,0.0,4.0),square(20.0,20.0,1.0),square(3.0,3.0,2.0)]);
        // two overlapping clip squares covering x and y from 1 to 4
        let clip_area = table_of(vec![square(1.0,1.0,2.0),square(2.0,2.0,2.0)]);
        let result = clip_to_area(&target,&clip_area,&mut ());
        assert_eq!(result.len(),2);
        assert_eq!(result.rows()[0].values,vec![AttributeValue::Integer(0)]);
        assert!((area(&result.rows()[0]) - 7.0).abs() < 1e-9);
        assert_eq!(result.rows()[1].values,vec![AttributeValue::Integer(2)]);
        assert!((area(&result.rows()[1]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_area_clip_is_empty() {
        let target = table_of(vec![square(0.0,0.0,1.0)]);
        let clip_area = table_of(vec![square(50.0,50.0,1.0)]);
        assert!(clip_to_area(&target,&clip_area,&mut ()).is_empty());
    }

    #[test]
    fn test_clip_with_itself_does_nothing() {
        // the guard applies before anything is read
        let outcome = clip(Path::new("missing/water.shp"),Path::new("missing/water.shp"),None,&mut ()).unwrap();
        assert_eq!(outcome,ClipOutcome::SameSource);
    }
}
