use geo::Area as _;

use crate::geometry::ArealGeometry;
use crate::progress::ProgressObserver;
use crate::progress::WatchableIterator as _;
use crate::table::spatial::SpatialFeatureTable;

/**
Splits every multipolygon row into one row per part, each carrying the attributes of the original row. Parts with an
area below `min_area` are dropped, so a multipolygon none of whose parts are big enough leaves no rows at all. Polygon
rows and rows without geometry are kept as they are.
*/
pub(crate) fn decompose<Progress: ProgressObserver>(table: &SpatialFeatureTable, min_area: f64, progress: &mut Progress) -> SpatialFeatureTable {
    let mut rows = Vec::with_capacity(table.len());

    for row in table.rows().iter().watch(progress,"Decomposing multipolygons.","Multipolygons decomposed.") {
        match &row.geometry {
            Some(ArealGeometry::MultiPolygon(multi)) => {
                for polygon in &multi.0 {
                    if polygon.unsigned_area() >= min_area {
                        rows.push(row.with_geometry(ArealGeometry::Polygon(polygon.clone())))
                    }
                }
            },
            Some(ArealGeometry::Polygon(_)) | None => rows.push(row.clone()),
        }
    }

    table.with_rows(rows)
}
