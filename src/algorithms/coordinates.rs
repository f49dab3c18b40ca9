use std::fs::File;
use std::io::BufWriter;
use std::io::Write as _;
use std::path::Path;

use serde::Serialize;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

use crate::errors::CommandError;
use crate::geometry::ArealGeometry;
use crate::progress::ProgressObserver;
use crate::progress::WatchableIterator as _;
use crate::table::spatial::SpatialFeatureTable;

/// The exterior ring of a polygon as separate x and y sequences. The closing point is included, so the first and last
/// entries are equal.
#[derive(Clone,Debug,PartialEq,Serialize)]
pub(crate) struct RingCoordinates {
    pub(crate) xs: Vec<f64>,
    pub(crate) ys: Vec<f64>
}

pub(crate) fn extract_xy<Progress: ProgressObserver>(table: &SpatialFeatureTable, progress: &mut Progress) -> Result<Vec<RingCoordinates>,CommandError> {
    let mut result = Vec::with_capacity(table.len());
    for (i,row) in table.rows().iter().enumerate().watch(progress,"Extracting ring coordinates.","Ring coordinates extracted.") {
        match &row.geometry {
            Some(ArealGeometry::Polygon(polygon)) => {
                let (xs,ys) = polygon.exterior().coords().map(|coord| (coord.x,coord.y)).unzip();
                result.push(RingCoordinates { xs, ys })
            },
            Some(other) => return Err(CommandError::IncorrectGeometryType {
                row: i,
                expected: "Polygon",
                found: other.type_name().to_owned()
            }),
            None => return Err(CommandError::MissingGeometry(i))
        }
    }
    Ok(result)
}

#[derive(Serialize)]
struct PlotRow<'ring> {
    xs: &'ring [f64],
    ys: &'ring [f64],
    properties: JsonMap<String,JsonValue>
}

/// Writes a JSON array with one object per row, holding the ring coordinates and the row's attributes.
pub(crate) fn write_ring_coordinates(table: &SpatialFeatureTable, rings: &[RingCoordinates], output_path: &Path) -> Result<(),CommandError> {
    let plot_rows: Vec<PlotRow> = table.rows().iter().zip(rings).map(|(row,ring)| {
        let properties = table.columns().iter().zip(&row.values).map(|(name,value)| (name.clone(),value.to_json())).collect();
        PlotRow {
            xs: &ring.xs,
            ys: &ring.ys,
            properties
        }
    }).collect();

    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer,&plot_rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
