use std::fs::File;
use std::io::BufWriter;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use geo_types::Coord;
use serde::Serialize;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

use crate::errors::CommandError;
use crate::progress::ProgressObserver;
use crate::progress::WatchableIterator as _;
use crate::projection::Crs;
use crate::projection::Reprojector;
use crate::projection::reproject_table;
use crate::table::fields::AttributeValue;
use crate::table::layers::read_spatial_table;
use crate::table::layers::write_spatial_table;
use crate::table::spatial::SpatialFeatureTable;
use crate::utils::umlauts::FoldUmlauts as _;

#[derive(Debug,Serialize)]
#[serde(tag = "type", rename = "Point")]
pub(crate) struct PointGeometry {
    pub(crate) coordinates: [f64; 2]
}

#[derive(Debug,Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub(crate) struct PointFeature {
    pub(crate) geometry: Option<PointGeometry>,
    pub(crate) properties: JsonMap<String,JsonValue>
}

#[derive(Debug,Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub(crate) struct PointFeatureCollection {
    pub(crate) features: Vec<PointFeature>
}

fn property_value(value: &AttributeValue) -> JsonValue {
    match value {
        AttributeValue::Text(text) => JsonValue::String(text.fold_umlauts()),
        other => other.to_json()
    }
}

/**
Builds one point feature per row, placed at the centroid of the row's geometry and passed through `transform`. Rows
without a geometry, or with an empty one, get a null geometry. Property names and text values have their umlauts
replaced. `columns` limits the properties written, all columns are written if it is `None`.
*/
pub(crate) fn point_features<Progress: ProgressObserver, Transform: Fn(Coord) -> Result<Coord,CommandError>>(table: &SpatialFeatureTable, columns: Option<&[String]>, transform: Transform, progress: &mut Progress) -> Result<PointFeatureCollection,CommandError> {
    let columns: Vec<(usize,String)> = match columns {
        Some(columns) => columns.iter().map(|column| Ok((table.column_index(column)?,column.fold_umlauts()))).collect::<Result<_,CommandError>>()?,
        None => table.columns().iter().enumerate().map(|(i,column)| (i,column.fold_umlauts())).collect(),
    };

    let mut features = Vec::with_capacity(table.len());
    for row in table.rows().iter().watch(progress,"Placing points.","Points placed.") {
        let centroid = row.geometry.as_ref().filter(|geometry| !geometry.is_empty()).and_then(|geometry| geometry.centroid());
        let geometry = match centroid {
            Some(point) => {
                let coord = transform(point.0)?;
                Some(PointGeometry {
                    coordinates: [coord.x,coord.y]
                })
            },
            None => None
        };

        let mut properties = JsonMap::new();
        for (column,name) in &columns {
            let value = row.values.get(*column).map_or(JsonValue::Null, property_value);
            _ = properties.insert(name.clone(),value);
        }

        features.push(PointFeature {
            geometry,
            properties
        })
    }

    Ok(PointFeatureCollection {
        features
    })
}

pub(crate) fn write_point_features(collection: &PointFeatureCollection, output_path: &Path) -> Result<(),CommandError> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer,collection)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes the features of a vector file as points in the target CRS, to a GeoJSON file.
pub(crate) fn export_points<Progress: ProgressObserver>(input_path: &Path, target: &Crs, output_path: &Path, columns: Option<&[String]>, progress: &mut Progress) -> Result<(),CommandError> {
    let table = read_spatial_table(input_path,progress)?;
    let source = table.crs().ok_or_else(|| CommandError::MissingSpatialReference(input_path.to_path_buf()))?;
    let reprojector = Reprojector::new(source,target)?;

    let collection = point_features(&table,columns,|coord| reprojector.coord(coord),progress)?;
    write_point_features(&collection,output_path)?;

    progress.announce(|| format!("Points reprojected from {source} to {} and written to {}.",reprojector.target(),output_path.display()));
    Ok(())
}

/// The file written when no output is given: the input path with a `.geojson` extension.
pub(crate) fn default_geojson_path(input_path: &Path) -> PathBuf {
    input_path.with_extension("geojson")
}

/// Reprojects all geometries of a vector file and writes them, in the format matching the output extension. Returns the
/// path written.
pub(crate) fn reproject_to_file<Progress: ProgressObserver>(input_path: &Path, output_path: Option<&Path>, target: &Crs, progress: &mut Progress) -> Result<PathBuf,CommandError> {
    let output_path = output_path.map_or_else(|| default_geojson_path(input_path), Path::to_path_buf);
    let table = read_spatial_table(input_path,progress)?;
    let table = reproject_table(&table,target,input_path)?;
    write_spatial_table(&table,&output_path,progress)?;
    progress.announce(|| format!("Data written to file {}.",output_path.display()));
    Ok(output_path)
}

#[cfg(test)]
mod test {
    use std::path::Path;
    use std::path::PathBuf;

    use geo_types::Coord;
    use geo_types::MultiPolygon;
    use geo_types::polygon;
    use serde_json::json;

    use super::default_geojson_path;
    use super::point_features;
    use crate::errors::CommandError;
    use crate::geometry::ArealGeometry;
    use crate::table::fields::AttributeValue;
    use crate::table::spatial::SpatialFeatureTable;
    use crate::table::spatial::SpatialRow;

    fn identity(coord: Coord) -> Result<Coord,CommandError> {
        Ok(coord)
    }

    fn table() -> SpatialFeatureTable {
        let square = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0), (x: 0.0, y: 0.0)];
        SpatialFeatureTable::new(None,vec!["Kylä".to_owned(),"väkiluku".to_owned()],vec![
            SpatialRow::new(Some(ArealGeometry::Polygon(square)),vec![AttributeValue::Text("Säkkijärvi".to_owned()),AttributeValue::Integer(1200)]),
            SpatialRow::new(None,vec![AttributeValue::Text("Kämärä".to_owned()),AttributeValue::Null]),
            SpatialRow::new(Some(ArealGeometry::MultiPolygon(MultiPolygon::new(Vec::new()))),vec![AttributeValue::Text("Öljy".to_owned()),AttributeValue::Real(1.5)]),
        ])
    }

    #[test]
    fn test_points_at_centroids_with_folded_text() {
        let collection = point_features(&table(),None,identity,&mut ()).unwrap();
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value,json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [1.0, 1.0] },
                    "properties": { "Kyla": "Sakkijarvi", "vakiluku": 1200 }
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": { "Kyla": "Kamara", "vakiluku": null }
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": { "Kyla": "oljy", "vakiluku": 1.5 }
                }
            ]
        }));
    }

    #[test]
    fn test_point_transform_and_column_filter() {
        let shift = |coord: Coord| -> Result<Coord,CommandError> { Ok(Coord { x: coord.x + 10.0, y: coord.y - 10.0 }) };
        let collection = point_features(&table(),Some(&["väkiluku".to_owned()][..]),shift,&mut ()).unwrap();
        let first = &collection.features[0];
        assert_eq!(first.geometry.as_ref().map(|point| point.coordinates),Some([11.0,-9.0]));
        assert_eq!(first.properties.keys().collect::<Vec<_>>(),vec!["vakiluku"]);
    }

    #[test]
    fn test_unknown_point_column() {
        let result = point_features(&table(),Some(&["nimi".to_owned()][..]),identity,&mut ());
        assert!(matches!(result,Err(CommandError::KeyNotFound { .. })));
    }

    #[test]
    fn test_default_geojson_path() {
        assert_eq!(default_geojson_path(Path::new("data/districts.shp")),PathBuf::from("data/districts.geojson"));
    }
}
