use std::path::Path;

use gdal::Dataset;
use gdal::DatasetOptions;
use gdal::DriverManager;
use gdal::GdalOpenFlags;
use gdal::vector::LayerOptions;
use gdal::vector::Feature;
use gdal::vector::Layer;
use gdal::vector::LayerAccess;
use gdal::vector::OGRFieldType;
use gdal::vector::OGRwkbGeometryType;

use crate::errors::CommandError;
use crate::geometry::ArealGeometry;
use crate::progress::ProgressObserver;
use crate::progress::WatchableIterator as _;
use crate::projection::Crs;
use crate::table::attributes::AttributeTable;
use crate::table::fields::AttributeValue;
use crate::table::fields::FieldKind;
use crate::table::spatial::SpatialFeatureTable;
use crate::table::spatial::SpatialRow;

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|extension| extension.to_string_lossy().to_lowercase())
}

/// The kinds of files statistics tables can be loaded from.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub(crate) enum TableFormat {
    Csv,
    Spreadsheet
}

impl TableFormat {

    pub(crate) fn from_path(path: &Path) -> Result<Self,CommandError> {
        match extension(path).as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xls" | "xlsx") => Ok(Self::Spreadsheet),
            _ => Err(CommandError::UnsupportedFormat(path.to_path_buf()))
        }
    }

    const fn open_options(self) -> &'static [&'static str] {
        match self {
            // without this, every csv column is text
            Self::Csv => &["AUTODETECT_TYPE=YES"],
            Self::Spreadsheet => &["HEADERS=FORCE"],
        }
    }
}

/// Returns the name of the gdal driver used to write a vector file with this path.
pub(crate) fn vector_driver_name(path: &Path) -> Result<&'static str,CommandError> {
    match extension(path).as_deref() {
        Some("shp") => Ok("ESRI Shapefile"),
        Some("geojson" | "json") => Ok("GeoJSON"),
        Some("gpkg") => Ok("GPKG"),
        _ => Err(CommandError::UnsupportedFormat(path.to_path_buf()))
    }
}

fn field_names(layer: &Layer) -> Vec<String> {
    layer.defn().fields().map(|field| field.name()).collect()
}

fn first_layer<'dataset>(dataset: &'dataset Dataset, path: &Path) -> Result<Layer<'dataset>,CommandError> {
    if dataset.layer_count() == 0 {
        Err(CommandError::MissingLayer(path.to_path_buf()))
    } else {
        Ok(dataset.layer(0)?)
    }
}

// Sheets are looked up by name first, since sheets are often named after years.
fn find_sheet<'dataset>(dataset: &'dataset Dataset, path: &Path, sheet: &str) -> Result<Layer<'dataset>,CommandError> {
    if let Ok(layer) = dataset.layer_by_name(sheet) {
        return Ok(layer)
    }
    match sheet.parse::<usize>() {
        Ok(index) if index < dataset.layer_count() => Ok(dataset.layer(index)?),
        _ => Err(CommandError::MissingSheet {
            path: path.to_path_buf(),
            sheet: sheet.to_owned()
        })
    }
}

pub(crate) fn read_spatial_table<Progress: ProgressObserver>(path: &Path, progress: &mut Progress) -> Result<SpatialFeatureTable,CommandError> {
    let dataset = Dataset::open(path)?;
    let mut layer = first_layer(&dataset,path)?;
    let crs = layer.spatial_ref().map(|srs| Crs::from_spatial_ref(&srs)).transpose()?;
    let columns = field_names(&layer);

    let mut rows = Vec::new();
    for (i,feature) in layer.features().watch(progress,format!("Reading {}.",path.display()),"Features read.").enumerate() {
        let geometry = feature.geometry().map(|geometry| ArealGeometry::try_from_gdal(geometry,i)).transpose()?;
        let values = feature.fields().map(|(_,value)| AttributeValue::from(value)).collect();
        rows.push(SpatialRow::new(geometry,values));
    }

    Ok(SpatialFeatureTable::new(crs,columns,rows))
}

/// Reads a statistics table. `sheet` selects a worksheet by name or zero-based index, the first one is used by default.
pub(crate) fn read_attribute_table<Progress: ProgressObserver>(path: &Path, sheet: Option<&str>, progress: &mut Progress) -> Result<AttributeTable,CommandError> {
    // checked before opening anything
    let format = TableFormat::from_path(path)?;

    let dataset = Dataset::open_ex(path, DatasetOptions {
        open_flags: GdalOpenFlags::GDAL_OF_VECTOR,
        open_options: Some(format.open_options()),
        ..Default::default()
    })?;

    let mut layer = match (format,sheet) {
        (TableFormat::Spreadsheet,Some(sheet)) => find_sheet(&dataset,path,sheet)?,
        (TableFormat::Csv,Some(sheet)) => {
            progress.warning(|| format!("{} is not a spreadsheet, sheet '{sheet}' is ignored.",path.display()));
            first_layer(&dataset,path)?
        },
        (_,None) => first_layer(&dataset,path)?
    };
    let columns = field_names(&layer);

    let mut rows = Vec::new();
    for feature in layer.features().watch(progress,format!("Reading {}.",path.display()),"Table read.") {
        rows.push(feature.fields().map(|(_,value)| AttributeValue::from(value)).collect());
    }

    Ok(AttributeTable::new(columns,rows))
}

fn set_field(feature: &mut Feature, index: usize, value: &AttributeValue, kind: FieldKind) -> Result<(),CommandError> {
    match (value,kind) {
        // a field that is never set is stored as null
        (AttributeValue::Null,_) => (),
        (AttributeValue::Integer(value),FieldKind::Integer) => feature.set_field_integer64(index,*value)?,
        (AttributeValue::Integer(value),FieldKind::Real) => feature.set_field_double(index,*value as f64)?,
        (AttributeValue::Real(value),FieldKind::Real | FieldKind::Integer) => feature.set_field_double(index,*value)?,
        (AttributeValue::Text(value),_) => feature.set_field_string(index,value)?,
        (other,FieldKind::Text) => feature.set_field_string(index,&other.to_string())?,
    }
    Ok(())
}

/// Writes the table to a new file, the format is chosen from the extension. An existing file is replaced.
pub(crate) fn write_spatial_table<Progress: ProgressObserver>(table: &SpatialFeatureTable, path: &Path, progress: &mut Progress) -> Result<(),CommandError> {
    let driver = DriverManager::get_driver_by_name(vector_driver_name(path)?)?;
    let srs = table.crs().map(Crs::to_spatial_ref).transpose()?;

    let kinds: Vec<FieldKind> = (0..table.columns().len()).map(|column| {
        FieldKind::infer(table.rows().iter().filter_map(|row| row.values.get(column)))
    }).collect();

    let geometry_type = if table.rows().iter().any(|row| matches!(row.geometry,Some(ArealGeometry::MultiPolygon(_)))) {
        OGRwkbGeometryType::wkbMultiPolygon
    } else {
        OGRwkbGeometryType::wkbPolygon
    };

    let layer_name = path.file_stem().map_or_else(|| "features".to_owned(), |stem| stem.to_string_lossy().into_owned());

    if path.exists() {
        driver.delete(path)?;
    }
    let mut dataset = driver.create_vector_only(path)?;
    let layer = dataset.create_layer(LayerOptions {
        name: &layer_name,
        srs: srs.as_ref(),
        ty: geometry_type,
        ..Default::default()
    })?;

    let field_defs: Vec<(&str,OGRFieldType::Type)> = table.columns().iter().zip(&kinds).map(|(name,kind)| (name.as_str(),kind.storage_type())).collect();
    layer.create_defn_fields(&field_defs)?;

    for row in table.rows().iter().watch(progress,"Writing features.",format!("Features written to {}.",path.display())) {
        let mut feature = Feature::new(layer.defn())?;
        if let Some(geometry) = &row.geometry {
            feature.set_geometry(geometry.to_gdal()?)?;
        }
        for (index,(value,kind)) in row.values.iter().zip(&kinds).enumerate() {
            set_field(&mut feature,index,value,*kind)?;
        }
        feature.create(&layer)?;
    }

    Ok(())
}
