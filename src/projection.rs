use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FormatResult;
use std::path::Path;
use std::path::PathBuf;

use clap::Args;
use gdal::config::set_config_option;
use gdal::spatial_ref::AxisMappingStrategy;
use gdal::spatial_ref::CoordTransform;
use gdal::spatial_ref::SpatialRef;
use geo_types::Coord;

use crate::errors::CommandError;
use crate::geometry::ArealGeometry;
use crate::table::spatial::SpatialFeatureTable;
use crate::table::spatial::SpatialRow;

/// Settings needed by operations that transform coordinates. These are passed explicitly instead of relying on
/// environment defaults.
#[derive(Clone,Debug,Default,Args)]
pub(crate) struct ProjectionSettings {
    #[arg(long,global = true)]
    /// Directory holding the PROJ database (proj.db), if the one found by GDAL is not wanted
    pub(crate) proj_data: Option<PathBuf>
}

impl ProjectionSettings {

    pub(crate) fn apply(&self) -> Result<(),CommandError> {
        if let Some(proj_data) = &self.proj_data {
            let proj_data = proj_data.to_string_lossy();
            set_config_option("PROJ_DATA", &proj_data)?;
            // older PROJ versions only know this name
            set_config_option("PROJ_LIB", &proj_data)?;
        }
        Ok(())
    }
}

/// A coordinate reference system, kept as WKT so tables stay cheap to clone.
#[derive(Clone,Debug)]
pub(crate) struct Crs {
    wkt: String,
    label: String
}

impl Crs {

    pub(crate) fn from_epsg(code: u32) -> Result<Self,CommandError> {
        Self::from_spatial_ref(&SpatialRef::from_epsg(code)?)
    }

    pub(crate) fn from_spatial_ref(srs: &SpatialRef) -> Result<Self,CommandError> {
        let label = match (srs.auth_name(),srs.auth_code()) {
            (Some(name),Ok(code)) => format!("{name}:{code}"),
            _ => srs.to_proj4().map_or_else(|_| "custom CRS".to_owned(), |proj| proj.trim().to_owned()),
        };
        Ok(Self {
            wkt: srs.to_wkt()?,
            label
        })
    }

    /// The spatial reference, always in traditional GIS axis order (x is easting or longitude).
    pub(crate) fn to_spatial_ref(&self) -> Result<SpatialRef,CommandError> {
        let mut srs = SpatialRef::from_wkt(&self.wkt)?;
        srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
        Ok(srs)
    }

    pub(crate) fn is_same(&self, other: &Self) -> Result<bool,CommandError> {
        Ok(self.to_spatial_ref()? == other.to_spatial_ref()?)
    }

}

impl Display for Crs {

    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f,"{}",self.label)
    }
}

pub(crate) struct Reprojector {
    transform: CoordTransform,
    target: Crs
}

impl Reprojector {

    pub(crate) fn new(source: &Crs, target: &Crs) -> Result<Self,CommandError> {
        let transform = CoordTransform::new(&source.to_spatial_ref()?,&target.to_spatial_ref()?)?;
        Ok(Self {
            transform,
            target: target.clone()
        })
    }

    pub(crate) const fn target(&self) -> &Crs {
        &self.target
    }

    pub(crate) fn coord(&self, coord: Coord) -> Result<Coord,CommandError> {
        let mut x = [coord.x];
        let mut y = [coord.y];
        self.transform.transform_coords(&mut x, &mut y, &mut [])?;
        Ok(Coord { x: x[0], y: y[0] })
    }

    pub(crate) fn geometry(&self, geometry: &ArealGeometry) -> Result<ArealGeometry,CommandError> {
        geometry.try_map_coords(|coord| self.coord(coord))
    }

    pub(crate) fn table(&self, table: &SpatialFeatureTable) -> Result<SpatialFeatureTable,CommandError> {
        let mut rows = Vec::with_capacity(table.len());
        for row in table.rows() {
            let geometry = row.geometry.as_ref().map(|geometry| self.geometry(geometry)).transpose()?;
            rows.push(SpatialRow::new(geometry,row.values.clone()));
        }
        let mut result = table.with_rows(rows);
        result.set_crs(Some(self.target.clone()));
        Ok(result)
    }

}

/// Reprojects `table` into `target` unless it is already there.
pub(crate) fn reproject_table(table: &SpatialFeatureTable, target: &Crs, source_path: &Path) -> Result<SpatialFeatureTable,CommandError> {
    let source = table.crs().ok_or_else(|| CommandError::MissingSpatialReference(source_path.to_path_buf()))?;
    if source.is_same(target)? {
        let mut result = table.clone();
        result.set_crs(Some(target.clone()));
        Ok(result)
    } else {
        Reprojector::new(source,target)?.table(table)
    }
}
