use std::path::Path;

use gdal::raster::GdalDataType;

use crate::errors::CommandError;
use crate::progress::ProgressObserver;
use crate::progress::WatchableIterator as _;
use crate::raster::RasterCell;
use crate::raster::RasterMap;
use crate::raster::RasterPlacement;
use crate::raster::write_geotiff;

pub(crate) const DEFAULT_MIN: i32 = -32767;
pub(crate) const DEFAULT_MAX: i32 = 32768;

/// Inclusive bounds for raster cell values. Bounds outside `DEFAULT_MIN..=DEFAULT_MAX` are replaced with the default for
/// that side.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub(crate) struct ClampRange {
    min: i32,
    max: i32
}

impl Default for ClampRange {

    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX
        }
    }
}

impl ClampRange {

    fn admissible(value: i64, default: i32) -> i32 {
        i32::try_from(value).ok().filter(|value| (DEFAULT_MIN..=DEFAULT_MAX).contains(value)).unwrap_or(default)
    }

    pub(crate) fn new(min: i64, max: i64) -> Self {
        Self {
            min: Self::admissible(min,DEFAULT_MIN),
            max: Self::admissible(max,DEFAULT_MAX)
        }
    }

    pub(crate) const fn min(&self) -> i32 {
        self.min
    }

    pub(crate) const fn max(&self) -> i32 {
        self.max
    }

}

/// Cells above the maximum become the maximum, otherwise cells below the minimum become the minimum. If the bounds are
/// reversed, the maximum wins. Cells on a bound, and NaN cells, are left alone.
pub(crate) fn clamp_cells<DataType: RasterCell>(cells: &mut [DataType], range: ClampRange) {
    let min = DataType::from_bound(range.min);
    let max = DataType::from_bound(range.max);
    for cell in cells {
        if *cell > max {
            *cell = max
        } else if *cell < min {
            *cell = min
        }
    }
}

fn clamp_typed_raster<DataType: RasterCell, Progress: ProgressObserver>(raster: &RasterMap, output_path: &Path, range: ClampRange, progress: &mut Progress) -> Result<(),CommandError> {
    let mut bands = raster.read_bands::<DataType>()?;
    for band in bands.iter_mut().watch(progress,"Clamping bands.","Bands clamped.") {
        clamp_cells(band.data_mut(),range)
    }

    let placement = RasterPlacement {
        geo_transform: raster.geo_transform(),
        spatial_ref: raster.spatial_ref()
    };
    write_geotiff(output_path,raster.size(),&placement,&mut bands)
}

/// Clamps every cell of every band and writes the result as a GeoTIFF with the same size, cell type and georeferencing.
pub(crate) fn clamp_raster<Progress: ProgressObserver>(input_path: &Path, output_path: &Path, range: ClampRange, progress: &mut Progress) -> Result<(),CommandError> {
    let raster = RasterMap::open(input_path)?;

    match raster.band_type()? {
        GdalDataType::UInt8 => clamp_typed_raster::<u8,_>(&raster,output_path,range,progress)?,
        GdalDataType::UInt16 => clamp_typed_raster::<u16,_>(&raster,output_path,range,progress)?,
        GdalDataType::Int16 => clamp_typed_raster::<i16,_>(&raster,output_path,range,progress)?,
        GdalDataType::UInt32 => clamp_typed_raster::<u32,_>(&raster,output_path,range,progress)?,
        GdalDataType::Int32 => clamp_typed_raster::<i32,_>(&raster,output_path,range,progress)?,
        GdalDataType::Float32 => clamp_typed_raster::<f32,_>(&raster,output_path,range,progress)?,
        GdalDataType::Float64 => clamp_typed_raster::<f64,_>(&raster,output_path,range,progress)?,
        other => return Err(CommandError::UnsupportedRasterSourceBand(other))
    }

    progress.announce(|| format!("{} clamped to {}..={}, written to {}.",raster.path().display(),range.min(),range.max(),output_path.display()));
    Ok(())
}
