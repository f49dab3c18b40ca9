use std::fs;
use std::path::Path;
use std::path::PathBuf;

use gdal::Dataset;
use gdal::DriverManager;
use gdal::GeoTransform;
use gdal::raster::Buffer;
use gdal::raster::GdalDataType;
use gdal::raster::GdalType;
use gdal::spatial_ref::SpatialRef;

use crate::errors::CommandError;
use crate::errors::GdalError;

/// A cell type which the clamp can work on. Bounds are given as integers and saturate to the type's range.
pub(crate) trait RasterCell: GdalType + Copy + PartialOrd {

    fn from_bound(value: i32) -> Self;

}

macro_rules! impl_raster_cell_int {
    ($int: ty) => {
        impl RasterCell for $int {
            fn from_bound(value: i32) -> Self {
                <$int>::try_from(value).unwrap_or(if value < 0 {
                    <$int>::MIN
                } else {
                    <$int>::MAX
                })
            }
        }
    };
}

macro_rules! impl_raster_cell_float {
    ($float: ty) => {
        impl RasterCell for $float {
            fn from_bound(value: i32) -> Self {
                value as $float
            }
        }
    };
}

impl_raster_cell_int!(u8);

impl_raster_cell_int!(u16);

impl_raster_cell_int!(i16);

impl_raster_cell_int!(u32);

impl_raster_cell_int!(i32);

impl_raster_cell_float!(f32);

impl_raster_cell_float!(f64);

pub(crate) struct RasterBandBuffer<DataType: GdalType> {
    buffer: Buffer<DataType>,
    no_data: Option<f64>
}

impl<DataType: GdalType + Copy> RasterBandBuffer<DataType> {

    pub(crate) fn data_mut(&mut self) -> &mut [DataType] {
        self.buffer.data_mut()
    }

}

pub(crate) struct RasterMap {
    path: PathBuf,
    dataset: Dataset
}

impl RasterMap {

    pub(crate) fn open(path: &Path) -> Result<Self,CommandError> {
        let dataset = Dataset::open(path).map_err(|source| CommandError::RasterAccess {
            path: path.to_path_buf(),
            source
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            dataset
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn band_count(&self) -> usize {
        self.dataset.raster_count()
    }

    /// Width and height in cells.
    pub(crate) fn size(&self) -> (usize,usize) {
        self.dataset.raster_size()
    }

    /// The cell type of the first band, which is the type of the whole raster.
    pub(crate) fn band_type(&self) -> Result<GdalDataType,CommandError> {
        if self.band_count() == 0 {
            return Err(CommandError::RasterAccess {
                path: self.path.clone(),
                source: GdalError::BadArgument("raster has no bands".to_owned())
            })
        }
        Ok(self.dataset.rasterband(1)?.band_type()) // 1-based array
    }

    pub(crate) fn read_bands<DataType: GdalType + Copy>(&self) -> Result<Vec<RasterBandBuffer<DataType>>,CommandError> {
        let mut result = Vec::with_capacity(self.band_count());
        for index in 1..=self.band_count() {
            let band = self.dataset.rasterband(index)?;
            result.push(RasterBandBuffer {
                buffer: band.read_band_as::<DataType>()?,
                no_data: band.no_data_value()
            })
        }
        Ok(result)
    }

    pub(crate) fn geo_transform(&self) -> Option<GeoTransform> {
        self.dataset.geo_transform().ok()
    }

    pub(crate) fn spatial_ref(&self) -> Option<SpatialRef> {
        self.dataset.spatial_ref().ok()
    }

}

/// Georeferencing copied from the source raster to its output.
pub(crate) struct RasterPlacement {
    pub(crate) geo_transform: Option<GeoTransform>,
    pub(crate) spatial_ref: Option<SpatialRef>
}

fn write_bands<DataType: RasterCell>(mut dataset: Dataset, size: (usize,usize), placement: &RasterPlacement, bands: &mut [RasterBandBuffer<DataType>]) -> Result<(),CommandError> {
    let (width,height) = size;
    if let Some(geo_transform) = &placement.geo_transform {
        dataset.set_geo_transform(geo_transform)?;
    }
    if let Some(srs) = &placement.spatial_ref {
        dataset.set_spatial_ref(srs)?;
    }
    for (index,band) in bands.iter_mut().enumerate() {
        let mut output = dataset.rasterband(index + 1)?;
        output.set_no_data_value(band.no_data)?;
        output.write((0,0),(width,height),&mut band.buffer)?;
    }
    Ok(())
}

fn write_raster<DataType: RasterCell>(driver_name: &str, path: &Path, size: (usize,usize), placement: &RasterPlacement, bands: &mut [RasterBandBuffer<DataType>]) -> Result<(),CommandError> {
    let driver = DriverManager::get_driver_by_name(driver_name)?;
    let (width,height) = size;
    // a file that could not be created is not ours to remove
    let dataset = driver.create_with_band_type::<DataType,_>(path,width,height,bands.len()).map_err(|source| CommandError::RasterAccess {
        path: path.to_path_buf(),
        source
    })?;
    let result = write_bands(dataset,size,placement,bands);
    if result.is_err() && path.exists() {
        // the dataset is already closed here
        _ = fs::remove_file(path);
    }
    result
}

/// Writes the bands to a new GeoTIFF, one output band per buffer. If writing fails after the file was created, the partial file is removed.
pub(crate) fn write_geotiff<DataType: RasterCell>(path: &Path, size: (usize,usize), placement: &RasterPlacement, bands: &mut [RasterBandBuffer<DataType>]) -> Result<(),CommandError> {
    write_raster("GTiff",path,size,placement,bands)
}

#[cfg(test)]
mod test {
    use std::fs;

    use gdal::raster::Buffer;
    use tempfile::TempDir;

    use super::RasterBandBuffer;
    use super::RasterCell as _;
    use super::RasterPlacement;
    use super::write_raster;
    use crate::errors::CommandError;

    #[test]
    fn test_bounds_saturate_to_cell_type() {
        assert_eq!(u8::from_bound(-32767),0);
        assert_eq!(u8::from_bound(32768),255);
        assert_eq!(i16::from_bound(32768),i16::MAX);
        assert_eq!(i16::from_bound(-32767),-32767);
        assert_eq!(u16::from_bound(32768),32768);
        assert!((f32::from_bound(-100) + 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_failed_create_keeps_existing_file() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("elevation.png");
        fs::write(&path,b"not written by this run").unwrap();

        let placement = RasterPlacement {
            geo_transform: None,
            spatial_ref: None
        };
        let mut bands = vec![RasterBandBuffer {
            buffer: Buffer::new((2,2),vec![1_u8,2,3,4]),
            no_data: None
        }];
        // the png driver can only copy datasets, so create fails before anything is written
        let result = write_raster("PNG",&path,(2,2),&placement,&mut bands);

        assert!(matches!(result,Err(CommandError::RasterAccess { path: failed, .. }) if failed == path));
        assert_eq!(fs::read(&path).unwrap(),b"not written by this run");
    }
}
