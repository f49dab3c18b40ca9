use std::path::PathBuf;

use clap::Args;

use super::Task;
use crate::algorithms::coordinates::extract_xy;
use crate::algorithms::coordinates::write_ring_coordinates;
use crate::algorithms::decompose::decompose;
use crate::errors::CommandError;
use crate::progress::ProgressObserver;
use crate::subcommand_def;
use crate::table::layers::read_spatial_table;
use crate::table::layers::write_spatial_table;

subcommand_def!{
    /// Splits multipolygon features into one feature per polygon
    pub(crate) struct Decompose {

        /// The vector file to read
        input: PathBuf,

        /// The vector file to write, the format is chosen by extension (shp, geojson, gpkg)
        output: PathBuf,

        #[arg(long,default_value="0")]
        /// Multipolygon parts with a smaller area, in units of the data's CRS, are dropped. Polygon features are always kept.
        min_area: f64,

    }
}

impl Task for Decompose {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {

        let table = read_spatial_table(&self.input,progress)?;

        let decomposed = decompose(&table,self.min_area,progress);

        progress.announce(|| format!("{} features decomposed into {} polygons.",table.len(),decomposed.len()));

        write_spatial_table(&decomposed,&self.output,progress)

    }
}

subcommand_def!{
    /// Writes the exterior ring coordinates of polygon features to a JSON file for plotting
    pub(crate) struct ExtractXy {

        /// The vector file to read, which must only contain polygons (see `decompose`)
        input: PathBuf,

        /// The JSON file to write
        output: PathBuf,

    }
}

impl Task for ExtractXy {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {

        let table = read_spatial_table(&self.input,progress)?;

        let rings = extract_xy(&table,progress)?;

        write_ring_coordinates(&table,&rings,&self.output)?;

        progress.announce(|| format!("Ring coordinates written to {}.",self.output.display()));

        Ok(())
    }
}
