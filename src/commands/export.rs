use std::path::PathBuf;

use clap::Args;

use super::Task;
use crate::algorithms::export::export_points;
use crate::algorithms::export::reproject_to_file;
use crate::errors::CommandError;
use crate::progress::ProgressObserver;
use crate::projection::Crs;
use crate::subcommand_def;

subcommand_def!{
    /// Writes one point per feature, at its centroid, to a GeoJSON file in another CRS
    pub(crate) struct ExportPoints {

        /// The vector file to read, which must have a CRS
        input: PathBuf,

        /// The GeoJSON file to write
        output: PathBuf,

        #[arg(long,default_value="4326")]
        /// The EPSG code of the output CRS
        epsg: u32,

        #[arg(long,value_delimiter=',')]
        /// The columns to write as properties, separated by commas. All columns are written by default.
        columns: Option<Vec<String>>,

    }
}

impl Task for ExportPoints {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {

        let target = Crs::from_epsg(self.epsg)?;

        export_points(&self.input,&target,&self.output,self.columns.as_deref(),progress)

    }
}

subcommand_def!{
    /// Reprojects a vector file and writes it, as GeoJSON unless another output is given
    pub(crate) struct ToGeojson {

        /// The vector file to read, which must have a CRS
        input: PathBuf,

        #[arg(long)]
        /// The file to write, the format is chosen by extension. Defaults to the input with a `.geojson` extension.
        output: Option<PathBuf>,

        #[arg(long,default_value="4326")]
        /// The EPSG code of the output CRS
        epsg: u32,

    }
}

impl Task for ToGeojson {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {

        let target = Crs::from_epsg(self.epsg)?;

        _ = reproject_to_file(&self.input,self.output.as_deref(),&target,progress)?;

        Ok(())
    }
}
