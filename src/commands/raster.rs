use std::path::PathBuf;

use clap::Args;

use super::Task;
use crate::algorithms::clamp::ClampRange;
use crate::algorithms::clamp::clamp_raster;
use crate::errors::CommandError;
use crate::progress::ProgressObserver;
use crate::subcommand_def;

subcommand_def!{
    /// Clamps raster cell values to a range, writing a GeoTIFF
    pub(crate) struct ClampRaster {

        /// The raster to read
        input: PathBuf,

        /// The GeoTIFF to write
        output: PathBuf,

        #[arg(long,default_value="-32767",allow_hyphen_values=true)]
        /// Cells below this become this value. Values outside -32767..=32768 mean the default.
        min: i64,

        #[arg(long,default_value="32768",allow_hyphen_values=true)]
        /// Cells above this become this value. Values outside -32767..=32768 mean the default.
        max: i64,

    }
}

impl Task for ClampRaster {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {

        let range = ClampRange::new(self.min,self.max);

        clamp_raster(&self.input,&self.output,range,progress)

    }
}
