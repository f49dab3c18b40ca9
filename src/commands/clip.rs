use std::path::PathBuf;

use clap::Args;

use super::Task;
use crate::algorithms::clip::clip;
use crate::algorithms::clip::clip_rectangle_file;
use crate::errors::CommandError;
use crate::progress::ProgressObserver;
use crate::subcommand_def;
use crate::utils::arg_range::AxisRange;
use crate::utils::extent::Extent;

subcommand_def!{
    /// Clips features to a rectangle. Features outside it are kept with an empty geometry.
    pub(crate) struct ClipRectangle {

        /// The vector file to read
        input: PathBuf,

        /// The vector file to write, the format is chosen by extension (shp, geojson, gpkg)
        output: PathBuf,

        #[arg(long,allow_hyphen_values=true)]
        /// West and east edges of the rectangle, as `west..east`, in the data's CRS
        x_range: AxisRange,

        #[arg(long,allow_hyphen_values=true)]
        /// South and north edges of the rectangle, as `south..north`, in the data's CRS
        y_range: AxisRange,

    }
}

impl Task for ClipRectangle {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {

        let extent = Extent::from_ranges(self.x_range,self.y_range);

        clip_rectangle_file(&self.input,&extent,&self.output,progress)

    }
}

subcommand_def!{
    /// Clips features to the area covered by the features of another vector file
    pub(crate) struct Clip {

        /// The vector file to clip
        target: PathBuf,

        /// The vector file whose features make up the clip area
        clip_source: PathBuf,

        #[arg(long)]
        /// The file to write. Defaults to `clipped/<target name>.shp`.
        output: Option<PathBuf>,

    }
}

impl Task for Clip {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {

        // an empty clip, or a clip with itself, is reported but is not an error
        _ = clip(&self.target,&self.clip_source,self.output.as_deref(),progress)?;

        Ok(())
    }
}
