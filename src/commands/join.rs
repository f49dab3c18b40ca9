use std::path::PathBuf;

use clap::Args;

use super::Task;
use crate::algorithms::join::JoinSettings;
use crate::algorithms::join::combine_files;
use crate::algorithms::shares::add_share_columns;
use crate::algorithms::shares::fill_nulls;
use crate::algorithms::shares::retain_positive;
use crate::errors::CommandError;
use crate::progress::ProgressObserver;
use crate::subcommand_def;
use crate::table::layers::read_spatial_table;
use crate::table::layers::write_spatial_table;

subcommand_def!{
    /// Joins a statistics table (csv, xls or xlsx) onto the features of a vector file
    pub(crate) struct Join {

        /// The vector file with the map features
        spatial: PathBuf,

        /// The statistics table
        attributes: PathBuf,

        /// The vector file to write, the format is chosen by extension (shp, geojson, gpkg)
        output: PathBuf,

        #[arg(long)]
        /// The worksheet to read from a spreadsheet, by name or zero-based index. The first sheet is read by default.
        sheet: Option<String>,

        #[command(flatten)]
        settings: JoinSettings,

    }
}

impl Task for Join {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {

        let joined = combine_files(&self.spatial,&self.attributes,self.sheet.as_deref(),&self.settings,progress)?;

        write_spatial_table(&joined,&self.output,progress)

    }
}

subcommand_def!{
    /// Adds percentage share columns (`<column>_pct`) relative to a total column
    pub(crate) struct Shares {

        /// The vector file to read
        input: PathBuf,

        /// The vector file to write
        output: PathBuf,

        #[arg(long,required=true,value_delimiter=',')]
        /// The columns to calculate shares for, separated by commas
        columns: Vec<String>,

        #[arg(long)]
        /// The column holding the total
        total: String,

        #[arg(long)]
        /// Drop features whose total is not greater than zero
        positive_only: bool,

        #[arg(long,allow_hyphen_values=true)]
        /// Replace empty values with this number after calculating
        fill_nulls: Option<f64>,

    }
}

impl Task for Shares {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {

        let mut table = read_spatial_table(&self.input,progress)?;

        add_share_columns(&mut table,&self.columns,&self.total)?;

        if self.positive_only {
            retain_positive(&mut table,&self.total)?;
        }

        if let Some(value) = self.fill_nulls {
            fill_nulls(&mut table,value)
        }

        write_spatial_table(&table,&self.output,progress)

    }
}
