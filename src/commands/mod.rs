use clap::Parser;
use clap::Subcommand;

use crate::errors::CommandError;
use crate::progress::ProgressObserver;
use crate::projection::ProjectionSettings;

mod geometry;
mod join;
mod export;
mod clip;
mod raster;

use geometry::Decompose;
use geometry::ExtractXy;
use join::Join;
use join::Shares;
use export::ExportPoints;
use export::ToGeojson;
use clip::ClipRectangle;
use clip::Clip;
use raster::ClampRaster;

pub(crate) trait Task {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError>;

}

#[macro_export]
macro_rules! command_def {
    ($struct_name: ident {$($command_name: ident),*}) => {

        #[derive(Subcommand)]
        pub(crate) enum $struct_name {
            $(
                $command_name($command_name)
            ),*
        }

        impl Task for $struct_name {

            fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {
                match self {
                    $(Self::$command_name(a) => a.run(progress)),*
                }
            }

        }
    };
}

#[macro_export]
macro_rules! subcommand_def {
    ($(#[$attr: meta])* $visibility: vis struct $struct_name: ident {$($fields: tt)*}) => {

        #[derive(Args)]
        $(#[$attr])*
        $visibility struct $struct_name {
            $($fields)*
        }
    };
}

command_def!{
    MainCommand {
        Decompose,
        ExtractXy,
        Join,
        Shares,
        ExportPoints,
        ToGeojson,
        ClipRectangle,
        Clip,
        ClampRaster
    }
}

/// Data transformation tools for the town atlas: joins statistics onto district maps, reprojects, clips and
/// decomposes vector data, and clamps elevation rasters.
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(disable_help_subcommand(true))]
pub(crate) struct AtlasTools {

    #[command(flatten)]
    projection: ProjectionSettings,

    #[command(subcommand)]
    command: MainCommand

}

impl Task for AtlasTools {

    fn run<Progress: ProgressObserver>(self, progress: &mut Progress) -> Result<(),CommandError> {
        self.projection.apply()?;
        self.command.run(progress)
    }
}
