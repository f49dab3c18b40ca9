/*!
Atlas tools are the data transformation steps behind a historical town atlas: joining population statistics onto
district maps, reprojecting and exporting them, decomposing and clipping vector data, and clamping elevation rasters.
*/

use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

use clap::Parser;

pub(crate) mod errors;
pub(crate) mod commands;
pub(crate) mod geometry;
pub(crate) mod projection;
pub(crate) mod table;
pub(crate) mod raster;
pub(crate) mod utils;
pub(crate) mod progress;
pub(crate) mod algorithms;

use commands::AtlasTools;
use commands::Task as _;
use errors::ProgramError;
use progress::ConsoleProgressBar;

/**
Runs the tools with arbitrary arguments. The first item in the arguments will be ignored. All output will be printed to Stdout or Stderr.
*/
fn run<Arg, Args>(args: Args) -> Result<(),ProgramError>
where
    Arg: Clone + Into<OsString>,
    Args: IntoIterator<Item = Arg>
{
    let mut progress = ConsoleProgressBar::new();
    let command = AtlasTools::try_parse_from(args)?;
    command.run(&mut progress)?;
    Ok(())
}

fn main() -> ExitCode {
    // errors are printed with Display, returning them from main would use Debug.
    match run(env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        // clap knows how to print help and version requests, and which of its errors are really errors
        Err(ProgramError::ArgumentError(err)) => err.exit(),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
