use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;

pub(crate) use gdal::errors::GdalError;
use gdal::raster::GdalDataType;

pub(crate) use clap::error::Error as ArgumentError;

#[derive(Debug)]
pub(crate) enum CommandError {
    GdalError(GdalError),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    KeyNotFound {
        column: String,
        table: String
    },
    UnsupportedFormat(PathBuf),
    MissingSheet {
        path: PathBuf,
        sheet: String
    },
    MissingLayer(PathBuf),
    OverlappingColumns(String),
    IncorrectGeometryType {
        row: usize,
        expected: &'static str,
        found: String
    },
    MissingGeometry(usize),
    MissingSpatialReference(PathBuf),
    RasterAccess {
        path: PathBuf,
        source: GdalError
    },
    UnsupportedRasterSourceBand(GdalDataType),
    InvalidRangeArgument(String,String),
}

impl Error for CommandError {

    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::GdalError(a) | Self::RasterAccess { source: a, .. } => Some(a),
            Self::IoError(a) => Some(a),
            Self::JsonError(a) => Some(a),
            Self::KeyNotFound { .. } |
            Self::UnsupportedFormat(_) |
            Self::MissingSheet { .. } |
            Self::MissingLayer(_) |
            Self::OverlappingColumns(_) |
            Self::IncorrectGeometryType { .. } |
            Self::MissingGeometry(_) |
            Self::MissingSpatialReference(_) |
            Self::UnsupportedRasterSourceBand(_) |
            Self::InvalidRangeArgument(..) => None,
        }
    }

}

impl Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GdalError(a) => write!(f,"gdal: {a}"),
            Self::IoError(a) => write!(f,"io: {a}"),
            Self::JsonError(a) => write!(f,"json: {a}"),
            Self::KeyNotFound { column, table } => write!(f,"Column '{column}' not found in {table}."),
            Self::UnsupportedFormat(a) => write!(f,"File '{}' is not in a supported format.",a.display()),
            Self::MissingSheet { path, sheet } => write!(f,"Sheet '{sheet}' not found in '{}'.",path.display()),
            Self::MissingLayer(a) => write!(f,"'{}' contains no data layers.",a.display()),
            Self::OverlappingColumns(a) => write!(f,"Column '{a}' exists in both tables, rename it before joining."),
            Self::IncorrectGeometryType { row, expected, found } => write!(f,"Row {row} has a {found} geometry, expected {expected}."),
            Self::MissingGeometry(a) => write!(f,"Row {a} has no geometry."),
            Self::MissingSpatialReference(a) => write!(f,"'{}' has no spatial reference, is the projection file missing?",a.display()),
            Self::RasterAccess { path, source } => write!(f,"Could not access raster '{}': {source}",path.display()),
            Self::UnsupportedRasterSourceBand(a) => write!(f,"raster source band type ({a:?}) is not supported"),
            Self::InvalidRangeArgument(a, b) => write!(f,"Invalid range expression '{a}' ({b})."),
        }
    }
}

impl From<GdalError> for CommandError {

    fn from(value: GdalError) -> Self {
        Self::GdalError(value)
    }
}

impl From<std::io::Error> for CommandError {

    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}

impl From<serde_json::Error> for CommandError {

    fn from(value: serde_json::Error) -> Self {
        Self::JsonError(value)
    }
}

#[derive(Debug)]
pub(crate) enum ProgramError {
    ArgumentError(ArgumentError),
    CommandError(CommandError)
}

impl Error for ProgramError {

}

impl Display for ProgramError {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArgumentError(a) => write!(f,"{a}"),
            Self::CommandError(a) => write!(f,"{a}"),
        }
    }
}

impl From<ArgumentError> for ProgramError {

    fn from(value: ArgumentError) -> Self {
        Self::ArgumentError(value)
    }
}

impl From<CommandError> for ProgramError {

    fn from(value: CommandError) -> Self {
        Self::CommandError(value)
    }
}
