pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod note;
pub mod warnings;

pub use config::{ConvertConfig, ExportFormat, OutputLayout};
pub use convert::{convert, inspect, Conversion, ConversionStats, ExportSurvey};
pub use error::{FlomoError, Result};
pub use note::Note;
