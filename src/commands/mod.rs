//! CLI command implementations
//!
//! This module contains the export commands supported by the CLI
//! application using the Command pattern.

pub mod command_traits;
pub mod raw_export_command;
pub mod nrrd_export_command;

pub use command_traits::{Command, CommandFactory};
pub use raw_export_command::RawExportCommand;
pub use nrrd_export_command::NrrdExportCommand;

use clap::ArgMatches;
use crate::tiff::errors::TiffResult;

/// Factory for creating command instances based on CLI arguments
///
/// A header path selects the NRRD export; without one only the raw
/// volume is written.
#[derive(Default)]
pub struct TiffrawCommandFactory;

impl TiffrawCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        TiffrawCommandFactory
    }
}

impl CommandFactory for TiffrawCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> TiffResult<Box<dyn Command>> {
        if args.get_one::<String>("header").is_some() {
            Ok(Box::new(NrrdExportCommand::new(args)?))
        } else {
            Ok(Box::new(RawExportCommand::new(args)?))
        }
    }
}
