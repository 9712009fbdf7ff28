//! Raw volume export with a detached NRRD header

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::raw_export_command::RawExportCommand;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::volume;

/// Command for exporting a raw volume plus its NRRD header
pub struct NrrdExportCommand {
    /// The raw export this header describes
    raw_export: RawExportCommand,
    /// Path to the header file
    header_output: String,
}

impl NrrdExportCommand {
    /// Create a new NRRD export command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new NrrdExportCommand instance or an error
    pub fn new(args: &ArgMatches) -> TiffResult<Self> {
        let header_output = args.get_one::<String>("header")
            .ok_or_else(|| TiffError::GenericError("Missing header output file".to_string()))?
            .clone();

        Ok(NrrdExportCommand {
            raw_export: RawExportCommand::new(args)?,
            header_output,
        })
    }

    /// Create a command wrapping an existing raw export
    pub fn with_raw_export(raw_export: RawExportCommand, header_output: String) -> Self {
        NrrdExportCommand { raw_export, header_output }
    }
}

impl Command for NrrdExportCommand {
    fn execute(&self) -> TiffResult<()> {
        let descriptor = self.raw_export.export()?;

        volume::write_header(&descriptor, self.raw_export.raw_output(), &self.header_output)?;
        info!("Volume {}x{}x{} {} described by {}",
              descriptor.width, descriptor.height, descriptor.depth,
              descriptor.nrrd_type(), self.header_output);
        Ok(())
    }
}
