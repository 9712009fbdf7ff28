//! Raw volume export command
//!
//! Opens a TIFF stack, works out its volume shape and copies every page's
//! scanlines into a headerless binary file.

use clap::ArgMatches;
use log::{debug, info};
use std::fs::File;
use std::io;

use crate::commands::command_traits::Command;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::TiffHandle;
use crate::volume::{self, ExportOptions, RawCopier, VolumeDescriptor};

/// Command for exporting a TIFF stack as a raw volume
pub struct RawExportCommand {
    /// Path to the input TIFF stack
    input_file: String,
    /// Path to the raw output file
    raw_output: String,
    /// Dump and progress switches
    options: ExportOptions,
}

impl RawExportCommand {
    /// Create a new raw export command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new RawExportCommand instance or an error
    pub fn new(args: &ArgMatches) -> TiffResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))?
            .clone();
        let raw_output = args.get_one::<String>("output")
            .ok_or_else(|| TiffError::GenericError("Missing raw output file".to_string()))?
            .clone();
        let options = ExportOptions::new(args.get_flag("dump-directory"), args.get_flag("progress"));

        debug!("Raw export {} -> {} ({:?})", input_file, raw_output, options);
        Ok(Self::with_options(input_file, raw_output, options))
    }

    /// Create a command from explicit paths and options
    pub fn with_options(input_file: String, raw_output: String, options: ExportOptions) -> Self {
        RawExportCommand { input_file, raw_output, options }
    }

    /// Path of the raw output file, as given
    pub fn raw_output(&self) -> &str {
        &self.raw_output
    }

    /// Runs the export and returns the volume it wrote
    ///
    /// The input handle is released before this returns, on success and
    /// on failure alike.
    pub fn export(&self) -> TiffResult<VolumeDescriptor> {
        let mut handle = TiffHandle::open(&self.input_file)?;
        info!("{} has {} directories", handle.name(), handle.directory_count());

        let probe = volume::probe_dimensions(&mut handle)?;
        let metadata = volume::read_sample_metadata(&mut handle)?;
        let descriptor = metadata.describe(&probe);
        volume::log_summary(&descriptor);

        if self.options.verbose_dump {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            handle.set_directory(0)?;
            handle.print_directory(&mut out)?;
        }

        let output = File::create(&self.raw_output)
            .map_err(|e| TiffError::output(&self.raw_output, e))?;
        RawCopier::new(&self.options).copy(&mut handle, &descriptor, output, &self.raw_output)?;

        Ok(descriptor)
    }
}

impl Command for RawExportCommand {
    fn execute(&self) -> TiffResult<()> {
        self.export().map(|_| ())
    }
}
