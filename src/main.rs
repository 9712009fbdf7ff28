use clap::{Arg, Command as ClapCommand, ArgAction};
use clap::error::ErrorKind;
use std::process;
use log::error;

use tiffraw::utils::logger::Logger;
use tiffraw::commands::{CommandFactory, TiffrawCommandFactory};

fn cli() -> ClapCommand {
    ClapCommand::new("tiffraw")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Maurice Schilpp")
        .about("Convert a multi-page TIFF stack into a raw volume and optional NRRD header")
        .arg(
            Arg::new("input")
                .help("Input TIFF stack")
                .value_name("INPUT")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Raw volume output file")
                .value_name("OUTPUT_RAW")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("header")
                .help("Detached NRRD header output file")
                .value_name("OUTPUT_HEADER")
                .required(false)
                .index(3),
        )
        .arg(
            Arg::new("dump-directory")
                .short('d')
                .long("dump-directory")
                .help("Print the first directory's tags to stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show a per-page progress bar")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also append diagnostics to this file")
                .value_name("FILE")
                .required(false),
        )
}

fn main() {
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    let log_file = matches.get_one::<String>("log-file").map(String::as_str);
    if let Err(e) = Logger::init_global_logger(matches.get_flag("verbose"), log_file) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = TiffrawCommandFactory::new();

    let command_result = factory.create_command(&matches);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn header_argument_is_optional() {
        let matches = cli().try_get_matches_from(["tiffraw", "in.tif", "out.raw"]).unwrap();
        assert!(matches.get_one::<String>("header").is_none());

        let matches = cli()
            .try_get_matches_from(["tiffraw", "-d", "in.tif", "out.raw", "out.nhdr"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("header").map(String::as_str), Some("out.nhdr"));
        assert!(matches.get_flag("dump-directory"));
    }

    #[test]
    fn wrong_argument_count_is_a_usage_error() {
        assert!(cli().try_get_matches_from(["tiffraw", "in.tif"]).is_err());
        assert!(cli().try_get_matches_from(["tiffraw", "a", "b", "c", "d"]).is_err());
    }
}
