//! Command-line interface implementation for the template machine.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure.
#[derive(Parser, Debug)]
#[command(author, version, about = "template-machine: generate multi-language documents from a template tree", long_about = None)]
pub struct Args {
    /// Project directory containing the templates
    #[arg(value_name = "TEMPLATE_DIR")]
    pub template_dir: PathBuf,

    /// Directory for the generated files (defaults to TEMPLATE_DIR-<timestamp>)
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Sub-directory of the project to generate; everything else is skipped
    #[arg(short, long, value_name = "SUB_DIR")]
    pub sub_dir: Option<PathBuf>,

    /// Base configuration file (defaults to TEMPLATE_DIR/template-machine.properties)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Move an existing output directory to <OUTPUT_DIR>.old instead of failing
    #[arg(short, long)]
    pub force: bool,

    /// Encoding of templates and localization files
    #[arg(short, long, default_value = "UTF-8")]
    pub read_encoding: String,

    /// Encoding of generated files
    #[arg(short, long, default_value = "UTF-8")]
    pub write_encoding: String,

    /// Print the run statistics as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
