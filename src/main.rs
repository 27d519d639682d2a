//! template-machine's application entry point.
//! Handles command-line argument parsing, output directory housekeeping and
//! hands the project over to the template machine.

use chrono::Local;
use template_machine::{
    cli::{get_args, Args},
    config::{find_base_config, load_base_config},
    context::{Context, ContextOptions},
    encoding::TextEncoding,
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    machine::TemplateMachine,
    output::{default_output_dir, prepare_output_dir},
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves encodings, base configuration and generation scope
/// 2. Builds the root context (validates the project layout)
/// 3. Moves an existing output directory aside when forced
/// 4. Generates the whole tree and prints the run statistics
fn run(args: Args) -> Result<()> {
    let generation_time = Local::now().naive_local();
    let read_encoding = TextEncoding::from_label(&args.read_encoding)?;
    let write_encoding = TextEncoding::from_label(&args.write_encoding)?;

    let output_root = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.template_dir, generation_time));

    let config_file = find_base_config(&args.template_dir, args.config.as_deref())?;
    let config = load_base_config(config_file.as_deref(), read_encoding)?;

    let mut options = ContextOptions::new(&args.template_dir, &output_root)
        .config(config)
        .read_encoding(read_encoding)
        .write_encoding(write_encoding)
        .generation_time(generation_time);
    if let Some(sub_dir) = &args.sub_dir {
        options = options.scope(args.template_dir.join(sub_dir));
    }
    if let Some(config_file) = config_file {
        options = options.ignore_file(config_file);
    }

    let root = Context::root(options)?;
    prepare_output_dir(&output_root, args.force)?;

    let renderer = MiniJinjaRenderer::new();
    let stats = TemplateMachine::new(&renderer).generate(&root)?;

    if args.json {
        let summary = serde_json::to_string_pretty(&stats).map_err(|e| Error::IoError(e.into()))?;
        println!("{summary}");
    } else {
        println!("Generated {stats}.");
    }
    Ok(())
}
