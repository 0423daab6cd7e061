use std::path::PathBuf;

use clap::Parser;
use log::info;
use readson::batch::{BatchConfig, run};

/// readson turns JSON files into readable documents, one per record, using a
/// template.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON input: a file, a directory ending in '/', or a glob, optionally
    /// followed by an access pattern such as '->people' or '[0]'.
    input: String,

    /// File path to the template.
    #[arg(short, long, value_name = "TEMPLATE")]
    templ: PathBuf,

    /// Name each output after a record field, e.g. 'out/user->id'.
    #[arg(short = 'p', long, value_name = "PATTERN", conflicts_with = "output")]
    name: Option<String>,

    /// Write every document into a single file.
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Lua file defining the functions templates may call.
    #[arg(short, long, value_name = "SCRIPT")]
    functions: Option<PathBuf>,

    /// Log records that fail to render and carry on with the rest.
    #[arg(long)]
    skip_errors: bool,

    /// Print evaluation logs.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = BatchConfig { input:        args.input,
                               template:     args.templ,
                               name_pattern: args.name,
                               output:       args.output,
                               functions:    args.functions,
                               skip_errors:  args.skip_errors, };

    match run(&config) {
        Ok(report) => {
            info!("{} document(s) rendered, {} skipped, {} file(s) written",
                  report.rendered,
                  report.skipped,
                  report.written.len());
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
