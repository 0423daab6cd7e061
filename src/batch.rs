/// Output naming.
///
/// Decides where each rendered document is written.
pub mod output;
/// Template preprocessing.
///
/// Expands `$$$ name value` macro definitions before parsing.
pub mod preprocess;
/// Input discovery.
///
/// Turns an input expression into files and the records inside them.
pub mod sources;

use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{
    access::json::JsonData,
    ast::Template,
    batch::{
        output::{OutputMode, named_path, record_path, single_path, template_extension},
        preprocess::expand_macros,
        sources::discover,
    },
    interpreter::evaluator::{
        core::{Context, Getter},
        function::script::ScriptEnvironment,
    },
    parse,
};

/// Everything a batch run needs, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Input expression: a file, directory or glob, optionally followed by
    /// an access pattern.
    pub input:        String,
    /// The template file.
    pub template:     PathBuf,
    /// `dir/field` naming pattern.
    pub name_pattern: Option<String>,
    /// Single output file, without extension.
    pub output:       Option<PathBuf>,
    /// Lua file with user functions.
    pub functions:    Option<PathBuf>,
    /// Log failing records and carry on instead of stopping.
    pub skip_errors:  bool,
}

/// What a batch run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files written, in order.
    pub written:  Vec<PathBuf>,
    /// Number of records that failed and were skipped.
    pub skipped:  usize,
    /// Number of records rendered.
    pub rendered: usize,
}

/// Renders every record selected by the configuration.
///
/// The template is read, its macros expanded and parsed once; the functions
/// file, if any, is loaded once. Every record is then rendered with a fresh
/// context and written according to the output mode.
///
/// # Errors
/// - Reading, preprocessing or parsing the template fails.
/// - The functions file cannot be read or loaded.
/// - Input discovery fails.
/// - A record fails to render or to be named, unless `skip_errors` is set.
/// - An output file cannot be written.
pub fn run(config: &BatchConfig) -> Result<BatchReport, Box<dyn Error>> {
    let template = load_template(&config.template)?;
    let extension = template_extension(&config.template);

    let functions = match &config.functions {
        Some(path) => Some(ScriptEnvironment::new(&read(path)?)?),
        None => None,
    };

    let mode = OutputMode::from_options(config.name_pattern.as_deref(), config.output.as_deref());
    let mut report = BatchReport::default();
    let mut combined = String::new();

    for source in discover(&config.input)? {
        for (index, record) in source.records.iter().enumerate() {
            let mut ctx = Context::new(record.as_bytes(), &JsonData, &JsonData);
            if let Some(functions) = &functions {
                ctx = ctx.with_functions(functions);
            }

            let rendered = ctx.eval_template(&template).map_err(Box::<dyn Error>::from)
                              .and_then(|text| {
                                  let target = match &mode {
                                      OutputMode::PerRecord => {
                                          Some(record_path(&source.path, index, &extension))
                                      },
                                      OutputMode::Named { dir, field } => {
                                          let (value, _) = JsonData.get(record.as_bytes(), field)?;
                                          Some(named_path(dir, &value, &extension)?)
                                      },
                                      OutputMode::Single(_) => None,
                                  };
                                  Ok((text, target))
                              });

            match rendered {
                Ok((text, Some(target))) => {
                    fs::write(&target, text).map_err(|e| {
                                                format!("Cannot write '{}': {e}", target.display())
                                            })?;
                    info!("Wrote {}", target.display());
                    report.written.push(target);
                },
                Ok((text, None)) => combined.push_str(&text),
                Err(e) if config.skip_errors => {
                    warn!("Skipping record {index} of {}: {e}", source.path.display());
                    report.skipped += 1;
                    continue;
                },
                Err(e) => {
                    return Err(format!("Record {index} of {}: {e}", source.path.display()).into());
                },
            }
            report.rendered += 1;
        }
    }

    if let OutputMode::Single(output) = &mode {
        let target = single_path(output, &extension);
        fs::write(&target, combined).map_err(|e| {
                                        format!("Cannot write '{}': {e}", target.display())
                                    })?;
        info!("Wrote {}", target.display());
        report.written.push(target);
    }

    Ok(report)
}

/// Reads, preprocesses and parses a template file.
///
/// # Errors
/// Fails if the file cannot be read or the template has a syntax error.
pub fn load_template(path: &Path) -> Result<Template, Box<dyn Error>> {
    let source = expand_macros(&read(path)?);
    Ok(parse(&source)?)
}

fn read(path: &Path) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(path).map_err(|e| format!("Cannot read '{}': {e}", path.display()).into())
}
