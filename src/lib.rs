//! # readson
//!
//! readson turns JSON records into readable documents. A template written in
//! a small templating language is parsed once and rendered for every record:
//! it can insert values, compute with them, branch on conditions, loop over
//! arrays and objects, and call user functions written in Lua.
//!
//! ## Access patterns
//!
//! A pattern such as `user->address[0]->city` (or `user.address[0].city`)
//! addresses a field of the current record. Property segments are ASCII
//! letters, digits and `_`, and the pattern starts with a letter or `_`.
//! Keys with any other character cannot be addressed: inside an expression
//! block, `first-name` reads as `first - name`.
//!
//! ```
//! use readson::render_json;
//!
//! assert_eq!(render_json("$user.first_name$", r#"{"user": {"first_name": "Ann"}}"#).unwrap(),
//!            "Ann");
//! assert!(render_json("$first-name$", r#"{"first-name": "Ann"}"#).is_err());
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    access::json::JsonData,
    ast::Template,
    error::ParseError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::script::ScriptEnvironment,
        },
        parser::core::parse_template,
    },
};

/// Data access collaborators.
///
/// This module resolves access patterns and iterates arrays and objects over
/// a concrete serialized format. The evaluator only depends on the `Getter`
/// and `Traversal` traits; JSON is the format shipped with the crate.
///
/// # Responsibilities
/// - Resolves patterns such as `user->address[0]->city` against JSON.
/// - Iterates JSON arrays and objects, objects in document order.
pub mod access;
/// Defines the structure of parsed templates.
///
/// This module declares the node tree built by the parser and walked by the
/// evaluator: text, access, `if` and `for` nodes, plus the elements and
/// conditions they contain.
///
/// # Responsibilities
/// - Defines node, element and condition types for all language constructs.
/// - Stores nodes in a single arena, linked by index.
pub mod ast;
/// Batch rendering of templates over sets of files.
///
/// This module is what the command line drives: it preprocesses and parses
/// the template, discovers input records, renders them, and writes the
/// documents.
///
/// # Responsibilities
/// - Expands template macros.
/// - Finds input files from a file, directory or glob expression.
/// - Names and writes output documents.
pub mod batch;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while splitting, lexing,
/// parsing, or evaluating templates. It standardizes error reporting and
/// carries detailed information about failures, including the offending
/// text and, for syntax errors, the template line.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Supports integration with standard error handling traits and reporting
///   utilities.
pub mod error;
/// Orchestrates the templating language.
///
/// This module ties together lexing, parsing, evaluation and value
/// representations.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion.
pub mod util;

/// Parses template text.
///
/// # Errors
/// Returns a `ParseError` for any syntax error; no partial template is
/// returned.
///
/// # Examples
/// ```
/// use readson::parse;
///
/// assert!(parse("Hello $name$!").is_ok());
/// assert!(parse("Hello $name").is_err());
/// ```
pub fn parse(source: &str) -> Result<Template, ParseError> {
    parse_template(source)
}

/// Renders a parsed template against a context.
///
/// # Errors
/// Returns the first `RuntimeError` raised while rendering; no partial
/// document is returned.
///
/// # Examples
/// ```
/// use readson::{access::json::JsonData, evaluate, interpreter::evaluator::core::Context, parse};
///
/// let template = parse("$if age >= 18$adult$else$minor$end$").unwrap();
/// let json = JsonData;
/// let ctx = Context::new(br#"{"age": 20}"#, &json, &json);
///
/// assert_eq!(evaluate(&template, &ctx).unwrap(), "adult");
/// ```
pub fn evaluate(template: &Template, context: &Context<'_>) -> EvalResult<String> {
    context.eval_template(template)
}

/// Loads user functions from Lua source.
///
/// The returned environment is attached to contexts with
/// [`Context::with_functions`]. Without it, any function call fails with
/// `RuntimeError::ScriptEnvironmentNotReady`.
///
/// # Errors
/// Returns `RuntimeError::ScriptFailure` if the script fails to load.
pub fn initialize_functions(source: &str) -> EvalResult<ScriptEnvironment> {
    ScriptEnvironment::new(source)
}

/// Parses a template and renders it against one JSON record.
///
/// # Errors
/// Returns an error if parsing or evaluation fails.
///
/// # Examples
/// ```
/// use readson::render_json;
///
/// let out = render_json("$for p in people$- $p->name$\n$end$",
///                       r#"{"people": [{"name": "Ann"}, {"name": "Bo"}]}"#).unwrap();
/// assert_eq!(out, "- Ann\n- Bo\n");
///
/// // Missing data is an error.
/// assert!(render_json("$nope$", "{}").is_err());
/// ```
pub fn render_json(template: &str, record: &str) -> Result<String, Box<dyn std::error::Error>> {
    let template = parse(template)?;
    let ctx = Context::new(record.as_bytes(), &JsonData, &JsonData);

    Ok(evaluate(&template, &ctx)?)
}
