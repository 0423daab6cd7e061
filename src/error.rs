/// Parsing errors.
///
/// Defines all error types that can occur while splitting a template into
/// blocks, lexing expression blocks, and parsing them into the syntax tree.
/// These are the template syntax errors: any of them aborts parsing.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while a template is evaluated
/// against a record: missing data, type mismatches in conditions or
/// arithmetic, and function-call failures.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
