/// The evaluator module renders parsed templates.
///
/// The evaluator walks the node tree against an evaluation context,
/// evaluates conditions and elements, iterates loops through derived
/// contexts, and produces the document text.
///
/// # Responsibilities
/// - Renders text, access, `if` and `for` nodes.
/// - Evaluates conditions with short-circuiting and typed comparisons.
/// - Calls user functions through the scripting environment.
/// - Reports runtime errors such as missing data or type mismatches.
pub mod evaluator;
/// The lexer module tokenizes expression blocks for further parsing.
///
/// The lexer reads the content of one expression block and produces a
/// stream of tokens: constants, access patterns, keywords and operators.
///
/// # Responsibilities
/// - Converts block text into tokens with their template line.
/// - Recognises string and numeric constants and access patterns.
/// - Reports invalid characters.
pub mod lexer;
/// The parser module builds the node tree from template text.
///
/// The parser splits the template into literal text and expression blocks,
/// parses each block, and assembles `if` and `for` blocks into nodes.
///
/// # Responsibilities
/// - Converts blocks into nodes, conditions and elements.
/// - Validates grammar and block nesting, reporting errors with their line.
pub mod parser;
/// Access pattern helpers.
///
/// Splits patterns such as `user->address[0]->city` into segments and
/// recognises loop item prefixes.
pub mod path;
/// The value module defines the runtime data types for evaluation.
///
/// # Responsibilities
/// - Defines the `Value` enum and the closed set of `ElementType`s.
/// - Parses constants and coerces looked-up text into typed values.
/// - Formats values for display and compares them.
pub mod value;
