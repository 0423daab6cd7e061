/// Template parsing entry point.
///
/// Defines `ParseResult` and assembles parsed blocks into the node tree,
/// checking that `if`, `else`, `for` and `end` are balanced.
pub mod core;

/// Splitting of template text into literal runs and expression blocks.
pub mod block;

/// Parsing of a single expression block into a statement.
///
/// Lexes the block and decides, from its first token, whether it opens,
/// continues or closes a control block or inserts an element.
pub mod statement;

/// Condition parsing.
///
/// Implements `or`, `and`, negation, grouping, comparisons, `exists` and
/// `is` checks.
pub mod condition;

/// Element parsing.
///
/// Handles constants, access patterns, function calls and arithmetic with
/// the usual precedence.
pub mod element;

/// Utility functions for the parser.
///
/// Provides helpers for lists, identifiers and expected tokens.
pub mod utils;
