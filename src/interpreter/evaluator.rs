/// Core evaluation logic and context management.
///
/// Contains the result alias, the data-access capability traits, the
/// evaluation context and the node walker.
pub mod core;

/// Condition evaluation.
///
/// Implements boolean algebra with short-circuiting, comparisons, and
/// `exists`/`is` checks.
pub mod condition;

/// Element evaluation.
///
/// Turns elements into typed values or into document text, including
/// arithmetic.
pub mod element;

/// Evaluation of `for` blocks.
///
/// Iterates arrays and objects and rebinds loop names through per-iteration
/// scopes.
pub mod for_loop;

/// Function evaluation.
///
/// Handles calls to user-supplied functions and the scripting environment
/// that runs them.
pub mod function;
