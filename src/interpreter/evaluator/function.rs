/// Function-call evaluation.
///
/// Defines the `FunctionHost` capability and evaluates call elements against
/// it.
pub mod core;

/// The Lua script environment.
///
/// Loads the user's functions file and converts values across the Lua
/// boundary.
pub mod script;
