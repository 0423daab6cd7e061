use log::debug;

use crate::{
    ast::Element,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

/// Runs user-supplied functions.
///
/// The evaluator only sees this trait; [`super::script::ScriptEnvironment`]
/// implements it on top of an embedded Lua state.
pub trait FunctionHost {
    /// Calls `name` with already stringified arguments.
    ///
    /// # Errors
    /// - `RuntimeError::UnknownFunction` if `name` is not defined.
    /// - `RuntimeError::ScriptFailure` if the call raises an error.
    fn call(&self, name: &str, arguments: &[String]) -> EvalResult<Value>;
}

impl Context<'_> {
    /// Evaluates a function call.
    ///
    /// Arguments are evaluated left to right to their text form; the first
    /// failing argument aborts the call. The function is then looked up and
    /// invoked through the context's [`FunctionHost`].
    ///
    /// # Parameters
    /// - `name`: Function name.
    /// - `arguments`: Argument elements.
    ///
    /// # Returns
    /// The value returned by the function.
    ///
    /// # Errors
    /// - `RuntimeError::ScriptEnvironmentNotReady` if the context has no
    ///   functions. Arguments are not evaluated in that case.
    /// - Errors from argument evaluation or from the host.
    pub fn eval_function_call(&self, name: &str, arguments: &[Element]) -> EvalResult<Value> {
        let Some(host) = self.functions else {
            return Err(RuntimeError::ScriptEnvironmentNotReady { function: name.to_string() });
        };

        let arguments = arguments.iter()
                                 .map(|argument| self.element_text(argument))
                                 .collect::<EvalResult<Vec<_>>>()?;

        debug!("EVALUATING: Function: {name}({})", arguments.join(", "));

        host.call(name, &arguments)
    }
}
