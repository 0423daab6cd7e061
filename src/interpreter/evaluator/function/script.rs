use mlua::{Lua, LuaSerdeExt, Value as LuaValue, Variadic};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::core::FunctionHost},
        value::core::Value,
    },
    util::num::i64_to_f64_checked,
};

/// Name reported for errors raised while loading the script itself.
const SCRIPT_CHUNK: &str = "functions";

/// A Lua state holding the user-supplied functions.
///
/// Created once from the functions file and shared by reference with every
/// evaluation. A Lua state is not reentrant: it stays on the thread that
/// created it, and parallel renderers need one environment each.
pub struct ScriptEnvironment {
    lua: Lua,
}

impl ScriptEnvironment {
    /// Loads `source` into a fresh Lua state.
    ///
    /// Every global function the script defines becomes callable from
    /// templates.
    ///
    /// # Errors
    /// `RuntimeError::ScriptFailure` if the script does not compile or fails
    /// while running.
    ///
    /// # Example
    /// ```
    /// use readson::interpreter::{
    ///     evaluator::function::{core::FunctionHost, script::ScriptEnvironment},
    ///     value::core::Value,
    /// };
    ///
    /// let env = ScriptEnvironment::new("function shout(s) return s:upper() end").unwrap();
    /// assert_eq!(env.call("shout", &["hi".to_string()]).unwrap(), Value::from("HI"));
    ///
    /// assert!(ScriptEnvironment::new("function (").is_err());
    /// ```
    pub fn new(source: &str) -> EvalResult<Self> {
        let lua = Lua::new();
        lua.load(source)
           .set_name(SCRIPT_CHUNK)
           .exec()
           .map_err(|e| RuntimeError::ScriptFailure { function: SCRIPT_CHUNK.to_string(),
                                                      message:  e.to_string(), })?;

        Ok(Self { lua })
    }

    /// Maps a Lua return value onto a template value.
    ///
    /// Booleans, strings and numbers map directly. Tables are serialized to
    /// JSON and become arrays or objects. `nil` is the empty string and any
    /// other value falls back to its Lua type name.
    fn convert(&self, function: &str, value: LuaValue) -> EvalResult<Value> {
        let failure = |message: String| RuntimeError::ScriptFailure { function: function.to_string(),
                                                                      message };

        Ok(match value {
            LuaValue::Nil => Value::String(String::new()),
            LuaValue::Boolean(b) => Value::Bool(b),
            LuaValue::Integer(i) => {
                Value::Number(i64_to_f64_checked(i, failure(format!("integer {i} is too large")))?)
            },
            LuaValue::Number(n) => Value::Number(n),
            LuaValue::String(s) => Value::String(s.to_string_lossy()),
            LuaValue::Table(_) => {
                let json = self.lua
                               .from_value::<serde_json::Value>(value)
                               .map_err(|e| failure(e.to_string()))?;
                let raw = json.to_string();
                match json {
                    serde_json::Value::Array(_) => Value::Array(raw.as_bytes().into()),
                    serde_json::Value::Object(_) => Value::Object(raw.as_bytes().into()),
                    _ => Value::String(raw),
                }
            },
            other => Value::String(other.type_name().to_string()),
        })
    }
}

impl FunctionHost for ScriptEnvironment {
    fn call(&self, name: &str, arguments: &[String]) -> EvalResult<Value> {
        let function = match self.lua.globals().get::<LuaValue>(name) {
            Ok(LuaValue::Function(f)) => f,
            _ => return Err(RuntimeError::UnknownFunction { name: name.to_string() }),
        };

        let result = function.call::<LuaValue>(Variadic::from_iter(arguments.iter().cloned()))
                             .map_err(|e| RuntimeError::ScriptFailure { function: name.to_string(),
                                                                        message:  e.to_string(), })?;

        self.convert(name, result)
    }
}
