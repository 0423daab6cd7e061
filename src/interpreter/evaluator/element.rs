use crate::{
    ast::{ArithmeticOperator, Element},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates an element to a typed value.
    ///
    /// - An access is looked up and converted to the type the data reports.
    /// - A constant is its parsed value.
    /// - An arithmetic expression evaluates both operands, which must be
    ///   numbers.
    /// - A function call is delegated to the user functions.
    ///
    /// # Errors
    /// - `RuntimeError::NotExists` for access patterns that do not resolve.
    /// - `RuntimeError::TypeCoercion` when data does not match its type.
    /// - `RuntimeError::ExpectedNumber` for non-numeric arithmetic operands.
    /// - Any error from the function call.
    ///
    /// # Example
    /// ```
    /// use readson::{
    ///     access::json::JsonData,
    ///     ast::Element,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let json = JsonData;
    /// let ctx = Context::new(br#"{"age": 41}"#, &json, &json);
    ///
    /// assert_eq!(ctx.eval_element(&Element::access("age")).unwrap(), Value::Number(41.0));
    /// ```
    pub fn eval_element(&self, element: &Element) -> EvalResult<Value> {
        match element {
            Element::Access { pattern } => {
                let (text, element_type) = self.lookup(pattern)?;
                Value::coerce(&text, element_type)
            },
            Element::Constant { value, .. } => Ok(value.clone()),
            Element::Expression { left, op, right } => {
                let left = self.eval_number(left)?;
                let right = self.eval_number(right)?;
                Ok(Value::Number(apply(*op, left, right)))
            },
            Element::FunctionCall { name, arguments } => self.eval_function_call(name, arguments),
        }
    }

    /// Evaluates an element to the text inserted into a document.
    ///
    /// - An access renders the text returned by the lookup, untouched.
    /// - A constant renders as written (strings without their quotes).
    /// - An arithmetic result keeps full precision.
    /// - A function result is displayed, with numbers rounded to two
    ///   decimals.
    ///
    /// # Errors
    /// Same as [`Context::eval_element`].
    pub fn element_text(&self, element: &Element) -> EvalResult<String> {
        match element {
            Element::Access { pattern } => self.lookup(pattern).map(|(text, _)| text),
            Element::Constant { text, .. } => Ok(text.clone()),
            Element::Expression { .. } => Ok(self.eval_element(element)?.to_plain_string()),
            Element::FunctionCall { name, arguments } => {
                Ok(self.eval_function_call(name, arguments)?.display())
            },
        }
    }

    fn eval_number(&self, element: &Element) -> EvalResult<f64> {
        match self.eval_element(element)? {
            Value::Number(n) => Ok(n),
            other => Err(RuntimeError::ExpectedNumber { element: element.to_string(),
                                                        found:   other.element_type(), }),
        }
    }
}

/// Applies an arithmetic operator. Division by zero follows IEEE 754.
const fn apply(op: ArithmeticOperator, left: f64, right: f64) -> f64 {
    match op {
        ArithmeticOperator::Add => left + right,
        ArithmeticOperator::Sub => left - right,
        ArithmeticOperator::Mul => left * right,
        ArithmeticOperator::Div => left / right,
    }
}
