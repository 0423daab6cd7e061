use std::cmp::Ordering;

use crate::{
    ast::{ComparisonOperator, Condition, Element},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates a condition to a boolean.
    ///
    /// - `and` and `or` short-circuit: the right side is not evaluated when
    ///   the left side decides the result.
    /// - `exists` is `false` for missing values and never fails for them.
    /// - `is` compares the element's type; a missing element is of no type.
    /// - A single element must evaluate to a boolean.
    ///
    /// # Errors
    /// - `RuntimeError::ExpectedBoolean` for a single non-boolean element.
    /// - Any error from [`Context::compare_elements`].
    /// - Any error from evaluating an element.
    pub fn eval_condition(&self, condition: &Condition) -> EvalResult<bool> {
        match condition {
            Condition::Single(element) => match self.eval_element(element)? {
                Value::Bool(b) => Ok(b),
                other => Err(RuntimeError::ExpectedBoolean { element: element.to_string(),
                                                             found:   other.element_type(), }),
            },
            Condition::And(left, right) => {
                Ok(self.eval_condition(left)? && self.eval_condition(right)?)
            },
            Condition::Or(left, right) => {
                Ok(self.eval_condition(left)? || self.eval_condition(right)?)
            },
            Condition::Negated(inner) => Ok(!self.eval_condition(inner)?),
            Condition::Operator { left, op, right } => self.compare_elements(left, *op, right),
            Condition::Exists(element) => self.exists(element),
            Condition::TypeCheck { element, expected } => match self.eval_element(element) {
                Ok(value) => Ok(value.element_type() == *expected),
                Err(e) if e.is_missing() => Ok(false),
                Err(e) => Err(e),
            },
        }
    }

    /// Compares two elements with a comparison operator.
    ///
    /// Both elements are evaluated, left first. Booleans only support `=`.
    ///
    /// # Errors
    /// - `RuntimeError::IncomparableTypes` when the types differ.
    /// - `RuntimeError::UnsupportedComparison` for arrays and objects.
    /// - `RuntimeError::InvalidBooleanComparison` for booleans with anything
    ///   but `=`.
    pub fn compare_elements(&self,
                            left: &Element,
                            op: ComparisonOperator,
                            right: &Element)
                            -> EvalResult<bool> {
        let left = self.eval_element(left)?;
        let right = self.eval_element(right)?;

        let ordering = left.compare(&right)?;

        if matches!(left, Value::Bool(_)) && op != ComparisonOperator::Equal {
            return Err(RuntimeError::InvalidBooleanComparison { operator: op });
        }

        // Unordered numbers (NaN) are only ever different.
        let Some(ordering) = ordering else {
            return Ok(op == ComparisonOperator::NotEqual);
        };

        Ok(match op {
            ComparisonOperator::Equal => ordering == Ordering::Equal,
            ComparisonOperator::NotEqual => ordering != Ordering::Equal,
            ComparisonOperator::Less => ordering == Ordering::Less,
            ComparisonOperator::LessEqual => ordering != Ordering::Greater,
            ComparisonOperator::Greater => ordering == Ordering::Greater,
            ComparisonOperator::GreaterEqual => ordering != Ordering::Less,
        })
    }

    fn exists(&self, element: &Element) -> EvalResult<bool> {
        let found = match element {
            Element::Access { pattern } => self.lookup(pattern).map(|_| ()),
            other => self.eval_element(other).map(|_| ()),
        };

        match found {
            Ok(()) => Ok(true),
            Err(e) if e.is_missing() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
