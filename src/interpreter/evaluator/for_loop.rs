use log::debug;

use crate::{
    ast::{ForNode, Template},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Getter},
        path::strip_item,
        value::element_type::ElementType,
    },
};

impl Context<'_> {
    /// Evaluates a `for` block.
    ///
    /// The target is resolved against the current context and its runtime
    /// type picks the flavor of the loop:
    ///
    /// 1. **Array:** the body is rendered once per element, in source order.
    ///    The index name is bound to the 1-based position.
    /// 2. **Object:** the body is rendered once per property, in the order
    ///    the traversal yields them. The index name is bound to the key.
    ///
    /// Each iteration renders the body with a derived context whose getter is
    /// a [`LoopScope`]: loop names resolve against the current element and
    /// every other name falls through to this context.
    ///
    /// The first failing iteration aborts the loop; no partial text is
    /// returned.
    ///
    /// # Parameters
    /// - `template`: The template owning the loop body.
    /// - `for_node`: Loop header and body.
    ///
    /// # Returns
    /// The concatenated text of every iteration.
    ///
    /// # Errors
    /// - `RuntimeError::NotExists` if the target does not resolve.
    /// - `RuntimeError::NotIterable` if it is neither an array nor an object.
    /// - Any error raised by the body.
    ///
    /// # Example
    /// ```
    /// use readson::{access::json::JsonData, interpreter::evaluator::core::Context, parse};
    ///
    /// let template = parse("$for x, i in items$$i$:$x$ $end$").unwrap();
    ///
    /// let json = JsonData;
    /// let ctx = Context::new(br#"{"items": ["a", "b"]}"#, &json, &json);
    ///
    /// assert_eq!(ctx.eval_template(&template).unwrap(), "1:a 2:b ");
    /// ```
    pub fn eval_for(&self, template: &Template, for_node: &ForNode) -> EvalResult<String> {
        let (raw, target_type) = self.lookup(&for_node.target)?;
        let mut out = String::new();

        match target_type {
            ElementType::Array => {
                let mut position = 0;
                self.traversal.array_each(raw.as_bytes(), &mut |element, element_type| {
                                  position += 1;
                                  let scope = LoopScope { parent: self.getter,
                                                          item: &for_node.item,
                                                          index: for_node.index.as_deref(),
                                                          element,
                                                          element_type,
                                                          binding: Binding::Position(position) };
                                  out.push_str(&self.iterate(template, for_node, &scope)?);
                                  Ok(())
                              })?;
            },
            ElementType::Object => {
                self.traversal.object_each(raw.as_bytes(), &mut |key, element, element_type| {
                                  let scope = LoopScope { parent: self.getter,
                                                          item: &for_node.item,
                                                          index: for_node.index.as_deref(),
                                                          element,
                                                          element_type,
                                                          binding: Binding::Key(key) };
                                  out.push_str(&self.iterate(template, for_node, &scope)?);
                                  Ok(())
                              })?;
            },
            found => {
                return Err(RuntimeError::NotIterable { pattern: for_node.target.clone(),
                                                       found });
            },
        }

        Ok(out)
    }

    /// Renders the loop body once with a context derived from `scope`.
    ///
    /// The derived context keeps the current data; only name resolution
    /// changes.
    fn iterate(&self,
               template: &Template,
               for_node: &ForNode,
               scope: &LoopScope<'_>)
               -> EvalResult<String> {
        debug!("EVALUATING: Iteration {} of {}", scope.binding, for_node.target);

        let derived = Context { getter: scope,
                                ..*self };
        derived.eval_chain(template, for_node.body)
    }
}

/// What the loop index name is bound to in one iteration.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
    /// 1-based position of the current array element.
    Position(usize),
    /// Key of the current object property.
    Key(&'a str),
}

impl std::fmt::Display for Binding<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position(n) => write!(f, "#{n}"),
            Self::Key(k) => write!(f, "'{k}'"),
        }
    }
}

/// Name resolution for one loop iteration.
///
/// Borrows its parent getter, never owns it, so nested loops chain scopes
/// on the stack:
///
/// - the index name resolves to the position (as a number) or key (as a
///   string),
/// - the item name alone resolves to the current element,
/// - the item name followed by a path resolves that path inside the current
///   element, which must then be an array or an object,
/// - anything else is handed to the parent unchanged.
pub struct LoopScope<'a> {
    /// Getter of the enclosing context.
    pub parent:       &'a dyn Getter,
    /// Loop item name.
    pub item:         &'a str,
    /// Loop index name, if any.
    pub index:        Option<&'a str>,
    /// Raw bytes of the current element.
    pub element:      &'a [u8],
    /// Type of the current element.
    pub element_type: ElementType,
    /// Value of the index name.
    pub binding:      Binding<'a>,
}

impl Getter for LoopScope<'_> {
    fn get(&self, data: &[u8], pattern: &str) -> EvalResult<(String, ElementType)> {
        if self.index == Some(pattern) {
            return Ok(match self.binding {
                          Binding::Position(n) => (n.to_string(), ElementType::Number),
                          Binding::Key(key) => (key.to_string(), ElementType::String),
                      });
        }

        match strip_item(pattern, self.item) {
            Some("") if self.element_type == ElementType::NotExists => {
                Err(RuntimeError::NotExists { pattern: pattern.to_string() })
            },
            Some("") => Ok((String::from_utf8_lossy(self.element).into_owned(), self.element_type)),
            Some(_) if !matches!(self.element_type, ElementType::Array | ElementType::Object) => {
                Err(RuntimeError::NotExists { pattern: pattern.to_string() })
            },
            Some(rest) => self.parent.get(self.element, rest),
            None => self.parent.get(data, pattern),
        }
    }
}
