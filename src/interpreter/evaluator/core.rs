use log::debug;

use crate::{
    ast::{NodeId, NodeKind, Template},
    error::RuntimeError,
    interpreter::{evaluator::function::core::FunctionHost, value::element_type::ElementType},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Resolves access patterns against raw record data.
///
/// Implemented by the data-access collaborator (see
/// [`crate::access::json::JsonData`]) and by the per-iteration loop scopes,
/// which rebind loop names and delegate everything else to their parent.
pub trait Getter {
    /// Resolves `pattern` against `data`.
    ///
    /// # Returns
    /// The value as text together with its type. Strings are returned
    /// without quotes; arrays and objects as their serialized form.
    ///
    /// # Errors
    /// `RuntimeError::NotExists` if the pattern does not resolve.
    fn get(&self, data: &[u8], pattern: &str) -> EvalResult<(String, ElementType)>;
}

/// Iterates over arrays and objects held as raw serialized bytes.
pub trait Traversal {
    /// Calls `each` once per element of the array in `data`, in source order.
    ///
    /// # Errors
    /// Fails if `data` is not an array, or with the first error returned by
    /// `each`.
    fn array_each(&self,
                  data: &[u8],
                  each: &mut dyn FnMut(&[u8], ElementType) -> EvalResult<()>)
                  -> EvalResult<()>;

    /// Calls `each` once per property of the object in `data` with the key,
    /// the value bytes and the value type.
    ///
    /// # Errors
    /// Fails if `data` is not an object, or with the first error returned by
    /// `each`.
    fn object_each(&self,
                   data: &[u8],
                   each: &mut dyn FnMut(&str, &[u8], ElementType) -> EvalResult<()>)
                   -> EvalResult<()>;
}

/// Stores the runtime evaluation context.
///
/// A context bundles the record being rendered with the capabilities needed
/// to resolve names against it. Contexts are never mutated: a `for` loop
/// derives a new context per iteration whose getter borrows this one.
///
/// ## Usage
///
/// The batch driver builds one context per record and hands it to
/// [`crate::evaluate`], or calls [`Context::eval_template`] directly.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// Raw bytes of the current record.
    pub data:      &'a [u8],
    /// Resolves access patterns.
    pub getter:    &'a dyn Getter,
    /// Iterates arrays and objects.
    pub traversal: &'a dyn Traversal,
    /// User functions; `None` when no script was supplied.
    pub functions: Option<&'a dyn FunctionHost>,
}

impl<'a> Context<'a> {
    /// Creates a context over `data` without user functions.
    #[must_use]
    pub fn new(data: &'a [u8], getter: &'a dyn Getter, traversal: &'a dyn Traversal) -> Self {
        Self { data,
               getter,
               traversal,
               functions: None }
    }

    /// Returns the same context with user functions available.
    #[must_use]
    pub fn with_functions(self, functions: &'a dyn FunctionHost) -> Self {
        Self { functions: Some(functions),
               ..self }
    }

    /// Resolves an access pattern against the current data.
    ///
    /// # Errors
    /// Whatever the getter reports, typically `RuntimeError::NotExists`.
    pub fn lookup(&self, pattern: &str) -> EvalResult<(String, ElementType)> {
        self.getter.get(self.data, pattern)
    }

    /// Renders a whole template.
    ///
    /// # Errors
    /// The first error raised by any node; no partial output is returned.
    pub fn eval_template(&self, template: &Template) -> EvalResult<String> {
        self.eval_chain(template, template.root())
    }

    /// Renders a chain of sibling nodes starting at `start`.
    ///
    /// Every node contributes its own text followed by the text of its
    /// `next` sibling. An empty chain renders as an empty string.
    ///
    /// # Errors
    /// The first error raised by any node in the chain.
    pub fn eval_chain(&self, template: &Template, start: Option<NodeId>) -> EvalResult<String> {
        let mut out = String::new();

        for node in template.chain(start) {
            self.eval_node(template, &node.kind, &mut out)?;
        }

        Ok(out)
    }

    /// Evaluates a single node and appends its contribution to `out`.
    ///
    /// - Text is copied verbatim.
    /// - An access renders its element as text; a missing value becomes
    ///   `RuntimeError::InvalidAccess` naming the element.
    /// - An `if` renders the branch selected by its condition, or nothing.
    /// - A `for` renders its body once per element of its target.
    fn eval_node(&self, template: &Template, kind: &NodeKind, out: &mut String) -> EvalResult<()> {
        match kind {
            NodeKind::Text(text) => {
                debug!("EVALUATING: Text: {text:?}");
                out.push_str(text);
            },
            NodeKind::Access(element) => {
                debug!("EVALUATING: Variable Access: {element}");
                let text = self.element_text(element).map_err(|e| match e {
                                                          RuntimeError::NotExists { .. } => {
                                                              RuntimeError::InvalidAccess { pattern: element.to_string() }
                                                          },
                                                          other => other,
                                                      })?;
                out.push_str(&text);
            },
            NodeKind::If { condition,
                           then_branch,
                           else_branch, } => {
                debug!("EVALUATING: If");
                let branch = if self.eval_condition(condition)? {
                    *then_branch
                } else {
                    *else_branch
                };
                out.push_str(&self.eval_chain(template, branch)?);
            },
            NodeKind::For(for_node) => {
                debug!("EVALUATING: For: {} in {}", for_node.item, for_node.target);
                out.push_str(&self.eval_for(template, for_node)?);
            },
        }

        Ok(())
    }
}
