use crate::interpreter::value::{core::Value, element_type::ElementType};

/// Anything that can produce a value: a path access, a constant, an
/// arithmetic expression or a function call.
///
/// Every element can also be rendered as text, whatever its native type.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Access to a field of the current record, e.g. `user->address[0]`.
    Access {
        /// The access pattern, as written.
        pattern: String,
    },
    /// A constant written in the template.
    Constant {
        /// The constant as it should be rendered (strings without quotes).
        text:  String,
        /// The parsed value.
        value: Value,
    },
    /// Binary arithmetic between two numeric elements.
    Expression {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    ArithmeticOperator,
        /// Right operand.
        right: Box<Self>,
    },
    /// Call to a user-supplied function, e.g. `upper(name)`.
    FunctionCall {
        /// Name of the function being called.
        name:      String,
        /// Arguments to the function.
        arguments: Vec<Self>,
    },
}

impl Element {
    /// Builds an access element.
    #[must_use]
    pub fn access(pattern: &str) -> Self {
        Self::Access { pattern: pattern.to_string() }
    }

    /// Builds a constant element from a value.
    ///
    /// ## Example
    /// ```
    /// use readson::{ast::Element, interpreter::value::core::Value};
    ///
    /// let e = Element::constant(Value::Bool(true));
    /// assert_eq!(e.to_string(), "true");
    /// ```
    #[must_use]
    pub fn constant(value: Value) -> Self {
        Self::Constant { text: value.to_plain_string(),
                         value }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access { pattern } => write!(f, "{pattern}"),
            Self::Constant { text, value } => match value {
                Value::String(_) => write!(f, "\"{text}\""),
                _ => write!(f, "{text}"),
            },
            Self::Expression { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::FunctionCall { name, arguments } => {
                write!(f, "{name}(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            },
        }
    }
}

/// A boolean condition, as used by `if` blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A single element that must evaluate to a boolean.
    Single(Element),
    /// Both sides must hold. The right side is skipped when the left is false.
    And(Box<Self>, Box<Self>),
    /// Either side must hold. The right side is skipped when the left is
    /// true.
    Or(Box<Self>, Box<Self>),
    /// Logical negation (`not` or `!`).
    Negated(Box<Self>),
    /// Comparison between two elements.
    Operator {
        /// Left operand.
        left:  Element,
        /// The comparison operator.
        op:    ComparisonOperator,
        /// Right operand.
        right: Element,
    },
    /// `exists <element>`.
    Exists(Element),
    /// `<element> is <type>`.
    TypeCheck {
        /// The element whose type is checked.
        element:  Element,
        /// The expected type.
        expected: ElementType,
    },
}

/// Represents a comparison operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`=`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
}

/// Represents an arithmetic operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArithmeticOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "=",
            Self::NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        };
        write!(f, "{operator}")
    }
}

/// Index of a node inside a [`Template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// One node of the template tree.
///
/// Nodes form chains: `next` is what gets evaluated, and appended, after
/// this node. The last node of a chain has no `next`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What the node contributes.
    pub kind: NodeKind,
    /// The following sibling.
    pub next: Option<NodeId>,
}

/// The four kinds of template nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Literal text, copied verbatim.
    Text(String),
    /// An element rendered as text, e.g. `$name$`.
    Access(Element),
    /// `$if ...$ ... [$else$ ...] $end$`
    If {
        /// The condition.
        condition:   Condition,
        /// First node of the chain rendered when the condition holds.
        then_branch: Option<NodeId>,
        /// First node of the chain rendered otherwise.
        else_branch: Option<NodeId>,
    },
    /// `$for item[, index] in target$ ... $end$`
    For(ForNode),
}

/// Header and body of a `for` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    /// Name bound to the current element.
    pub item:   String,
    /// Name bound to the 1-based position (arrays) or key (objects).
    pub index:  Option<String>,
    /// Access pattern of the array or object to iterate.
    pub target: String,
    /// First node of the loop body.
    pub body:   Option<NodeId>,
}

/// A parsed template.
///
/// Nodes live in one vector and reference each other by [`NodeId`]; every
/// node is referenced from exactly one place (the root, a parent branch or a
/// previous sibling). A template is read-only once parsed and can be
/// evaluated any number of times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root:  Option<NodeId>,
}

impl Template {
    /// The first node of the top-level chain, if the template is not empty.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Looks up a node.
    ///
    /// # Panics
    /// Never for ids produced by the parser of this template.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes in the template.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` for a template with no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over a chain of siblings, starting at `start`.
    pub fn chain(&self, start: Option<NodeId>) -> impl Iterator<Item = &Node> {
        std::iter::successors(start.map(|id| self.node(id)), |node| {
            node.next.map(|id| self.node(id))
        })
    }

    /// Appends a node and returns its id. Used by the parser only.
    pub(crate) fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node { kind, next: None });
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Links `id` after `previous`. Used by the parser only.
    pub(crate) fn link(&mut self, previous: NodeId, id: NodeId) {
        self.nodes[previous.0].next = Some(id);
    }
}
