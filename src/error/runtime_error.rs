use crate::{ast::ComparisonOperator, interpreter::value::element_type::ElementType};

#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur while evaluating a template.
pub enum RuntimeError {
    /// An access pattern did not resolve against the current data.
    NotExists {
        /// The access pattern.
        pattern: String,
    },
    /// A `$pattern$` block could not be rendered.
    InvalidAccess {
        /// The access pattern.
        pattern: String,
    },
    /// A raw value did not match the type the data reported for it.
    TypeCoercion {
        /// The raw text that failed to convert.
        text:     String,
        /// The type the data declared.
        expected: ElementType,
    },
    /// A comparison between values of two different types.
    IncomparableTypes {
        /// Type of the left operand.
        left:  ElementType,
        /// Type of the right operand.
        right: ElementType,
    },
    /// Booleans only support `=`.
    InvalidBooleanComparison {
        /// The operator that was used.
        operator: ComparisonOperator,
    },
    /// Arrays and objects cannot be compared.
    UnsupportedComparison {
        /// The type of both operands.
        element_type: ElementType,
    },
    /// A condition element did not produce a boolean.
    ExpectedBoolean {
        /// The element, as written in the template.
        element: String,
        /// The type it produced.
        found:   ElementType,
    },
    /// An arithmetic operand did not produce a number.
    ExpectedNumber {
        /// The element, as written in the template.
        element: String,
        /// The type it produced.
        found:   ElementType,
    },
    /// A `for` block targeted something that is neither an array nor an
    /// object.
    NotIterable {
        /// The access pattern of the loop target.
        pattern: String,
        /// The type it resolved to.
        found:   ElementType,
    },
    /// A function was called but no script environment was supplied.
    ScriptEnvironmentNotReady {
        /// The function that was called.
        function: String,
    },
    /// The script environment does not define the function.
    UnknownFunction {
        /// The name of the function.
        name: String,
    },
    /// The script raised an error while running a function.
    ScriptFailure {
        /// The function that failed.
        function: String,
        /// The message reported by the scripting runtime.
        message:  String,
    },
    /// The data-access collaborator could not read the data.
    DataAccess {
        /// Details reported by the collaborator.
        details: String,
    },
}

impl RuntimeError {
    /// Returns `true` when the error means "the requested value is absent".
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::NotExists { .. } | Self::InvalidAccess { .. })
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotExists { pattern } => write!(f, "Error: '{pattern}' does not exist."),
            Self::InvalidAccess { pattern } => {
                write!(f, "Error: Access pattern '{pattern}' is invalid.")
            },
            Self::TypeCoercion { text, expected } => {
                write!(f, "Error: '{text}' cannot be read as {expected}.")
            },
            Self::IncomparableTypes { left, right } => write!(f,
                                                              "Error: Cannot compare values of different types (left: {left}, right: {right})."),
            Self::InvalidBooleanComparison { operator } => write!(f,
                                                                  "Error: Booleans cannot be compared with '{operator}'."),
            Self::UnsupportedComparison { element_type } => {
                write!(f, "Error: Values of type {element_type} cannot be compared.")
            },
            Self::ExpectedBoolean { element, found } => {
                write!(f, "Error: '{element}' is {found}, not a boolean.")
            },
            Self::ExpectedNumber { element, found } => write!(f,
                                                              "Error: '{element}' is {found}; arithmetic only operates over numbers."),
            Self::NotIterable { pattern, found } => write!(f,
                                                           "Error: Cannot loop over '{pattern}' of type {found}."),
            Self::ScriptEnvironmentNotReady { function } => write!(f,
                                                                   "Error: Cannot call '{function}': no functions file was supplied."),
            Self::UnknownFunction { name } => write!(f, "Error: Unknown function '{name}'."),
            Self::ScriptFailure { function, message } => {
                write!(f, "Error: Function '{function}' failed: {message}")
            },
            Self::DataAccess { details } => write!(f, "Error: Cannot read data: {details}."),
        }
    }
}

impl std::error::Error for RuntimeError {}
