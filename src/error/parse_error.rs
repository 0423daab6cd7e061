#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while splitting, lexing or parsing a
/// template.
///
/// Every variant is a syntax error: parsing never returns a partial template.
pub enum ParseError {
    /// The template ended while an expression block was still open.
    UnterminatedExpression {
        /// The text of the unterminated block.
        text: String,
        /// The line on which the block was opened.
        line: usize,
    },
    /// Found an unexpected token while parsing an expression block.
    UnexpectedToken {
        /// Description of the token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An expression block ended before its grammar was complete.
    UnexpectedEndOfInput {
        /// The text of the incomplete block.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A character sequence that the lexer does not recognise.
    InvalidCharacter {
        /// The offending slice.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A constant could not be parsed into a value.
    MalformedConstant {
        /// The constant as written.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// `is` was followed by something other than a known type name.
    UnknownType {
        /// The type name as written.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An expression block started with a keyword that cannot open a block.
    UnknownKeyword {
        /// The keyword as written.
        keyword: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// `else` or `end` without an open `if`/`for`.
    UnmatchedBlock {
        /// The keyword as written.
        keyword: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An `if` or `for` block was never closed with `end`.
    UnclosedBlock {
        /// The opening block text.
        text: String,
        /// The line on which the block was opened.
        line: usize,
    },
    /// An `if` block with more than one `else`, or an `else` inside `for`.
    DuplicateElse {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    ExpectedClosingParen {
        /// The text of the block.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function was called through a path that is not a plain name.
    InvalidFunctionName {
        /// The name as written.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Found extra tokens after parsing should have completed.
    UnexpectedTrailingTokens {
        /// The extra/unexpected token.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl ParseError {
    /// Returns the template line the error refers to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnterminatedExpression { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line, .. }
            | Self::InvalidCharacter { line, .. }
            | Self::MalformedConstant { line, .. }
            | Self::UnknownType { line, .. }
            | Self::UnknownKeyword { line, .. }
            | Self::UnmatchedBlock { line, .. }
            | Self::UnclosedBlock { line, .. }
            | Self::DuplicateElse { line }
            | Self::ExpectedClosingParen { line, .. }
            | Self::InvalidFunctionName { line, .. }
            | Self::UnexpectedTrailingTokens { line, .. } => *line,
        }
    }

    /// Attaches the text and line of the enclosing expression block to errors
    /// raised deep inside the grammar, where neither is known.
    ///
    /// Only fills fields that are still empty (`""` or line `0`).
    #[must_use]
    pub fn in_block(mut self, block: &str, block_line: usize) -> Self {
        match &mut self {
            Self::UnexpectedEndOfInput { text, line } | Self::ExpectedClosingParen { text, line } => {
                if text.is_empty() {
                    *text = block.trim().to_string();
                }
                if *line == 0 {
                    *line = block_line;
                }
            },
            Self::UnexpectedToken { line, .. }
            | Self::MalformedConstant { line, .. }
            | Self::UnknownType { line, .. }
            | Self::InvalidFunctionName { line, .. }
            | Self::UnexpectedTrailingTokens { line, .. }
                if *line == 0 =>
            {
                *line = block_line;
            },
            _ => {},
        }
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedExpression { text, line } => write!(f,
                                                                  "Syntax error on line {line}: Expression '{text}' is never closed with '$'."),

            Self::UnexpectedToken { token, line } => {
                write!(f, "Syntax error on line {line}: Unexpected token: {token}.")
            },

            Self::UnexpectedEndOfInput { text, line } => write!(f,
                                                                "Syntax error on line {line}: Expression '{text}' ends unexpectedly."),

            Self::InvalidCharacter { text, line } => {
                write!(f, "Syntax error on line {line}: Invalid character sequence '{text}'.")
            },

            Self::MalformedConstant { text, line } => {
                write!(f, "Syntax error on line {line}: Malformed constant {text}.")
            },

            Self::UnknownType { name, line } => write!(f,
                                                       "Syntax error on line {line}: Unknown type '{name}'. Expected array, object, number, string or bool."),

            Self::UnknownKeyword { keyword, line } => {
                write!(f, "Syntax error on line {line}: '{keyword}' cannot start a block.")
            },

            Self::UnmatchedBlock { keyword, line } => write!(f,
                                                             "Syntax error on line {line}: '{keyword}' has no matching 'if' or 'for'."),

            Self::UnclosedBlock { text, line } => write!(f,
                                                         "Syntax error on line {line}: Block '{text}' is never closed with 'end'."),

            Self::DuplicateElse { line } => write!(f,
                                                   "Syntax error on line {line}: 'else' is only allowed once inside an 'if' block."),

            Self::ExpectedClosingParen { text, line } => write!(f,
                                                                "Syntax error on line {line}: Expected closing parenthesis ')' in '{text}'."),

            Self::InvalidFunctionName { name, line } => {
                write!(f, "Syntax error on line {line}: '{name}' is not a valid function name.")
            },

            Self::UnexpectedTrailingTokens { token, line } => write!(f,
                                                                     "Syntax error on line {line}: Extra tokens after expression: {token}."),
        }
    }
}

impl std::error::Error for ParseError {}
