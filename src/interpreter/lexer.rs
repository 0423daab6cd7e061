use logos::Logos;

/// Represents a lexical token inside an expression block.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Literal text between expression blocks is never lexed.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens, such as `3.14`, `42` or `2.1e-10`.
    ///
    /// The source text is kept so constants render exactly as written.
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9]+(\.[0-9]+)?[eE][+-]?[0-9]+", |lex| lex.slice().to_string())]
    Number(String),
    /// String literal tokens, such as `"hello"`, quotes included.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    Str(String),
    /// Boolean literal tokens, such as `true`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `end`
    #[token("end")]
    End,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// `exists`
    #[token("exists")]
    Exists,
    /// `is`
    #[token("is")]
    Is,
    /// Access pattern tokens, such as `name`, `user->address[0]->city` or
    /// `user.name`.
    ///
    /// A plain identifier is a path with a single segment; it doubles as a
    /// function name or a loop variable name.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*((->|\.)[a-zA-Z0-9_]+|\[[0-9]+\])*",
            |lex| lex.slice().to_string())]
    Path(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Bang,

    /// Line breaks inside a block only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

impl Token {
    /// Returns `true` for tokens that are reserved words of the language.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self,
                 Self::If
                 | Self::Else
                 | Self::End
                 | Self::For
                 | Self::In
                 | Self::And
                 | Self::Or
                 | Self::Not
                 | Self::Exists
                 | Self::Is)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Number(s) | Self::Str(s) | Self::Path(s) => return write!(f, "'{s}'"),
            Self::Bool(b) => return write!(f, "'{b}'"),
            Self::If => "if",
            Self::Else => "else",
            Self::End => "end",
            Self::For => "for",
            Self::In => "in",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Exists => "exists",
            Self::Is => "is",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Comma => ",",
            Self::Equals => "=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Bang => "!",
            Self::NewLine => "newline",
            Self::Ignored => "whitespace",
        };
        write!(f, "'{text}'")
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting. Each expression block
/// is lexed on its own, starting at the line the block was opened on.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the template.
    pub line: usize,
}

/// Parses a boolean literal from the current token slice (`true` or `false`).
///
/// # Parameters
/// - `lex`: Reference to the Logos lexer at the current token.
///
/// # Returns
/// - `Some(true)` if the slice is `"true"`.
/// - `Some(false)` if the slice is `"false"`.
/// - `None` otherwise.
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
