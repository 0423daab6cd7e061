use std::iter::Peekable;

use logos::Logos;

use crate::{
    ast::{Condition, Element},
    error::ParseError,
    interpreter::{
        lexer::{LexerExtras, Token},
        parser::{
            condition::parse_condition,
            core::ParseResult,
            element::parse_element,
            utils::{end_of_input, expect, expect_end, parse_identifier},
        },
    },
};

/// What a single expression block says.
///
/// Blocks are parsed one at a time; `If`, `Else`, `End` and `For` are then
/// assembled into nodes by the tree builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `if <condition>`
    If(Condition),
    /// `else`
    Else,
    /// `end`
    End,
    /// `for <item>[, <index>] in <target>`
    For {
        /// Loop item name.
        item:   String,
        /// Optional index (array) or key (object) name.
        index:  Option<String>,
        /// Access pattern of the iterated value.
        target: String,
    },
    /// Any other block: an element whose text is inserted in the document.
    Emit(Element),
}

/// Lexes one expression block into `(Token, line)` pairs.
///
/// # Parameters
/// - `text`: The block content, without the surrounding markers.
/// - `line`: The template line on which the block starts.
///
/// # Errors
/// `InvalidCharacter` for any slice the lexer does not recognise.
pub fn tokenize(text: &str, line: usize) -> ParseResult<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(text, LexerExtras { line });

    while let Some(token) = lexer.next() {
        if let Ok(tok) = token {
            tokens.push((tok, lexer.extras.line));
        } else {
            return Err(ParseError::InvalidCharacter { text: lexer.slice().to_string(),
                                                      line: lexer.extras.line, });
        }
    }

    Ok(tokens)
}

/// Parses the content of one expression block.
///
/// The first token decides the statement:
/// - `if` starts a condition,
/// - `else` and `end` stand alone,
/// - `for` starts a loop header,
/// - keywords that cannot open a block are rejected,
/// - anything else is an element to insert.
///
/// # Parameters
/// - `text`: The block content, without the surrounding markers.
/// - `line`: The template line on which the block starts.
///
/// # Returns
/// A parsed [`Statement`].
///
/// # Errors
/// Any syntax error in the block. Errors raised inside the grammar are
/// completed with the block text and line.
pub fn parse_statement(text: &str, line: usize) -> ParseResult<Statement> {
    let tokens = tokenize(text, line)?;
    let mut iter = tokens.iter().peekable();

    parse_tokens(&mut iter).map_err(|e| e.in_block(text, line))
}

fn parse_tokens<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let statement = match tokens.peek() {
        Some((Token::If, _)) => {
            tokens.next();
            Statement::If(parse_condition(tokens)?)
        },
        Some((Token::Else, _)) => {
            tokens.next();
            Statement::Else
        },
        Some((Token::End, _)) => {
            tokens.next();
            Statement::End
        },
        Some((Token::For, _)) => {
            tokens.next();
            parse_for_header(tokens)?
        },
        Some((tok, line)) if tok.is_keyword() => {
            return Err(ParseError::UnknownKeyword { keyword: tok.to_string().trim_matches('\'').to_string(),
                                                    line:    *line, });
        },
        _ => Statement::Emit(parse_element(tokens)?),
    };

    expect_end(tokens)?;

    Ok(statement)
}

/// Parses the header of a `for` block, after the `for` keyword.
///
/// Grammar: `for := "for" identifier ("," identifier)? "in" path`
///
/// # Errors
/// - `UnexpectedToken` if a name is not a plain identifier, `in` is missing,
///   or the target is not an access pattern.
fn parse_for_header<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let item = parse_identifier(tokens, "loop item name")?;

    let index = if let Some((Token::Comma, _)) = tokens.peek() {
        tokens.next();
        Some(parse_identifier(tokens, "loop index name")?)
    } else {
        None
    };

    expect(tokens, &Token::In)?;

    let target = match tokens.next() {
        Some((Token::Path(pattern), _)) => pattern.clone(),
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("expected an access pattern after 'in', found {tok}"),
                                                     line:  *line, });
        },
        None => return Err(end_of_input()),
    };

    Ok(Statement::For { item, index, target })
}
