use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Parses a comma-separated list of items until a closing token.
///
/// Used for function argument lists. It repeatedly calls `parse_item` to
/// parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g. `)`).
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the block ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((tok, _)) if tok == closing => {
                tokens.next();
                break;
            },
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("expected ',' or {closing}, found {tok}"),
                                                         line:  *line, });
            },
            None => return Err(end_of_input()),
        }
    }
    Ok(items)
}

/// Parses a plain identifier: an access pattern with a single segment.
///
/// Loop variables and function names must be plain identifiers.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at an identifier.
/// - `what`: What the identifier names, for the error message.
///
/// # Returns
/// A `String` containing the identifier.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the next token is not a plain identifier,
/// - the block ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              what: &str)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Path(s), _)) if is_plain_identifier(s) => Ok(s.clone()),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("expected {what}, found {tok}"),
                                              line:  *line, })
        },
        None => Err(end_of_input()),
    }
}

/// Consumes the next token if it equals `expected`.
///
/// # Errors
/// `UnexpectedToken` if another token follows, `UnexpectedEndOfInput` if the
/// block is exhausted.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token)
                                                    -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, _)) if tok == expected => Ok(()),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("expected {expected}, found {tok}"),
                                              line:  *line, })
        },
        None => Err(end_of_input()),
    }
}

/// Fails if any token is left in the block.
pub(in crate::interpreter::parser) fn expect_end<'a, I>(tokens: &mut Peekable<I>)
                                                        -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, line)) => Err(ParseError::UnexpectedTrailingTokens { token: tok.to_string(),
                                                                        line:  *line, }),
        None => Ok(()),
    }
}

/// Error for a block that ends in the middle of the grammar. Text and line
/// are filled in by [`ParseError::in_block`].
pub(in crate::interpreter::parser) const fn end_of_input() -> ParseError {
    ParseError::UnexpectedEndOfInput { text: String::new(),
                                       line: 0 }
}

/// Returns `true` if the pattern has a single segment, e.g. `name` but not
/// `user->name` or `items[0]`.
pub(in crate::interpreter::parser) fn is_plain_identifier(pattern: &str) -> bool {
    !pattern.is_empty() && pattern.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
