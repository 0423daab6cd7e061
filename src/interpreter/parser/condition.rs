use std::iter::Peekable;

use crate::{
    ast::{ComparisonOperator, Condition},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::ParseResult,
            element::parse_element,
            utils::{end_of_input, expect},
        },
        value::element_type::ElementType,
    },
};

/// Parses a full condition.
///
/// Precedence, lowest first: `or`, `and`, negation, then primaries.
///
/// Grammar: `condition := or`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed condition.
pub fn parse_condition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Condition>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_or(tokens)
}

/// Parses logical OR (`or`), left-associative.
///
/// Grammar: `or := and ("or" and)*`
fn parse_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Condition>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_and(tokens)?;

    while let Some((Token::Or, _)) = tokens.peek() {
        tokens.next();
        let right = parse_and(tokens)?;
        left = Condition::Or(Box::new(left), Box::new(right));
    }

    Ok(left)
}

/// Parses logical AND (`and`), left-associative.
///
/// Grammar: `and := not ("and" not)*`
fn parse_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Condition>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_not(tokens)?;

    while let Some((Token::And, _)) = tokens.peek() {
        tokens.next();
        let right = parse_not(tokens)?;
        left = Condition::And(Box::new(left), Box::new(right));
    }

    Ok(left)
}

/// Parses negation. `not` and `!` are interchangeable and may be stacked.
///
/// Grammar: `not := ("not" | "!") not | primary`
fn parse_not<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Condition>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Not | Token::Bang, _)) = tokens.peek() {
        tokens.next();
        let inner = parse_not(tokens)?;
        return Ok(Condition::Negated(Box::new(inner)));
    }

    parse_primary(tokens)
}

/// Parses a primary condition.
///
/// Grammar:
/// ```text
///     primary := "(" condition ")"
///              | "exists" element
///              | element "is" typename
///              | element comparison element
///              | element
/// ```
///
/// A leading parenthesis is ambiguous: `(a or b)` groups a condition while
/// `(a + 1) > b` groups an element. The condition reading is tried first on
/// a copy of the stream and kept only if no comparison, arithmetic or `is`
/// follows the closing parenthesis.
///
/// # Errors
/// - `UnknownType` if `is` is not followed by a known type name.
/// - Propagates any errors from element parsing.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Condition>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::Exists, _)) => {
            tokens.next();
            return Ok(Condition::Exists(parse_element(tokens)?));
        },
        Some((Token::LParen, _)) => {
            let mut lookahead = tokens.clone();
            if let Some(grouped) = try_grouped(&mut lookahead) {
                *tokens = lookahead;
                return Ok(grouped);
            }
        },
        None => return Err(end_of_input()),
        _ => {},
    }

    let left = parse_element(tokens)?;

    if let Some((Token::Is, _)) = tokens.peek() {
        tokens.next();
        return match tokens.next() {
            Some((Token::Path(name), line)) => match ElementType::from_type_name(name) {
                Some(expected) => Ok(Condition::TypeCheck { element: left,
                                                            expected }),
                None => Err(ParseError::UnknownType { name: name.clone(),
                                                      line: *line, }),
            },
            Some((tok, line)) => Err(ParseError::UnknownType { name: tok.to_string(),
                                                               line: *line, }),
            None => Err(end_of_input()),
        };
    }

    match tokens.peek().and_then(|(tok, _)| comparison_operator(tok)) {
        Some(op) => {
            tokens.next();
            let right = parse_element(tokens)?;
            Ok(Condition::Operator { left, op, right })
        },
        None => Ok(Condition::Single(left)),
    }
}

/// Attempts to read `( condition )` and returns it if nothing that continues
/// an element or comparison follows.
fn try_grouped<'a, I>(tokens: &mut Peekable<I>) -> Option<Condition>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen).ok()?;
    let inner = parse_condition(tokens).ok()?;
    expect(tokens, &Token::RParen).ok()?;

    match tokens.peek() {
        Some((tok, _)) if continues_element(tok) => None,
        _ => Some(inner),
    }
}

/// Tokens that can follow an element inside a condition.
const fn continues_element(token: &Token) -> bool {
    matches!(token,
             Token::Plus
             | Token::Minus
             | Token::Star
             | Token::Slash
             | Token::Is
             | Token::Equals
             | Token::EqualEqual
             | Token::BangEqual
             | Token::Less
             | Token::LessEqual
             | Token::Greater
             | Token::GreaterEqual)
}

/// Maps a token to the comparison operator it denotes. `==` is an alias of
/// `=`.
const fn comparison_operator(token: &Token) -> Option<ComparisonOperator> {
    match token {
        Token::Equals | Token::EqualEqual => Some(ComparisonOperator::Equal),
        Token::BangEqual => Some(ComparisonOperator::NotEqual),
        Token::Less => Some(ComparisonOperator::Less),
        Token::LessEqual => Some(ComparisonOperator::LessEqual),
        Token::Greater => Some(ComparisonOperator::Greater),
        Token::GreaterEqual => Some(ComparisonOperator::GreaterEqual),
        _ => None,
    }
}
