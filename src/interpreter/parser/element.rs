use std::iter::Peekable;

use crate::{
    ast::{ArithmeticOperator, Element},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::ParseResult,
            utils::{end_of_input, is_plain_identifier, parse_comma_separated},
        },
        value::core::Value,
    },
};

/// Parses an element: anything that evaluates to a value.
///
/// This is the entry point for element parsing and starts at the lowest
/// precedence level, addition and subtraction.
///
/// Grammar: `element := additive`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed element.
pub fn parse_element<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Element>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_additive(tokens)
}

/// Parses addition and subtraction, left-associative.
///
/// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Element>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_multiplicative(tokens)?;

    while let Some((tok, _)) = tokens.peek() {
        let op = match tok {
            Token::Plus => ArithmeticOperator::Add,
            Token::Minus => ArithmeticOperator::Sub,
            _ => break,
        };
        tokens.next();

        let right = parse_multiplicative(tokens)?;
        left = Element::Expression { left: Box::new(left),
                                     op,
                                     right: Box::new(right) };
    }

    Ok(left)
}

/// Parses multiplication and division, left-associative.
///
/// Grammar: `multiplicative := operand (("*" | "/") operand)*`
fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Element>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_operand(tokens)?;

    while let Some((tok, _)) = tokens.peek() {
        let op = match tok {
            Token::Star => ArithmeticOperator::Mul,
            Token::Slash => ArithmeticOperator::Div,
            _ => break,
        };
        tokens.next();

        let right = parse_operand(tokens)?;
        left = Element::Expression { left: Box::new(left),
                                     op,
                                     right: Box::new(right) };
    }

    Ok(left)
}

/// Parses a single operand.
///
/// Operands are:
/// - constants: `"text"`, `true`, `false`, `12.5`, and `-12.5`,
/// - access patterns: `name`, `user->address[0]->city`,
/// - function calls: `name(arg, ...)`,
/// - parenthesized elements: `(a + b)`.
///
/// # Errors
/// - `UnexpectedToken` for anything that cannot start an element.
/// - `MalformedConstant` for constants that do not parse.
/// - `InvalidFunctionName` when a call is made through a nested path.
/// - `ExpectedClosingParen` when a group is not closed.
fn parse_operand<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Element>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Number(text), line)) => {
            Ok(Element::Constant { text:  text.clone(),
                                   value: Value::parse_constant(text, *line)?, })
        },
        Some((Token::Str(text), line)) => {
            let value = Value::parse_constant(text, *line)?;
            Ok(Element::Constant { text: value.to_plain_string(),
                                   value })
        },
        Some((Token::Bool(b), _)) => Ok(Element::constant(Value::Bool(*b))),
        Some((Token::Minus, line)) => match tokens.next() {
            Some((Token::Number(text), _)) => {
                let text = format!("-{text}");
                Ok(Element::Constant { value: Value::parse_constant(&text, *line)?,
                                       text })
            },
            Some((tok, line)) => {
                Err(ParseError::UnexpectedToken { token: format!("expected a number after '-', found {tok}"),
                                                  line:  *line, })
            },
            None => Err(end_of_input()),
        },
        Some((Token::Path(pattern), line)) => {
            if let Some((Token::LParen, _)) = tokens.peek() {
                tokens.next();
                parse_function_call(tokens, pattern, *line)
            } else {
                Ok(Element::access(pattern))
            }
        },
        Some((Token::LParen, line)) => {
            let inner = parse_element(tokens)?;
            match tokens.next() {
                Some((Token::RParen, _)) => Ok(inner),
                _ => Err(ParseError::ExpectedClosingParen { text: String::new(),
                                                            line: *line, }),
            }
        },
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("expected a value, found {tok}"),
                                              line:  *line, })
        },
        None => Err(end_of_input()),
    }
}

/// Parses the argument list of a function call.
///
/// Grammar: `call := identifier "(" (element ("," element)*)? ")"`
///
/// # Parameters
/// - `tokens`: Token stream positioned after the opening parenthesis.
/// - `name`: The name preceding the parenthesis.
/// - `line`: Line number of the name.
///
/// # Returns
/// An `Element::FunctionCall`.
fn parse_function_call<'a, I>(tokens: &mut Peekable<I>,
                              name: &str,
                              line: usize)
                              -> ParseResult<Element>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if !is_plain_identifier(name) {
        return Err(ParseError::InvalidFunctionName { name: name.to_string(),
                                                     line });
    }

    let arguments = parse_comma_separated(tokens, parse_element, &Token::RParen)?;

    Ok(Element::FunctionCall { name: name.to_string(),
                               arguments })
}
