use crate::{error::ParseError, interpreter::parser::core::ParseResult};

/// The marker that opens and closes expression blocks.
pub const MARKER: char = '$';

/// One run of template text: either literal text or the content of an
/// expression block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// The text, without markers.
    pub text:          &'a str,
    /// `true` for expression blocks.
    pub is_expression: bool,
    /// The 1-based line on which the block starts.
    pub line:          usize,
}

/// Splits a template into literal text and expression blocks.
///
/// Every marker toggles between the two modes, starting in literal text, so
/// a template whose first character is the marker opens with an expression.
/// A marker immediately followed by another one while in literal text is an
/// empty expression and stands for a literal marker character.
///
/// # Parameters
/// - `source`: The whole template.
///
/// # Returns
/// The blocks in template order. Empty literal runs are omitted.
///
/// # Errors
/// `UnterminatedExpression` if the last expression block is never closed.
///
/// # Example
/// ```
/// use readson::interpreter::parser::block::split_blocks;
///
/// let blocks = split_blocks("Hi $name$!").unwrap();
/// assert_eq!(blocks.len(), 3);
/// assert!(blocks[1].is_expression);
/// assert_eq!(blocks[1].text, "name");
///
/// assert!(split_blocks("Hi $name").is_err());
/// ```
pub fn split_blocks(source: &str) -> ParseResult<Vec<Block<'_>>> {
    let mut blocks = Vec::new();
    let mut line = 1;
    let mut rest = source;

    loop {
        let Some(open) = rest.find(MARKER) else {
            push_text(&mut blocks, rest, line);
            break;
        };

        let (text, after) = rest.split_at(open);
        push_text(&mut blocks, text, line);
        line += count_lines(text);

        let after = &after[MARKER.len_utf8()..];

        if let Some(tail) = after.strip_prefix(MARKER) {
            blocks.push(Block { text: &after[..MARKER.len_utf8()],
                                is_expression: false,
                                line });
            rest = tail;
            continue;
        }

        let Some(close) = after.find(MARKER) else {
            return Err(ParseError::UnterminatedExpression { text: after.trim().to_string(),
                                                            line });
        };

        let expression = &after[..close];
        blocks.push(Block { text: expression,
                            is_expression: true,
                            line });
        line += count_lines(expression);
        rest = &after[close + MARKER.len_utf8()..];
    }

    Ok(blocks)
}

fn push_text<'a>(blocks: &mut Vec<Block<'a>>, text: &'a str, line: usize) {
    if !text.is_empty() {
        blocks.push(Block { text,
                            is_expression: false,
                            line });
    }
}

fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}
