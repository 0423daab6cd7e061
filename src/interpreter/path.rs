/// Splits an access pattern into its segments.
///
/// `->` and `.` separate property segments; an index such as `[0]` is a
/// segment on its own and keeps its brackets, so consumers can tell array
/// indices from property names. Empty segments are dropped, which lets a
/// remainder like `->city` (what is left of `item->city` once the loop item
/// is stripped) resolve as `city`.
///
/// # Parameters
/// - `pattern`: The access pattern, e.g. `user->address[0]->city`.
///
/// # Returns
/// The ordered segments.
///
/// # Example
/// ```
/// use readson::interpreter::path::split_segments;
///
/// assert_eq!(split_segments("user->address[0]->city"),
///            vec!["user", "address", "[0]", "city"]);
/// assert_eq!(split_segments("a.b"), vec!["a", "b"]);
/// assert_eq!(split_segments("[2]"), vec!["[2]"]);
/// assert!(split_segments("").is_empty());
/// ```
#[must_use]
pub fn split_segments(pattern: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '-' if chars.peek() == Some(&'>') => {
                chars.next();
                flush(&mut segments, &mut current);
            },
            '.' => flush(&mut segments, &mut current),
            '[' => {
                flush(&mut segments, &mut current);
                current.push(c);
            },
            ']' => {
                current.push(c);
                flush(&mut segments, &mut current);
            },
            _ => current.push(c),
        }
    }
    flush(&mut segments, &mut current);

    segments
}

/// Parses an index segment such as `[3]`.
///
/// # Example
/// ```
/// use readson::interpreter::path::index_segment;
///
/// assert_eq!(index_segment("[3]"), Some(3));
/// assert_eq!(index_segment("name"), None);
/// ```
#[must_use]
pub fn index_segment(segment: &str) -> Option<usize> {
    segment.strip_prefix('[')?.strip_suffix(']')?.parse().ok()
}

/// Returns the part of `pattern` that follows the loop item `item`, or `None`
/// if `pattern` does not refer to the item.
///
/// The item must be followed by the end of the pattern or by a separator, so
/// an item called `x` does not capture an outer name such as `xs`.
///
/// # Example
/// ```
/// use readson::interpreter::path::strip_item;
///
/// assert_eq!(strip_item("x->name", "x"), Some("->name"));
/// assert_eq!(strip_item("x[1]", "x"), Some("[1]"));
/// assert_eq!(strip_item("x", "x"), Some(""));
/// assert_eq!(strip_item("xs", "x"), None);
/// ```
#[must_use]
pub fn strip_item<'a>(pattern: &'a str, item: &str) -> Option<&'a str> {
    let rest = pattern.strip_prefix(item)?;

    if rest.is_empty() || rest.starts_with("->") || rest.starts_with('.') || rest.starts_with('[')
    {
        Some(rest)
    } else {
        None
    }
}

fn flush(segments: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        segments.push(std::mem::take(current));
    }
}
