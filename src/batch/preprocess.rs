/// Prefix of a macro definition line.
pub const MACRO_PREFIX: &str = "$$$ ";

/// Expands `$$$ name value` macros in a template.
///
/// A definition line is removed from the output. From the next line on,
/// every `$name$` is replaced by `value`. Several macros can be active at
/// once; redefining a name replaces its value for the lines that follow.
/// A definition without a value is ignored.
///
/// Line endings of the remaining lines are kept as they are.
///
/// # Parameters
/// - `source`: The raw template file.
///
/// # Returns
/// The template with definitions removed and macros expanded.
///
/// # Example
/// ```
/// use readson::batch::preprocess::expand_macros;
///
/// let source = "$$$ sep  | \n$a$$sep$$b$\n$$$ sep ,\n$a$$sep$$b$\n";
/// assert_eq!(expand_macros(source), "$a$ | $b$\n$a$,$b$\n");
/// ```
#[must_use]
pub fn expand_macros(source: &str) -> String {
    let mut macros: Vec<(String, String)> = Vec::new();
    let mut out = String::with_capacity(source.len());

    for line in source.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);

        if let Some(definition) = content.strip_prefix(MACRO_PREFIX) {
            if let Some((name, value)) = definition.split_once(' ') {
                let marker = format!("${name}$");
                match macros.iter_mut().find(|(m, _)| *m == marker) {
                    Some(existing) => existing.1 = value.to_string(),
                    None => macros.push((marker, value.to_string())),
                }
            }
            continue;
        }

        let mut expanded = line.to_string();
        for (marker, value) in &macros {
            expanded = expanded.replace(marker.as_str(), value);
        }
        out.push_str(&expanded);
    }

    out
}
