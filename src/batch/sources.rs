use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use regex::Regex;
use serde_json::Value as Json;
use walkdir::WalkDir;

use crate::access::json::JsonData;

/// One input file and the records drawn from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// The file the records come from.
    pub path:    PathBuf,
    /// Every record, as compact JSON.
    pub records: Vec<String>,
}

/// Splits an input expression into its file part and its access pattern.
///
/// The pattern starts at the first `[` or `->`; without either, the whole
/// expression is the file part.
///
/// # Example
/// ```
/// use readson::batch::sources::split_input;
///
/// assert_eq!(split_input("data/*.json->people"), ("data/*.json", "->people"));
/// assert_eq!(split_input("list.json[0]->tags"), ("list.json", "[0]->tags"));
/// assert_eq!(split_input("plain.json"), ("plain.json", ""));
/// ```
#[must_use]
pub fn split_input(expression: &str) -> (&str, &str) {
    let arrow = expression.find("->");
    let bracket = expression.find('[');

    let split = match (arrow, bracket) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    match split {
        Some(at) => expression.split_at(at),
        None => (expression, ""),
    }
}

/// Lists the files an input path refers to.
///
/// - A path ending in `/` is a directory: all files directly inside it.
/// - A path whose file name contains `*` or `?` is a glob over its parent
///   directory.
/// - Anything else is a single file.
///
/// Directory and glob results are sorted by file name.
///
/// # Errors
/// Fails if a directory cannot be read or a single file does not exist.
pub fn find_files(path: &str) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    if path.ends_with('/') {
        return list_dir(Path::new(path), |_| true);
    }

    let as_path = Path::new(path);
    let name = as_path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

    if name.contains(['*', '?']) {
        let matcher = glob_to_regex(name)?;
        let dir = match as_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        return list_dir(dir, |file| matcher.is_match(file));
    }

    if !as_path.is_file() {
        return Err(format!("File '{path}' does not exist or is a directory").into());
    }

    Ok(vec![as_path.to_path_buf()])
}

/// Reads a file and extracts its records.
///
/// The document is parsed as JSON and `pattern` is resolved inside it (an
/// empty pattern selects the whole document). An array yields one record
/// per element, anything else a single record.
///
/// # Errors
/// Fails if the file cannot be read or parsed, or if the pattern does not
/// resolve.
pub fn load_records(path: &Path, pattern: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let text = fs::read_to_string(path).map_err(|e| format!("Cannot read '{}': {e}",
                                                            path.display()))?;
    let document: Json = serde_json::from_str(&text).map_err(|e| {
                                                         format!("'{}' is not valid JSON: {e}",
                                                                 path.display())
                                                     })?;

    let selected = JsonData::resolve(&document, pattern).ok_or_else(|| {
                                                             format!("'{pattern}' does not exist in '{}'",
                                                                     path.display())
                                                         })?;

    let records = match selected {
        Json::Array(items) => items.iter().map(Json::to_string).collect(),
        other => vec![other.to_string()],
    };

    debug!("{} record(s) in {}", records.len(), path.display());

    Ok(records)
}

/// Resolves an input expression into its sources, in file order.
///
/// # Errors
/// Any error from [`find_files`] or [`load_records`].
pub fn discover(expression: &str) -> Result<Vec<Source>, Box<dyn Error>> {
    let (path, pattern) = split_input(expression);

    find_files(path)?.into_iter()
                     .map(|path| -> Result<Source, Box<dyn Error>> {
                         let records = load_records(&path, pattern)?;
                         Ok(Source { path, records })
                     })
                     .collect()
}

/// Converts a file-name glob into an anchored regular expression.
///
/// # Example
/// ```
/// use readson::batch::sources::glob_to_regex;
///
/// let re = glob_to_regex("data_?.json").unwrap();
/// assert!(re.is_match("data_1.json"));
/// assert!(!re.is_match("data_10.json"));
/// assert!(!re.is_match("data_1xjson"));
/// ```
pub fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::from("^");

    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');

    Regex::new(&pattern)
}

fn list_dir(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| format!("Cannot read '{}': {e}", dir.display()))?;
        if entry.file_type().is_file() && entry.file_name().to_str().is_some_and(&keep) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
