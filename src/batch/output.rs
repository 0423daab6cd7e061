use std::path::{Path, PathBuf};

/// Where rendered documents go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// One file per record, next to its source:
    /// `<source dir>/<source stem><n><ext>`.
    PerRecord,
    /// One file per record, named after a record field:
    /// `<dir>/<field value><ext>`.
    Named {
        /// Directory prefix, possibly empty.
        dir:   String,
        /// Access pattern of the field giving the name.
        field: String,
    },
    /// Every document, in record order, in `<path><ext>`.
    Single(PathBuf),
}

impl OutputMode {
    /// Picks the mode from the command-line options. The two options are
    /// mutually exclusive; `output` wins if both are somehow given.
    ///
    /// # Example
    /// ```
    /// use readson::batch::output::OutputMode;
    ///
    /// assert_eq!(OutputMode::from_options(Some("out/user->id"), None),
    ///            OutputMode::Named { dir:   "out/".to_string(),
    ///                                field: "user->id".to_string(), });
    /// assert_eq!(OutputMode::from_options(None, None), OutputMode::PerRecord);
    /// ```
    #[must_use]
    pub fn from_options(name_pattern: Option<&str>, output: Option<&Path>) -> Self {
        match (output, name_pattern) {
            (Some(path), _) => Self::Single(path.to_path_buf()),
            (None, Some(pattern)) => {
                let (dir, field) = match pattern.rfind('/') {
                    Some(at) => pattern.split_at(at + 1),
                    None => ("", pattern),
                };
                Self::Named { dir:   dir.to_string(),
                              field: field.to_string(), }
            },
            (None, None) => Self::PerRecord,
        }
    }
}

/// Extension of the template file, with its dot, or an empty string.
///
/// # Example
/// ```
/// use std::path::Path;
///
/// use readson::batch::output::template_extension;
///
/// assert_eq!(template_extension(Path::new("report.md")), ".md");
/// assert_eq!(template_extension(Path::new("README")), "");
/// ```
#[must_use]
pub fn template_extension(template: &Path) -> String {
    template.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
}

/// Default name of the `index`-th document rendered from `source`.
///
/// The stem is the file name up to its first dot.
///
/// # Example
/// ```
/// use std::path::{Path, PathBuf};
///
/// use readson::batch::output::record_path;
///
/// assert_eq!(record_path(Path::new("data/people.v2.json"), 3, ".md"),
///            PathBuf::from("data/people3.md"));
/// ```
#[must_use]
pub fn record_path(source: &Path, index: usize, extension: &str) -> PathBuf {
    let name = source.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();

    source.with_file_name(format!("{stem}{index}{extension}"))
}

/// Name of a document named after a record field.
///
/// Path separators in the value become `_`, so every document lands
/// directly inside `dir`.
///
/// # Errors
/// Fails for values that name no file: empty, `.` or `..`.
///
/// # Example
/// ```
/// use std::path::PathBuf;
///
/// use readson::batch::output::named_path;
///
/// assert_eq!(named_path("out/", "../etc/x", ".md").unwrap(), PathBuf::from("out/.._etc_x.md"));
/// assert!(named_path("out/", "..", ".md").is_err());
/// ```
pub fn named_path(dir: &str, value: &str, extension: &str) -> Result<PathBuf, String> {
    let name = value.replace(['/', '\\'], "_");
    if matches!(name.as_str(), "" | "." | "..") {
        return Err(format!("'{value}' cannot be used as a file name"));
    }

    Ok(PathBuf::from(format!("{dir}{name}{extension}")))
}

/// Name of the single output file.
#[must_use]
pub fn single_path(output: &Path, extension: &str) -> PathBuf {
    let mut path = output.as_os_str().to_os_string();
    path.push(extension);
    PathBuf::from(path)
}
