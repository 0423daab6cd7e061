/// JSON data access.
///
/// Resolves access patterns and iterates arrays and objects over raw JSON
/// bytes, using `serde_json` with document-ordered objects.
pub mod json;
