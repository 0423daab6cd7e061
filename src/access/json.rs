use serde_json::Value as Json;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Getter, Traversal},
        path::{index_segment, split_segments},
        value::element_type::ElementType,
    },
};

/// Data access over JSON records.
///
/// Implements [`Getter`] and [`Traversal`] for raw JSON bytes:
///
/// - strings are handed out unescaped, without quotes,
/// - numbers and booleans as their JSON text,
/// - arrays and objects as compact JSON, which can be fed back in,
/// - `null` counts as missing.
///
/// Objects are iterated in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonData;

impl JsonData {
    /// Resolves an access pattern against a parsed document.
    ///
    /// An empty pattern addresses the whole document.
    ///
    /// # Example
    /// ```
    /// use readson::access::json::JsonData;
    /// use serde_json::json;
    ///
    /// let doc = json!({"user": {"address": [{"city": "Lisbon"}]}});
    /// let city = JsonData::resolve(&doc, "user->address[0]->city");
    /// assert_eq!(city, Some(&json!("Lisbon")));
    ///
    /// assert_eq!(JsonData::resolve(&doc, "user->phone"), None);
    /// ```
    #[must_use]
    pub fn resolve<'a>(document: &'a Json, pattern: &str) -> Option<&'a Json> {
        split_segments(pattern).iter().try_fold(document, |current, segment| {
                                          match index_segment(segment) {
                                              Some(i) => current.as_array()?.get(i),
                                              None => current.as_object()?.get(segment.as_str()),
                                          }
                                      })
    }

    /// Text and type of a JSON value, as handed to templates.
    ///
    /// # Example
    /// ```
    /// use readson::{access::json::JsonData, interpreter::value::element_type::ElementType};
    /// use serde_json::json;
    ///
    /// assert_eq!(JsonData::describe(&json!("a\"b")), ("a\"b".to_string(), ElementType::String));
    /// assert_eq!(JsonData::describe(&json!([1, 2])), ("[1,2]".to_string(), ElementType::Array));
    /// assert_eq!(JsonData::describe(&json!(null)).1, ElementType::NotExists);
    /// ```
    #[must_use]
    pub fn describe(value: &Json) -> (String, ElementType) {
        match value {
            Json::Null => ("null".to_string(), ElementType::NotExists),
            Json::Bool(b) => (b.to_string(), ElementType::Boolean),
            Json::Number(n) => (n.to_string(), ElementType::Number),
            Json::String(s) => (s.clone(), ElementType::String),
            Json::Array(_) => (value.to_string(), ElementType::Array),
            Json::Object(_) => (value.to_string(), ElementType::Object),
        }
    }

    fn parse(data: &[u8]) -> EvalResult<Json> {
        serde_json::from_slice(data).map_err(|e| RuntimeError::DataAccess { details: e.to_string() })
    }
}

impl Getter for JsonData {
    fn get(&self, data: &[u8], pattern: &str) -> EvalResult<(String, ElementType)> {
        let not_exists = || RuntimeError::NotExists { pattern: pattern.to_string() };

        // Loop elements that are plain strings are not JSON; nothing can be
        // addressed inside them.
        let document = Self::parse(data).map_err(|_| not_exists())?;

        match Self::resolve(&document, pattern).map(Self::describe) {
            Some((_, ElementType::NotExists)) | None => Err(not_exists()),
            Some(found) => Ok(found),
        }
    }
}

impl Traversal for JsonData {
    fn array_each(&self,
                  data: &[u8],
                  each: &mut dyn FnMut(&[u8], ElementType) -> EvalResult<()>)
                  -> EvalResult<()> {
        match Self::parse(data)? {
            Json::Array(items) => {
                for item in &items {
                    let (text, element_type) = Self::describe(item);
                    each(text.as_bytes(), element_type)?;
                }
                Ok(())
            },
            other => Err(RuntimeError::DataAccess { details: format!("expected an array, found {}",
                                                                     Self::describe(&other).1) }),
        }
    }

    fn object_each(&self,
                   data: &[u8],
                   each: &mut dyn FnMut(&str, &[u8], ElementType) -> EvalResult<()>)
                   -> EvalResult<()> {
        match Self::parse(data)? {
            Json::Object(members) => {
                for (key, value) in &members {
                    let (text, element_type) = Self::describe(value);
                    each(key, text.as_bytes(), element_type)?;
                }
                Ok(())
            },
            other => Err(RuntimeError::DataAccess { details: format!("expected an object, found {}",
                                                                     Self::describe(&other).1) }),
        }
    }
}
