use std::{cmp::Ordering, sync::Arc};

use crate::{
    error::{ParseError, RuntimeError},
    interpreter::{
        evaluator::core::EvalResult, parser::core::ParseResult,
        value::element_type::ElementType,
    },
};

/// Represents a typed value produced while evaluating a template.
///
/// Values are immutable once produced. Arrays and objects are never decoded:
/// they keep the raw serialized bytes handed out by the data-access
/// collaborator so they can be fed back to it (for loops, nested lookups).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// A numeric value (double precision floating-point).
    Number(f64),
    /// Raw bytes of an array.
    Array(Arc<[u8]>),
    /// Raw bytes of an object.
    Object(Arc<[u8]>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl Value {
    /// Parses a constant as written inside an expression block.
    ///
    /// - `"..."` is a string; the quotes are removed and `\"`, `\\`, `\n`,
    ///   `\t` escapes are resolved.
    /// - `true` and `false` are booleans.
    /// - Anything else must be a 64-bit float.
    ///
    /// # Errors
    /// `ParseError::MalformedConstant` when the text is none of the above.
    ///
    /// # Example
    /// ```
    /// use readson::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::parse_constant("\"hi\"", 1).unwrap(), Value::from("hi"));
    /// assert_eq!(Value::parse_constant("2.5", 1).unwrap(), Value::Number(2.5));
    /// assert!(Value::parse_constant("two", 1).is_err());
    /// ```
    pub fn parse_constant(text: &str, line: usize) -> ParseResult<Self> {
        let malformed = || ParseError::MalformedConstant { text: text.to_string(),
                                                           line };

        if let Some(inner) = text.strip_prefix('"') {
            let inner = inner.strip_suffix('"').ok_or_else(malformed)?;
            return unescape(inner).map(Self::String).ok_or_else(malformed);
        }

        match text {
            "true" => Ok(Self::Bool(true)),
            "false" => Ok(Self::Bool(false)),
            _ => text.parse::<f64>().map(Self::Number).map_err(|_| malformed()),
        }
    }

    /// Converts raw text returned by a lookup into a value of its declared
    /// type.
    ///
    /// # Errors
    /// `RuntimeError::TypeCoercion` if a number or boolean does not parse, or
    /// if the declared type is `NotExists`.
    ///
    /// # Example
    /// ```
    /// use readson::interpreter::value::{core::Value, element_type::ElementType};
    ///
    /// let v = Value::coerce("42", ElementType::Number).unwrap();
    /// assert_eq!(v, Value::Number(42.0));
    ///
    /// assert!(Value::coerce("forty", ElementType::Number).is_err());
    /// ```
    pub fn coerce(text: &str, declared: ElementType) -> EvalResult<Self> {
        let mismatch = || RuntimeError::TypeCoercion { text:     text.to_string(),
                                                       expected: declared, };

        match declared {
            ElementType::String => Ok(Self::String(text.to_string())),
            ElementType::Boolean => match text {
                "true" => Ok(Self::Bool(true)),
                "false" => Ok(Self::Bool(false)),
                _ => Err(mismatch()),
            },
            ElementType::Number => text.trim().parse().map(Self::Number).map_err(|_| mismatch()),
            ElementType::Array => Ok(Self::Array(text.as_bytes().into())),
            ElementType::Object => Ok(Self::Object(text.as_bytes().into())),
            ElementType::NotExists => Err(mismatch()),
        }
    }

    /// Returns the type of the value.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Bool(_) => ElementType::Boolean,
            Self::String(_) => ElementType::String,
            Self::Number(_) => ElementType::Number,
            Self::Array(_) => ElementType::Array,
            Self::Object(_) => ElementType::Object,
        }
    }

    /// Text used when the value is written into a document.
    ///
    /// Numbers are rounded to two decimals.
    ///
    /// # Example
    /// ```
    /// use readson::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Number(2.0 / 3.0).display(), "0.67");
    /// assert_eq!(Value::Bool(false).display(), "false");
    /// ```
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => format!("{n:.2}"),
            other => other.to_plain_string(),
        }
    }

    /// Text of the value with full numeric precision.
    ///
    /// # Example
    /// ```
    /// use readson::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Number(0.125).to_plain_string(), "0.125");
    /// assert_eq!(Value::Number(3.0).to_plain_string(), "3");
    /// ```
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
            Self::Number(n) => format!("{n}"),
            Self::Array(raw) | Self::Object(raw) => String::from_utf8_lossy(raw).into_owned(),
        }
    }

    /// Orders two values of the same type.
    ///
    /// Strings compare lexicographically, numbers numerically and booleans
    /// with `false < true`; callers decide which operators are legal for
    /// booleans.
    ///
    /// Numbers follow IEEE 754: `-0` equals `0`, and `NaN` is unordered
    /// against everything, itself included (`None`).
    ///
    /// # Errors
    /// - `RuntimeError::IncomparableTypes` when the types differ.
    /// - `RuntimeError::UnsupportedComparison` for arrays and objects.
    ///
    /// # Example
    /// ```
    /// use std::cmp::Ordering;
    ///
    /// use readson::interpreter::value::core::Value;
    ///
    /// let zero = Value::Number(0.0);
    /// assert_eq!(Value::Number(-0.0).compare(&zero).unwrap(), Some(Ordering::Equal));
    /// assert_eq!(Value::Number(f64::NAN).compare(&zero).unwrap(), None);
    /// ```
    pub fn compare(&self, other: &Self) -> EvalResult<Option<Ordering>> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Ok(Some(a.cmp(b))),
            (Self::String(a), Self::String(b)) => Ok(Some(a.cmp(b))),
            (Self::Number(a), Self::Number(b)) => Ok(a.partial_cmp(b)),
            (Self::Array(_), Self::Array(_)) | (Self::Object(_), Self::Object(_)) => {
                Err(RuntimeError::UnsupportedComparison { element_type: self.element_type() })
            },
            _ => Err(RuntimeError::IncomparableTypes { left:  self.element_type(),
                                                       right: other.element_type(), }),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Resolves backslash escapes in the body of a string constant.
///
/// Returns `None` on an unknown escape or a trailing backslash.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            _ => return None,
        }
    }

    Some(out)
}
