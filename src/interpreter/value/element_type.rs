/// The closed set of types a template value can have.
///
/// `NotExists` is not a real data type: it is what a lookup reports when an
/// access pattern does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `true` or `false`.
    Boolean,
    /// UTF-8 text.
    String,
    /// A 64-bit float.
    Number,
    /// An array, kept as raw serialized bytes.
    Array,
    /// A key/value object, kept as raw serialized bytes.
    Object,
    /// The lookup failed.
    NotExists,
}

impl ElementType {
    /// Converts a type name used by `is` checks into its type.
    ///
    /// Accepted names are `array`, `object`, `number`, `string` and `bool`.
    ///
    /// # Example
    /// ```
    /// use readson::interpreter::value::element_type::ElementType;
    ///
    /// assert_eq!(ElementType::from_type_name("bool"), Some(ElementType::Boolean));
    /// assert_eq!(ElementType::from_type_name("date"), None);
    /// ```
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "bool" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// The name used for this type in templates and messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::String => "string",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
            Self::NotExists => "nonexistent",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
