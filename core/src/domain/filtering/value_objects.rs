/// A parameter coerced through one of the typed accessors.
///
/// `name` is the backend-facing reference used to build condition
/// expressions; `value` is `None` when the parameter is absent from the
/// source, in which case no condition is emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Param<T> {
    pub name: String,
    pub value: Option<ParamValue<T>>,
}

/// A present parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue<T> {
    /// The literal `"null"` sentinel: match unset/absent fields.
    Null,
    /// A scalar. For string parameters this may carry a comma-delimited
    /// membership list, split by the condition builders.
    Single(T),
    /// Closed lower/upper pair for a between-condition.
    Range(T, T),
}

impl<T> Param<T> {
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn new(name: impl Into<String>, value: ParamValue<T>) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }
}
