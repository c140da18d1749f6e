/// Renderable value produced by labels, icons and formatters.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    /// Named icon drawn by the host, e.g. a Lucide glyph name.
    Icon(String),
    Fragment(Vec<Content>),
}

impl Content {
    pub fn text(value: impl Into<String>) -> Self {
        Content::Text(value.into())
    }

    pub fn icon(name: impl Into<String>) -> Self {
        Content::Icon(name.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(text) => text.is_empty(),
            Content::Icon(name) => name.is_empty(),
            Content::Fragment(parts) => parts.iter().all(Content::is_empty),
        }
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Content::Text(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Content::Text(value)
    }
}

/// Text shown for an engine-supplied value: strings unquoted, integral
/// numbers without a fractional part, everything else as JSON.
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => format_number(float),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

pub fn format_number(value: f64) -> String {
    // f64's Display already drops a trailing `.0`.
    format!("{value}")
}
