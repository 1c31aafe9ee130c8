pub mod html;
pub mod summary;


use crate::results::HtmlHints;
use regex::Regex;
use serde_json::Value;

/// Why no embedded data could be taken from a page
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no __NEXT_DATA__ script tag")]
    MissingTag,

    #[error("__NEXT_DATA__ content is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("__NEXT_DATA__ content is empty ({0})")]
    EmptyPayload(Value),
}

/// `null`, `false`, zero and `""` carry no page data
fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Everything learned from one HTML page
#[derive(Debug, Clone)]
pub struct PageInspection {
    /// Parsed `__NEXT_DATA__` payload (if found and valid)
    pub next_data: Option<Value>,
    pub hints: HtmlHints,
}

/// Scans HTML pages for an embedded Next.js data blob
#[derive(Debug)]
pub struct PageInspector {
    next_data_re: Regex,
    title_re: Regex,
}

impl Default for PageInspector {
    fn default() -> Self {
        Self::new().expect("Built-in regex patterns should be valid")
    }
}

impl PageInspector {
    /// Compile the extraction patterns
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            next_data_re: Regex::new(html::NEXT_DATA_PATTERN)?,
            title_re: Regex::new(html::TITLE_PATTERN)?,
        })
    }

    /// Finds the first `__NEXT_DATA__` script block and parses its content.
    ///
    /// The scan is not nesting-aware: the block ends at the first `</script>`.
    /// A payload of `null`, `false`, `0` or `""` counts as no data.
    pub fn try_extract_next_data(&self, html: &str) -> Result<Value, ExtractError> {
        let content = self
            .next_data_re
            .captures(html)
            .and_then(|caps| caps.get(1))
            .ok_or(ExtractError::MissingTag)?;
        let value: Value = serde_json::from_str(content.as_str())?;
        if is_empty_payload(&value) {
            return Err(ExtractError::EmptyPayload(value));
        }
        Ok(value)
    }

    /// Like `try_extract_next_data`, with every failure collapsed to `None`
    pub fn extract_next_data(&self, html: &str) -> Option<Value> {
        match self.try_extract_next_data(html) {
            Ok(value) => Some(value),
            Err(e) => {
                ::log::debug!("No embedded data: {}", e);
                None
            }
        }
    }

    pub fn html_hints(&self, html: &str) -> HtmlHints {
        html::hints(html, &self.title_re)
    }

    /// Extract embedded data and compute hints in one pass over the page
    pub fn inspect(&self, html: &str) -> PageInspection {
        PageInspection {
            next_data: self.extract_next_data(html),
            hints: self.html_hints(html),
        }
    }
}
