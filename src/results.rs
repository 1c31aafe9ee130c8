use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Diagnostics for pages that don't follow the expected embedding convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlHints {
    /// Length of the raw HTML in bytes
    pub length: usize,

    /// Whether the marker `__NEXT_DATA__` appears anywhere in the page
    pub has_next_data_tag: bool,

    /// Whether the marker `__NUXT__` appears anywhere in the page
    pub has_nuxt: bool,

    /// Text of the first `<title>` tag (if available)
    pub title: Option<String>,
}

/// Outcome of fetching one source URL during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchRecord {
    /// The server answered, whatever the status code
    #[serde(rename_all = "camelCase")]
    Fetched {
        url: String,
        http_status: u16,
        has_next_data: bool,
        next_data_top_level: Option<Value>,
        html_hints: HtmlHints,
    },

    /// The request never produced a response body
    Failed { url: String, error: String },
}

impl FetchRecord {
    pub fn failed(url: impl Into<String>, error: impl ToString) -> Self {
        FetchRecord::Failed {
            url: url.into(),
            error: error.to_string(),
        }
    }

    /// URL this record was produced for
    pub fn url(&self) -> &str {
        match self {
            FetchRecord::Fetched { url, .. } | FetchRecord::Failed { url, .. } => url,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchRecord::Failed { .. })
    }
}
