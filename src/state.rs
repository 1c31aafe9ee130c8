use crate::results::FetchRecord;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;

const LAST_UPDATED: &str = "lastUpdated";
const SOURCES: &str = "sources";
const MATCHES: &str = "matches";
const DEBUG: &str = "debug";

/// Errors that can fail a state write
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

/// The persisted results document, read and rewritten once per run.
///
/// Held as the JSON object found on disk so that keys this tool doesn't own
/// keep their value and position. Only `lastUpdated`, `sources`, `matches`
/// and `debug` are ever written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PersistedState {
    document: Map<String, Value>,
}

impl Default for PersistedState {
    fn default() -> Self {
        let mut document = Map::new();
        document.insert(LAST_UPDATED.to_string(), Value::Null);
        document.insert(SOURCES.to_string(), Value::Array(Vec::new()));
        document.insert(MATCHES.to_string(), Value::Array(Vec::new()));
        Self { document }
    }
}

impl PersistedState {
    /// Reads the state at `path`, falling back to the empty default.
    ///
    /// A missing file, unreadable file, invalid JSON or a non-object document
    /// all yield `PersistedState::default()`.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                ::log::debug!("No prior state at {}: {}", path.display(), e);
                return Self::default();
            }
        };
        Self::from_json(&raw)
    }

    /// Parses a state document, never failing
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(document)) => Self::from_document(document),
            Ok(other) => {
                ::log::warn!("State file is not a JSON object ({}), starting fresh", other);
                Self::default()
            }
            Err(e) => {
                ::log::warn!("State file is not valid JSON ({}), starting fresh", e);
                Self::default()
            }
        }
    }

    /// Wraps a parsed document, coercing the fields this tool relies on.
    ///
    /// `debug` is kept exactly as found, whatever its shape.
    pub fn from_document(mut document: Map<String, Value>) -> Self {
        match document.get(LAST_UPDATED) {
            Some(Value::String(_)) | Some(Value::Null) => {}
            Some(other) => {
                ::log::warn!("Replacing non-string lastUpdated ({}) with null", other);
                document.insert(LAST_UPDATED.to_string(), Value::Null);
            }
            None => {
                document.insert(LAST_UPDATED.to_string(), Value::Null);
            }
        }

        let sources_ok = match document.get(SOURCES) {
            Some(Value::Array(items)) => items.iter().all(Value::is_string),
            _ => false,
        };
        if !sources_ok {
            if let Some(other) = document.get(SOURCES) {
                ::log::warn!("Ignoring malformed sources in state file: {}", other);
            }
            document.insert(SOURCES.to_string(), Value::Array(Vec::new()));
        }

        match document.get(MATCHES) {
            Some(Value::Array(_)) => {}
            other => {
                if let Some(other) = other {
                    ::log::warn!("Replacing non-array matches ({}) with []", other);
                }
                document.insert(MATCHES.to_string(), Value::Array(Vec::new()));
            }
        }

        Self { document }
    }

    /// ISO-8601 instant of the last run
    pub fn last_updated(&self) -> Option<&str> {
        self.document.get(LAST_UPDATED).and_then(Value::as_str)
    }

    /// Sources used by the last run
    pub fn sources(&self) -> Vec<String> {
        self.document
            .get(SOURCES)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parsed matches; opaque until the page structure is known
    pub fn matches(&self) -> &[Value] {
        self.document
            .get(MATCHES)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Raw `debug` value, as written by the last debug run or by hand
    pub fn debug(&self) -> Option<&Value> {
        self.document.get(DEBUG)
    }

    /// `debug` parsed as fetch records; `None` when absent or not in that shape
    pub fn debug_records(&self) -> Option<Vec<FetchRecord>> {
        let value = self.debug()?;
        serde_json::from_value(value.clone())
            .map_err(|e| ::log::debug!("debug is not a list of fetch records: {}", e))
            .ok()
    }

    /// Every top-level key, in file order
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Record a finished run: timestamp, the sources used and, when given,
    /// this run's fetch records. `None` leaves the prior `debug` untouched.
    pub fn apply_run(
        &mut self,
        timestamp: String,
        sources: &[String],
        debug: Option<Vec<FetchRecord>>,
    ) -> Result<(), StateError> {
        self.document
            .insert(LAST_UPDATED.to_string(), Value::String(timestamp));
        self.document.insert(
            SOURCES.to_string(),
            Value::Array(sources.iter().cloned().map(Value::String).collect()),
        );
        if let Some(records) = debug {
            self.document
                .insert(DEBUG.to_string(), serde_json::to_value(records)?);
        }
        if !self.document.get(MATCHES).is_some_and(Value::is_array) {
            self.document
                .insert(MATCHES.to_string(), Value::Array(Vec::new()));
        }
        Ok(())
    }

    /// Pretty-printed JSON with a trailing newline
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Overwrites `path` with this state, creating the parent directory.
    ///
    /// The write is not atomic; a crash mid-write leaves a file that `load`
    /// treats as missing.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StateError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        let write_err = |source| StateError::Write {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, json).map_err(write_err)?;
        ::log::debug!("Saved state to {}", path.display());
        Ok(())
    }
}
