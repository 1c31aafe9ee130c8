use crate::config::ConfigError;
use crate::crawlers::{FetchError, FetchedPage, Fetcher};
use crate::parsers::{PageInspector, summary};
use crate::results::FetchRecord;
use crate::state::{PersistedState, StateError};
use chrono::{SecondsFormat, Utc};
use std::path::Path;

/// Anything that can fail a whole run
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to set up HTTP client: {0}")]
    Client(#[from] FetchError),

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Current UTC instant as ISO-8601 with millisecond precision
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Builds the debug record for a page that was received
pub fn record_for_page(url: &str, page: &FetchedPage, inspector: &PageInspector) -> FetchRecord {
    let inspection = inspector.inspect(&page.body);
    FetchRecord::Fetched {
        url: url.to_string(),
        http_status: page.status,
        has_next_data: inspection.next_data.is_some(),
        next_data_top_level: inspection.next_data.as_ref().map(summary::summarize),
        html_hints: inspection.hints,
    }
}

/// Fetches every source in order, one at a time.
///
/// A failing source is recorded and never stops the ones after it.
pub async fn collect_records<F: Fetcher>(
    fetcher: &F,
    inspector: &PageInspector,
    sources: &[String],
) -> Vec<FetchRecord> {
    let mut records = Vec::with_capacity(sources.len());

    for url in sources {
        ::log::info!("Fetching {}", url);
        let record = match fetcher.fetch(url).await {
            Ok(page) => record_for_page(url, &page, inspector),
            Err(e) => {
                let message = e.describe();
                ::log::warn!("Failed to fetch {}: {}", url, message);
                FetchRecord::failed(url.as_str(), message)
            }
        };
        if let FetchRecord::Fetched {
            http_status,
            has_next_data,
            ..
        } = &record
        {
            ::log::info!(
                "Fetched {} (status {}, embedded data: {})",
                url,
                http_status,
                has_next_data
            );
        }
        records.push(record);
    }

    records
}

/// Load the state, fetch and summarize every source, then write it back
pub async fn run_debug<F: Fetcher>(
    path: &Path,
    sources: &[String],
    fetcher: &F,
    inspector: &PageInspector,
) -> Result<PersistedState, SnapshotError> {
    let mut state = PersistedState::load(path);
    let records = collect_records(fetcher, inspector, sources).await;

    state.apply_run(now_iso(), sources, Some(records))?;
    state.save(path)?;
    Ok(state)
}

/// Load the state, stamp it and write it back without touching the network
pub fn run_timestamp(path: &Path, sources: &[String]) -> Result<PersistedState, SnapshotError> {
    let mut state = PersistedState::load(path);

    state.apply_run(now_iso(), sources, None)?;
    state.save(path)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves canned pages; unknown URLs fail like a refused connection
    struct StubFetcher {
        pages: HashMap<String, FetchedPage>,
    }

    impl StubFetcher {
        fn new(pages: &[(&str, u16, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, status, body)| {
                        (
                            url.to_string(),
                            FetchedPage {
                                status: *status,
                                body: body.to_string(),
                            },
                        )
                    })
                    .collect(),
            }
        }
    }

    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Transport(format!("connection refused: {url}")))
        }
    }

    #[test]
    fn test_now_iso_format() {
        let ts = now_iso();
        assert_eq!(ts.len(), "2024-01-02T03:04:05.678Z".len());
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_record_for_page_with_next_data() {
        let page = FetchedPage {
            status: 200,
            body: r#"<title>Results</title><script id="__NEXT_DATA__" type="application/json">{"props":{"pageProps":{}},"page":"/result","isFallback":false}</script>"#.to_string(),
        };
        let record = record_for_page("https://example.com/r", &page, &PageInspector::default());
        let FetchRecord::Fetched {
            http_status,
            has_next_data,
            next_data_top_level,
            html_hints,
            ..
        } = record
        else {
            panic!("expected a fetched record");
        };
        assert_eq!(http_status, 200);
        assert!(has_next_data);
        assert_eq!(
            next_data_top_level,
            Some(json!({
                "props": "{object keys=pageProps}",
                "page": "/result",
                "isFallback": false
            }))
        );
        assert!(html_hints.has_next_data_tag);
        assert_eq!(html_hints.title.as_deref(), Some("Results"));
    }

    #[test]
    fn test_record_for_page_with_null_next_data() {
        let page = FetchedPage {
            status: 200,
            body: r#"<script id="__NEXT_DATA__">null</script>"#.to_string(),
        };
        let record = record_for_page("https://example.com/r", &page, &PageInspector::default());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["hasNextData"], json!(false));
        assert_eq!(value["nextDataTopLevel"], json!(null));
        assert_eq!(value["htmlHints"]["hasNextDataTag"], json!(true));
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_sources() {
        let fetcher = StubFetcher::new(&[("https://example.com/ok", 404, "<p>gone</p>")]);
        let sources = vec![
            "https://example.com/down".to_string(),
            "https://example.com/ok".to_string(),
        ];
        let records = collect_records(&fetcher, &PageInspector::default(), &sources).await;

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            FetchRecord::failed(
                "https://example.com/down",
                "connection refused: https://example.com/down"
            )
        );
        assert_eq!(records[1].url(), "https://example.com/ok");
        assert!(!records[1].is_failed());
    }

    #[tokio::test]
    async fn test_run_debug_writes_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("results.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"matches": "bad", "lastUpdated": null}"#).unwrap();

        let fetcher = StubFetcher::new(&[("https://example.com/r", 404, "Not Found")]);
        let sources = vec!["https://example.com/r".to_string()];
        let state = run_debug(&path, &sources, &fetcher, &PageInspector::default())
            .await
            .unwrap();

        assert!(state.last_updated().is_some());
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["matches"], json!([]));
        assert_eq!(written["sources"], json!(["https://example.com/r"]));
        assert_eq!(
            written["debug"],
            json!([{
                "url": "https://example.com/r",
                "httpStatus": 404,
                "hasNextData": false,
                "nextDataTopLevel": null,
                "htmlHints": {
                    "length": 9,
                    "hasNextDataTag": false,
                    "hasNuxt": false,
                    "title": null
                }
            }])
        );
    }

    #[test]
    fn test_run_timestamp_leaves_debug() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(
            &path,
            r#"{"debug": [{"url": "https://example.com/old", "error": "boom"}], "matches": []}"#,
        )
        .unwrap();

        let sources = vec!["https://example.com/new".to_string()];
        let state = run_timestamp(&path, &sources).unwrap();

        assert_eq!(
            state.debug_records(),
            Some(vec![FetchRecord::failed("https://example.com/old", "boom")])
        );
        assert_eq!(state.sources(), sources);
        assert_eq!(PersistedState::load(&path), state);
    }
}
