//! Suggestion data sources.
//!
//! The concrete data source is an injected capability: anything that can
//! asynchronously turn a query into a list of [`Suggestion`]s. The widget
//! never talks to the network or disk itself; it awaits whatever future the
//! source returns and treats the source as untrusted content.
//!
//! [`StaticListSource`] is the built-in default, a fixed in-memory dataset
//! with literal substring matching. It is what the demo uses and what the
//! widget falls back to when no source is injected.

use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;

use crate::highlight::MatchSpan;

// ============================================================================
// Suggestions
// ============================================================================

/// One candidate match produced by a data source for a query.
///
/// Immutable once received; `spans` locate the query occurrences inside
/// `value` and feed the highlighter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The suggested value, committed verbatim on selection.
    pub value: String,
    /// Byte ranges of `value` that matched the query. Order irrelevant.
    pub spans: Vec<MatchSpan>,
}

impl Suggestion {
    /// Create a suggestion with the given match spans.
    pub fn new(value: impl Into<String>, spans: Vec<MatchSpan>) -> Self {
        Self {
            value: value.into(),
            spans,
        }
    }
}

/// Errors a data source may report.
///
/// These never reach the embedding caller: the coordinator catches them,
/// logs, and degrades to "no suggestions".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The backing service could not be reached.
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    /// The source failed while producing matches.
    #[error("data source failed: {0}")]
    Failed(String),
}

/// Result alias for fetch operations.
pub type FetchResult = Result<Vec<Suggestion>, SourceError>;

// ============================================================================
// Source Capability
// ============================================================================

/// The injected data-source capability.
///
/// Implementations must resolve to the full candidate list for `query`;
/// rejections are recovered by the caller and must not be relied on for
/// control flow.
pub trait SuggestionSource: Send + Sync {
    /// Fetch candidate matches for `query`.
    fn fetch_matches(&self, query: &str) -> BoxFuture<'static, FetchResult>;
}

/// Any `Fn(&str) -> BoxFuture` closure is a source.
impl<F> SuggestionSource for F
where
    F: Fn(&str) -> BoxFuture<'static, FetchResult> + Send + Sync,
{
    fn fetch_matches(&self, query: &str) -> BoxFuture<'static, FetchResult> {
        self(query)
    }
}

// ============================================================================
// Static List Source
// ============================================================================

/// Controls how the static source handles letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    /// Case-sensitive matching ("chi" won't match "Chicago").
    CaseSensitive,
    /// Case-insensitive matching (default).
    #[default]
    CaseInsensitive,
}

/// The fixed dataset the widget ships with.
const DEFAULT_DATASET: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
    "Austin",
    "Jacksonville",
    "Fort Worth",
    "Columbus",
    "Charlotte",
];

/// A source backed by a fixed list of strings.
///
/// Performs literal substring matching (no fuzzy scoring) and reports one
/// span per non-overlapping occurrence of the query. An optional artificial
/// latency makes demos behave like a remote backend.
#[derive(Debug, Clone)]
pub struct StaticListSource {
    items: Vec<String>,
    case_sensitivity: CaseSensitivity,
    latency: Option<Duration>,
}

impl StaticListSource {
    /// Create a source over the given items.
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            case_sensitivity: CaseSensitivity::default(),
            latency: None,
        }
    }

    /// The built-in demo dataset (US cities).
    pub fn with_default_dataset() -> Self {
        Self::new(DEFAULT_DATASET.iter().map(|s| s.to_string()).collect())
    }

    /// Set case sensitivity using builder pattern.
    pub fn with_case_sensitivity(mut self, sensitivity: CaseSensitivity) -> Self {
        self.case_sensitivity = sensitivity;
        self
    }

    /// Delay each fetch by `latency`, simulating a remote backend.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The backing items.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Compute matches synchronously.
    fn matches_for(&self, query: &str) -> Vec<Suggestion> {
        self.items
            .iter()
            .filter_map(|item| {
                let spans = find_spans(item, query, self.case_sensitivity);
                (!spans.is_empty()).then(|| Suggestion::new(item.clone(), spans))
            })
            .collect()
    }
}

impl SuggestionSource for StaticListSource {
    fn fetch_matches(&self, query: &str) -> BoxFuture<'static, FetchResult> {
        let results = self.matches_for(query);
        let latency = self.latency;
        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            Ok(results)
        }
        .boxed()
    }
}

/// Single-char case fold; the simplified fold is enough for literal matching.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Byte spans of the non-overlapping occurrences of `query` in `value`.
fn find_spans(value: &str, query: &str, sensitivity: CaseSensitivity) -> Vec<MatchSpan> {
    if query.is_empty() {
        return Vec::new();
    }

    if sensitivity == CaseSensitivity::CaseSensitive {
        return value
            .match_indices(query)
            .map(|(at, matched)| MatchSpan::new(at, at + matched.len()))
            .collect();
    }

    let needle: Vec<char> = query.chars().map(fold).collect();
    let haystack: Vec<(usize, char)> = value.char_indices().collect();

    let mut spans = Vec::new();
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        let hit = needle
            .iter()
            .enumerate()
            .all(|(k, &nc)| fold(haystack[i + k].1) == nc);
        if hit {
            let (start, _) = haystack[i];
            let (last_at, last_char) = haystack[i + needle.len() - 1];
            spans.push(MatchSpan::new(start, last_at + last_char.len_utf8()));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    spans
}
