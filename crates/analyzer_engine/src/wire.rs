use std::collections::BTreeMap;

use analyzer_core::{AnalysisRecord, InaccessibleLink};
use engine_logging::engine_warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub url: &'a str,
}

/// Body returned by `POST /analyze` on success.
#[derive(Debug, Deserialize)]
pub(crate) struct WireAnalysis {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "HTMLVersion", default)]
    html_version: String,
    #[serde(rename = "HeadingsCount", default)]
    headings_count: Option<WireHeadings>,
    #[serde(rename = "InternalLinks", default)]
    internal_links: u32,
    #[serde(rename = "ExternalLinks", default)]
    external_links: u32,
    #[serde(rename = "InaccessibleLinks", default)]
    inaccessible_links: Option<Vec<WireLink>>,
    #[serde(rename = "HasLoginForm", default)]
    has_login_form: bool,
    #[serde(rename = "CreatedAt", default)]
    created_at: String,
    #[serde(rename = "UpdatedAt", default)]
    updated_at: String,
}

/// Heading counts arrive as a JSON-encoded string; a plain object is also
/// accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireHeadings {
    Encoded(String),
    Map(BTreeMap<String, u32>),
}

#[derive(Debug, Deserialize)]
struct WireLink {
    url: String,
    #[serde(default)]
    status: Option<u16>,
}

/// Error body, e.g. `{"error": "Failed to analyze page: ..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl WireError {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|message| !message.trim().is_empty())
    }
}

impl WireAnalysis {
    pub(crate) fn into_record(self) -> AnalysisRecord {
        let heading_counts = match self.headings_count {
            Some(WireHeadings::Map(map)) => map,
            Some(WireHeadings::Encoded(raw)) => decode_headings(self.id, &raw),
            None => BTreeMap::new(),
        };
        AnalysisRecord {
            id: self.id,
            source_url: self.url,
            title: self.title,
            html_version: self.html_version,
            heading_counts,
            internal_link_count: self.internal_links,
            external_link_count: self.external_links,
            inaccessible_links: self
                .inaccessible_links
                .unwrap_or_default()
                .into_iter()
                .map(|link| InaccessibleLink::new(link.url, link.status))
                .collect(),
            has_login_form: self.has_login_form,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn decode_headings(id: u64, raw: &str) -> BTreeMap<String, u32> {
    if raw.trim().is_empty() {
        return BTreeMap::new();
    }
    match serde_json::from_str(raw) {
        Ok(map) => map,
        Err(err) => {
            engine_warn!("Record {} has malformed heading counts: {}", id, err);
            BTreeMap::new()
        }
    }
}
