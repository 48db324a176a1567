use std::collections::BTreeMap;

/// Server-assigned identity of a completed analysis.
pub type RecordId = u64;

/// A link on the analyzed page that did not answer successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InaccessibleLink {
    pub url: String,
    /// `None` when the link produced no response at all.
    pub status_code: Option<u16>,
}

impl InaccessibleLink {
    pub fn new(url: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            url: url.into(),
            status_code: status_code.filter(|code| *code != 0),
        }
    }
}

/// One completed analysis result for a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisRecord {
    pub id: RecordId,
    pub source_url: String,
    pub title: String,
    pub html_version: String,
    pub heading_counts: BTreeMap<String, u32>,
    pub internal_link_count: u32,
    pub external_link_count: u32,
    pub inaccessible_links: Vec<InaccessibleLink>,
    pub has_login_form: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl AnalysisRecord {
    /// Minimal record carrying only identity and URL; handy for fixtures.
    pub fn new(id: RecordId, source_url: impl Into<String>) -> Self {
        Self {
            id,
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    /// Internal plus external links, widened so it cannot overflow.
    pub fn total_links(&self) -> u64 {
        u64::from(self.internal_link_count) + u64::from(self.external_link_count)
    }
}
