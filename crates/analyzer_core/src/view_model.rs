use crate::{AnalysisRecord, ControllerError, RecordId, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub records: Vec<RecordRowView>,
    pub record_count: usize,
    pub submitting: bool,
    /// Input is non-empty and no primary request is in flight.
    pub can_submit: bool,
    pub reanalyzing_ids: Vec<RecordId>,
    pub last_error: Option<String>,
    pub url_input: String,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    pub id: RecordId,
    pub url: String,
    pub title: String,
    pub html_version: String,
    pub internal_links: u32,
    pub external_links: u32,
    pub inaccessible_links: usize,
    pub has_login_form: bool,
    pub reanalyzing: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDetailView {
    pub id: RecordId,
    pub url: String,
    pub title: String,
    pub html_version: String,
    pub has_login_form: bool,
    pub headings: Vec<HeadingCountView>,
    pub links: LinkSplitView,
    pub inaccessible: Vec<InaccessibleLinkView>,
    pub created_at: String,
    pub updated_at: String,
    pub reanalyzing: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingCountView {
    /// Upper-cased tag name, e.g. `H2`.
    pub tag: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSplitView {
    pub internal: u32,
    pub external: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSeverity {
    NoResponse,
    ClientError,
    ServerError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InaccessibleLinkView {
    pub url: String,
    /// Status code as text, or `Error` when the link never answered.
    pub status_label: String,
    pub severity: LinkSeverity,
}

pub(crate) fn build_row(
    record: &AnalysisRecord,
    store: &RecordStore,
    error: Option<&ControllerError>,
) -> RecordRowView {
    RecordRowView {
        id: record.id,
        url: record.source_url.clone(),
        title: record.title.clone(),
        html_version: record.html_version.clone(),
        internal_links: record.internal_link_count,
        external_links: record.external_link_count,
        inaccessible_links: record.inaccessible_links.len(),
        has_login_form: record.has_login_form,
        reanalyzing: store.is_reanalyzing(record.id),
        error: error.map(ToString::to_string),
    }
}

pub(crate) fn build_detail(
    record: &AnalysisRecord,
    store: &RecordStore,
    error: Option<&ControllerError>,
) -> RecordDetailView {
    let headings = record
        .heading_counts
        .iter()
        .map(|(tag, count)| HeadingCountView {
            tag: tag.to_uppercase(),
            count: *count,
        })
        .collect();

    let inaccessible = record
        .inaccessible_links
        .iter()
        .map(|link| {
            let (status_label, severity) = match link.status_code {
                None => ("Error".to_string(), LinkSeverity::NoResponse),
                Some(code) if code >= 500 => (code.to_string(), LinkSeverity::ServerError),
                Some(code) => (code.to_string(), LinkSeverity::ClientError),
            };
            InaccessibleLinkView {
                url: link.url.clone(),
                status_label,
                severity,
            }
        })
        .collect();

    RecordDetailView {
        id: record.id,
        url: record.source_url.clone(),
        title: record.title.clone(),
        html_version: record.html_version.clone(),
        has_login_form: record.has_login_form,
        headings,
        links: LinkSplitView {
            internal: record.internal_link_count,
            external: record.external_link_count,
            total: record.total_links(),
        },
        inaccessible,
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        reanalyzing: store.is_reanalyzing(record.id),
        error: error.map(ToString::to_string),
    }
}
