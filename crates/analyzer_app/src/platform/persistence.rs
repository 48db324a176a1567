use std::collections::BTreeMap;

use analyzer_core::{AnalysisRecord, InaccessibleLink};
use analyzer_engine::StateFile;
use engine_logging::{engine_error, engine_info, engine_warn};
use serde::{Deserialize, Serialize};

pub(crate) const STATE_FILENAME: &str = ".analyzer_state.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedLink {
    url: String,
    status_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedRecord {
    id: u64,
    source_url: String,
    title: String,
    html_version: String,
    #[serde(default)]
    heading_counts: BTreeMap<String, u32>,
    internal_link_count: u32,
    external_link_count: u32,
    #[serde(default)]
    inaccessible_links: Vec<PersistedLink>,
    has_login_form: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    records: Vec<PersistedRecord>,
}

impl From<&AnalysisRecord> for PersistedRecord {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            id: record.id,
            source_url: record.source_url.clone(),
            title: record.title.clone(),
            html_version: record.html_version.clone(),
            heading_counts: record.heading_counts.clone(),
            internal_link_count: record.internal_link_count,
            external_link_count: record.external_link_count,
            inaccessible_links: record
                .inaccessible_links
                .iter()
                .map(|link| PersistedLink {
                    url: link.url.clone(),
                    status_code: link.status_code,
                })
                .collect(),
            has_login_form: record.has_login_form,
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
        }
    }
}

impl From<PersistedRecord> for AnalysisRecord {
    fn from(record: PersistedRecord) -> Self {
        Self {
            id: record.id,
            source_url: record.source_url,
            title: record.title,
            html_version: record.html_version,
            heading_counts: record.heading_counts,
            internal_link_count: record.internal_link_count,
            external_link_count: record.external_link_count,
            inaccessible_links: record
                .inaccessible_links
                .into_iter()
                .map(|link| InaccessibleLink::new(link.url, link.status_code))
                .collect(),
            has_login_form: record.has_login_form,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Loads the last saved collection; empty when missing or unreadable.
pub(crate) fn load_records(file: &StateFile) -> Vec<AnalysisRecord> {
    let content = match file.read() {
        Ok(Some(text)) => text,
        Ok(None) => return Vec::new(),
        Err(err) => {
            engine_warn!(
                "Failed to read persisted state from {:?}: {}",
                file.path(),
                err
            );
            return Vec::new();
        }
    };

    let state: PersistedState = match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            engine_warn!(
                "Failed to parse persisted state from {:?}: {}",
                file.path(),
                err
            );
            return Vec::new();
        }
    };

    let records: Vec<AnalysisRecord> = state.records.into_iter().map(Into::into).collect();
    engine_info!(
        "Loaded {} persisted records from {:?}",
        records.len(),
        file.path()
    );
    records
}

pub(crate) fn save_records(file: &StateFile, records: &[AnalysisRecord]) {
    let state = PersistedState {
        records: records.iter().map(PersistedRecord::from).collect(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&state, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize persisted state: {}", err);
            return;
        }
    };

    if let Err(err) = file.write(&content) {
        engine_error!(
            "Failed to write persisted state to {:?}: {}",
            file.path(),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn sample() -> AnalysisRecord {
        AnalysisRecord {
            id: 8,
            source_url: "https://a.test".to_string(),
            title: "A".to_string(),
            html_version: "HTML 5".to_string(),
            heading_counts: BTreeMap::from([("h1".to_string(), 2)]),
            internal_link_count: 4,
            external_link_count: 1,
            inaccessible_links: vec![
                InaccessibleLink::new("https://a.test/x", Some(404)),
                InaccessibleLink::new("https://gone.test", None),
            ],
            has_login_form: false,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn saved_records_load_back_in_order() {
        let temp = TempDir::new().unwrap();
        let file = StateFile::new(temp.path(), STATE_FILENAME);
        let second = AnalysisRecord::new(9, "https://b.test");

        save_records(&file, &[second.clone(), sample()]);
        assert_eq!(load_records(&file), vec![second, sample()]);
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let file = StateFile::new(temp.path(), STATE_FILENAME);
        assert!(load_records(&file).is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(STATE_FILENAME), "(records: [oops").unwrap();
        let file = StateFile::new(temp.path(), STATE_FILENAME);
        assert!(load_records(&file).is_empty());
    }

    #[test]
    fn persisted_blob_holds_only_records() {
        let temp = TempDir::new().unwrap();
        let file = StateFile::new(temp.path(), STATE_FILENAME);
        save_records(&file, &[sample()]);

        let text = file.read().unwrap().unwrap();
        assert!(text.contains("records"));
        assert!(!text.contains("reanalyzing"));
        assert!(!text.contains("error"));
    }
}
