//! Environment-driven configuration for the analyzer app.

use std::path::PathBuf;

use analyzer_engine::AnalysisSettings;

use super::logging::LogDestination;

const BASE_URL_ENV: &str = "ANALYZER_BASE_URL";
const STATE_DIR_ENV: &str = "ANALYZER_STATE_DIR";
const LOG_TO_ENV: &str = "ANALYZER_LOG_TO";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub analysis: AnalysisSettings,
    pub state_dir: PathBuf,
    pub log_destination: LogDestination,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut analysis = AnalysisSettings::default();
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            analysis.base_url = base_url.trim().to_string();
        }

        let state_dir = lookup(STATE_DIR_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            });

        let log_destination = match lookup(LOG_TO_ENV).as_deref().map(str::trim) {
            Some("terminal") => LogDestination::Terminal,
            Some("both") => LogDestination::Both,
            _ => LogDestination::File,
        };

        Self {
            analysis,
            state_dir,
            log_destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = config(&[]);
        assert_eq!(config.analysis.base_url, "http://localhost:8080");
        assert_eq!(config.log_destination, LogDestination::File);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config(&[
            (BASE_URL_ENV, " http://analyzer.internal:9000 "),
            (STATE_DIR_ENV, "/tmp/analyzer"),
            (LOG_TO_ENV, "both"),
        ]);
        assert_eq!(config.analysis.base_url, "http://analyzer.internal:9000");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/analyzer"));
        assert_eq!(config.log_destination, LogDestination::Both);
    }
}
