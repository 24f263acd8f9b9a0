use crate::error::PipelineError;
use marklet_alerts::{AlertCode, ConfigurableAlertPolicy, Severity};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Build settings, usually loaded from a JSON file.
///
/// ```json
/// {
///   "treat_warnings_as_errors": true,
///   "alert_severities": { "unextractable-content": "warning" },
///   "parallel": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub treat_warnings_as_errors: bool,
    pub alert_severities: HashMap<AlertCode, Severity>,
    /// Run the i18n checker. When off, no unextractable-content alerts are produced.
    pub i18n_check: bool,
    /// Compile independent units concurrently. Ignored without the `rayon-executor` feature.
    pub parallel: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            treat_warnings_as_errors: false,
            alert_severities: HashMap::new(),
            i18n_check: true,
            parallel: true,
        }
    }
}

impl CompilerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn alert_policy(&self) -> ConfigurableAlertPolicy {
        let mut policy = ConfigurableAlertPolicy::new();
        for (code, severity) in &self.alert_severities {
            policy.set_severity(*code, *severity);
        }
        policy.set_treat_warnings_as_errors(self.treat_warnings_as_errors);
        policy
    }
}
