use crate::alert::{Alert, AlertCode, Severity};
use std::collections::HashMap;

/// Decides the effective severity of an alert.
pub trait AlertPolicy: Send + Sync {
    fn severity(&self, alert: &Alert) -> Severity;
}

/// Uses each alert's default severity unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAlertPolicy;

impl AlertPolicy for DefaultAlertPolicy {
    fn severity(&self, alert: &Alert) -> Severity {
        alert.default_severity()
    }
}

/// Per-code severity overrides plus an optional warnings-as-errors switch.
#[derive(Debug, Clone, Default)]
pub struct ConfigurableAlertPolicy {
    overrides: HashMap<AlertCode, Severity>,
    treat_warnings_as_errors: bool,
}

impl ConfigurableAlertPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_severity(&mut self, code: AlertCode, severity: Severity) {
        self.overrides.insert(code, severity);
    }

    pub fn with_severity(mut self, code: AlertCode, severity: Severity) -> Self {
        self.set_severity(code, severity);
        self
    }

    pub fn treat_warnings_as_errors(&self) -> bool {
        self.treat_warnings_as_errors
    }

    pub fn set_treat_warnings_as_errors(&mut self, value: bool) {
        self.treat_warnings_as_errors = value;
    }
}

impl AlertPolicy for ConfigurableAlertPolicy {
    fn severity(&self, alert: &Alert) -> Severity {
        let severity = self
            .overrides
            .get(&alert.code())
            .copied()
            .unwrap_or_else(|| alert.default_severity());
        if self.treat_warnings_as_errors && severity == Severity::Warning {
            Severity::Error
        } else {
            severity
        }
    }
}
