use crate::alert::{Alert, Severity};
use crate::policy::AlertPolicy;
use crate::sink::AlertSink;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// An immutable, ordered collection of unique alerts.
///
/// Cloning is cheap; stages pass their set forward by value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AlertSet {
    alerts: Arc<[Alert]>,
}

impl AlertSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Alert> {
        self.alerts.iter()
    }

    pub fn contains(&self, alert: &Alert) -> bool {
        self.alerts.contains(alert)
    }

    /// True if any alert is an error under `policy`.
    pub fn has_errors(&self, policy: &dyn AlertPolicy) -> bool {
        self.alerts
            .iter()
            .any(|alert| policy.severity(alert) == Severity::Error)
    }
}

impl<'a> IntoIterator for &'a AlertSet {
    type Item = &'a Alert;
    type IntoIter = std::slice::Iter<'a, Alert>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for AlertSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.alerts.iter().map(|a| a.to_string()))
            .finish()
    }
}

/// Accumulates alerts in insertion order, silently dropping duplicates.
#[derive(Debug, Default)]
pub struct AlertSetBuilder {
    alerts: Vec<Alert>,
    seen: HashSet<Alert>,
}

impl AlertSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a builder that already holds every alert of an earlier stage.
    pub fn from_set(alerts: &AlertSet) -> Self {
        let mut builder = Self::new();
        builder.add_all(alerts);
        builder
    }

    pub fn add_all(&mut self, alerts: &AlertSet) {
        for alert in alerts {
            self.add(alert.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn build_and_clear(&mut self) -> AlertSet {
        self.seen.clear();
        AlertSet {
            alerts: std::mem::take(&mut self.alerts).into(),
        }
    }
}

impl AlertSink for AlertSetBuilder {
    fn add(&mut self, alert: Alert) {
        if self.seen.insert(alert.clone()) {
            self.alerts.push(alert);
        }
    }
}
