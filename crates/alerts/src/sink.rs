use crate::alert::{Alert, Severity};
use crate::policy::AlertPolicy;

/// Receives alerts as a pass discovers them.
pub trait AlertSink {
    fn add(&mut self, alert: Alert);
}

impl<S: AlertSink + ?Sized> AlertSink for &mut S {
    fn add(&mut self, alert: Alert) {
        (**self).add(alert);
    }
}

/// Forwards alerts to the `log` facade at the level the policy assigns.
pub struct LoggingAlertSink<'a> {
    policy: &'a dyn AlertPolicy,
}

impl<'a> LoggingAlertSink<'a> {
    pub fn new(policy: &'a dyn AlertPolicy) -> Self {
        Self { policy }
    }
}

impl AlertSink for LoggingAlertSink<'_> {
    fn add(&mut self, alert: Alert) {
        match self.policy.severity(&alert) {
            Severity::Error => log::error!("{}", alert),
            Severity::Warning => log::warn!("{}", alert),
            Severity::Info => log::info!("{}", alert),
        }
    }
}

/// Counts alerts by effective severity, optionally forwarding them on.
pub struct AlertCounter<'a, S: AlertSink> {
    inner: S,
    policy: &'a dyn AlertPolicy,
    errors: usize,
    warnings: usize,
    infos: usize,
}

impl<'a, S: AlertSink> AlertCounter<'a, S> {
    pub fn new(inner: S, policy: &'a dyn AlertPolicy) -> Self {
        Self {
            inner,
            policy,
            errors: 0,
            warnings: 0,
            infos: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn info_count(&self) -> usize {
        self.infos
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AlertSink> AlertSink for AlertCounter<'_, S> {
    fn add(&mut self, alert: Alert) {
        match self.policy.severity(&alert) {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.infos += 1,
        }
        self.inner.add(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertCode;
    use crate::policy::{ConfigurableAlertPolicy, DefaultAlertPolicy};
    use crate::set::AlertSetBuilder;
    use marklet_types::SourcePosition;

    #[test]
    fn test_counter_counts_by_policy_severity() {
        let policy = ConfigurableAlertPolicy::new()
            .with_severity(AlertCode::EmptyPlaceholder, Severity::Warning);
        let mut counter = AlertCounter::new(AlertSetBuilder::new(), &policy);

        let pos = SourcePosition::new("t.gxp", 1, 1);
        counter.add(Alert::unextractable_content(pos.clone(), "text"));
        counter.add(Alert::empty_placeholder(pos.clone(), "<b>"));
        counter.add(Alert::double_else(pos, "<gxp:else>"));

        assert_eq!(counter.info_count(), 1);
        assert_eq!(counter.warning_count(), 1);
        assert_eq!(counter.error_count(), 1);
        assert_eq!(counter.into_inner().build_and_clear().len(), 3);
    }

    #[test]
    fn test_logging_sink_accepts_every_severity() {
        let policy = DefaultAlertPolicy;
        let mut sink = LoggingAlertSink::new(&policy);
        let pos = SourcePosition::new("t.gxp", 1, 1);
        sink.add(Alert::unextractable_content(pos.clone(), "text"));
        sink.add(Alert::double_else(pos, "<gxp:else>"));
    }
}
