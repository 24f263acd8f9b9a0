//! Diagnostics for the marklet compiler.
//!
//! Every problem found while compiling a template is reported as an [`Alert`]
//! rather than an `Err`. Passes push alerts into an [`AlertSink`]; each stage
//! freezes what it collected into an [`AlertSet`] and hands it to the next
//! stage, which seeds its own [`AlertSetBuilder`] from it.
//!
//! Whether an alert breaks the build is decided by an [`AlertPolicy`], not by
//! the pass that emitted it.

pub mod alert;
pub mod policy;
pub mod set;
pub mod sink;

pub use alert::{Alert, AlertCode, AlertKind, Severity};
pub use policy::{AlertPolicy, ConfigurableAlertPolicy, DefaultAlertPolicy};
pub use set::{AlertSet, AlertSetBuilder};
pub use sink::{AlertCounter, AlertSink, LoggingAlertSink};
