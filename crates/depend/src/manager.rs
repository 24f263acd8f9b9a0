use marklet_tree::Callable;
use marklet_types::TemplateName;
use std::collections::HashSet;
use std::sync::Arc;

/// What the build knows about one template.
pub trait CompilationUnit {
    fn template_name(&self) -> &TemplateName;

    /// Source modification time. Zero or negative means unknown.
    fn last_modified(&self) -> i64;

    /// Signatures of every template this unit calls.
    fn requirements(&self) -> HashSet<Arc<Callable>>;
}

/// Decides whether a unit needs recompiling.
pub trait CompilationManager: Send + Sync {
    fn source_changed(&self, unit: &dyn CompilationUnit) -> bool;

    fn used_interfaces_changed(&self, unit: &dyn CompilationUnit) -> bool;

    fn needs_recompile(&self, unit: &dyn CompilationUnit) -> bool {
        self.source_changed(unit) || self.used_interfaces_changed(unit)
    }
}

/// Treats everything as changed. Used for clean builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCompilationManager;

impl CompilationManager for SimpleCompilationManager {
    fn source_changed(&self, _unit: &dyn CompilationUnit) -> bool {
        true
    }

    fn used_interfaces_changed(&self, _unit: &dyn CompilationUnit) -> bool {
        true
    }
}
