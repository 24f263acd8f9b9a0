use crate::config::CompilerConfig;
use crate::error::PipelineError;
use crate::executor::Executor;
use log::{debug, info, warn};
use marklet_alerts::{AlertCounter, AlertPolicy, AlertSet, AlertSink, ConfigurableAlertPolicy, LoggingAlertSink};
use marklet_compiler::{ContentFlattener, I18nChecker, PlaceholderInserter, PlaceholderPivoter};
use marklet_depend::{CompilationManager, CompilationUnit, DependencyGraph, SimpleCompilationManager};
use marklet_tree::{Callable, I18nChecked, Root, SpaceCollapsed, Tree};
use marklet_types::TemplateName;
use std::collections::HashSet;
use std::sync::Arc;

/// A space-collapsed template waiting to be compiled.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    name: TemplateName,
    last_modified: i64,
    tree: Tree<SpaceCollapsed>,
}

impl SourceUnit {
    pub fn new(tree: Tree<SpaceCollapsed>, last_modified: i64) -> Self {
        Self {
            name: unit_name(tree.root(), tree.position().source_name()),
            last_modified,
            tree,
        }
    }

    pub fn tree(&self) -> &Tree<SpaceCollapsed> {
        &self.tree
    }
}

impl CompilationUnit for SourceUnit {
    fn template_name(&self) -> &TemplateName {
        &self.name
    }

    fn last_modified(&self) -> i64 {
        self.last_modified
    }

    fn requirements(&self) -> HashSet<Arc<Callable>> {
        requirements_of(self.tree.root())
    }
}

fn unit_name(root: &Root, source: &str) -> TemplateName {
    match root.template() {
        Some(template) => template.name.clone(),
        None => TemplateName::new(source),
    }
}

fn requirements_of(root: &Root) -> HashSet<Arc<Callable>> {
    root.template().map(|t| t.requirements()).unwrap_or_default()
}

/// The result of running the middle-end on one unit.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    name: TemplateName,
    last_modified: i64,
    requirements: HashSet<Arc<Callable>>,
    tree: Tree<I18nChecked>,
}

impl CompiledUnit {
    pub fn tree(&self) -> &Tree<I18nChecked> {
        &self.tree
    }

    pub fn alerts(&self) -> &AlertSet {
        self.tree.alerts()
    }

    /// False if any alert is an error under `policy`, in which case no code should be generated.
    pub fn is_usable(&self, policy: &dyn AlertPolicy) -> bool {
        !self.alerts().has_errors(policy)
    }
}

impl CompilationUnit for CompiledUnit {
    fn template_name(&self) -> &TemplateName {
        &self.name
    }

    fn last_modified(&self) -> i64 {
        self.last_modified
    }

    fn requirements(&self) -> HashSet<Arc<Callable>> {
        self.requirements.clone()
    }
}

/// Alert totals for one unit, by effective severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

/// Runs placeholder insertion, content flattening, placeholder pivoting
/// and the i18n check, in that order.
#[derive(Debug, Clone)]
pub struct CompilationPipeline {
    config: CompilerConfig,
    policy: ConfigurableAlertPolicy,
    executor: Executor,
}

impl CompilationPipeline {
    pub fn new(config: CompilerConfig) -> Self {
        let policy = config.alert_policy();
        let executor = Executor::for_config(config.parallel);
        Self {
            config,
            policy,
            executor,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn policy(&self) -> &ConfigurableAlertPolicy {
        &self.policy
    }

    pub fn executor(&self) -> Executor {
        self.executor
    }

    pub fn compile(&self, unit: SourceUnit) -> Result<CompiledUnit, PipelineError> {
        let requirements = unit.requirements();
        let SourceUnit {
            name,
            last_modified,
            tree,
        } = unit;
        debug!("compiling {} ({} alerts so far)", name, tree.alerts().len());

        let inserted = PlaceholderInserter.apply(tree.clone());
        let flattened = ContentFlattener.apply(inserted);
        let pivoted = PlaceholderPivoter.apply(flattened)?;
        let checked = if self.config.i18n_check {
            I18nChecker.apply(&tree, pivoted)?
        } else {
            let (position, alerts, root) = pivoted.into_parts();
            Tree::new(position, alerts, root)
        };

        let compiled = CompiledUnit {
            name,
            last_modified,
            requirements,
            tree: checked,
        };
        debug!("{}: {} done", compiled.name, compiled.tree.stage_name());
        if !compiled.is_usable(&self.policy) {
            warn!("{}: rejected, {} alerts", compiled.name, compiled.alerts().len());
        }
        Ok(compiled)
    }

    /// Compiles each unit independently. Results are in input order and a
    /// failing unit does not affect the others.
    pub fn compile_all(&self, units: Vec<SourceUnit>) -> Vec<Result<CompiledUnit, PipelineError>> {
        debug!("compiling {} units with {}", units.len(), self.executor.name());
        self.executor.execute_all(units, |unit| self.compile(unit))
    }

    /// Logs every alert of `unit` at its effective level and returns the totals.
    pub fn report(&self, unit: &CompiledUnit) -> AlertSummary {
        let mut counter = AlertCounter::new(LoggingAlertSink::new(&self.policy), &self.policy);
        for alert in unit.alerts() {
            counter.add(alert.clone());
        }
        let summary = AlertSummary {
            errors: counter.error_count(),
            warnings: counter.warning_count(),
            infos: counter.info_count(),
        };
        info!(
            "{}: {} errors, {} warnings, {} infos",
            unit.name, summary.errors, summary.warnings, summary.infos
        );
        summary
    }
}

/// Decides which units of a new build can reuse the previous build's output.
pub struct IncrementalBuild {
    manager: Box<dyn CompilationManager>,
}

impl IncrementalBuild {
    /// Everything is stale.
    pub fn clean() -> Self {
        Self {
            manager: Box::new(SimpleCompilationManager),
        }
    }

    pub fn from_previous<'a, I>(previous: I) -> Self
    where
        I: IntoIterator<Item = &'a CompiledUnit>,
    {
        let graph = DependencyGraph::new(previous.into_iter().map(|unit| unit as &dyn CompilationUnit));
        debug!("incremental build over {} known units", graph.len());
        Self {
            manager: Box::new(graph),
        }
    }

    pub fn needs_recompile(&self, unit: &dyn CompilationUnit) -> bool {
        self.manager.needs_recompile(unit)
    }

    /// Splits `units` into those that must be recompiled and those that are up to date.
    pub fn partition(&self, units: Vec<SourceUnit>) -> (Vec<SourceUnit>, Vec<SourceUnit>) {
        units.into_iter().partition(|unit| self.needs_recompile(unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marklet_compiler::test_support::{concat, native, template_tree, text};

    #[test]
    fn test_source_unit_takes_template_name() {
        let unit = SourceUnit::new(template_tree(text("hi")), 5);
        assert_eq!(unit.template_name().as_str(), "test.Main");
        assert_eq!(unit.last_modified(), 5);
        assert!(unit.requirements().is_empty());
    }

    #[test]
    fn test_compile_reports_unextractable_text() {
        let pipeline = CompilationPipeline::new(CompilerConfig::default());
        let compiled = pipeline.compile(SourceUnit::new(template_tree(text("hello")), 1)).unwrap();
        assert_eq!(compiled.alerts().len(), 1);
        assert_eq!(compiled.tree().stage_name(), "i18n-checked");
        assert!(compiled.is_usable(pipeline.policy()));
        assert_eq!(pipeline.report(&compiled).infos, 1);
    }

    #[test]
    fn test_i18n_check_can_be_disabled() {
        let config = CompilerConfig {
            i18n_check: false,
            ..CompilerConfig::default()
        };
        let pipeline = CompilationPipeline::new(config);
        let tree = template_tree(concat(vec![text("a "), native("x")]));
        let compiled = pipeline.compile(SourceUnit::new(tree, 1)).unwrap();
        assert!(compiled.alerts().is_empty());
    }

    #[test]
    fn test_clean_build_recompiles_everything() {
        let unit = SourceUnit::new(template_tree(text("hi")), 1);
        assert!(IncrementalBuild::clean().needs_recompile(&unit));
    }
}
