use crate::manager::{CompilationManager, CompilationUnit};
use log::trace;
use marklet_tree::Callable;
use marklet_types::TemplateName;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A unit as it was at the end of the previous build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    name: TemplateName,
    last_modified: i64,
    requirements: HashSet<Arc<Callable>>,
}

impl DependencyNode {
    pub fn new(name: TemplateName, last_modified: i64, requirements: HashSet<Arc<Callable>>) -> Self {
        Self {
            name,
            last_modified,
            requirements,
        }
    }

    pub fn from_unit(unit: &dyn CompilationUnit) -> Self {
        Self::new(unit.template_name().clone(), unit.last_modified(), unit.requirements())
    }

    pub fn name(&self) -> &TemplateName {
        &self.name
    }

    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    pub fn requirements(&self) -> &HashSet<Arc<Callable>> {
        &self.requirements
    }
}

/// Previous-build records keyed by fully-qualified template name.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: HashMap<TemplateName, DependencyNode>,
}

impl DependencyGraph {
    pub fn new<'a, I>(units: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn CompilationUnit>,
    {
        units.into_iter().map(DependencyNode::from_unit).collect()
    }

    pub fn node(&self, name: &TemplateName) -> Option<&DependencyNode> {
        self.nodes.get(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<DependencyNode> for DependencyGraph {
    fn from_iter<T: IntoIterator<Item = DependencyNode>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().map(|node| (node.name.clone(), node)).collect(),
        }
    }
}

impl CompilationManager for DependencyGraph {
    fn source_changed(&self, unit: &dyn CompilationUnit) -> bool {
        let name = unit.template_name();
        let changed = match self.nodes.get(name) {
            Some(node) if node.last_modified > 0 => node.last_modified != unit.last_modified(),
            // Never seen, or no trustworthy timestamp.
            _ => true,
        };
        trace!("{name}: source changed = {changed}");
        changed
    }

    fn used_interfaces_changed(&self, unit: &dyn CompilationUnit) -> bool {
        let name = unit.template_name();
        let changed = match self.nodes.get(name) {
            Some(node) => node.requirements != unit.requirements(),
            None => true,
        };
        trace!("{name}: used interfaces changed = {changed}");
        changed
    }
}
