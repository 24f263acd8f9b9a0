use marklet::tree::{Call, CallTarget, Callable, ExprKind, Expression, NodeMeta, SpaceCollapsed, Tree};
use marklet::SourceUnit;
use marklet_compiler::test_support::{meta, pos, template_tree};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn message(content: Expression) -> Expression {
    Expression::new(meta("gxp:msg"), None, ExprKind::UnextractedMessage(Box::new(content)))
}

pub fn ph_start(name: &str, line: u32) -> Expression {
    Expression::placeholder_start(NodeMeta::new(pos(line), "gxp:ph"), None, name, None)
}

pub fn ph_end(line: u32) -> Expression {
    Expression::placeholder_end(NodeMeta::new(pos(line), "gxp:eph"), None)
}

pub fn call(target: CallTarget) -> Expression {
    Expression::new(meta("call"), None, ExprKind::Call(Call::new(target, Vec::new())))
}

pub fn calls(callee: &Arc<Callable>) -> Expression {
    call(CallTarget::Bound(Arc::clone(callee)))
}

/// A collapsed `test.Main` unit whose body is `content`.
pub fn unit(content: Expression, last_modified: i64) -> SourceUnit {
    let tree: Tree<SpaceCollapsed> = template_tree(content);
    SourceUnit::new(tree, last_modified)
}
