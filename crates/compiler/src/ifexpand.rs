use log::debug;
use marklet_alerts::{Alert, AlertSetBuilder, AlertSink};
use marklet_tree::{ElementKind, Forest, IfExpanded, NodeMeta, Parsed, ParsedAttribute, ParsedElement};

/// Turns flat `if` / `elif` / `else` siblings into `Cond` groups of `Clause`s.
///
/// Each `if` becomes a [`ElementKind::Cond`] whose children are clauses in
/// source order. A clause keeps the attributes of the marker that started
/// it, so the condition travels with the branch. Misplaced markers are
/// dropped with an alert and compilation of the siblings continues. Alerts
/// that the dropped subtree would have produced are not reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct IfExpander;

impl IfExpander {
    pub fn apply(&self, forest: Forest<Parsed>) -> Forest<IfExpanded> {
        let (position, alerts, children) = forest.into_parts();
        let mut builder = AlertSetBuilder::from_set(&alerts);
        debug!("if expansion: {} top-level nodes", children.len());
        let children = children
            .into_iter()
            .map(|child| expand(child, &mut builder))
            .collect();
        let alerts = builder.build_and_clear();
        debug!("if expansion done: {} alerts", alerts.len());
        Forest::new(position, alerts, children)
    }
}

fn expand(node: ParsedElement, sink: &mut dyn AlertSink) -> ParsedElement {
    match node.kind {
        ElementKind::If => expand_if(node, sink),
        ElementKind::Elif | ElementKind::Else => {
            sink.add(Alert::bad_node_placement(
                node.meta.position.clone(),
                node.display_name(),
                None,
            ));
            ParsedElement::null(node.meta)
        }
        ElementKind::Cond
        | ElementKind::Clause
        | ElementKind::Null
        | ElementKind::Text(_)
        | ElementKind::Element { .. } => {
            let children = node
                .children
                .into_iter()
                .map(|child| expand(child, sink))
                .collect();
            ParsedElement { children, ..node }
        }
    }
}

struct ClauseBuilder {
    clauses: Vec<ParsedElement>,
    from: Option<(NodeMeta, Vec<ParsedAttribute>)>,
    children: Vec<ParsedElement>,
    saw_else: bool,
}

impl ClauseBuilder {
    fn flush(&mut self) {
        if let Some((meta, attributes)) = self.from.take() {
            let children = std::mem::take(&mut self.children);
            self.clauses.push(ParsedElement::new(
                meta,
                ElementKind::Clause,
                attributes,
                children,
            ));
        }
    }

    fn start(&mut self, marker: ParsedElement) {
        self.flush();
        self.from = Some((marker.meta, marker.attributes));
    }
}

fn report_children(marker: &ParsedElement, sink: &mut dyn AlertSink) {
    for child in &marker.children {
        sink.add(Alert::bad_node_placement(
            child.meta.position.clone(),
            child.display_name(),
            Some(marker.display_name()),
        ));
    }
}

fn expand_if(node: ParsedElement, sink: &mut dyn AlertSink) -> ParsedElement {
    let ParsedElement {
        meta,
        attributes,
        children,
        ..
    } = node;
    let mut clauses = ClauseBuilder {
        clauses: Vec::new(),
        from: Some((meta.clone(), attributes)),
        children: Vec::new(),
        saw_else: false,
    };

    for child in children {
        match child.kind {
            ElementKind::Elif => {
                if clauses.saw_else {
                    sink.add(Alert::elif_after_else(
                        child.meta.position.clone(),
                        child.display_name(),
                    ));
                }
                report_children(&child, sink);
                if !clauses.saw_else {
                    clauses.start(child);
                }
            }
            ElementKind::Else => {
                if clauses.saw_else {
                    sink.add(Alert::double_else(
                        child.meta.position.clone(),
                        child.display_name(),
                    ));
                }
                report_children(&child, sink);
                if !clauses.saw_else {
                    clauses.start(child);
                    clauses.saw_else = true;
                }
            }
            ElementKind::If
            | ElementKind::Cond
            | ElementKind::Clause
            | ElementKind::Null
            | ElementKind::Text(_)
            | ElementKind::Element { .. } => {
                let child = expand(child, sink);
                clauses.children.push(child);
            }
        }
    }
    clauses.flush();

    ParsedElement::new(meta, ElementKind::Cond, Vec::new(), clauses.clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{alert_codes, meta, pos};
    use marklet_alerts::{AlertCode, AlertSet};

    fn marker(kind: ElementKind, name: &str, cond: Option<&str>, children: Vec<ParsedElement>) -> ParsedElement {
        let attributes = cond
            .map(|value| {
                vec![ParsedAttribute {
                    meta: meta("cond"),
                    namespace: String::new(),
                    name: "cond".to_string(),
                    value: value.to_string(),
                }]
            })
            .unwrap_or_default();
        ParsedElement::new(meta(name), kind, attributes, children)
    }

    fn txt(value: &str) -> ParsedElement {
        ParsedElement::text(meta("text"), value)
    }

    fn run(children: Vec<ParsedElement>) -> Forest<IfExpanded> {
        let _ = env_logger::builder().is_test(true).try_init();
        IfExpander.apply(Forest::new(pos(1), AlertSet::empty(), children))
    }

    fn texts(clause: &ParsedElement) -> Vec<&str> {
        clause
            .children
            .iter()
            .filter_map(|child| match &child.kind {
                ElementKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_full_chain_yields_clauses_in_order() {
        let tree = run(vec![marker(
            ElementKind::If,
            "gxp:if",
            Some("a"),
            vec![
                txt("A"),
                marker(ElementKind::Elif, "gxp:elif", Some("b"), vec![]),
                txt("B"),
                marker(ElementKind::Elif, "gxp:elif", Some("c"), vec![]),
                txt("C"),
                marker(ElementKind::Else, "gxp:else", None, vec![]),
                txt("D"),
            ],
        )]);
        assert!(tree.alerts().is_empty());
        let cond = &tree.children()[0];
        assert_eq!(cond.kind, ElementKind::Cond);
        assert!(cond.attributes.is_empty());
        assert_eq!(cond.children.len(), 4);
        let bodies: Vec<_> = cond.children.iter().map(texts).collect();
        assert_eq!(bodies, vec![vec!["A"], vec!["B"], vec!["C"], vec!["D"]]);
        assert_eq!(cond.children[1].attribute("cond").unwrap().value, "b");
        assert!(cond.children[3].attributes.is_empty());
    }

    #[test]
    fn test_double_else_keeps_first_else() {
        let tree = run(vec![marker(
            ElementKind::If,
            "gxp:if",
            Some("a"),
            vec![
                txt("A"),
                marker(ElementKind::Else, "gxp:else", None, vec![]),
                txt("B"),
                marker(ElementKind::Else, "gxp:else", None, vec![]),
                txt("C"),
            ],
        )]);
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::DoubleElse]);
        let cond = &tree.children()[0];
        assert_eq!(cond.children.len(), 2);
        // Children after the dropped marker stay in the first else clause.
        assert_eq!(texts(&cond.children[1]), vec!["B", "C"]);
    }

    #[test]
    fn test_elif_after_else_is_dropped() {
        let tree = run(vec![marker(
            ElementKind::If,
            "gxp:if",
            Some("a"),
            vec![
                marker(ElementKind::Else, "gxp:else", None, vec![]),
                marker(ElementKind::Elif, "gxp:elif", Some("b"), vec![]),
            ],
        )]);
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::ElifAfterElse]);
        assert_eq!(tree.children()[0].children.len(), 2);
    }

    #[test]
    fn test_bare_else_becomes_null() {
        let tree = run(vec![
            txt("before"),
            marker(ElementKind::Else, "gxp:else", None, vec![txt("lost")]),
        ]);
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::BadNodePlacement]);
        assert_eq!(tree.children()[1].kind, ElementKind::Null);
        assert!(tree.children()[1].children.is_empty());
        assert_eq!(
            tree.alerts().iter().next().unwrap().message(),
            "gxp:else not allowed here"
        );
    }

    #[test]
    fn test_children_inside_marker_are_reported() {
        let tree = run(vec![marker(
            ElementKind::If,
            "gxp:if",
            Some("a"),
            vec![marker(ElementKind::Elif, "gxp:elif", Some("b"), vec![txt("x")])],
        )]);
        let alerts: Vec<_> = tree.alerts().iter().map(|a| a.message()).collect();
        assert_eq!(alerts, vec!["text not allowed inside gxp:elif"]);
        assert!(tree.children()[0].children[1].children.is_empty());
    }

    #[test]
    fn test_misplaced_marker_is_reported_before_its_children() {
        let tree = run(vec![marker(
            ElementKind::If,
            "gxp:if",
            Some("a"),
            vec![
                marker(ElementKind::Else, "gxp:else", None, vec![]),
                marker(ElementKind::Else, "gxp:else", None, vec![txt("x")]),
                marker(ElementKind::Elif, "gxp:elif", Some("b"), vec![txt("y")]),
            ],
        )]);
        let alerts: Vec<_> = tree.alerts().iter().map(|a| a.message()).collect();
        assert_eq!(
            alerts,
            vec![
                "Only one gxp:else allowed per if block.",
                "text not allowed inside gxp:else",
                "gxp:elif not allowed after else clause.",
                "text not allowed inside gxp:elif",
            ]
        );
    }

    #[test]
    fn test_nested_if_is_expanded() {
        let inner = marker(ElementKind::If, "gxp:if", Some("b"), vec![txt("X")]);
        let outer = ParsedElement::new(
            meta("div"),
            ElementKind::Element {
                namespace: "http://www.w3.org/1999/xhtml".to_string(),
                name: "div".to_string(),
            },
            Vec::new(),
            vec![marker(ElementKind::If, "gxp:if", Some("a"), vec![inner])],
        );
        let tree = run(vec![outer]);
        let outer_cond = &tree.children()[0].children[0];
        assert_eq!(outer_cond.kind, ElementKind::Cond);
        let inner_cond = &outer_cond.children[0].children[0];
        assert_eq!(inner_cond.kind, ElementKind::Cond);
        assert_eq!(texts(&inner_cond.children[0]), vec!["X"]);
    }
}
