//! Selector resolution against a document tree.
//!
//! Resolution is total: a selector that references a structurally absent
//! path yields an empty result set, count 0, or sum 0.0. Malformed document
//! shapes are exactly what cardinality rules exist to report, so nothing in
//! here can fail.

use super::{Clause, CmpOp, CompareLhs, PathExpr, Selector, Step, Union};
use crate::document::DocumentNode;

/// Evaluates selectors relative to one document root.
///
/// Absolute selectors restart from the root regardless of the context node;
/// the first segment of an absolute path names the root element itself.
pub struct Resolver<'a, D: DocumentNode> {
    root: &'a D,
}

impl<'a, D: DocumentNode> Resolver<'a, D> {
    pub fn new(root: &'a D) -> Self {
        Self { root }
    }

    /// All nodes matching `selector` relative to `ctx`, in document order
    /// per union branch.
    pub fn resolve(&self, ctx: &'a D, selector: &Selector) -> Vec<&'a D> {
        self.resolve_union(ctx, selector.union())
    }

    /// Number of nodes matching `selector`. For `count(...)` selectors this
    /// evaluates the inner union and returns the count directly; the two
    /// forms agree by construction.
    pub fn count(&self, ctx: &'a D, selector: &Selector) -> usize {
        self.resolve(ctx, selector).len()
    }

    /// Sum of the text values of all matched nodes, parsed as floats.
    /// Non-numeric or absent text contributes 0.
    pub fn sum(&self, ctx: &'a D, selector: &Selector) -> f64 {
        self.resolve(ctx, selector)
            .iter()
            .map(|node| {
                node.text()
                    .and_then(|t| t.trim().parse::<f64>().ok())
                    .unwrap_or(0.0)
            })
            .sum()
    }

    /// Text of the first match, if any.
    pub fn text(&self, ctx: &'a D, selector: &Selector) -> Option<&'a str> {
        self.resolve(ctx, selector)
            .into_iter()
            .next()
            .and_then(|node| node.text())
    }

    fn resolve_union(&self, ctx: &'a D, union: &Union) -> Vec<&'a D> {
        let mut out = Vec::new();
        for path in &union.paths {
            out.extend(self.resolve_path(ctx, path));
        }
        out
    }

    fn resolve_path(&self, ctx: &'a D, path: &PathExpr) -> Vec<&'a D> {
        let mut steps = path.steps.iter();
        let mut current = if path.absolute {
            match steps.next() {
                Some(first) => self.match_root(first),
                None => vec![self.root],
            }
        } else {
            vec![ctx]
        };
        for step in steps {
            if current.is_empty() {
                break;
            }
            current = self.apply_step(&current, step);
        }
        current
    }

    /// The first segment of an absolute path is matched against the root
    /// element itself rather than descending into it.
    fn match_root(&self, step: &Step) -> Vec<&'a D> {
        let keep = match step {
            Step::Child { name, predicates } => {
                self.root.name() == name && self.satisfies(self.root, predicates)
            }
            Step::Filter(predicates) => self.satisfies(self.root, predicates),
            Step::Text => true,
        };
        if keep {
            vec![self.root]
        } else {
            Vec::new()
        }
    }

    fn apply_step(&self, nodes: &[&'a D], step: &Step) -> Vec<&'a D> {
        let mut out = Vec::new();
        match step {
            Step::Child { name, predicates } => {
                for &node in nodes {
                    for child in node.children() {
                        if child.name() == name && self.satisfies(child, predicates) {
                            out.push(child);
                        }
                    }
                }
            }
            Step::Filter(predicates) => {
                for &node in nodes {
                    if self.satisfies(node, predicates) {
                        out.push(node);
                    }
                }
            }
            Step::Text => out.extend_from_slice(nodes),
        }
        out
    }

    /// Sequential brackets AND; clauses within one bracket OR.
    fn satisfies(&self, node: &'a D, predicates: &[super::Predicate]) -> bool {
        predicates
            .iter()
            .all(|p| p.clauses.iter().any(|c| self.eval_clause(node, c)))
    }

    fn eval_clause(&self, node: &'a D, clause: &Clause) -> bool {
        match clause {
            Clause::Exists(path) => {
                if !self.resolve_path(node, path).is_empty() {
                    return true;
                }
                // Fall back to an attribute of the same name for plain
                // single-segment operands.
                single_name(path).map_or(false, |name| node.attribute(name).is_some())
            }
            Clause::Compare { lhs, op, value } => {
                let matched = match lhs {
                    CompareLhs::Count(path) => {
                        value.matches_count(self.resolve_path(node, path).len())
                    }
                    CompareLhs::Path(path) => {
                        let nodes = self.resolve_path(node, path);
                        let mut hit = nodes
                            .iter()
                            .filter_map(|n| n.text())
                            .any(|t| value.matches_text(t));
                        if !hit && nodes.is_empty() {
                            if let Some(name) = single_name(path) {
                                hit = node
                                    .attribute(name)
                                    .map_or(false, |v| value.matches_text(v));
                            }
                        }
                        hit
                    }
                };
                match op {
                    CmpOp::Eq => matched,
                    // Negation of the equality test, so an absent operand
                    // satisfies `!=`.
                    CmpOp::Ne => !matched,
                }
            }
        }
    }
}

/// The name of a path consisting of exactly one bare child segment.
fn single_name(path: &PathExpr) -> Option<&str> {
    match path.steps.as_slice() {
        [Step::Child { name, predicates }] if predicates.is_empty() && !path.absolute => {
            Some(name.as_str())
        }
        _ => None,
    }
}
