//! The validation engine.
//!
//! One linear pass over (group × context instance × child rule) triples.
//! Groups are mutually independent: no group's evaluation depends on
//! another's outcome, and the scan never stops early, so the caller always
//! sees every problem in one pass.

use crate::document::DocumentNode;
use crate::report::Violation;
use crate::ruleset::{RuleGroup, RuleSet};
use crate::selector::{Resolver, Selector};

/// Evaluates every rule group against the document, collecting cardinality
/// violations in rule-set order.
pub(crate) fn run<D: DocumentNode>(root: &D, rules: &RuleSet) -> Vec<Violation> {
    let resolver = Resolver::new(root);
    let mut violations = Vec::new();
    for group in rules.groups() {
        check_group(&resolver, root, group, &mut violations);
    }
    violations
}

fn check_group<'a, D: DocumentNode>(
    resolver: &Resolver<'a, D>,
    root: &'a D,
    group: &RuleGroup,
    violations: &mut Vec<Violation>,
) {
    let instances: Vec<&D> = match group.context() {
        None => vec![root],
        Some(context) => {
            let matched = resolver.resolve(root, context);
            if matched.is_empty() {
                // Vacuous satisfaction: the trigger context does not exist
                // in this document. Presence of the context itself is the
                // business of an unconditional rule elsewhere.
                return;
            }
            matched
        }
    };

    for instance in instances {
        for (selector, expected) in group.rules() {
            if expected.is_skip() {
                continue;
            }
            let actual = resolver.count(instance, selector);
            if !expected.is_satisfied(actual) {
                violations.push(Violation::Cardinality {
                    selector: combined_selector(group.context(), selector),
                    expected: expected.clone(),
                    actual,
                });
            }
        }
    }
}

/// Joins context and child selector text for reporting. A child selector
/// that starts with a bracket filters the context node itself, so it is
/// concatenated rather than joined with a path separator.
fn combined_selector(context: Option<&Selector>, child: &Selector) -> String {
    match context {
        None => child.as_str().to_string(),
        Some(context) if child.as_str().starts_with('[') => {
            format!("{}{}", context.as_str(), child.as_str())
        }
        Some(context) => format!("{}/{}", context.as_str(), child.as_str()),
    }
}
