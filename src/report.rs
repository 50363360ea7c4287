//! Violations and the top-level validator.
//!
//! Violations are plain data: they are collected and returned, never
//! raised. An empty list signals a fully conforming document.

use std::fmt;

use crate::aggregate::FractionSumCheck;
use crate::cardinality::Cardinality;
use crate::document::DocumentNode;
use crate::engine;
use crate::ruleset::RuleSet;
use crate::selector::Resolver;

/// One validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A cardinality rule failed for one context instance.
    Cardinality {
        /// Combined context + child selector text.
        selector: String,
        expected: Cardinality,
        actual: usize,
    },
    /// A fraction-sum invariant missed its tolerance window.
    FractionSum {
        label: String,
        expected: f64,
        actual: f64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Cardinality {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "expected {} element(s) but found {} element(s) for selector: {}",
                expected, actual, selector
            ),
            Violation::FractionSum {
                label,
                expected,
                actual,
            } => write!(
                f,
                "expected {} to sum to {}, but calculated sum is {}",
                label, expected, actual
            ),
        }
    }
}

/// Composes the validation engine and the aggregate checks into the single
/// entry point: one call, one document, one complete list of problems.
///
/// A `Validator` is immutable once built and holds no per-call state, so it
/// can be shared read-only across threads and reused across documents.
///
/// # Examples
///
/// ```rust
/// use cardinal::cardinality::Cardinality;
/// use cardinal::document::Element;
/// use cardinal::report::Validator;
/// use cardinal::ruleset::RuleSet;
///
/// let rules = RuleSet::builder()
///     .conditional("Attic", |g| {
///         g.require("Roofs/Roof", Cardinality::exactly_one());
///     })
///     .build()
///     .unwrap();
/// let validator = Validator::new(rules);
///
/// let doc = Element::new("HPXML").with_child(Element::new("Attic"));
/// let violations = validator.validate(&doc);
/// assert_eq!(violations.len(), 1);
/// assert_eq!(
///     violations[0].to_string(),
///     "expected [1] element(s) but found 0 element(s) for selector: Attic/Roofs/Roof"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    rules: RuleSet,
    fraction_sums: Vec<FractionSumCheck>,
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            fraction_sums: Vec::new(),
        }
    }

    /// Appends an aggregate invariant, evaluated after every rule group.
    pub fn with_fraction_sum(mut self, check: FractionSumCheck) -> Self {
        self.fraction_sums.push(check);
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn fraction_sums(&self) -> &[FractionSumCheck] {
        &self.fraction_sums
    }

    /// Validates one document, returning every violation in discovery
    /// order: cardinality violations in rule-set order, then aggregate
    /// violations in check order.
    pub fn validate<D: DocumentNode>(&self, root: &D) -> Vec<Violation> {
        let mut violations = engine::run(root, &self.rules);
        let resolver = Resolver::new(root);
        violations.extend(
            self.fraction_sums
                .iter()
                .filter_map(|check| check.check(&resolver, root)),
        );
        violations
    }
}
