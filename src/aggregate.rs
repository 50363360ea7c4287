//! Aggregate sum invariants across independent element collections.
//!
//! Models "distributable fractions must partition the whole, or be entirely
//! absent": independent pieces of equipment each serving a fraction of a
//! total load must sum to 1.0 within tolerance, while a total of exactly
//! zero means the feature is unmodeled and is valid.

use crate::document::DocumentNode;
use crate::errors::ConfigError;
use crate::report::Violation;
use crate::selector::{Resolver, Selector};

/// Accepted deviation from 1.0 when no per-check tolerance is given,
/// matching the 0.999–1.001 window of the originating rule tables.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// One fraction-sum invariant: the values matched by `selectors` must sum
/// to 1.0 (± tolerance) or to exactly 0.0.
///
/// # Examples
///
/// ```rust
/// use cardinal::aggregate::FractionSumCheck;
///
/// let check = FractionSumCheck::new(
///     "FractionCoolLoadServed",
///     ["CoolingSystem/FractionCoolLoadServed", "HeatPump/FractionCoolLoadServed"],
/// )
/// .unwrap()
/// .with_tolerance(0.01);
/// assert_eq!(check.label(), "FractionCoolLoadServed");
/// ```
#[derive(Debug, Clone)]
pub struct FractionSumCheck {
    label: String,
    selectors: Vec<Selector>,
    tolerance: f64,
}

impl FractionSumCheck {
    /// Compiles a check from selector text. Plain node selectors sum the
    /// text of every matched node; `sum(...)` selectors are accepted and
    /// behave identically.
    pub fn new<'a>(
        label: impl Into<String>,
        selectors: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ConfigError> {
        let selectors = selectors
            .into_iter()
            .map(Selector::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            label: label.into(),
            selectors,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    /// Overrides the accepted deviation from 1.0.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Evaluates the invariant against the document root.
    pub(crate) fn check<D: DocumentNode>(
        &self,
        resolver: &Resolver<'_, D>,
        root: &D,
    ) -> Option<Violation> {
        let total: f64 = self
            .selectors
            .iter()
            .map(|s| resolver.sum(root, s))
            .sum();
        if total == 0.0 {
            // Entirely unmodeled; absence is valid.
            return None;
        }
        if (total - 1.0).abs() > self.tolerance {
            return Some(Violation::FractionSum {
                label: self.label.clone(),
                expected: 1.0,
                actual: total,
            });
        }
        None
    }
}
