//! The closed set of cardinality constraint kinds.
//!
//! The originating rule tables encoded these as raw arrays and nil (`[1]`,
//! `[0, 1]`, `[]` for "one or more", nil for "don't check"), relying on
//! dynamic truthiness. Here the kinds are an explicit tagged union, and the
//! exact-count set lives behind a non-empty newtype so an unsatisfiable or
//! ambiguous constraint cannot be constructed.

use std::collections::BTreeSet;
use std::fmt;

/// A finite, non-empty set of permitted counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountSet(BTreeSet<usize>);

impl CountSet {
    /// Builds a count set, rejecting the empty set.
    pub fn new(counts: impl IntoIterator<Item = usize>) -> Option<Self> {
        let set: BTreeSet<usize> = counts.into_iter().collect();
        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    pub fn contains(&self, count: usize) -> bool {
        self.0.contains(&count)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for CountSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, count) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", count)?;
        }
        write!(f, "]")
    }
}

/// How many matches a child selector is permitted to produce.
///
/// # Examples
///
/// ```rust
/// use cardinal::cardinality::Cardinality;
///
/// assert!(Cardinality::exactly_one().is_satisfied(1));
/// assert!(!Cardinality::exactly_one().is_satisfied(2));
/// assert!(Cardinality::optional().is_satisfied(0));
/// assert!(Cardinality::forbidden().is_satisfied(0));
/// assert!(Cardinality::at_least_one().is_satisfied(3));
/// assert!(Cardinality::skip().is_satisfied(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cardinality {
    /// The actual count must be a member of the set.
    Exact(CountSet),
    /// The actual count must be at least 1.
    AtLeastOne,
    /// No check at this layer; the element's shape is validated by a more
    /// specific rule group keyed on it as context.
    Skip,
}

impl Cardinality {
    /// Exactly one element required: `Exact({1})`.
    pub fn exactly_one() -> Self {
        Self::exact([1])
    }

    /// Element forbidden: `Exact({0})`.
    pub fn forbidden() -> Self {
        Self::exact([0])
    }

    /// Zero or one element: `Exact({0, 1})`.
    pub fn optional() -> Self {
        Self::exact([0, 1])
    }

    /// One or more elements.
    pub fn at_least_one() -> Self {
        Cardinality::AtLeastOne
    }

    /// Constraint intentionally not enforced.
    pub fn skip() -> Self {
        Cardinality::Skip
    }

    /// An arbitrary non-empty permitted-count set.
    ///
    /// Returns `None` for an empty set; use the named constructors for the
    /// common shapes.
    pub fn one_of(counts: impl IntoIterator<Item = usize>) -> Option<Self> {
        CountSet::new(counts).map(Cardinality::Exact)
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Cardinality::Skip)
    }

    /// Whether an observed match count satisfies this constraint.
    pub fn is_satisfied(&self, actual: usize) -> bool {
        match self {
            Cardinality::Exact(set) => set.contains(actual),
            Cardinality::AtLeastOne => actual >= 1,
            Cardinality::Skip => true,
        }
    }

    fn exact<const N: usize>(counts: [usize; N]) -> Self {
        // Non-empty by construction at every call site.
        Cardinality::Exact(CountSet::new(counts).unwrap())
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Exact(set) => write!(f, "{}", set),
            Cardinality::AtLeastOne => write!(f, "1 or more"),
            Cardinality::Skip => write!(f, "any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_set_membership() {
        let spec = Cardinality::one_of([0, 2, 4]).unwrap();
        assert!(spec.is_satisfied(0));
        assert!(!spec.is_satisfied(1));
        assert!(spec.is_satisfied(4));
        assert!(!spec.is_satisfied(5));
    }

    #[test]
    fn empty_exact_set_is_rejected() {
        assert!(Cardinality::one_of([]).is_none());
        assert!(CountSet::new([]).is_none());
    }

    #[test]
    fn display_is_sorted_and_deduplicated() {
        let spec = Cardinality::one_of([1, 0, 1]).unwrap();
        assert_eq!(spec.to_string(), "[0, 1]");
        assert_eq!(Cardinality::at_least_one().to_string(), "1 or more");
    }
}
