//! Rule sets: ordered groups of conditional cardinality rules.
//!
//! A rule set is process-lifetime configuration, compiled once and reused
//! across validation calls. Compilation parses every selector up front, so
//! a malformed selector aborts construction with a [`ConfigError`] naming
//! the offending text instead of surfacing mid-validation.

use crate::cardinality::Cardinality;
use crate::errors::ConfigError;
use crate::selector::Selector;

/// One rule group: an optional context selector and the child rules
/// evaluated against each context instance.
///
/// A group whose context selector matches zero nodes is skipped entirely —
/// conditional applicability, not a violation. Presence of the context
/// itself must be enforced by a separate rule in an unconditional group.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    context: Option<Selector>,
    rules: Vec<(Selector, Cardinality)>,
}

impl RuleGroup {
    pub fn context(&self) -> Option<&Selector> {
        self.context.as_ref()
    }

    pub fn rules(&self) -> impl Iterator<Item = (&Selector, &Cardinality)> {
        self.rules.iter().map(|(s, c)| (s, c))
    }
}

/// An ordered, immutable collection of rule groups.
///
/// Group order and rule order within a group affect only the order of
/// reported violations; every group is always evaluated.
///
/// # Examples
///
/// ```rust
/// use cardinal::cardinality::Cardinality;
/// use cardinal::ruleset::RuleSet;
///
/// let rules = RuleSet::builder()
///     .unconditional(|g| {
///         g.require("/HPXML/Building", Cardinality::exactly_one());
///     })
///     .conditional("/HPXML/Building/Attics/Attic", |g| {
///         g.require("Roofs/Roof", Cardinality::exactly_one());
///     })
///     .build()
///     .unwrap();
/// assert_eq!(rules.groups().count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RuleSet {
    groups: Vec<RuleGroup>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder { groups: Vec::new() }
    }

    /// Compiles raw `(context, [(selector, cardinality)])` entries, the
    /// shape external rule tables arrive in.
    pub fn compile<'a, I, R>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (Option<&'a str>, R)>,
        R: IntoIterator<Item = (&'a str, Cardinality)>,
    {
        let mut builder = Self::builder();
        for (context, rules) in entries {
            let mut group = GroupBuilder::default();
            for (selector, expected) in rules {
                group.require(selector, expected);
            }
            builder.groups.push((context.map(str::to_string), group));
        }
        builder.build()
    }

    pub fn groups(&self) -> impl Iterator<Item = &RuleGroup> {
        self.groups.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Collects raw selector text, deferring parsing to [`RuleSetBuilder::build`].
#[derive(Debug, Default)]
pub struct GroupBuilder {
    rules: Vec<(String, Cardinality)>,
}

impl GroupBuilder {
    /// Adds one child rule to the group.
    pub fn require(&mut self, selector: impl Into<String>, expected: Cardinality) -> &mut Self {
        self.rules.push((selector.into(), expected));
        self
    }
}

#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    groups: Vec<(Option<String>, GroupBuilder)>,
}

impl RuleSetBuilder {
    /// Adds a group whose single context instance is the document root.
    pub fn unconditional(mut self, configure: impl FnOnce(&mut GroupBuilder)) -> Self {
        let mut group = GroupBuilder::default();
        configure(&mut group);
        self.groups.push((None, group));
        self
    }

    /// Adds a group evaluated once per node matched by `context`.
    pub fn conditional(
        mut self,
        context: impl Into<String>,
        configure: impl FnOnce(&mut GroupBuilder),
    ) -> Self {
        let mut group = GroupBuilder::default();
        configure(&mut group);
        self.groups.push((Some(context.into()), group));
        self
    }

    /// Parses every selector and assembles the rule set. Fails on the first
    /// malformed selector, aggregate selector in a node position, or empty
    /// exact-count set.
    pub fn build(self) -> Result<RuleSet, ConfigError> {
        let mut groups = Vec::with_capacity(self.groups.len());
        for (context, group) in self.groups {
            let context = context
                .map(|text| compile_node_selector(&text, "a context selector"))
                .transpose()?;
            let mut rules = Vec::with_capacity(group.rules.len());
            for (text, expected) in group.rules {
                let selector = Selector::parse(&text)?;
                if selector.is_sum() {
                    return Err(ConfigError::SelectorNotAllowed {
                        selector: text,
                        role: "a cardinality rule",
                    });
                }
                rules.push((selector, expected));
            }
            groups.push(RuleGroup { context, rules });
        }
        Ok(RuleSet { groups })
    }
}

fn compile_node_selector(text: &str, role: &'static str) -> Result<Selector, ConfigError> {
    let selector = Selector::parse(text)?;
    if selector.is_sum() {
        return Err(ConfigError::SelectorNotAllowed {
            selector: text.to_string(),
            role,
        });
    }
    Ok(selector)
}
