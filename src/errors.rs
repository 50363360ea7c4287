//! Configuration diagnostics.
//!
//! Business-rule failures are *data* ([`crate::report::Violation`]) and are
//! returned in the violation list, never raised. The errors here are the
//! fatal class: authoring mistakes in the trusted, static rule table. They
//! surface when a rule set or aggregate check is compiled, before any
//! document is examined, so a half-evaluated result can never be produced
//! from an ambiguous rule table.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Fatal rule-table authoring errors.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A selector in the rule table failed to parse. Carries the selector
    /// text as a miette source so the offending position renders inline.
    #[error("malformed selector: {selector}")]
    #[diagnostic(
        code(cardinal::selector::malformed),
        help("selectors are path segments with optional [bracket] predicates, e.g. Wall[Siding='stucco']/Insulation")
    )]
    MalformedSelector {
        selector: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{reason}")]
        span: SourceSpan,
        reason: String,
    },

    /// A selector parsed, but its form is not legal in the position it was
    /// used (e.g. `sum(...)` as a cardinality rule).
    #[error("selector `{selector}` cannot be used as {role}")]
    #[diagnostic(code(cardinal::selector::not_allowed))]
    SelectorNotAllowed { selector: String, role: &'static str },

    /// An exact-count cardinality was given an empty set of permitted
    /// counts, which would reject every document.
    #[error("exact cardinality for `{selector}` has an empty set of permitted counts")]
    #[diagnostic(code(cardinal::cardinality::empty))]
    EmptyCardinality { selector: String },

    /// A serialized rule table could not be decoded at all.
    #[error("cannot decode rule table: {0}")]
    #[diagnostic(code(cardinal::config::decode))]
    Decode(String),
}

impl ConfigError {
    pub(crate) fn malformed(
        selector: &str,
        span: impl Into<SourceSpan>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::MalformedSelector {
            selector: selector.to_string(),
            src: NamedSource::new("selector", selector.to_string()),
            span: span.into(),
            reason: reason.into(),
        }
    }
}
