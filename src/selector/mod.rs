//! The selector expression language.
//!
//! Selectors identify zero or more nodes relative to a context node, or the
//! document root when the path is absolute. The grammar is the XPath subset
//! the rule tables actually use: path segments, bracket predicates with
//! equality / inequality / bare-existence clauses, `or` and `|` alternation
//! inside a bracket, sequential brackets ANDed on one step, and the
//! aggregate wrappers `count(...)` and `sum(...)`.
//!
//! Parsing is infallible-or-fatal: a selector that fails to parse is a
//! [`ConfigError::MalformedSelector`], because it can only come from the
//! trusted rule table, never from document content. Resolution against a
//! document never fails; structurally absent paths yield empty results.

mod eval;
mod parser;

pub use eval::Resolver;

use std::fmt;

use crate::errors::ConfigError;

/// A compiled selector expression. Retains its source text for reporting.
///
/// # Examples
///
/// ```rust
/// use cardinal::selector::Selector;
///
/// let sel = Selector::parse("Wall[Siding='stucco']/Insulation").unwrap();
/// assert_eq!(sel.as_str(), "Wall[Siding='stucco']/Insulation");
/// assert!(Selector::parse("Wall[Siding=").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Selector {
    text: String,
    kind: SelectorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SelectorKind {
    /// A plain node path union.
    Nodes(Union),
    /// `count(...)`: evaluates the inner union, yields the match count.
    Count(Union),
    /// `sum(...)`: evaluates the inner union, sums the matched text values.
    Sum(Union),
}

/// One or more `|`-joined paths; resolution is the concatenation of each
/// branch's matches in branch order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Union {
    pub paths: Vec<PathExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathExpr {
    /// Absolute paths start at the tree root; the first segment names the
    /// root element itself.
    pub absolute: bool,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// `Name[pred][pred]...`: descend to child elements with this name,
    /// keeping those satisfying every predicate.
    Child {
        name: String,
        predicates: Vec<Predicate>,
    },
    /// `[pred][pred]...` with no name: filter the current node itself.
    Filter(Vec<Predicate>),
    /// Trailing `text()`: selects the node's text value; a no-op for node
    /// resolution, meaningful only under `sum(...)`.
    Text,
}

/// The contents of one bracket: clauses ORed together.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Predicate {
    pub clauses: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Clause {
    /// Bare path operand: true when the relative path matches anything.
    Exists(PathExpr),
    /// `lhs = literal` or `lhs != literal`.
    Compare {
        lhs: CompareLhs,
        op: CmpOp,
        value: Literal,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CompareLhs {
    Path(PathExpr),
    /// `count(path)`: compares the match count instead of matched text.
    Count(PathExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    Str(String),
    Num(f64),
}

impl Literal {
    /// True when a node's text value matches this literal. Numeric literals
    /// compare against the text parsed as a float, so `[Year=2012]` accepts
    /// the text "2012".
    pub(crate) fn matches_text(&self, text: &str) -> bool {
        match self {
            Literal::Str(s) => text == s,
            Literal::Num(n) => text.trim().parse::<f64>().map_or(false, |v| v == *n),
        }
    }

    /// True when a match count equals this literal.
    pub(crate) fn matches_count(&self, count: usize) -> bool {
        match self {
            Literal::Num(n) => count as f64 == *n,
            Literal::Str(s) => s.trim().parse::<f64>().map_or(false, |v| v == count as f64),
        }
    }
}

impl Selector {
    /// Parses a selector expression.
    ///
    /// A syntactically malformed selector is a fatal
    /// [`ConfigError::MalformedSelector`] carrying a span into the text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let kind = parser::parse(text)?;
        Ok(Self {
            text: text.to_string(),
            kind,
        })
    }

    /// The original selector text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True for `sum(...)` selectors, which are only meaningful in
    /// aggregate checks.
    pub fn is_sum(&self) -> bool {
        matches!(self.kind(), SelectorKind::Sum(_))
    }

    pub(crate) fn kind(&self) -> &SelectorKind {
        &self.kind
    }

    pub(crate) fn union(&self) -> &Union {
        match &self.kind {
            SelectorKind::Nodes(u) | SelectorKind::Count(u) | SelectorKind::Sum(u) => u,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl std::str::FromStr for Selector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl TryFrom<&str> for Selector {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Selector::parse(value)
    }
}
