//! Cardinal: declarative structural validation for hierarchical documents.
//!
//! A caller supplies a parsed document tree and a rule set of conditional
//! element-cardinality constraints plus aggregate fraction-sum invariants;
//! [`Validator::validate`] returns the complete, order-preserving list of
//! violations rather than failing fast. The engine is agnostic to how the
//! tree was parsed: it only needs the [`DocumentNode`] capability trait.

pub use crate::aggregate::{FractionSumCheck, DEFAULT_TOLERANCE};
pub use crate::cardinality::{Cardinality, CountSet};
pub use crate::document::{DocumentNode, Element};
pub use crate::errors::ConfigError;
pub use crate::report::{Validator, Violation};
pub use crate::ruleset::{RuleGroup, RuleSet, RuleSetBuilder};
pub use crate::selector::{Resolver, Selector};

pub mod aggregate;
pub mod cardinality;
mod config;
pub mod document;
mod engine;
pub mod errors;
pub mod report;
pub mod ruleset;
pub mod selector;
