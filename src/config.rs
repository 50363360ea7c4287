//! Loading rule tables from external configuration.
//!
//! The rule table is domain data maintained outside the engine: the formats
//! here deserialize into raw shadow types first, then pass through the same
//! fallible compilation as hand-built rule sets, so a typo in a config file
//! produces the same [`ConfigError`] diagnostics as a typo in code.
//!
//! ```yaml
//! groups:
//!   - rules:
//!       - selector: "/HPXML/Building"
//!         expect: { one_of: [1] }
//!   - context: "/HPXML/Building/Attics/Attic"
//!     rules:
//!       - selector: "Roofs/Roof"
//!         expect: { one_of: [1] }
//!       - selector: "Floors/Floor"
//!         expect: skip
//! fraction_sums:
//!   - label: "FractionCoolLoadServed"
//!     selectors: ["/HPXML/Building/Systems/CoolingSystem/FractionCoolLoadServed"]
//!     tolerance: 0.001
//! ```

use serde::Deserialize;

use crate::aggregate::{FractionSumCheck, DEFAULT_TOLERANCE};
use crate::cardinality::Cardinality;
use crate::errors::ConfigError;
use crate::report::Validator;
use crate::ruleset::RuleSet;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    fraction_sums: Vec<RawFractionSum>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    #[serde(default)]
    context: Option<String>,
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    selector: String,
    expect: RawCardinality,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawCardinality {
    OneOf(Vec<usize>),
    AtLeastOne,
    Skip,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFractionSum {
    label: String,
    selectors: Vec<String>,
    #[serde(default = "default_tolerance")]
    tolerance: f64,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Validator {
    /// Loads and compiles a rule table from YAML.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let raw: RawTable =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Decode(e.to_string()))?;
        compile(raw)
    }

    /// Loads and compiles a rule table from JSON.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawTable =
            serde_json::from_str(text).map_err(|e| ConfigError::Decode(e.to_string()))?;
        compile(raw)
    }
}

fn compile(raw: RawTable) -> Result<Validator, ConfigError> {
    let mut builder = RuleSet::builder();
    for group in raw.groups {
        let rules = group
            .rules
            .into_iter()
            .map(|rule| {
                let expected = compile_cardinality(&rule.selector, rule.expect)?;
                Ok((rule.selector, expected))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let configure = |g: &mut crate::ruleset::GroupBuilder| {
            for (selector, expected) in rules {
                g.require(selector, expected);
            }
        };
        builder = match group.context {
            Some(context) => builder.conditional(context, configure),
            None => builder.unconditional(configure),
        };
    }
    let mut validator = Validator::new(builder.build()?);
    for sum in raw.fraction_sums {
        let check = FractionSumCheck::new(sum.label, sum.selectors.iter().map(String::as_str))?
            .with_tolerance(sum.tolerance);
        validator = validator.with_fraction_sum(check);
    }
    Ok(validator)
}

fn compile_cardinality(selector: &str, raw: RawCardinality) -> Result<Cardinality, ConfigError> {
    match raw {
        RawCardinality::OneOf(counts) => {
            Cardinality::one_of(counts).ok_or_else(|| ConfigError::EmptyCardinality {
                selector: selector.to_string(),
            })
        }
        RawCardinality::AtLeastOne => Ok(Cardinality::at_least_one()),
        RawCardinality::Skip => Ok(Cardinality::skip()),
    }
}
