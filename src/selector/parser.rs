//! Selector parser: pest pairs to the typed AST.
//!
//! Purely syntactic; role checks (where a `sum(...)` may appear, and so on)
//! happen where selectors are installed into a rule set.

use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use super::{Clause, CmpOp, CompareLhs, Literal, PathExpr, Predicate, SelectorKind, Step, Union};
use crate::errors::ConfigError;

#[derive(Parser)]
#[grammar = "selector/grammar.pest"]
struct SelectorParser;

pub(super) fn parse(text: &str) -> Result<SelectorKind, ConfigError> {
    if text.trim().is_empty() {
        return Err(ConfigError::malformed(text, (0usize, 0usize), "empty selector"));
    }

    let mut pairs = SelectorParser::parse(Rule::selector, text)
        .map_err(|e| convert_parse_error(text, e))?;

    let selector = pairs.next().unwrap(); // pest guarantees the selector rule exists
    let inner = selector
        .into_inner()
        .find(|p| p.as_rule() != Rule::EOI)
        .unwrap(); // grammar guarantees one alternative before EOI

    Ok(match inner.as_rule() {
        Rule::count_expr => SelectorKind::Count(build_union(first_inner(inner))),
        Rule::sum_expr => SelectorKind::Sum(build_union(first_inner(inner))),
        Rule::path_union => SelectorKind::Nodes(build_union(inner)),
        rule => unreachable!("unexpected selector alternative: {:?}", rule),
    })
}

fn first_inner(pair: Pair<Rule>) -> Pair<Rule> {
    pair.into_inner().next().unwrap() // grammar guarantees inner exists
}

fn build_union(pair: Pair<Rule>) -> Union {
    debug_assert_eq!(pair.as_rule(), Rule::path_union);
    Union {
        paths: pair.into_inner().map(build_path).collect(),
    }
}

fn build_path(pair: Pair<Rule>) -> PathExpr {
    debug_assert_eq!(pair.as_rule(), Rule::path);
    let mut absolute = false;
    let mut steps = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::root_marker => absolute = true,
            Rule::step => steps.push(build_step(p)),
            rule => unreachable!("unexpected path element: {:?}", rule),
        }
    }
    PathExpr { absolute, steps }
}

fn build_rel_path(pair: Pair<Rule>) -> PathExpr {
    debug_assert_eq!(pair.as_rule(), Rule::rel_path);
    PathExpr {
        absolute: false,
        steps: pair.into_inner().map(build_step).collect(),
    }
}

fn build_step(pair: Pair<Rule>) -> Step {
    let inner = first_inner(pair);
    match inner.as_rule() {
        Rule::text_call => Step::Text,
        Rule::named_step => {
            let mut parts = inner.into_inner();
            let name = parts.next().unwrap().as_str().to_string(); // grammar guarantees name first
            let predicates = parts.map(build_predicate).collect();
            Step::Child { name, predicates }
        }
        Rule::filter_step => Step::Filter(inner.into_inner().map(build_predicate).collect()),
        rule => unreachable!("unexpected step alternative: {:?}", rule),
    }
}

fn build_predicate(pair: Pair<Rule>) -> Predicate {
    debug_assert_eq!(pair.as_rule(), Rule::predicate);
    Predicate {
        clauses: pair.into_inner().map(build_clause).collect(),
    }
}

fn build_clause(pair: Pair<Rule>) -> Clause {
    let inner = first_inner(pair);
    match inner.as_rule() {
        Rule::exists => Clause::Exists(build_rel_path(first_inner(inner))),
        Rule::comparison => {
            let mut parts = inner.into_inner();
            let lhs_pair = parts.next().unwrap(); // grammar guarantees lhs
            let lhs = match lhs_pair.as_rule() {
                Rule::count_call => CompareLhs::Count(build_rel_path(first_inner(lhs_pair))),
                Rule::rel_path => CompareLhs::Path(build_rel_path(lhs_pair)),
                rule => unreachable!("unexpected comparison lhs: {:?}", rule),
            };
            let op = match parts.next().unwrap().as_str() {
                "!=" => CmpOp::Ne,
                _ => CmpOp::Eq,
            };
            let value = build_literal(parts.next().unwrap());
            Clause::Compare { lhs, op, value }
        }
        rule => unreachable!("unexpected clause alternative: {:?}", rule),
    }
}

fn build_literal(pair: Pair<Rule>) -> Literal {
    let inner = first_inner(pair);
    match inner.as_rule() {
        Rule::string => Literal::Str(first_inner(inner).as_str().to_string()),
        // Grammar guarantees a valid float shape.
        Rule::number => Literal::Num(inner.as_str().parse().unwrap()),
        rule => unreachable!("unexpected literal alternative: {:?}", rule),
    }
}

fn convert_parse_error(text: &str, error: pest::error::Error<Rule>) -> ConfigError {
    let span = match error.location {
        InputLocation::Pos(pos) => (pos, 0usize),
        InputLocation::Span((start, end)) => (start, end.saturating_sub(start)),
    };
    ConfigError::malformed(text, span, error.variant.message().to_string())
}

#[cfg(test)]
mod tests {
    use super::super::{Selector, SelectorKind, Step};
    use crate::errors::ConfigError;

    fn parse(text: &str) -> Selector {
        Selector::parse(text).unwrap()
    }

    #[test]
    fn plain_absolute_path() {
        let sel = parse("/HPXML/Building/BuildingDetails");
        match sel.kind() {
            SelectorKind::Nodes(union) => {
                assert_eq!(union.paths.len(), 1);
                assert!(union.paths[0].absolute);
                assert_eq!(union.paths[0].steps.len(), 3);
            }
            other => panic!("expected a node path, got {:?}", other),
        }
    }

    #[test]
    fn equality_predicate_with_or_alternation() {
        let sel = parse("Site[Surroundings='stand-alone' or Surroundings='attached on one side']");
        match sel.kind() {
            SelectorKind::Nodes(union) => {
                let step = &union.paths[0].steps[0];
                match step {
                    Step::Child { name, predicates } => {
                        assert_eq!(name, "Site");
                        assert_eq!(predicates.len(), 1);
                        assert_eq!(predicates[0].clauses.len(), 2);
                    }
                    other => panic!("expected a named step, got {:?}", other),
                }
            }
            other => panic!("expected a node path, got {:?}", other),
        }
    }

    #[test]
    fn sequential_brackets_are_separate_predicates() {
        let sel = parse(
            "HeatingSystem[HeatingSystemType/Furnace | HeatingSystemType/Boiler][HeatingSystemFuel!='electricity']",
        );
        match sel.kind() {
            SelectorKind::Nodes(union) => match &union.paths[0].steps[0] {
                Step::Child { predicates, .. } => {
                    assert_eq!(predicates.len(), 2);
                    assert_eq!(predicates[0].clauses.len(), 2);
                    assert_eq!(predicates[1].clauses.len(), 1);
                }
                other => panic!("expected a named step, got {:?}", other),
            },
            other => panic!("expected a node path, got {:?}", other),
        }
    }

    #[test]
    fn leading_bracket_union() {
        let sel = parse(
            "[[HousePressure=50]/BuildingAirLeakage[UnitofMeasure='CFM']/AirLeakage] | [LeakinessDescription='tight' or LeakinessDescription='average']",
        );
        match sel.kind() {
            SelectorKind::Nodes(union) => {
                assert_eq!(union.paths.len(), 2);
                assert!(matches!(union.paths[0].steps[0], Step::Filter(_)));
                assert!(matches!(union.paths[1].steps[0], Step::Filter(_)));
            }
            other => panic!("expected a node path, got {:?}", other),
        }
    }

    #[test]
    fn nested_predicates_parse() {
        parse("AtticType[Attic[Vented='true'] | Attic[CapeCod='true'] | CathedralCeiling]");
        parse("[count(GlassType)=0 or GlassType='tinted/reflective' or GlassType='low-e']");
        parse("[YearInstalled | AnnualCoolingEfficiency[Units='SEER']/Value | [FractionCoolLoadServed=0]]");
    }

    #[test]
    fn sum_selector_with_text_call() {
        let sel = parse("sum(/HPXML/Systems/CoolingSystem/FractionCoolLoadServed/text())");
        assert!(sel.is_sum());
        match sel.kind() {
            SelectorKind::Sum(union) => {
                assert!(matches!(union.paths[0].steps.last(), Some(Step::Text)));
            }
            other => panic!("expected a sum selector, got {:?}", other),
        }
    }

    #[test]
    fn count_wrapper_selector() {
        let sel = parse("count(Wall)");
        assert!(matches!(sel.kind(), SelectorKind::Count(_)));
    }

    #[test]
    fn malformed_selectors_are_config_errors() {
        for bad in ["Wall[Siding=", "Wall[", "Wall]", "", "Wall//Roof", "count(Wall"] {
            match Selector::parse(bad) {
                Err(ConfigError::MalformedSelector { selector, .. }) => {
                    assert_eq!(selector, bad)
                }
                other => panic!("expected a malformed-selector error for {:?}, got {:?}", bad, other),
            }
        }
    }
}
