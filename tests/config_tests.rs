//! Loading rule tables from YAML and JSON configuration.

use cardinal::{Cardinality, ConfigError, Element, Validator, Violation};

const ATTIC_TABLE_YAML: &str = r#"
groups:
  - rules:
      - selector: "/HPXML/Enclosure/Attics/Attic"
        expect: at_least_one
  - context: "/HPXML/Enclosure/Attics/Attic"
    rules:
      - selector: "Roofs/Roof"
        expect: { one_of: [1] }
      - selector: "Floors/Floor"
        expect: skip
fraction_sums:
  - label: "FractionCoolLoadServed"
    selectors:
      - "sum(/HPXML/Systems/CoolingSystem/FractionCoolLoadServed/text())"
      - "sum(/HPXML/Systems/HeatPump/FractionCoolLoadServed/text())"
"#;

fn attic_doc(with_roof: bool) -> Element {
    let mut attic = Element::new("Attic");
    if with_roof {
        attic = attic.with_child(Element::new("Roofs").with_child(Element::new("Roof")));
    }
    Element::new("HPXML").with_child(
        Element::new("Enclosure").with_child(Element::new("Attics").with_child(attic)),
    )
}

#[test]
fn yaml_table_validates_documents() {
    let validator = Validator::from_yaml(ATTIC_TABLE_YAML).unwrap();
    assert!(validator.validate(&attic_doc(true)).is_empty());

    let violations = validator.validate(&attic_doc(false));
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0],
        Violation::Cardinality {
            selector: "/HPXML/Enclosure/Attics/Attic/Roofs/Roof".to_string(),
            expected: Cardinality::exactly_one(),
            actual: 0,
        }
    );
}

#[test]
fn json_table_round_trips_the_same_semantics() {
    let table = r#"{
        "groups": [
            {
                "context": "Wall",
                "rules": [
                    {"selector": "Orientation", "expect": {"one_of": [1]}},
                    {"selector": "Windows", "expect": {"one_of": [0, 1]}}
                ]
            }
        ]
    }"#;
    let validator = Validator::from_json(table).unwrap();
    let doc = Element::new("HPXML").with_child(Element::new("Wall"));
    let violations = validator.validate(&doc);
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].to_string(),
        "expected [1] element(s) but found 0 element(s) for selector: Wall/Orientation"
    );
}

#[test]
fn fraction_sums_are_loaded_with_default_tolerance() {
    let validator = Validator::from_yaml(ATTIC_TABLE_YAML).unwrap();
    assert_eq!(validator.fraction_sums().len(), 1);
    assert_eq!(validator.fraction_sums()[0].tolerance(), cardinal::DEFAULT_TOLERANCE);

    let doc = attic_doc(true).with_child(
        Element::new("Systems").with_child(
            Element::new("CoolingSystem").with_child(Element::leaf("FractionCoolLoadServed", "0.8")),
        ),
    );
    let violations = validator.validate(&doc);
    assert_eq!(violations.len(), 1);
    assert!(matches!(&violations[0], Violation::FractionSum { actual, .. } if (actual - 0.8).abs() < 1e-9));
}

#[test]
fn malformed_selector_in_config_names_the_selector() {
    let table = r#"
groups:
  - rules:
      - selector: "Wall[Siding="
        expect: at_least_one
"#;
    match Validator::from_yaml(table) {
        Err(ConfigError::MalformedSelector { selector, .. }) => {
            assert_eq!(selector, "Wall[Siding=")
        }
        other => panic!("expected a malformed-selector error, got {:?}", other),
    }
}

#[test]
fn empty_one_of_set_is_rejected() {
    let table = r#"
groups:
  - rules:
      - selector: "Wall"
        expect: { one_of: [] }
"#;
    match Validator::from_yaml(table) {
        Err(ConfigError::EmptyCardinality { selector }) => assert_eq!(selector, "Wall"),
        other => panic!("expected an empty-cardinality error, got {:?}", other),
    }
}

#[test]
fn sum_selector_in_a_rule_position_is_rejected() {
    let table = r#"
groups:
  - rules:
      - selector: "sum(Wall/Area/text())"
        expect: at_least_one
"#;
    match Validator::from_yaml(table) {
        Err(ConfigError::SelectorNotAllowed { selector, .. }) => {
            assert_eq!(selector, "sum(Wall/Area/text())")
        }
        other => panic!("expected a selector-role error, got {:?}", other),
    }
}

#[test]
fn undecodable_table_is_a_decode_error() {
    assert!(matches!(
        Validator::from_yaml("groups: 12"),
        Err(ConfigError::Decode(_))
    ));
    assert!(matches!(
        Validator::from_json("{"),
        Err(ConfigError::Decode(_))
    ));
}
