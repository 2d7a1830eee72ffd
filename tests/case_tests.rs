//! Data-driven document cases.
//!
//! Each case in `tests/cases.json` pairs markup with its expected
//! pseudo-XML tree.

use mdtree::{parse, to_pseudo_xml};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    markup: String,
    xml: String,
}

fn load_cases() -> Vec<Case> {
    let json = fs::read_to_string("tests/cases.json").expect("Failed to read tests/cases.json");
    serde_json::from_str(&json).expect("Failed to parse cases.json")
}

#[test]
fn all_cases_match() {
    let cases = load_cases();
    assert!(!cases.is_empty());

    let mut failures = Vec::new();
    for case in &cases {
        let output = match parse(&case.markup) {
            Ok(doc) => to_pseudo_xml(&doc),
            Err(err) => format!("error: {err}"),
        };
        if output != case.xml {
            failures.push(format!(
                "{}\n  markup:   {:?}\n  expected: {:?}\n  actual:   {:?}",
                case.name, case.markup, case.xml, output
            ));
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} cases failed:\n{}",
        failures.len(),
        cases.len(),
        failures.join("\n")
    );
}

#[test]
fn case_names_are_unique() {
    let cases = load_cases();
    let mut names: Vec<&str> = cases.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), cases.len());
}
