//! `llm-tester suites`

use llm_tester_core::{TestCase, TestSuite, Validator};

use crate::output::OutputStyle;

pub fn list_suites() {
    let style = OutputStyle::default();
    for id in TestSuite::builtin_ids() {
        let suite = TestSuite::builtin(id);
        println!(
            "{} - {} ({} tests)",
            style.header(id),
            suite.name,
            suite.len()
        );
        println!("  {}", style.dim(&suite.description));
        for case in suite.test_cases() {
            println!("    {:<24} {}", case.name(), describe_criterion(case));
        }
        println!();
    }
}

/// Short description of how a case is judged
pub fn describe_criterion(case: &TestCase) -> String {
    let describe = |case_insensitive: bool| if case_insensitive { " (any case)" } else { "" };
    match (case.validator(), case.expected_result()) {
        (Some(Validator::ExactMatch { expected, case_insensitive }), _) => {
            format!("equals {:?}{}", expected, describe(*case_insensitive))
        }
        (Some(Validator::Contains { needle, case_insensitive }), _) => {
            format!("contains {:?}{}", needle, describe(*case_insensitive))
        }
        (Some(Validator::ContainsAll { needles, case_insensitive }), _) => {
            format!("contains all of {:?}{}", needles, describe(*case_insensitive))
        }
        (Some(Validator::ContainsAny { needles, case_insensitive }), _) => {
            format!("contains any of {:?}{}", needles, describe(*case_insensitive))
        }
        (Some(Validator::Custom(_)), _) => "custom check".to_string(),
        (None, Some(expected)) => format!("equals {:?}", expected),
        (None, None) => "any response".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_criterion() {
        let basic = TestSuite::builtin("basic");
        let cases = basic.test_cases();
        assert_eq!(describe_criterion(&cases[0]), "contains \"hello\" (any case)");
        assert_eq!(describe_criterion(&cases[1]), "equals \"Paris\"");
        assert_eq!(
            describe_criterion(&TestCase::new("t", "p", "basic")),
            "any response"
        );
    }
}
