//! Test cases and their validation strategies

use std::{fmt, sync::Arc};

use llm_tester_client::GenerationParams;
use serde::{Deserialize, Serialize};

/// Predicate used by [`Validator::Custom`]
pub type ValidatorFn = dyn Fn(&str) -> bool + Send + Sync;

/// Callback wrapper so custom validators can live inside a cloneable, debuggable enum
#[derive(Clone)]
pub struct CustomValidator(Arc<ValidatorFn>);

impl CustomValidator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, response: &str) -> bool {
        (self.0)(response)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(<fn>)")
    }
}

/// How a response is judged.
///
/// Every strategy except [`Validator::Custom`] is plain data and round-trips
/// through serde, so suites can be stored as YAML or JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// Trimmed response equals `expected`
    ExactMatch {
        expected: String,
        #[serde(default)]
        case_insensitive: bool,
    },

    /// Response contains `needle`
    Contains {
        needle: String,
        #[serde(default)]
        case_insensitive: bool,
    },

    /// Response contains every needle
    ContainsAll {
        needles: Vec<String>,
        #[serde(default)]
        case_insensitive: bool,
    },

    /// Response contains at least one needle
    ContainsAny {
        needles: Vec<String>,
        #[serde(default)]
        case_insensitive: bool,
    },

    /// Arbitrary predicate; never serialized
    #[serde(skip)]
    Custom(CustomValidator),
}

impl Validator {
    pub fn exact(expected: impl Into<String>) -> Self {
        Validator::ExactMatch {
            expected: expected.into(),
            case_insensitive: false,
        }
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        Validator::Contains {
            needle: needle.into(),
            case_insensitive: false,
        }
    }

    pub fn contains_all<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::ContainsAll {
            needles: needles.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    pub fn contains_any<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::ContainsAny {
            needles: needles.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Validator::Custom(CustomValidator::new(f))
    }

    /// Make the comparison ignore case. No effect on custom validators.
    pub fn ignore_case(mut self) -> Self {
        match &mut self {
            Validator::ExactMatch {
                case_insensitive, ..
            }
            | Validator::Contains {
                case_insensitive, ..
            }
            | Validator::ContainsAll {
                case_insensitive, ..
            }
            | Validator::ContainsAny {
                case_insensitive, ..
            } => *case_insensitive = true,
            Validator::Custom(_) => {}
        }
        self
    }

    pub fn is_serializable(&self) -> bool {
        !matches!(self, Validator::Custom(_))
    }

    /// Apply the strategy to a response. Deterministic for every built-in strategy.
    pub fn validate(&self, response: &str) -> bool {
        match self {
            Validator::ExactMatch {
                expected,
                case_insensitive,
            } => {
                let (response, expected) = (response.trim(), expected.trim());
                if *case_insensitive {
                    response.to_lowercase() == expected.to_lowercase()
                } else {
                    response == expected
                }
            }
            Validator::Contains {
                needle,
                case_insensitive,
            } => Haystack::new(response, *case_insensitive).contains(needle),
            Validator::ContainsAll {
                needles,
                case_insensitive,
            } => {
                let haystack = Haystack::new(response, *case_insensitive);
                needles.iter().all(|n| haystack.contains(n))
            }
            Validator::ContainsAny {
                needles,
                case_insensitive,
            } => {
                let haystack = Haystack::new(response, *case_insensitive);
                needles.iter().any(|n| haystack.contains(n))
            }
            Validator::Custom(f) => f.call(response),
        }
    }
}

struct Haystack {
    text: String,
    case_insensitive: bool,
}

impl Haystack {
    fn new(text: &str, case_insensitive: bool) -> Self {
        let text = if case_insensitive {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        Self {
            text,
            case_insensitive,
        }
    }

    fn contains(&self, needle: &str) -> bool {
        if self.case_insensitive {
            self.text.contains(&needle.to_lowercase())
        } else {
            self.text.contains(needle)
        }
    }
}

/// One prompt plus its pass/fail criterion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default = "new_test_case_id")]
    id: String,
    name: String,
    prompt: String,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validator: Option<Validator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<GenerationParams>,
}

fn new_test_case_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl TestCase {
    /// Create a test case with a freshly generated id
    pub fn new(
        name: impl Into<String>,
        prompt: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: new_test_case_id(),
            name: name.into(),
            prompt: prompt.into(),
            category: category.into(),
            expected_result: None,
            validator: None,
            parameters: None,
        }
    }

    pub fn with_expected_result(mut self, expected: impl Into<String>) -> Self {
        self.expected_result = Some(expected.into());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Per-case generation parameters, sent as-is with the prompt
    pub fn with_parameters(mut self, parameters: GenerationParams) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn expected_result(&self) -> Option<&str> {
        self.expected_result.as_deref()
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    pub fn parameters(&self) -> Option<&GenerationParams> {
        self.parameters.as_ref()
    }

    /// Judge a response.
    ///
    /// The validator wins when present; otherwise the trimmed response must
    /// equal the trimmed expected result; with neither, every response passes.
    pub fn validate_response(&self, response: &str) -> bool {
        if let Some(validator) = &self.validator {
            validator.validate(response)
        } else if let Some(expected) = &self.expected_result {
            response.trim() == expected.trim()
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = TestCase::new("a", "p", "basic");
        let b = TestCase::new("a", "p", "basic");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_validator_takes_precedence_over_expected_result() {
        let case = TestCase::new("t", "p", "basic")
            .with_expected_result("yes")
            .with_validator(Validator::contains("no"));
        assert!(case.validate_response("no way"));
        assert!(!case.validate_response("yes"));
    }

    #[test]
    fn test_ignore_case_applies_to_all_needles() {
        let validator = Validator::contains_all(["<html", "<body"]).ignore_case();
        assert!(validator.validate("<HTML><BODY></BODY></HTML>"));
        assert!(!validator.validate("<HTML>"));
    }

    #[test]
    fn test_custom_validator_is_not_serializable() {
        let validator = Validator::custom(|r| r.len() > 3);
        assert!(!validator.is_serializable());
        assert!(serde_json::to_string(&validator).is_err());
    }
}
