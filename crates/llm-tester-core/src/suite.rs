//! Test suites and the built-in suite catalogue

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    case::{TestCase, Validator},
    error::TestError,
    Result,
};

const BUILTIN_IDS: [&str; 4] = ["basic", "math", "code", "knowledge"];

/// Ordered group of test cases; cases run in insertion order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    test_cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            test_cases: Vec::new(),
        }
    }

    pub fn add_test_case(&mut self, test_case: TestCase) {
        self.test_cases.push(test_case);
    }

    pub fn add_test_cases(&mut self, test_cases: impl IntoIterator<Item = TestCase>) {
        self.test_cases.extend(test_cases);
    }

    /// Builder form of [`Self::add_test_case`]
    pub fn with_test_case(mut self, test_case: TestCase) -> Self {
        self.add_test_case(test_case);
        self
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Index of the case with `test_case_id`, if it belongs to this suite
    pub fn position_of(&self, test_case_id: &str) -> Option<usize> {
        self.test_cases.iter().position(|case| case.id() == test_case_id)
    }

    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }

    /// Ids accepted by [`Self::builtin`]
    pub fn builtin_ids() -> &'static [&'static str] {
        &BUILTIN_IDS
    }

    /// Built-in suite by id; unknown ids fall back to `basic`
    pub fn builtin(id: &str) -> Self {
        Self::try_builtin(id).unwrap_or_else(|_| {
            warn!("Unknown test suite '{}', using 'basic'", id);
            basic_suite()
        })
    }

    /// Built-in suite by id, rejecting unknown ids
    pub fn try_builtin(id: &str) -> Result<Self> {
        match id {
            "basic" => Ok(basic_suite()),
            "math" => Ok(math_suite()),
            "code" => Ok(code_suite()),
            "knowledge" => Ok(knowledge_suite()),
            other => Err(TestError::UnknownSuite(other.to_string())),
        }
    }
}

fn basic_suite() -> TestSuite {
    TestSuite::new("Basic Evaluation", "Basic tests for LLM evaluation")
        .with_test_case(
            TestCase::new("Simple Greeting", "Say hello to the user.", "basic")
                .with_validator(Validator::contains("hello").ignore_case()),
        )
        .with_test_case(
            TestCase::new(
                "Simple Prompt Response",
                "What is the capital of France?",
                "basic",
            )
            .with_expected_result("Paris"),
        )
        .with_test_case(
            TestCase::new("Simple Instruction", "Count from 1 to 5.", "basic")
                .with_validator(Validator::contains_all(["1", "2", "3", "4", "5"])),
        )
}

fn math_suite() -> TestSuite {
    TestSuite::new("Math Capabilities", "Tests for mathematical capabilities")
        .with_test_case(
            TestCase::new("Simple Addition", "What is 1 + 2?", "math").with_expected_result("3"),
        )
        .with_test_case(
            TestCase::new("Simple Subtraction", "What is 10 - 5?", "math")
                .with_expected_result("5"),
        )
        .with_test_case(
            TestCase::new("Simple Multiplication", "What is 7 * 6?", "math")
                .with_expected_result("42"),
        )
        .with_test_case(
            TestCase::new("Square Root", "What is the square root of 64?", "math")
                .with_validator(Validator::contains("8")),
        )
}

fn code_suite() -> TestSuite {
    TestSuite::new("Code Generation", "Tests for code generation capabilities")
        .with_test_case(
            TestCase::new(
                "Python Hello World",
                "Write a Python program that prints 'Hello, World!'",
                "code",
            )
            .with_validator(Validator::contains_all(["print", "Hello, World"])),
        )
        .with_test_case(
            TestCase::new(
                "JavaScript Function",
                "Write a JavaScript function that calculates the factorial of a number.",
                "code",
            )
            .with_validator(Validator::contains_all(["function", "factorial"])),
        )
        .with_test_case(
            TestCase::new(
                "HTML Structure",
                "Write the basic HTML structure for a webpage with a heading and a paragraph.",
                "code",
            )
            .with_validator(Validator::contains_all(["<html", "<body", "<h"]).ignore_case()),
        )
        .with_test_case(
            TestCase::new(
                "SQL Query",
                "Write a SQL query to select all users from a 'users' table where the age is greater than 18.",
                "code",
            )
            .with_validator(Validator::contains_all(["select", "from", "users"]).ignore_case()),
        )
}

fn knowledge_suite() -> TestSuite {
    TestSuite::new("General Knowledge", "Tests for general knowledge capabilities")
        .with_test_case(
            TestCase::new(
                "Historical Fact",
                "Who was the first person to walk on the moon?",
                "knowledge",
            )
            .with_validator(Validator::contains_any(["armstrong", "neil"]).ignore_case()),
        )
        .with_test_case(
            TestCase::new(
                "Scientific Fact",
                "What is the chemical symbol for water?",
                "knowledge",
            )
            .with_expected_result("H2O"),
        )
        .with_test_case(
            TestCase::new("Geography", "What is the largest ocean on Earth?", "knowledge")
                .with_validator(Validator::contains("pacific").ignore_case()),
        )
        .with_test_case(
            TestCase::new("Literature", "Who wrote 'Pride and Prejudice'?", "knowledge")
                .with_validator(Validator::contains_any(["austen", "jane"]).ignore_case()),
        )
}
