//! LLM Tester core
//!
//! Test cases and suites, the test manager that runs them against a
//! [`llm_tester_client::ModelService`], and the session that runs one suite
//! across several models.

pub mod case;
pub mod error;
pub mod events;
pub mod manager;
pub mod pool;
pub mod result;
pub mod session;
pub mod suite;

pub use case::{CustomValidator, TestCase, Validator};
pub use error::TestError;
pub use events::{NoopObserver, ProgressCounter, ProgressEvent, ProgressObserver};
pub use manager::TestManager;
pub use pool::{UnitOutcome, WorkerPool};
pub use result::{ResultMap, TestResult};
pub use session::{ExecutionMode, ModelFailure, RunOutcome, TestSession};
pub use suite::TestSuite;

pub type Result<T> = std::result::Result<T, TestError>;
