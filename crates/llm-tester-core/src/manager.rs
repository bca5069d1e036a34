//! Test manager: runs test cases against models and stores the results

use std::sync::Arc;

use llm_tester_client::ModelService;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    case::TestCase,
    error::TestError,
    events::{NoopObserver, ProgressEvent, ProgressObserver},
    pool::WorkerPool,
    result::{ResultMap, TestResult},
    suite::TestSuite,
    Result,
};

/// Runs tests through a [`ModelService`] and keeps every result grouped by model.
///
/// Within one model, stored results follow completion order.
pub struct TestManager {
    client: Arc<dyn ModelService>,
    results: Mutex<ResultMap>,
    observer: Arc<dyn ProgressObserver>,
}

impl TestManager {
    pub fn new(client: Arc<dyn ModelService>) -> Self {
        Self {
            client,
            results: Mutex::new(ResultMap::new()),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn set_observer(&mut self, observer: Arc<dyn ProgressObserver>) {
        self.observer = observer;
    }

    /// Run one test case against one model.
    ///
    /// On success the result is appended to the model's stored results. A failed
    /// generation is returned as [`TestError::ExecutionFailed`] and nothing is stored.
    pub async fn run_test(&self, model: &str, test_case: &TestCase) -> Result<TestResult> {
        info!("Running test '{}' on model '{}'", test_case.name(), model);
        self.observer.on_event(&ProgressEvent::TestStarted {
            model: model.to_string(),
            test_name: test_case.name().to_string(),
        });

        let generation = match self
            .client
            .generate_response(model, test_case.prompt(), test_case.parameters())
            .await
        {
            Ok(generation) => generation,
            Err(e) => {
                error!("Error in test execution: {}", e);
                self.observer.on_event(&ProgressEvent::TestFailed {
                    model: model.to_string(),
                    test_name: test_case.name().to_string(),
                    error: e.to_string(),
                });
                return Err(TestError::ExecutionFailed {
                    test_name: test_case.name().to_string(),
                    model: model.to_string(),
                    source: e,
                });
            }
        };

        if !generation.is_complete() {
            warn!(
                "Response for test '{}' with model '{}' may not be complete",
                test_case.name(),
                model
            );
        }

        let result = TestResult::new(test_case, model, &generation);
        debug!(
            "Test '{}' on '{}': valid={}, time={:.2}s, tokens={}",
            result.test_case_name, model, result.is_valid, result.response_time, result.token_count
        );

        self.results
            .lock()
            .entry(model.to_string())
            .or_default()
            .push(result.clone());

        self.observer.on_event(&ProgressEvent::TestCompleted {
            model: model.to_string(),
            test_name: result.test_case_name.clone(),
            passed: result.is_valid,
            response_time: result.response_time,
        });

        Ok(result)
    }

    /// Run a suite against one model, one case at a time in suite order.
    ///
    /// The first failure aborts the remaining cases.
    pub async fn run_test_suite(&self, model: &str, suite: &TestSuite) -> Result<Vec<TestResult>> {
        info!(
            "Running suite '{}' ({} tests) on model '{}'",
            suite.name,
            suite.len(),
            model
        );

        let mut results = Vec::with_capacity(suite.len());
        for test_case in suite.test_cases() {
            results.push(self.run_test(model, test_case).await?);
        }
        Ok(results)
    }

    /// Run every (model, test case) pair with at most `max_concurrency` in flight.
    ///
    /// All pairs run to completion. If any failed, the first failure in
    /// completion order is returned; results of the successful pairs are still
    /// stored. On success every requested model has an entry, with its results
    /// in suite order.
    pub async fn run_parallel_tests(
        &self,
        models: &[String],
        suite: &TestSuite,
        max_concurrency: usize,
    ) -> Result<ResultMap> {
        let units: Vec<(&str, &TestCase)> = models
            .iter()
            .flat_map(|model| {
                suite
                    .test_cases()
                    .iter()
                    .map(move |case| (model.as_str(), case))
            })
            .collect();

        let pool = WorkerPool::new(max_concurrency);
        info!(
            "Running {} tests across {} models (max concurrency {})",
            units.len(),
            models.len(),
            pool.workers()
        );

        let mut outcomes = pool
            .run(units, |(model, case)| self.run_test(model, case))
            .await;

        if let Some(position) = outcomes.iter().position(|o| o.result.is_err()) {
            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            warn!("{} of the parallel tests failed", failed);
            if let Err(e) = outcomes.swap_remove(position).result {
                return Err(e);
            }
        }

        outcomes.sort_by_key(|o| o.index);

        let mut grouped: ResultMap = models.iter().map(|m| (m.clone(), Vec::new())).collect();
        for outcome in outcomes {
            if let Ok(result) = outcome.result {
                grouped
                    .entry(result.model_name.clone())
                    .or_default()
                    .push(result);
            }
        }
        Ok(grouped)
    }

    /// Snapshot of every stored result
    pub fn get_results(&self) -> ResultMap {
        self.results.lock().clone()
    }

    /// Stored results for one model; empty when the model never ran
    pub fn get_model_results(&self, model: &str) -> Vec<TestResult> {
        self.results.lock().get(model).cloned().unwrap_or_default()
    }

    pub fn clear_results(&self) {
        self.results.lock().clear();
    }
}
