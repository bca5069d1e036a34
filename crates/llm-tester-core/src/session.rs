//! Multi-model test session
//!
//! A session owns the model selection and isolates per-model failures so one
//! broken model does not hide the results of the others.

use std::sync::Arc;

use llm_tester_client::ModelService;
use tracing::{error, info};

use crate::{
    error::TestError,
    events::{NoopObserver, ProgressCounter, ProgressEvent, ProgressObserver},
    manager::TestManager,
    result::ResultMap,
    suite::TestSuite,
    Result,
};

/// How a session schedules its tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One model after another, each suite in order
    Sequential,
    /// Every (model, test) pair through a bounded worker pool
    Parallel { max_concurrency: usize },
}

/// A failure caught at the session boundary
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFailure {
    /// Model the failure belongs to, when known
    pub model: Option<String>,
    pub error: TestError,
}

/// Everything a session run produced
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub results: ResultMap,
    pub failures: Vec<ModelFailure>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_results(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }
}

pub struct TestSession {
    manager: TestManager,
    observer: Arc<dyn ProgressObserver>,
    selected_models: Vec<String>,
}

impl TestSession {
    pub fn new(client: Arc<dyn ModelService>) -> Self {
        Self {
            manager: TestManager::new(client),
            observer: Arc::new(NoopObserver),
            selected_models: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the selection. Duplicates are dropped, first occurrence wins.
    pub fn set_selected_models<I, S>(&mut self, models: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_models.clear();
        for model in models {
            let model = model.into();
            if !self.selected_models.contains(&model) {
                self.selected_models.push(model);
            }
        }
    }

    pub fn selected_models(&self) -> &[String] {
        &self.selected_models
    }

    pub fn manager(&self) -> &TestManager {
        &self.manager
    }

    /// Run `suite` against every selected model.
    ///
    /// Stored results are cleared first. Failures are collected in the outcome
    /// instead of aborting the run; only an empty selection is an error.
    pub async fn run(&mut self, suite: &TestSuite, mode: ExecutionMode) -> Result<RunOutcome> {
        if self.selected_models.is_empty() {
            return Err(TestError::NoModelsSelected);
        }

        let models = self.selected_models.clone();
        let total = models.len() * suite.len();
        let counter = Arc::new(ProgressCounter::new(self.observer.clone(), total));
        self.manager.set_observer(counter.clone());
        self.manager.clear_results();

        info!(
            "Starting run of '{}' on {} models ({} tests, {:?})",
            suite.name,
            models.len(),
            total,
            mode
        );
        self.observer.on_event(&ProgressEvent::RunStarted {
            suite: suite.name.clone(),
            models: models.clone(),
            total,
        });

        let outcome = match mode {
            ExecutionMode::Sequential => self.run_sequential(&models, suite).await,
            ExecutionMode::Parallel { max_concurrency } => {
                self.run_parallel(&models, suite, max_concurrency).await
            }
        };

        self.observer.on_event(&ProgressEvent::RunCompleted {
            total,
            failed: counter.failed(),
        });
        info!(
            "Run finished: {} results, {} failures",
            outcome.total_results(),
            outcome.failures.len()
        );

        Ok(outcome)
    }

    async fn run_sequential(&self, models: &[String], suite: &TestSuite) -> RunOutcome {
        let mut outcome = RunOutcome::default();
        for model in models {
            match self.manager.run_test_suite(model, suite).await {
                Ok(results) => {
                    outcome.results.insert(model.clone(), results);
                }
                Err(e) => {
                    error!("Error testing model {}: {}", model, e);
                    outcome
                        .results
                        .insert(model.clone(), self.manager.get_model_results(model));
                    outcome.failures.push(ModelFailure {
                        model: Some(model.clone()),
                        error: e,
                    });
                }
            }
        }
        outcome
    }

    async fn run_parallel(
        &self,
        models: &[String],
        suite: &TestSuite,
        max_concurrency: usize,
    ) -> RunOutcome {
        match self
            .manager
            .run_parallel_tests(models, suite, max_concurrency)
            .await
        {
            Ok(results) => RunOutcome {
                results,
                failures: Vec::new(),
            },
            Err(e) => {
                error!("Error running parallel tests: {}", e);
                let mut results = self.manager.get_results();
                for model in models {
                    results.entry(model.clone()).or_default();
                }
                for model_results in results.values_mut() {
                    model_results.sort_by_key(|result| {
                        suite
                            .position_of(&result.test_case_id)
                            .unwrap_or(usize::MAX)
                    });
                }
                RunOutcome {
                    results,
                    failures: vec![ModelFailure {
                        model: e.model().map(str::to_string),
                        error: e,
                    }],
                }
            }
        }
    }
}
