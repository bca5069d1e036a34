//! Progress events emitted while tests run

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Something that happened during a run
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    RunStarted {
        suite: String,
        models: Vec<String>,
        total: usize,
    },
    TestStarted {
        model: String,
        test_name: String,
    },
    TestCompleted {
        model: String,
        test_name: String,
        passed: bool,
        response_time: f64,
    },
    TestFailed {
        model: String,
        test_name: String,
        error: String,
    },
    /// `done` counts finished tests (passed, failed validation or errored)
    Progress {
        done: usize,
        total: usize,
    },
    RunCompleted {
        total: usize,
        failed: usize,
    },
}

/// Receiver for [`ProgressEvent`]s.
///
/// Called from inside running tests, so implementations should return quickly.
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_event(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Observer that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Forwards events and follows every finished test with a `Progress` event
pub struct ProgressCounter {
    inner: Arc<dyn ProgressObserver>,
    total: usize,
    done: AtomicUsize,
    failed: AtomicUsize,
}

impl ProgressCounter {
    pub fn new(inner: Arc<dyn ProgressObserver>, total: usize) -> Self {
        Self {
            inner,
            total,
            done: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

impl ProgressObserver for ProgressCounter {
    fn on_event(&self, event: &ProgressEvent) {
        self.inner.on_event(event);

        let finished = match event {
            ProgressEvent::TestCompleted { .. } => true,
            ProgressEvent::TestFailed { .. } => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                true
            }
            _ => false,
        };

        if finished {
            let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
            self.inner.on_event(&ProgressEvent::Progress {
                done,
                total: self.total,
            });
        }
    }
}
