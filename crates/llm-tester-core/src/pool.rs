//! Bounded worker pool for independent async units of work

use std::{collections::VecDeque, future::Future};

use futures::future::join_all;
use parking_lot::Mutex;
use tracing::debug;

/// Result of one unit, tagged with its position in the submitted list
#[derive(Debug)]
pub struct UnitOutcome<T, E> {
    pub index: usize,
    pub result: Result<T, E>,
}

/// Fixed number of cooperative workers draining a FIFO queue.
///
/// At most `workers` units are in flight at any time. Units are admitted in
/// submission order as workers free up. A failing unit does not stop the
/// other workers; every unit runs to completion.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// A concurrency of 0 is treated as 1
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            workers: max_concurrency.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every unit through `work` and return the outcomes in completion order
    pub async fn run<U, T, E, F, Fut>(&self, units: Vec<U>, work: F) -> Vec<UnitOutcome<T, E>>
    where
        F: Fn(U) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let total = units.len();
        let workers = self.workers.min(total);
        debug!("Running {} units on {} workers", total, workers);

        let pending: Mutex<VecDeque<(usize, U)>> =
            Mutex::new(units.into_iter().enumerate().collect());
        let finished: Mutex<Vec<UnitOutcome<T, E>>> = Mutex::new(Vec::with_capacity(total));

        let queue = &pending;
        let outcomes = &finished;
        let work = &work;

        join_all((0..workers).map(|worker| async move {
            loop {
                let next = queue.lock().pop_front();
                let Some((index, unit)) = next else {
                    break;
                };
                debug!("Worker {} picked unit {}", worker, index);
                let result = work(unit).await;
                outcomes.lock().push(UnitOutcome { index, result });
            }
        }))
        .await;

        finished.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_concurrency_means_one_worker() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
        assert_eq!(WorkerPool::new(4).workers(), 4);
    }
}
