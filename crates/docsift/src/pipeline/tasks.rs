//! Generic bounded-concurrency task execution.
//!
//! [`process_tasks`] fans an arbitrary task list out to async workers under
//! a semaphore cap and a wall-clock deadline. It is the engine under
//! [`DocumentPipeline::process_batch`](super::DocumentPipeline::process_batch)
//! but takes any `(id, input)` list and worker function.

use crate::{DocsiftError, Result};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};

/// Run every task through `worker` with at most `max_workers` running
/// concurrently, bounded by a wall-clock `deadline` for the whole call.
///
/// The returned map contains exactly one entry per submitted id:
/// - the worker's result, for tasks that finished in time;
/// - `Err(Timeout)` for tasks still running (or queued) at the deadline -
///   already-completed results are kept, partial results beat none;
/// - `Err(Other)` for workers that panicked.
pub async fn process_tasks<T, R, F, Fut>(
    tasks: Vec<(String, T)>,
    worker: F,
    max_workers: usize,
    deadline: Duration,
) -> HashMap<String, Result<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let mut results: HashMap<String, Result<R>> = HashMap::with_capacity(tasks.len());
    if tasks.is_empty() {
        return results;
    }

    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut join_set = JoinSet::new();
    let mut pending: HashSet<String> = HashSet::with_capacity(tasks.len());

    for (id, input) in tasks {
        pending.insert(id.clone());
        let semaphore = Arc::clone(&semaphore);
        let worker = worker.clone();
        join_set.spawn(async move {
            // The semaphore is never closed, so acquisition cannot fail.
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            (id, worker(input).await)
        });
    }

    let deadline = Instant::now() + deadline;

    loop {
        match timeout_at(deadline, join_set.join_next()).await {
            Ok(Some(Ok((id, result)))) => {
                pending.remove(&id);
                results.insert(id, result);
            }
            Ok(Some(Err(join_err))) => {
                // Identity is only known from the payload; the panicked
                // task's id stays in `pending` and is resolved below.
                tracing::warn!("worker task did not complete: {}", join_err);
            }
            Ok(None) => break,
            Err(_) => {
                tracing::warn!("batch deadline reached with {} tasks unfinished", pending.len());
                join_set.abort_all();
                for id in pending.drain() {
                    results.insert(
                        id,
                        Err(DocsiftError::Timeout(
                            "batch deadline exceeded before this task completed".to_string(),
                        )),
                    );
                }
                break;
            }
        }
    }

    for id in pending.drain() {
        results.insert(
            id,
            Err(DocsiftError::Other("worker terminated abnormally".to_string())),
        );
    }

    results
}
