//! Bounded-concurrency task execution.
//!
//! [`run_bounded`] executes a set of independent async units of work with
//! at most `limit` in flight at once. Tasks must not depend on each other
//! within one invocation; cross-stage ordering is enforced by the caller
//! running one stage to completion before submitting the next.
//!
//! Failure semantics are fail-fast without per-task retry: the first
//! failure cancels tasks that have not started yet, every in-flight task
//! settles, and the first error is returned. On success, results are
//! returned in submission order regardless of completion order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;

/// Concurrency ceiling for background generation (remote, rate-limited).
pub const BACKGROUND_CONCURRENCY: usize = 3;

/// Concurrency ceiling for hero composition (remote, rate-limited).
pub const HERO_CONCURRENCY: usize = 2;

/// Concurrency ceiling for local raster exports (cheap).
pub const EXPORT_CONCURRENCY: usize = 5;

/// Run `tasks` with at most `limit` in flight.
///
/// The `cancel` token is observed before each task starts: once triggered
/// (externally, or internally by the first failure) pending tasks resolve
/// to [`PipelineError::Cancelled`] without running.
pub async fn run_bounded<T, F>(
    limit: usize,
    cancel: &CancellationToken,
    tasks: Vec<F>,
) -> Result<Vec<T>, PipelineError>
where
    T: Send + 'static,
    F: std::future::Future<Output = Result<T, PipelineError>> + Send + 'static,
{
    let task_count = tasks.len();
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut join_set = JoinSet::new();

    for (index, task) in tasks.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let cancel = cancel.clone();
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("scheduler semaphore never closes");
            if cancel.is_cancelled() {
                return (index, Err(PipelineError::Cancelled));
            }
            (index, task.await)
        });
    }

    // Drain every task; remember only the first error but let the rest
    // settle so no work is left running when this returns.
    let mut slots: Vec<Option<T>> = (0..task_count).map(|_| None).collect();
    let mut first_error: Option<PipelineError> = None;

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, Ok(value))) => slots[index] = Some(value),
            Ok((_, Err(e))) => {
                if first_error.is_none() {
                    // Stop tasks that have not acquired a permit yet.
                    cancel.cancel();
                    first_error = Some(e);
                }
            }
            Err(join_error) => {
                if first_error.is_none() {
                    cancel.cancel();
                    first_error = Some(PipelineError::Task(join_error.to_string()));
                }
            }
        }
    }

    if let Some(error) = first_error {
        return Err(error);
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.expect("every task settled successfully"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn results_preserve_submission_order() {
        let cancel = CancellationToken::new();
        let tasks: Vec<_> = (0..8u64)
            .map(|i| async move {
                // Later tasks finish first.
                tokio::time::sleep(Duration::from_millis(80 - i * 10)).await;
                Ok::<_, PipelineError>(i)
            })
            .collect();

        let results = run_bounded(8, &cancel, tasks).await.unwrap();
        assert_eq!(results, (0..8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_limit() {
        const LIMIT: usize = 3;
        let active = Arc::new(AtomicUsize::new(0));
        let observed_max = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let tasks: Vec<_> = (0..12)
            .map(|_| {
                let active = Arc::clone(&active);
                let observed_max = Arc::clone(&observed_max);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    observed_max.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, PipelineError>(())
                }
            })
            .collect();

        run_bounded(LIMIT, &cancel, tasks).await.unwrap();
        assert!(observed_max.load(Ordering::SeqCst) <= LIMIT);
    }

    #[tokio::test]
    async fn first_failure_propagates_after_all_settle() {
        let completed = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let mut tasks = Vec::new();
        for i in 0..4 {
            let completed = Arc::clone(&completed);
            tasks.push(async move {
                if i == 1 {
                    // Fail after the other tasks have finished so the test
                    // observes "in-flight work settles, first error wins".
                    tokio::time::sleep(Duration::from_millis(40)).await;
                    return Err(PipelineError::Task("boom".to_string()));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(i)
            });
        }

        let err = run_bounded(4, &cancel, tasks).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        // Tasks already in flight ran to completion.
        assert_eq!(completed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failure_cancels_not_yet_started_tasks() {
        let started = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let mut tasks = Vec::new();
        for i in 0..6 {
            let started = Arc::clone(&started);
            tasks.push(async move {
                started.fetch_add(1, Ordering::SeqCst);
                if i == 0 {
                    return Err(PipelineError::Task("early failure".to_string()));
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(i)
            });
        }

        // Limit 1 serializes the queue: the first task fails, the rest are
        // cancelled before their bodies run.
        let err = run_bounded(1, &cancel, tasks).await.unwrap_err();
        assert!(err.to_string().contains("early failure") || matches!(err, PipelineError::Cancelled));
        assert!(started.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn pre_cancelled_token_runs_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let tasks: Vec<_> = (0..3)
            .map(|i| async move { Ok::<_, PipelineError>(i) })
            .collect();

        let err = run_bounded(2, &cancel, tasks).await.unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled));
    }

    #[tokio::test]
    async fn empty_task_list_returns_empty_vec() {
        let cancel = CancellationToken::new();
        let tasks: Vec<std::future::Ready<Result<(), PipelineError>>> = Vec::new();
        let results = run_bounded(4, &cancel, tasks).await.unwrap();
        assert!(results.is_empty());
    }
}
