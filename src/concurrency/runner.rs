//! Bounded Concurrency Runner
//!
//! Runs a collection of independent async operations with a hard ceiling on
//! how many are in flight at once. A completed slot is refilled immediately
//! with the next unstarted item (a worker pool, not fixed batches), which
//! keeps throughput up when individual task latency varies.
//!
//! The runner owns no state beyond one call, so unrelated batches never
//! interfere.

use std::future::Future;

use futures::stream::{self, StreamExt};

// == Defaults ==
/// Default in-flight ceiling, sized for rate-limited upstream APIs.
pub const DEFAULT_CONCURRENCY: usize = 3;

// == Runner Options ==
/// Per-batch execution options.
pub struct RunnerOptions<E> {
    /// Maximum simultaneously pending tasks; 0 is clamped to 1
    pub concurrency: usize,
    /// Abort on the first failure instead of collecting it
    pub fail_fast: bool,
    /// Hook invoked synchronously with each captured failure
    pub on_error: Option<Box<dyn Fn(&E, usize) + Send + Sync>>,
}

impl<E> RunnerOptions<E> {
    /// Options with the default ceiling, tolerant error policy and no hook.
    pub fn new() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            fail_fast: false,
            on_error: None,
        }
    }

    /// Sets the in-flight ceiling.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Aborts the batch on the first failure.
    pub fn fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Installs a failure hook, called with `(error, index)` as each
    /// failure is captured.
    pub fn with_error_hook(mut self, hook: Box<dyn Fn(&E, usize) + Send + Sync>) -> Self {
        self.on_error = Some(hook);
        self
    }
}

impl<E> Default for RunnerOptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

// == Task Failure ==
/// A captured per-item failure, tagged with the item's original index so
/// callers can map it back to its input and retry just the failed subset.
#[derive(Debug)]
pub struct TaskFailure<E> {
    /// Index of the failed item in the input
    pub index: usize,
    /// The task's error
    pub error: E,
}

// == Batch Report ==
/// Outcome of a tolerant batch run.
#[derive(Debug)]
pub struct BatchReport<T, E> {
    /// Successful results, in the items' original relative order
    pub results: Vec<T>,
    /// Captured failures, ordered by input index
    pub errors: Vec<TaskFailure<E>>,
    /// Number of tasks that settled
    pub total_processed: usize,
    /// Number of successes
    pub success_count: usize,
    /// Number of failures
    pub error_count: usize,
}

// == Run Batch ==
/// Processes `items` through `processor` with at most
/// `options.concurrency` tasks pending at once.
///
/// Tolerant mode (default) captures each failure as a [`TaskFailure`],
/// invokes the error hook, and keeps going. Fail-fast mode returns the first
/// error immediately; in-flight siblings are dropped at their next await
/// point and their results discarded.
pub async fn run_batch<I, T, E, F, Fut>(
    items: Vec<I>,
    processor: F,
    options: &RunnerOptions<E>,
) -> Result<BatchReport<T, E>, E>
where
    F: Fn(I, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    run_batch_from(items, &processor, options, 0).await
}

/// Batch run with indices offset by `base_index`, shared by [`run_batch`]
/// and [`run_in_batches`].
async fn run_batch_from<I, T, E, F, Fut>(
    items: Vec<I>,
    processor: &F,
    options: &RunnerOptions<E>,
    base_index: usize,
) -> Result<BatchReport<T, E>, E>
where
    F: Fn(I, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let concurrency = options.concurrency.max(1);

    let mut in_flight = stream::iter(items.into_iter().enumerate().map(|(offset, item)| {
        let index = base_index + offset;
        let task = processor(item, index);
        async move { (index, task.await) }
    }))
    .buffer_unordered(concurrency);

    let mut indexed: Vec<(usize, T)> = Vec::new();
    let mut errors: Vec<TaskFailure<E>> = Vec::new();
    let mut total_processed = 0usize;

    while let Some((index, outcome)) = in_flight.next().await {
        total_processed += 1;
        match outcome {
            Ok(value) => indexed.push((index, value)),
            Err(error) => {
                if options.fail_fast {
                    return Err(error);
                }
                if let Some(hook) = &options.on_error {
                    hook(&error, index);
                }
                errors.push(TaskFailure { index, error });
            }
        }
    }

    // Physical completion order differs from input order; restore it
    indexed.sort_by_key(|(index, _)| *index);
    errors.sort_by_key(|failure| failure.index);

    let success_count = indexed.len();
    let error_count = errors.len();

    Ok(BatchReport {
        results: indexed.into_iter().map(|(_, value)| value).collect(),
        errors,
        total_processed,
        success_count,
        error_count,
    })
}

// == Map Concurrently ==
/// Maps `items` through `mapper` under the given ceiling, preserving full
/// positional alignment: the output has one slot per input, with None at
/// failed indices.
pub async fn map_concurrently<I, T, E, F, Fut>(
    items: Vec<I>,
    mapper: F,
    concurrency: usize,
) -> Vec<Option<T>>
where
    F: Fn(I, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let total = items.len();
    let mut in_flight = stream::iter(items.into_iter().enumerate().map(|(index, item)| {
        let task = mapper(item, index);
        async move { (index, task.await) }
    }))
    .buffer_unordered(concurrency.max(1));

    let mut slots: Vec<Option<T>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    while let Some((index, outcome)) = in_flight.next().await {
        if let Ok(value) = outcome {
            slots[index] = Some(value);
        }
    }

    slots
}

// == Filter Concurrently ==
/// Keeps the items whose async predicate resolves to `Ok(true)`, in their
/// original order. A predicate error means "exclude", not "fail the batch".
pub async fn filter_concurrently<I, E, F, Fut>(
    items: Vec<I>,
    predicate: F,
    concurrency: usize,
) -> Vec<I>
where
    I: Clone,
    F: Fn(I, usize) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let mut in_flight = stream::iter(items.into_iter().enumerate().map(|(index, item)| {
        let verdict = predicate(item.clone(), index);
        async move {
            let keep = matches!(verdict.await, Ok(true));
            (index, item, keep)
        }
    }))
    .buffer_unordered(concurrency.max(1));

    let mut kept: Vec<(usize, I)> = Vec::new();
    while let Some((index, item, keep)) = in_flight.next().await {
        if keep {
            kept.push((index, item));
        }
    }

    kept.sort_by_key(|(index, _)| *index);
    kept.into_iter().map(|(_, item)| item).collect()
}

// == Run In Batches ==
/// Chunks `items` into groups of `chunk_size` and runs the groups
/// sequentially, each through the same bounded-concurrency pool.
///
/// The chunk size paces a rate-limited upstream at the group level, on top
/// of the per-call ceiling. Failure indices in the merged report refer to
/// positions in the original input.
pub async fn run_in_batches<I, T, E, F, Fut>(
    items: Vec<I>,
    chunk_size: usize,
    processor: F,
    options: &RunnerOptions<E>,
) -> Result<BatchReport<T, E>, E>
where
    F: Fn(I, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let chunk_size = chunk_size.max(1);

    let mut results = Vec::new();
    let mut errors = Vec::new();
    let mut total_processed = 0usize;

    let mut base_index = 0usize;
    let mut remaining = items;
    while !remaining.is_empty() {
        let rest = remaining.split_off(chunk_size.min(remaining.len()));
        let chunk = std::mem::replace(&mut remaining, rest);
        let chunk_len = chunk.len();

        let report = run_batch_from(chunk, &processor, options, base_index).await?;
        results.extend(report.results);
        errors.extend(report.errors);
        total_processed += report.total_processed;
        base_index += chunk_len;
    }

    let success_count = results.len();
    let error_count = errors.len();

    Ok(BatchReport {
        results,
        errors,
        total_processed,
        success_count,
        error_count,
    })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Tracks the maximum number of simultaneously pending tasks.
    #[derive(Default)]
    struct InFlightGauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl InFlightGauge {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn exit(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_concurrency_ceiling_respected() {
        let gauge = Arc::new(InFlightGauge::default());

        let items: Vec<u32> = (0..10).collect();
        let gauge_ref = gauge.clone();
        let report = run_batch(
            items,
            |item, _| {
                let gauge = gauge_ref.clone();
                async move {
                    gauge.enter();
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    gauge.exit();
                    Ok::<u32, Infallible>(item)
                }
            },
            &RunnerOptions::new().with_concurrency(3),
        )
        .await
        .unwrap();

        assert_eq!(report.success_count, 10);
        assert!(gauge.peak() <= 3, "ceiling exceeded: {}", gauge.peak());
        // Real overlap, not accidental serialization
        assert!(gauge.peak() > 1, "no parallelism observed");
    }

    #[tokio::test]
    async fn test_results_in_original_order_despite_latency() {
        let items: Vec<u64> = vec![1, 2, 3, 4, 5];
        let report = run_batch(
            items,
            |item, _| async move {
                // Later items finish first
                tokio::time::sleep(Duration::from_millis((6 - item) * 10)).await;
                Ok::<u64, Infallible>(item * 2)
            },
            &RunnerOptions::new().with_concurrency(5),
        )
        .await
        .unwrap();

        assert_eq!(report.results, vec![2, 4, 6, 8, 10]);
    }

    #[tokio::test]
    async fn test_tolerant_mode_captures_failures() {
        let items: Vec<u32> = vec![1, 2, 3, 4, 5];
        let report = run_batch(
            items,
            |item, _| async move {
                if item == 3 {
                    Err("boom")
                } else {
                    Ok(item * 2)
                }
            },
            &RunnerOptions::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.results, vec![2, 4, 8, 10]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].index, 2);
        assert_eq!(report.errors[0].error, "boom");
        assert_eq!(report.success_count, 4);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.total_processed, 5);
    }

    #[tokio::test]
    async fn test_fail_fast_returns_first_error() {
        let items: Vec<u32> = vec![1, 2, 3, 4, 5];
        let start = Instant::now();
        let outcome = run_batch(
            items,
            |item, _| async move {
                if item == 3 {
                    Err("boom")
                } else {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(item)
                }
            },
            &RunnerOptions::new().with_concurrency(5).fail_fast(),
        )
        .await;

        assert_eq!(outcome.unwrap_err(), "boom");
        // The sleeping siblings were dropped, not drained
        assert!(
            start.elapsed() < Duration::from_millis(40),
            "fail-fast waited {:?} for in-flight siblings",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn test_error_hook_sees_error_and_index() {
        let seen: Arc<Mutex<Vec<(String, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_ref = seen.clone();

        let items: Vec<u32> = vec![0, 1, 2];
        let report = run_batch(
            items,
            |item, _| async move {
                if item == 1 {
                    Err("bad item".to_string())
                } else {
                    Ok(item)
                }
            },
            &RunnerOptions::new().with_error_hook(Box::new(move |error: &String, index| {
                seen_ref.lock().unwrap().push((error.clone(), index));
            })),
        )
        .await
        .unwrap();

        assert_eq!(report.error_count, 1);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[("bad item".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_map_concurrently_positional_alignment() {
        let items: Vec<u32> = vec![1, 2, 3, 4, 5];
        let mapped = map_concurrently(
            items,
            |item, _| async move {
                if item == 4 {
                    Err("skip")
                } else {
                    Ok(item * 10)
                }
            },
            3,
        )
        .await;

        assert_eq!(mapped, vec![Some(10), Some(20), Some(30), None, Some(50)]);
    }

    #[tokio::test]
    async fn test_filter_concurrently_drops_errors_silently() {
        let items: Vec<u32> = (1..=6).collect();
        let kept = filter_concurrently(
            items,
            |item, _| async move {
                if item == 5 {
                    Err("cannot judge")
                } else {
                    Ok(item % 2 == 0)
                }
            },
            3,
        )
        .await;

        assert_eq!(kept, vec![2, 4, 6]);
    }

    #[tokio::test]
    async fn test_run_in_batches_merges_reports() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_ref = calls.clone();

        let items: Vec<u32> = (0..7).collect();
        let report = run_in_batches(
            items,
            3,
            |item, index| {
                let calls = calls_ref.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    // index must be the global position
                    assert_eq!(item as usize, index);
                    if item == 4 {
                        Err("boom")
                    } else {
                        Ok(item)
                    }
                }
            },
            &RunnerOptions::new().with_concurrency(2),
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 7);
        assert_eq!(report.results, vec![0, 1, 2, 3, 5, 6]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].index, 4);
        assert_eq!(report.total_processed, 7);
    }

    #[tokio::test]
    async fn test_zero_concurrency_clamped_to_one() {
        let items: Vec<u32> = vec![1, 2, 3];
        let report = run_batch(
            items,
            |item, _| async move { Ok::<u32, Infallible>(item) },
            &RunnerOptions::new().with_concurrency(0),
        )
        .await
        .unwrap();

        assert_eq!(report.results, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = run_batch(
            Vec::<u32>::new(),
            |item, _| async move { Ok::<u32, Infallible>(item) },
            &RunnerOptions::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.total_processed, 0);
        assert!(report.results.is_empty());
        assert!(report.errors.is_empty());
    }
}
