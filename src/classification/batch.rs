use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// What happens to the records of a chunk whose execution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkFailurePolicy {
    /// Every record of the failed chunk receives the fallback result.
    #[default]
    Substitute,
    /// The chunk is logged and left out of the output.
    Drop,
    /// The whole batch fails with the first chunk error.
    Fail,
}

impl ChunkFailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "substitute" | "default" => Some(Self::Substitute),
            "drop" | "skip" => Some(Self::Drop),
            "fail" | "abort" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// Worker pool and failure settings for batch classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub chunk_size: usize,
    pub workers: usize,
    pub chunk_timeout: Option<Duration>,
    pub failure_policy: ChunkFailurePolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: available_workers(),
            chunk_timeout: None,
            failure_policy: ChunkFailurePolicy::default(),
        }
    }
}

pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1)
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkExecutionError {
    #[error("chunk {index} panicked: {message}")]
    Panicked { index: usize, message: String },
    #[error("chunk {index} timed out after {timeout:?}")]
    TimedOut { index: usize, timeout: Duration },
    #[error("chunk {index} was cancelled")]
    Cancelled { index: usize },
    #[error("chunk {index} returned {actual} results for {expected} records")]
    Incomplete {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("batch aborted: {0}")]
    ChunkFailed(#[from] ChunkExecutionError),
}

/// Counters describing how a batch was assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub chunks: usize,
    pub classified: usize,
    pub substituted: usize,
    pub dropped: usize,
    pub failed_chunks: usize,
}

/// Records paired with their results, in input order.
#[derive(Debug, Clone)]
pub struct BatchOutput<T, R> {
    pub results: Vec<(T, R)>,
    pub report: BatchReport,
}

type ChunkHandle<R> = JoinHandle<Result<Vec<R>, ChunkExecutionError>>;

/// Fans chunks out to a bounded pool of blocking workers and reassembles results in order.
pub struct BatchRunner {
    config: BatchConfig,
    permits: Arc<Semaphore>,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.workers.max(1)));
        Self { config, permits }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Splits `records` into chunks of `chunk_size` (0 is treated as 1) and runs
    /// `classify` on each chunk. `fallback` supplies results for failed chunks
    /// under [`ChunkFailurePolicy::Substitute`].
    pub async fn run<T, R, F, D>(
        &self,
        records: Vec<T>,
        chunk_size: usize,
        classify: F,
        fallback: D,
    ) -> Result<BatchOutput<T, R>, BatchError>
    where
        T: Clone + Send + Sync + 'static,
        R: Send + 'static,
        F: Fn(&[T]) -> Vec<R> + Send + Sync + 'static,
        D: Fn(&T) -> R,
    {
        let chunk_size = chunk_size.max(1);
        let classify = Arc::new(classify);
        let mut report = BatchReport {
            total: records.len(),
            ..BatchReport::default()
        };

        let mut pending: Vec<(usize, Arc<Vec<T>>, ChunkHandle<R>)> = Vec::new();
        let mut remaining = records.into_iter();
        loop {
            let chunk: Vec<T> = remaining.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }

            let index = pending.len();
            let chunk = Arc::new(chunk);
            let handle = self.spawn_chunk(index, Arc::clone(&chunk), Arc::clone(&classify));
            pending.push((index, chunk, handle));
        }
        report.chunks = pending.len();

        let mut results = Vec::with_capacity(report.total);
        let mut pending = pending.into_iter();
        while let Some((index, chunk, handle)) = pending.next() {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => Err(join_failure(index, err)),
            };
            let outcome = outcome.and_then(|chunk_results| {
                if chunk_results.len() == chunk.len() {
                    Ok(chunk_results)
                } else {
                    Err(ChunkExecutionError::Incomplete {
                        index,
                        expected: chunk.len(),
                        actual: chunk_results.len(),
                    })
                }
            });

            match outcome {
                Ok(chunk_results) => {
                    debug!(chunk = index, records = chunk.len(), "chunk classified");
                    report.classified += chunk.len();
                    results.extend(chunk.iter().cloned().zip(chunk_results));
                }
                Err(err) => {
                    report.failed_chunks += 1;
                    match self.config.failure_policy {
                        ChunkFailurePolicy::Substitute => {
                            warn!(
                                error = %err,
                                records = chunk.len(),
                                "chunk failed, substituting fallback results"
                            );
                            report.substituted += chunk.len();
                            results.extend(
                                chunk
                                    .iter()
                                    .map(|record| (record.clone(), fallback(record))),
                            );
                        }
                        ChunkFailurePolicy::Drop => {
                            warn!(
                                error = %err,
                                records = chunk.len(),
                                "chunk failed, dropping its records"
                            );
                            report.dropped += chunk.len();
                        }
                        ChunkFailurePolicy::Fail => {
                            warn!(error = %err, "chunk failed, aborting batch");
                            for (_, _, handle) in pending {
                                handle.abort();
                            }
                            return Err(err.into());
                        }
                    }
                }
            }
        }

        Ok(BatchOutput { results, report })
    }

    fn spawn_chunk<T, R, F>(
        &self,
        index: usize,
        chunk: Arc<Vec<T>>,
        classify: Arc<F>,
    ) -> ChunkHandle<R>
    where
        T: Send + Sync + 'static,
        R: Send + 'static,
        F: Fn(&[T]) -> Vec<R> + Send + Sync + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let timeout = self.config.chunk_timeout;

        tokio::spawn(async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|_| ChunkExecutionError::Cancelled { index })?;

            // The permit travels with the blocking work so a timed-out chunk still
            // occupies its worker slot until the classifier actually returns.
            let work = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                (*classify)(chunk.as_slice())
            });
            let joined = match timeout {
                Some(limit) => tokio::time::timeout(limit, work)
                    .await
                    .map_err(|_| ChunkExecutionError::TimedOut {
                        index,
                        timeout: limit,
                    })?,
                None => work.await,
            };

            joined.map_err(|err| join_failure(index, err))
        })
    }
}

fn join_failure(index: usize, err: JoinError) -> ChunkExecutionError {
    if err.is_cancelled() {
        return ChunkExecutionError::Cancelled { index };
    }

    match err.try_into_panic() {
        Ok(payload) => ChunkExecutionError::Panicked {
            index,
            message: panic_message(payload.as_ref()),
        },
        Err(_) => ChunkExecutionError::Cancelled { index },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn runner(policy: ChunkFailurePolicy) -> BatchRunner {
        BatchRunner::new(BatchConfig {
            chunk_size: 2,
            workers: 2,
            chunk_timeout: None,
            failure_policy: policy,
        })
    }

    fn doubled(chunk: &[u32]) -> Vec<u32> {
        chunk.iter().map(|value| value * 2).collect()
    }

    fn panics_on_seven(chunk: &[u32]) -> Vec<u32> {
        if chunk.contains(&7) {
            panic!("unexpected record 7");
        }
        doubled(chunk)
    }

    #[tokio::test]
    async fn preserves_input_order_across_chunks() {
        let records: Vec<u32> = (0..11).collect();
        let output = runner(ChunkFailurePolicy::Substitute)
            .run(records.clone(), 3, doubled, |_| 0)
            .await
            .expect("batch succeeds");

        let inputs: Vec<u32> = output.results.iter().map(|(record, _)| *record).collect();
        assert_eq!(inputs, records);
        assert!(output.results.iter().all(|(record, result)| *result == record * 2));
        assert_eq!(output.report.chunks, 4);
        assert_eq!(output.report.classified, 11);
    }

    #[tokio::test]
    async fn zero_chunk_size_is_treated_as_one() {
        let output = runner(ChunkFailurePolicy::Substitute)
            .run(vec![1, 2, 3], 0, doubled, |_| 0)
            .await
            .expect("batch succeeds");
        assert_eq!(output.report.chunks, 3);
        assert_eq!(output.results.len(), 3);
    }

    #[tokio::test]
    async fn empty_input_produces_empty_output() {
        let output = runner(ChunkFailurePolicy::Fail)
            .run(Vec::<u32>::new(), 4, doubled, |_| 0)
            .await
            .expect("batch succeeds");
        assert!(output.results.is_empty());
        assert_eq!(output.report, BatchReport::default());
    }

    #[tokio::test]
    async fn substitute_policy_keeps_output_length() {
        let output = runner(ChunkFailurePolicy::Substitute)
            .run(vec![1, 2, 7, 8, 9], 2, panics_on_seven, |_| u32::MAX)
            .await
            .expect("batch succeeds");

        let results: Vec<u32> = output.results.iter().map(|(_, result)| *result).collect();
        assert_eq!(results, vec![2, 4, u32::MAX, u32::MAX, 18]);
        assert_eq!(output.report.substituted, 2);
        assert_eq!(output.report.failed_chunks, 1);
    }

    #[tokio::test]
    async fn drop_policy_omits_failed_chunk() {
        let output = runner(ChunkFailurePolicy::Drop)
            .run(vec![1, 2, 7, 8, 9], 2, panics_on_seven, |_| u32::MAX)
            .await
            .expect("batch succeeds");

        let inputs: Vec<u32> = output.results.iter().map(|(record, _)| *record).collect();
        assert_eq!(inputs, vec![1, 2, 9]);
        assert_eq!(output.report.dropped, 2);
    }

    #[tokio::test]
    async fn fail_policy_surfaces_chunk_error() {
        let error = runner(ChunkFailurePolicy::Fail)
            .run(vec![1, 2, 7, 8, 9], 2, panics_on_seven, |_| u32::MAX)
            .await
            .expect_err("expected batch failure");

        match error {
            BatchError::ChunkFailed(ChunkExecutionError::Panicked { index, message }) => {
                assert_eq!(index, 1);
                assert!(message.contains("unexpected record 7"));
            }
            other => panic!("expected panicked chunk, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn short_chunk_results_count_as_failure() {
        let output = runner(ChunkFailurePolicy::Substitute)
            .run(vec![1, 2, 3], 3, |chunk: &[u32]| vec![chunk[0]], |_| 0)
            .await
            .expect("batch succeeds");

        assert_eq!(output.results.len(), 3);
        assert_eq!(output.report.substituted, 3);
    }

    #[tokio::test]
    async fn slow_chunk_times_out() {
        let runner = BatchRunner::new(BatchConfig {
            chunk_size: 1,
            workers: 1,
            chunk_timeout: Some(Duration::from_millis(20)),
            failure_policy: ChunkFailurePolicy::Fail,
        });

        let error = runner
            .run(
                vec![1u32],
                1,
                |chunk: &[u32]| {
                    std::thread::sleep(Duration::from_millis(200));
                    chunk.to_vec()
                },
                |_| 0,
            )
            .await
            .expect_err("expected timeout");

        assert!(matches!(
            error,
            BatchError::ChunkFailed(ChunkExecutionError::TimedOut { index: 0, .. })
        ));
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_worker_count() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (active_in, peak_in) = (Arc::clone(&active), Arc::clone(&peak));

        runner(ChunkFailurePolicy::Fail)
            .run(
                (0..12u32).collect(),
                1,
                move |chunk: &[u32]| {
                    let now = active_in.fetch_add(1, Ordering::SeqCst) + 1;
                    peak_in.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(5));
                    active_in.fetch_sub(1, Ordering::SeqCst);
                    chunk.to_vec()
                },
                |_| 0,
            )
            .await
            .expect("batch succeeds");

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn timed_out_chunks_keep_their_worker_slot() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (active_in, peak_in) = (Arc::clone(&active), Arc::clone(&peak));

        let runner = BatchRunner::new(BatchConfig {
            chunk_size: 1,
            workers: 1,
            chunk_timeout: Some(Duration::from_millis(10)),
            failure_policy: ChunkFailurePolicy::Substitute,
        });

        let output = runner
            .run(
                (0..4u32).collect(),
                1,
                move |chunk: &[u32]| {
                    let now = active_in.fetch_add(1, Ordering::SeqCst) + 1;
                    peak_in.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(60));
                    active_in.fetch_sub(1, Ordering::SeqCst);
                    chunk.to_vec()
                },
                |_| u32::MAX,
            )
            .await
            .expect("batch succeeds");

        assert_eq!(output.results.len(), 4);
        assert!(output.report.substituted >= 1);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn policy_parses_aliases() {
        assert_eq!(ChunkFailurePolicy::parse("Drop"), Some(ChunkFailurePolicy::Drop));
        assert_eq!(ChunkFailurePolicy::parse(" abort "), Some(ChunkFailurePolicy::Fail));
        assert_eq!(ChunkFailurePolicy::parse("substitute"), Some(ChunkFailurePolicy::Substitute));
        assert_eq!(ChunkFailurePolicy::parse("retry"), None);
    }
}
