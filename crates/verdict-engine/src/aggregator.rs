//! Keyed worker registry and the per-submission recomputation loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, oneshot};

use verdict_core::entities::FinalDecision;
use verdict_core::input::{EvidenceInput, EvidenceUpsert};
use verdict_db::retry::{is_retryable, with_retry};
use verdict_db::service::VerdictService;

use crate::config::AggregatorConfig;
use crate::error::AggregationError;

type Reply = oneshot::Sender<Result<FinalDecision, AggregationError>>;

/// One request to bring a submission's decision up to date.
struct Trigger {
    reply: Option<Reply>,
}

struct Worker {
    generation: u64,
    tx: mpsc::UnboundedSender<Trigger>,
}

struct Inner {
    service: Arc<VerdictService>,
    config: AggregatorConfig,
    workers: Mutex<HashMap<String, Worker>>,
    next_generation: AtomicU64,
    recomputations: AtomicU64,
}

impl Inner {
    fn workers(&self) -> MutexGuard<'_, HashMap<String, Worker>> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Aggregation trigger: the only writer of final decisions.
///
/// Cheap to clone; clones share the worker registry. Methods that start a
/// worker must be called from inside a Tokio runtime.
#[derive(Clone)]
pub struct Aggregator {
    inner: Arc<Inner>,
}

impl Aggregator {
    #[must_use]
    pub fn new(service: Arc<VerdictService>, config: AggregatorConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                config,
                workers: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
                recomputations: AtomicU64::new(0),
            }),
        }
    }

    /// The storage service recomputations run against.
    #[must_use]
    pub fn service(&self) -> &Arc<VerdictService> {
        &self.inner.service
    }

    /// Store one opinion, then wait for the decision that reflects it.
    ///
    /// # Errors
    ///
    /// Returns `AggregationError::Validation` or `UnknownSubmission` if the
    /// write is rejected, `Storage` if the write or the recomputation fails.
    pub async fn submit_evidence(
        &self,
        upsert: &EvidenceUpsert,
    ) -> Result<FinalDecision, AggregationError> {
        self.inner.service.upsert_evidence(upsert).await?;
        self.recompute(&upsert.submission_id).await
    }

    /// Validate raw inbound evidence and submit it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit_evidence`].
    pub async fn ingest(&self, input: EvidenceInput) -> Result<FinalDecision, AggregationError> {
        let upsert = input.validate()?;
        self.submit_evidence(&upsert).await
    }

    /// Schedule a recomputation without waiting for it.
    ///
    /// For evidence committed outside this aggregator.
    pub fn notify(&self, submission_id: &str) {
        self.dispatch(submission_id, None);
    }

    /// Schedule a recomputation and wait for its result.
    ///
    /// # Errors
    ///
    /// Returns `AggregationError::UnknownSubmission` for a missing submission
    /// and `Storage` once retries are exhausted.
    pub async fn recompute(&self, submission_id: &str) -> Result<FinalDecision, AggregationError> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(submission_id, Some(tx));
        rx.await
            .map_err(|_| AggregationError::WorkerGone(submission_id.to_string()))?
    }

    /// Number of live per-submission workers.
    #[must_use]
    pub fn active_workers(&self) -> usize {
        self.inner.workers().len()
    }

    /// Total recomputations run since this aggregator was created.
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.inner.recomputations.load(Ordering::Relaxed)
    }

    /// Queue a trigger on the submission's worker, starting one if needed.
    ///
    /// Sends happen under the registry lock. A worker only retires while
    /// holding the same lock and with an empty queue, so a trigger is never
    /// queued on a worker that is about to exit.
    fn dispatch(&self, submission_id: &str, reply: Option<Reply>) {
        let mut workers = self.inner.workers();
        let mut trigger = Trigger { reply };

        if let Some(worker) = workers.get(submission_id) {
            match worker.tx.send(trigger) {
                Ok(()) => return,
                Err(mpsc::error::SendError(returned)) => trigger = returned,
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        // rx is still held here, so this send cannot fail.
        let _ = tx.send(trigger);
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        workers.insert(submission_id.to_string(), Worker { generation, tx });
        tracing::debug!(%submission_id, generation, "aggregation worker started");

        tokio::spawn(run_worker(
            Arc::clone(&self.inner),
            submission_id.to_string(),
            generation,
            rx,
        ));
    }
}

async fn run_worker(
    inner: Arc<Inner>,
    submission_id: String,
    generation: u64,
    mut rx: mpsc::UnboundedReceiver<Trigger>,
) {
    // Consecutive recomputations that ended in a transient storage failure.
    // While non-zero the stored decision may be stale, so the worker keeps
    // scheduling follow-ups and never retires.
    let mut failed_runs: u32 = 0;

    loop {
        let wait = if failed_runs == 0 {
            inner.config.idle_timeout
        } else {
            inner.config.retry.delay_for(failed_runs)
        };

        let mut waiters: Vec<Reply> = match tokio::time::timeout(wait, rx.recv()).await {
            Ok(Some(trigger)) => trigger.reply.into_iter().collect(),
            Ok(None) => break,
            Err(_) if failed_runs > 0 => {
                tracing::debug!(%submission_id, failed_runs, "follow-up recomputation");
                Vec::new()
            }
            Err(_) => {
                let mut workers = inner.workers();
                if rx.is_empty() {
                    if workers
                        .get(&submission_id)
                        .is_some_and(|w| w.generation == generation)
                    {
                        workers.remove(&submission_id);
                    }
                    tracing::debug!(%submission_id, generation, "aggregation worker retired");
                    break;
                }
                continue;
            }
        };
        while let Ok(trigger) = rx.try_recv() {
            waiters.extend(trigger.reply);
        }

        let result = recompute_once(&inner, &submission_id).await;
        if needs_follow_up(&result) {
            failed_runs = failed_runs.saturating_add(1);
            tracing::warn!(
                %submission_id,
                failed_runs,
                "decision may be stale, follow-up recomputation scheduled"
            );
        } else {
            failed_runs = 0;
        }
        for waiter in waiters {
            // The caller may have stopped waiting.
            let _ = waiter.send(result.clone());
        }
    }
}

/// A recomputation that gave up on a transient storage failure left the
/// decision possibly stale; it has to run again once storage recovers.
fn needs_follow_up(result: &Result<FinalDecision, AggregationError>) -> bool {
    matches!(result, Err(AggregationError::Storage(e)) if is_retryable(e))
}

async fn recompute_once(
    inner: &Inner,
    submission_id: &str,
) -> Result<FinalDecision, AggregationError> {
    let result = with_retry(&inner.config.retry, "recompute decision", is_retryable, || {
        inner.service.recompute_decision(submission_id)
    })
    .await;
    inner.recomputations.fetch_add(1, Ordering::Relaxed);

    match result {
        Ok(recomputation) => {
            let decision = &recomputation.decision;
            tracing::debug!(
                %submission_id,
                branch = %recomputation.branch,
                source = %decision.source,
                verdict = %decision.verdict,
                "decision recomputed"
            );
            if recomputation.changed() {
                tracing::info!(
                    %submission_id,
                    source = %decision.source,
                    verdict = %decision.verdict,
                    previous_verdict = ?recomputation.previous.as_ref().map(|p| p.verdict),
                    "final decision changed"
                );
            }
            Ok(recomputation.decision)
        }
        Err(e) => {
            let e = AggregationError::from(e);
            if matches!(e, AggregationError::Storage(_)) {
                tracing::error!(%submission_id, error = %e, "recomputation failed after retries");
            }
            Err(e)
        }
    }
}
