use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
};

use tokio::sync::{Mutex, mpsc};

use crate::submit::{
    dependencies::SubmitDependencies,
    pipeline::perform_submission,
    types::{Submission, SubmitError, SubmitOutcome, SubmitRequest, SubmitStatus},
};

/// Shared state for fire-and-forget drawing submissions.
///
/// Bridges the synchronous drawing loop and the async network collaborators:
/// `submit` only enqueues, each request then runs as its own task, and
/// outcomes come back on the receiver returned by [`SubmissionManager::new`].
/// Requests are not cancellable. When several overlap, `last_outcome` holds
/// whichever finished last.
#[derive(Clone)]
pub struct SubmissionManager {
    /// Channel for sending submission requests.
    request_tx: mpsc::UnboundedSender<(u64, SubmitRequest)>,
    /// Id handed to the next request.
    next_id: Arc<AtomicU64>,
    /// Submissions accepted by `submit` that have not reported back yet.
    in_flight: Arc<AtomicUsize>,
    /// Set once any submission has reported back.
    finished_any: Arc<AtomicBool>,
    /// Most recently finished submission (if any).
    last_outcome: Arc<Mutex<Option<Submission>>>,
}

impl SubmissionManager {
    /// Create a new submission manager.
    ///
    /// This spawns a background task on `runtime_handle` that dispatches requests.
    pub fn new(
        runtime_handle: &tokio::runtime::Handle,
        dependencies: SubmitDependencies,
    ) -> (Self, mpsc::UnboundedReceiver<Submission>) {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<(u64, SubmitRequest)>();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<Submission>();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let finished_any = Arc::new(AtomicBool::new(false));
        let last_outcome = Arc::new(Mutex::new(None));
        let dependencies = Arc::new(dependencies);

        let in_flight_clone = in_flight.clone();
        let finished_clone = finished_any.clone();
        let outcome_clone = last_outcome.clone();
        let spawner = runtime_handle.clone();

        runtime_handle.spawn(async move {
            while let Some((id, request)) = request_rx.recv().await {
                log::debug!("Dispatching submission #{}: {:?}", id, request);

                let deps = dependencies.clone();
                let in_flight = in_flight_clone.clone();
                let finished_any = finished_clone.clone();
                let last_outcome = outcome_clone.clone();
                let outcome_tx = outcome_tx.clone();
                spawner.spawn(async move {
                    let outcome = match perform_submission(request, deps).await {
                        Ok(result) => {
                            log::info!(
                                "Submission #{} returned {} cards",
                                id,
                                result.cards.len()
                            );
                            SubmitOutcome::Success(result)
                        }
                        Err(e) => {
                            let error_message = e.to_string();
                            log::error!("Submission #{} failed: {}", id, error_message);
                            SubmitOutcome::Failed(error_message)
                        }
                    };

                    let submission = Submission { id, outcome };
                    *last_outcome.lock().await = Some(submission.clone());
                    finished_any.store(true, Ordering::Release);
                    in_flight.fetch_sub(1, Ordering::AcqRel);
                    // Receiver may have been dropped by a host that only polls.
                    let _ = outcome_tx.send(submission);
                });
            }
        });

        (
            Self {
                request_tx,
                next_id: Arc::new(AtomicU64::new(1)),
                in_flight,
                finished_any,
                last_outcome,
            },
            outcome_rx,
        )
    }

    /// Queue a drawing for classification.
    ///
    /// This is non-blocking and returns the submission id immediately. The
    /// request counts as in flight from the moment this returns.
    pub fn submit(&self, request: SubmitRequest) -> Result<u64, SubmitError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        if self.request_tx.send((id, request)).is_err() {
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
            return Err(SubmitError::ManagerStopped);
        }
        Ok(id)
    }

    /// Get the current submission status.
    pub async fn get_status(&self) -> SubmitStatus {
        match self.in_flight.load(Ordering::Acquire) {
            0 if self.finished_any.load(Ordering::Acquire) => SubmitStatus::Done,
            0 => SubmitStatus::Idle,
            n => SubmitStatus::InFlight(n),
        }
    }

    /// Most recently finished submission, left in place.
    pub async fn last_outcome(&self) -> Option<Submission> {
        self.last_outcome.lock().await.clone()
    }

    /// Try to take the last outcome without waiting (non-blocking).
    pub fn try_take_outcome(&self) -> Option<Submission> {
        self.last_outcome.try_lock().ok().and_then(|mut r| r.take())
    }
}

#[cfg(test)]
impl SubmissionManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<(u64, SubmitRequest)>();
        drop(rx);
        Self {
            request_tx: tx,
            next_id: Arc::new(AtomicU64::new(1)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            finished_any: Arc::new(AtomicBool::new(false)),
            last_outcome: Arc::new(Mutex::new(None)),
        }
    }
}
