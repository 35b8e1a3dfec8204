//! Off-thread scoring.
//!
//! The worker owns a [`FrameScorer`] on its own thread. The intake thread
//! submits frames without blocking and drains results whenever convenient;
//! results come back in completion order, not submission order.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded, unbounded};
use tracing::{debug, info, warn};

use crate::evaluation::{FrameScorer, ScoreError, ScoreTicket};
use crate::frame::SharedFrame;

/// Default capacity of the request queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// How long `shutdown` waits for the scorer to finish before detaching.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

struct ScoreRequest {
    ticket: ScoreTicket,
    frame: SharedFrame,
}

/// A finished scoring job.
#[derive(Debug, Clone)]
pub struct ScoreResponse {
    pub ticket: ScoreTicket,
    pub result: Result<f64, ScoreError>,
}

pub struct ScoringWorker {
    requests: Option<Sender<ScoreRequest>>,
    responses: Receiver<ScoreResponse>,
    /// Disconnects when the scoring thread exits, panicking or not.
    exited: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl ScoringWorker {
    /// Spawn the scoring thread.
    pub fn spawn(scorer: Arc<dyn FrameScorer>, queue_capacity: usize) -> Self {
        let (req_tx, req_rx) = bounded::<ScoreRequest>(queue_capacity.max(1));
        let (resp_tx, resp_rx) = unbounded::<ScoreResponse>();

        let (exit_tx, exit_rx) = bounded::<()>(0);

        let handle = thread::spawn(move || {
            let _exit = exit_tx;
            run(scorer, req_rx, resp_tx)
        });

        Self {
            requests: Some(req_tx),
            responses: resp_rx,
            exited: exit_rx,
            handle: Some(handle),
        }
    }

    /// Queue a frame for scoring without blocking.
    ///
    /// Fails with `Abandoned` when the queue is full or the worker is gone;
    /// the caller should record that as the frame's score result.
    pub fn submit(&self, ticket: ScoreTicket, frame: SharedFrame) -> Result<(), ScoreError> {
        let Some(ref requests) = self.requests else {
            return Err(ScoreError::Abandoned("worker shut down".into()));
        };
        match requests.try_send(ScoreRequest { ticket, frame }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(ScoreError::Abandoned("scoring queue full".into())),
            Err(TrySendError::Disconnected(_)) => {
                Err(ScoreError::Abandoned("scoring thread exited".into()))
            }
        }
    }

    /// All results available right now.
    pub fn drain(&self) -> Vec<ScoreResponse> {
        self.responses.try_iter().collect()
    }

    /// Wait up to `timeout` for the next result.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ScoreResponse> {
        self.responses.recv_timeout(timeout).ok()
    }

    /// Stop accepting work and give the thread [`SHUTDOWN_GRACE`] to finish.
    ///
    /// A scorer still busy after that is detached; its thread ends on its
    /// own once the current job returns.
    pub fn shutdown(&mut self) {
        self.requests.take();
        let Some(handle) = self.handle.take() else {
            return;
        };
        match self.exited.recv_timeout(SHUTDOWN_GRACE) {
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "[ScoringWorker] scorer still busy after {:?}, detaching thread",
                    SHUTDOWN_GRACE
                );
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if handle.join().is_err() {
                    warn!("[ScoringWorker] scoring thread panicked");
                }
            }
        }
    }
}

impl Drop for ScoringWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(scorer: Arc<dyn FrameScorer>, requests: Receiver<ScoreRequest>, responses: Sender<ScoreResponse>) {
    debug!("[ScoringWorker] thread started");
    let mut scored = 0usize;

    for request in requests.iter() {
        let result = scorer.score(&request.frame);
        scored += 1;
        if responses
            .send(ScoreResponse {
                ticket: request.ticket,
                result,
            })
            .is_err()
        {
            break;
        }
    }

    info!("[ScoringWorker] thread exiting after {} frames", scored);
}
