//! Background worker for running simulations off the main thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use placement_core::error::SimulationError;
use placement_core::model::{
    AccountComparison, MonteCarloBatch, MonteCarloConfig, MonteCarloProgress,
    SimulationParameters, SimulationResult,
};
use placement_core::simulation::{
    compare_accounts, monte_carlo_simulate_with_progress, run_simulation,
};

/// Request sent to the background worker
#[derive(Debug)]
pub enum SimulationRequest {
    /// Run a single seeded simulation for `params.account`
    Single { params: SimulationParameters },
    /// Tax one path as PEA and CTO
    Compare { params: SimulationParameters },
    /// Run a Monte Carlo batch
    MonteCarlo {
        params: SimulationParameters,
        config: MonteCarloConfig,
    },
    /// Graceful shutdown
    Shutdown,
}

/// Response from the background worker
#[derive(Debug)]
pub enum SimulationResponse {
    SingleComplete(Box<SimulationResult>),
    CompareComplete(Box<AccountComparison>),
    /// Monte Carlo batch completed (boxed to reduce enum size)
    MonteCarloComplete(Box<MonteCarloBatch>),
    /// Simulation was cancelled
    Cancelled,
    /// Error occurred
    Error(String),
}

/// Background worker that runs simulations on a separate thread
pub struct SimulationWorker {
    request_tx: Sender<SimulationRequest>,
    response_rx: Receiver<SimulationResponse>,
    cancel_flag: Arc<AtomicBool>,
    progress: Arc<AtomicUsize>,
    thread: Option<JoinHandle<()>>,
}

impl SimulationWorker {
    /// Create a new simulation worker with a background thread
    pub fn new() -> Self {
        let (request_tx, request_rx) = channel();
        let (response_tx, response_rx) = channel();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let progress = Arc::new(AtomicUsize::new(0));

        let ctx = WorkerContext {
            response_tx,
            cancel_flag: cancel_flag.clone(),
            progress: progress.clone(),
        };

        let thread = thread::spawn(move || {
            ctx.run(request_rx);
        });

        Self {
            request_tx,
            response_rx,
            cancel_flag,
            progress,
            thread: Some(thread),
        }
    }

    /// Send a simulation request to the worker
    pub fn send(&self, request: SimulationRequest) -> bool {
        // Clear cancel flag for new work
        self.cancel_flag.store(false, Ordering::SeqCst);
        self.progress.store(0, Ordering::SeqCst);
        self.request_tx.send(request).is_ok()
    }

    /// Wait up to `timeout` for a response.
    ///
    /// Returns `Ok(None)` on timeout and `Err` once the worker thread is gone.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<SimulationResponse>, RecvTimeoutError> {
        match self.response_rx.recv_timeout(timeout) {
            Ok(response) => Ok(Some(response)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Trials completed so far in the current Monte Carlo batch
    pub fn get_progress(&self) -> usize {
        self.progress.load(Ordering::SeqCst)
    }

    /// Request cancellation of the current operation
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    /// Shutdown the worker thread
    pub fn shutdown(&self) {
        let _ = self.request_tx.send(SimulationRequest::Shutdown);
    }
}

impl Default for SimulationWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SimulationWorker {
    fn drop(&mut self) {
        self.cancel();
        self.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Shared state for the background worker thread.
struct WorkerContext {
    response_tx: Sender<SimulationResponse>,
    cancel_flag: Arc<AtomicBool>,
    progress: Arc<AtomicUsize>,
}

impl WorkerContext {
    fn run(&self, request_rx: Receiver<SimulationRequest>) {
        while let Ok(request) = request_rx.recv() {
            let response = match request {
                SimulationRequest::Shutdown => break,

                SimulationRequest::Single { params } => {
                    tracing::info!(account = %params.account, seed = ?params.seed, "Starting single simulation");
                    if self.cancel_flag.load(Ordering::SeqCst) {
                        SimulationResponse::Cancelled
                    } else {
                        match run_simulation(&params) {
                            Ok(result) => SimulationResponse::SingleComplete(Box::new(result)),
                            Err(e) => SimulationResponse::Error(e.to_string()),
                        }
                    }
                }

                SimulationRequest::Compare { params } => {
                    tracing::info!(seed = ?params.seed, "Starting account comparison");
                    if self.cancel_flag.load(Ordering::SeqCst) {
                        SimulationResponse::Cancelled
                    } else {
                        match compare_accounts(&params) {
                            Ok(comparison) => {
                                SimulationResponse::CompareComplete(Box::new(comparison))
                            }
                            Err(e) => SimulationResponse::Error(e.to_string()),
                        }
                    }
                }

                SimulationRequest::MonteCarlo { params, config } => {
                    tracing::info!(
                        trials = config.trials,
                        base_seed = config.base_seed,
                        "Starting Monte Carlo simulation"
                    );
                    self.progress.store(0, Ordering::SeqCst);
                    self.run_monte_carlo(&params, &config)
                }
            };

            let _ = self.response_tx.send(response);
        }
    }

    fn run_monte_carlo(
        &self,
        params: &SimulationParameters,
        config: &MonteCarloConfig,
    ) -> SimulationResponse {
        let mc_progress =
            MonteCarloProgress::from_atomics(self.progress.clone(), self.cancel_flag.clone());

        match monte_carlo_simulate_with_progress(params, config, &mc_progress) {
            Ok(batch) => SimulationResponse::MonteCarloComplete(Box::new(batch)),
            Err(SimulationError::Cancelled) => {
                tracing::info!(completed = mc_progress.completed(), "Monte Carlo cancelled");
                SimulationResponse::Cancelled
            }
            Err(e) => SimulationResponse::Error(e.to_string()),
        }
    }
}
