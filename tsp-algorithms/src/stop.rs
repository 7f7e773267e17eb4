use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// When a search should give up. With nothing set the search runs until
/// [`StopCondition::cancel`] is called from another thread.
#[derive(Debug, Clone, Default)]
pub struct StopCondition {
    /// Restarts for local search, iterations for random search, rounds for
    /// the ant colony and generations for evolution.
    pub max_restarts: Option<u64>,
    pub timeout: Option<Duration>,
    cancelled: Arc<AtomicBool>,
}

impl StopCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_restarts(mut self, max_restarts: u64) -> Self {
        self.max_restarts = Some(max_restarts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Cancels every search using this condition or a clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub(crate) fn start(&self) -> Budget<'_> {
        Budget {
            stop: self,
            started: Instant::now(),
            restarts: AtomicU64::new(0),
            aborted: AtomicBool::new(false),
        }
    }
}

/// One run's view of a [`StopCondition`], shared by all of its workers.
pub(crate) struct Budget<'a> {
    stop: &'a StopCondition,
    started: Instant,
    restarts: AtomicU64,
    aborted: AtomicBool,
}

impl<'a> Budget<'a> {
    /// Claims the next restart, returning its index, or `None` once the
    /// budget is spent.
    pub fn next_restart(&self) -> Option<u64> {
        if self.is_exhausted() {
            return None;
        }
        let restart = self.restarts.fetch_add(1, Ordering::Relaxed);
        match self.stop.max_restarts {
            Some(max_restarts) if restart >= max_restarts => None,
            _ => Some(restart),
        }
    }

    /// True once the run is cancelled, aborted or out of time. The restart
    /// count is not consulted so a claimed restart can finish its descent.
    pub fn is_exhausted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
            || self.stop.is_cancelled()
            || self
                .stop
                .timeout
                .map_or(false, |timeout| self.started.elapsed() >= timeout)
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    pub fn restarts(&self) -> u64 {
        let claimed = self.restarts.load(Ordering::Relaxed);
        self.stop
            .max_restarts
            .map_or(claimed, |max_restarts| claimed.min(max_restarts))
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
