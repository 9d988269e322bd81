//! Bounded worker pool and single-shot completion handles.
//!
//! Operations are CPU-bound, so non-blocking calls run on a fixed-size
//! [`rayon::ThreadPool`] rather than an async runtime. Each submitted job
//! resolves one [`Pending`] exactly once: with its result, or with a
//! [`Worker`](scv_core::ErrorKind::Worker) error if the job died.
//!
//! # Configuration
//!
//! ```rust
//! use scv_compute::{Executor, PoolConfig};
//!
//! let pool = Executor::new(&PoolConfig::default().threads(2)).unwrap();
//! let answer = pool.submit(|| Ok(6 * 7)).wait().unwrap();
//! assert_eq!(answer, 42);
//! ```
//!
//! The process-wide pool behind every `*_async` method of
//! [`Matrix`](crate::Matrix) reads [`THREADS_ENV`] once, on first use.

use scv_core::{Error, Result};
use std::sync::OnceLock;
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError, sync_channel};
use std::time::Duration;
use tracing::{debug, error, trace};

/// Environment variable overriding the global pool's thread count.
pub const THREADS_ENV: &str = "SCV_THREADS";

/// Default worker thread name prefix.
pub const DEFAULT_THREAD_NAME: &str = "scv-worker";

/// A unit of work produced by a `prepare_*` step.
pub type Job<T> = Box<dyn FnOnce() -> Result<T> + Send + 'static>;

/// Worker pool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Worker count (0 = one per CPU).
    pub num_threads: usize,
    /// Thread name prefix; threads are named `<prefix>-<index>`.
    pub thread_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_threads: 0,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl PoolConfig {
    /// Default configuration with [`THREADS_ENV`] applied.
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(THREADS_ENV) {
            Ok(value) => config.with_env_override(&value),
            Err(_) => config,
        }
    }

    /// Applies a raw [`THREADS_ENV`] value; unparsable values are ignored.
    pub fn with_env_override(self, value: &str) -> Self {
        match value.trim().parse::<usize>() {
            Ok(n) => self.threads(n),
            Err(_) => {
                debug!(value, "ignoring invalid {THREADS_ENV}");
                self
            }
        }
    }

    /// Sets the worker count.
    pub fn threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Sets the thread name prefix.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }
}

/// Runs jobs on a bounded thread pool.
#[derive(Debug)]
pub struct Executor {
    pool: rayon::ThreadPool,
}

static GLOBAL: OnceLock<Executor> = OnceLock::new();

impl Executor {
    /// Builds a pool from `config`.
    pub fn new(config: &PoolConfig) -> Result<Self> {
        let prefix = config.thread_name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(move |index| format!("{prefix}-{index}"))
            .panic_handler(|payload| {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(panic = %msg, "worker job panicked");
            })
            .build()
            .map_err(|e| Error::worker(format!("failed to build worker pool: {e}")))?;
        debug!(threads = pool.current_num_threads(), prefix = %config.thread_name, "worker pool ready");
        Ok(Self { pool })
    }

    /// The process-wide pool, built from [`PoolConfig::from_env`] on first use.
    pub fn global() -> Result<&'static Executor> {
        if let Some(executor) = GLOBAL.get() {
            return Ok(executor);
        }
        let executor = Executor::new(&PoolConfig::from_env())?;
        // A concurrent first call may win; the spare pool is dropped.
        Ok(GLOBAL.get_or_init(|| executor))
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queues `job` and returns its completion handle.
    pub fn submit<T, F>(&self, job: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = sync_channel(1);
        self.pool.spawn(move || {
            // A panic unwinds past this send and drops `tx`.
            let _ = tx.send(job());
        });
        trace!("job queued");
        Pending { rx, taken: false }
    }
}

/// Single-shot completion handle of a queued job.
#[derive(Debug)]
pub struct Pending<T> {
    rx: Receiver<Result<T>>,
    taken: bool,
}

fn worker_lost() -> Error {
    Error::worker("operation did not complete: worker job panicked")
}

impl<T> Pending<T> {
    /// Blocks until the job finishes.
    pub fn wait(self) -> Result<T> {
        if self.taken {
            return Err(Error::worker("result already taken"));
        }
        self.rx.recv().unwrap_or_else(|_| Err(worker_lost()))
    }

    /// Takes the result if the job has finished.
    ///
    /// Returns `Some` at most once.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        if self.taken {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(worker_lost()),
        };
        self.taken = true;
        Some(outcome)
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    ///
    /// Returns `None` on timeout; the handle stays usable.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Result<T>> {
        if self.taken {
            return None;
        }
        let outcome = match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => Err(worker_lost()),
        };
        self.taken = true;
        Some(outcome)
    }

    /// Whether the result has already been taken.
    pub fn is_taken(&self) -> bool {
        self.taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scv_core::ErrorKind;

    fn pool() -> Executor {
        Executor::new(&PoolConfig::default().threads(2).thread_name("scv-test")).unwrap()
    }

    #[test]
    fn test_env_override() {
        assert_eq!(PoolConfig::default().with_env_override(" 3 ").num_threads, 3);
        assert_eq!(PoolConfig::default().with_env_override("many").num_threads, 0);
    }

    #[test]
    fn test_submit_and_wait() {
        let pool = pool();
        assert_eq!(pool.num_threads(), 2);
        let handle = pool.submit(|| Ok(std::thread::current().name().map(str::to_owned)));
        let name = handle.wait().unwrap().unwrap();
        assert!(name.starts_with("scv-test-"), "{name}");
    }

    #[test]
    fn test_error_passes_through() {
        let pool = pool();
        let handle = pool.submit::<(), _>(|| Err(Error::validation("nope")));
        assert_eq!(handle.wait().unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_panic_resolves_as_worker_error() {
        let pool = pool();
        let handle = pool.submit::<(), _>(|| panic!("boom"));
        assert_eq!(handle.wait().unwrap_err().kind(), ErrorKind::Worker);
    }

    #[test]
    fn test_resolves_once() {
        let pool = pool();
        let mut handle = pool.submit(|| Ok(1));
        let first = handle.wait_timeout(Duration::from_secs(10));
        assert_eq!(first.unwrap().unwrap(), 1);
        assert!(handle.is_taken());
        assert!(handle.try_take().is_none());
        assert!(handle.wait_timeout(Duration::from_millis(1)).is_none());
    }

    #[test]
    fn test_timeout_keeps_handle() {
        let (gate_tx, gate_rx) = std::sync::mpsc::channel::<()>();
        let pool = pool();
        let mut handle = pool.submit(move || {
            let _ = gate_rx.recv();
            Ok(5)
        });
        assert!(handle.wait_timeout(Duration::from_millis(10)).is_none());
        assert!(handle.try_take().is_none());
        gate_tx.send(()).unwrap();
        assert_eq!(handle.wait().unwrap(), 5);
    }
}
