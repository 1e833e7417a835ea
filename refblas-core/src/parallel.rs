//! Tuning knobs and the scoped worker pool behind the blocked multiply.
//!
//! Work is pushed through a bounded `crossbeam-channel` queue to a fixed set
//! of `std::thread::scope` workers. The pool borrows the jobs, so no `'static`
//! bounds and no runtime; every worker is joined before [`for_each_job`]
//! returns.

use std::num::NonZeroUsize;
use std::sync::OnceLock;

use crossbeam_channel::bounded;
use tracing::{debug, warn};

/// Edge length of the square tiles `C` is partitioned into.
pub const BLOCK_SIZE: usize = 64;

/// Fewest tiles worth fanning out for.
pub const MIN_PAR_BLOCK: usize = 4;

/// Queue depth per worker.
pub const BUFF_MUL: usize = 4;

/// Environment variable that overrides the worker count.
pub const NUM_THREADS_ENV: &str = "REFBLAS_NUM_THREADS";

/// Number of `b`-sized blocks needed to cover `d`.
#[inline(always)]
pub fn blocks(d: usize, b: usize) -> usize {
    d.div_ceil(b)
}

/// Parallel multiply configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemmConfig {
    pub block_size: usize,
    pub min_par_block: usize,
    pub buff_mul: usize,
    pub workers: usize,
}

impl Default for GemmConfig {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            min_par_block: MIN_PAR_BLOCK,
            buff_mul: BUFF_MUL,
            workers: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl GemmConfig {
    /// Defaults, with the worker count taken from `REFBLAS_NUM_THREADS` when set.
    pub fn from_env() -> Self {
        let cfg = Self::default();
        match std::env::var(NUM_THREADS_ENV) {
            Ok(raw) => match parse_workers(&raw) {
                Some(n) => cfg.with_workers(n),
                None => {
                    warn!(value = %raw, "ignoring invalid {NUM_THREADS_ENV}");
                    cfg
                }
            },
            Err(_) => cfg,
        }
    }

    /// Process-wide configuration, read from the environment on first use.
    pub fn global() -> &'static GemmConfig {
        static GLOBAL: OnceLock<GemmConfig> = OnceLock::new();
        GLOBAL.get_or_init(GemmConfig::from_env)
    }

    /// Worker count, clamped to at least one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Tile edge, clamped to at least one.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Whether an `m × n` output is big enough to split across workers.
    #[inline]
    pub fn is_parallel(&self, m: usize, n: usize) -> bool {
        blocks(m, self.block_size) * blocks(n, self.block_size) >= self.min_par_block
    }
}

fn parse_workers(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

/// Run `f` on every job using at most `workers` scoped threads.
///
/// Jobs are queued through a bounded channel of depth `buffer` (at least one).
/// With a single worker or a single job everything runs on the calling
/// thread. A panic in `f` is propagated once all workers have stopped.
pub fn for_each_job<T, I, F>(jobs: I, workers: usize, buffer: usize, f: F)
where
    I: IntoIterator<Item = T>,
    T: Send,
    F: Fn(T) + Sync,
{
    let mut jobs = jobs.into_iter().peekable();
    let Some(first) = jobs.next() else {
        return;
    };
    if workers <= 1 || jobs.peek().is_none() {
        f(first);
        jobs.for_each(&f);
        return;
    }

    debug!(workers, buffer, "starting gemm workers");
    let (tx, rx) = bounded::<T>(buffer.max(1));
    let f = &f;
    std::thread::scope(|s| {
        for _ in 0..workers {
            let rx = rx.clone();
            s.spawn(move || {
                for job in rx.iter() {
                    f(job);
                }
            });
        }
        drop(rx);
        for job in std::iter::once(first).chain(jobs) {
            // All receivers gone means every worker died; the scope re-raises.
            if tx.send(job).is_err() {
                break;
            }
        }
        drop(tx);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_blocks() {
        assert_eq!(blocks(0, 64), 0);
        assert_eq!(blocks(64, 64), 1);
        assert_eq!(blocks(65, 64), 2);
    }

    #[test]
    fn test_default_config() {
        let cfg = GemmConfig::default();
        assert_eq!(cfg.block_size, BLOCK_SIZE);
        assert_eq!(cfg.min_par_block, MIN_PAR_BLOCK);
        assert_eq!(cfg.buff_mul, BUFF_MUL);
        assert!(cfg.workers >= 1);
    }

    #[test]
    fn test_builders_clamp() {
        let cfg = GemmConfig::default().with_workers(0).with_block_size(0);
        assert_eq!(cfg.workers, 1);
        assert_eq!(cfg.block_size, 1);
    }

    #[test]
    fn test_is_parallel_threshold() {
        let cfg = GemmConfig::default();
        // 2x1 tiles is below MIN_PAR_BLOCK, 2x2 is at it.
        assert!(!cfg.is_parallel(2 * BLOCK_SIZE, BLOCK_SIZE));
        assert!(cfg.is_parallel(BLOCK_SIZE + 1, BLOCK_SIZE + 1));
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers(" 8 "), Some(8));
        assert_eq!(parse_workers("0"), None);
        assert_eq!(parse_workers("many"), None);
    }

    #[test]
    fn test_for_each_job_runs_every_job_once() {
        let counter = AtomicUsize::new(0);
        for_each_job(1..=100usize, 4, 3, |j| {
            counter.fetch_add(j, Ordering::Relaxed);
        });
        assert_eq!(counter.load(Ordering::Relaxed), 5050);
    }

    #[test]
    fn test_for_each_job_mutable_disjoint() {
        let mut data = vec![0usize; 10];
        let jobs: Vec<(usize, &mut usize)> = data.iter_mut().enumerate().collect();
        for_each_job(jobs, 3, 1, |(i, slot)| *slot = i * i);
        assert_eq!(data[9], 81);
        assert_eq!(data.iter().sum::<usize>(), 285);
    }

    #[test]
    fn test_for_each_job_empty() {
        let counter = AtomicUsize::new(0);
        for_each_job(Vec::<usize>::new(), 4, 4, |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(counter.load(Ordering::Relaxed), 0);
    }

    #[test]
    #[should_panic]
    fn test_for_each_job_propagates_panic() {
        for_each_job(0..8usize, 2, 2, |j| {
            if j == 5 {
                panic!("job failed");
            }
        });
    }
}
