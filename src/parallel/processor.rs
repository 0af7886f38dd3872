use crate::search::{CancelFlag, SearchListener};
use anyhow::Result;
use crossbeam::channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Maximum number of worker threads (0 = no limit)
    pub max_threads: usize,
    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,
    /// Channel buffer size multiplier (buffer = workers * multiplier)
    pub channel_buffer_multiplier: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            thread_percentage: 75,
            channel_buffer_multiplier: 2,
        }
    }
}

/// Sequential or parallel execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    /// Worker count from available cores, the configured percentage and thread cap
    pub fn calculate_optimal_workers(max_threads: usize, thread_percentage: u8) -> usize {
        let cpu_cores = num_cpus::get();
        let max_by_percentage = std::cmp::max(1, (cpu_cores * thread_percentage as usize) / 100);
        if max_threads > 0 {
            std::cmp::min(max_threads, max_by_percentage)
        } else {
            max_by_percentage
        }
    }

    pub fn from_config(config: &ParallelConfig) -> Self {
        match Self::calculate_optimal_workers(config.max_threads, config.thread_percentage) {
            0 | 1 => Self::Sequential,
            workers => Self::Parallel { workers },
        }
    }

    pub fn workers(&self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Parallel { workers } => *workers,
        }
    }
}

/// Runs a worker function over a lazily produced sequence of items
///
/// The sequence is pulled by a single producer thread, so iterators that are
/// `Send` but not `Sync` (all search iterators) can feed it. Results come back
/// in production order. Failed items are reported to the listener and left out.
pub struct ParallelProcessor {
    config: ParallelConfig,
    strategy: ExecutionStrategy,
}

impl ParallelProcessor {
    pub fn new(config: ParallelConfig) -> Self {
        let strategy = ExecutionStrategy::from_config(&config);
        Self { config, strategy }
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Process every item produced by `items`.
    ///
    /// `worker_fn` returns `Ok(None)` for items with nothing to report.
    /// Once `cancel` is set no further item is handed out.
    pub fn process<T, R, I, F>(
        &self,
        items: I,
        worker_fn: F,
        listener: &dyn SearchListener,
        cancel: &CancelFlag,
    ) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        I: Iterator<Item = T> + Send,
        F: Fn(T) -> Result<Option<R>> + Sync,
    {
        let workers = match self.strategy {
            ExecutionStrategy::Sequential => {
                return Ok(self.process_sequential(items, worker_fn, listener, cancel));
            }
            ExecutionStrategy::Parallel { workers } => workers,
        };
        tracing::debug!("Processing with {} worker threads", workers);

        let buffer = workers * self.config.channel_buffer_multiplier.max(1);
        let (work_tx, work_rx): (Sender<(usize, T)>, Receiver<(usize, T)>) = bounded(buffer);
        let (result_tx, result_rx): (
            Sender<(usize, Result<Option<R>>)>,
            Receiver<(usize, Result<Option<R>>)>,
        ) = bounded(buffer * 2);
        let processed = AtomicUsize::new(0);

        let indexed_results = crossbeam::thread::scope(|s| {
            let worker_fn = &worker_fn;
            let processed = &processed;

            for _ in 0..workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move |_| {
                    while let Ok((index, item)) = work_rx.recv() {
                        let result = worker_fn(item);
                        processed.fetch_add(1, Ordering::Relaxed);
                        if result_tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                });
            }

            // Producer: the only thread that pulls the sequence
            s.spawn(move |_| {
                for (index, item) in items.enumerate() {
                    if cancel.is_cancelled() || work_tx.send((index, item)).is_err() {
                        break;
                    }
                }
            });

            drop(work_rx);
            drop(result_tx);

            let mut results = Vec::new();
            while let Ok(result) = result_rx.recv() {
                results.push(result);
            }
            results
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel processing"))?;

        tracing::debug!("Processed {} item(s)", processed.load(Ordering::Relaxed));

        let mut sorted_results = indexed_results;
        sorted_results.sort_by_key(|(index, _)| *index);
        Ok(sorted_results
            .into_iter()
            .filter_map(|(_, result)| Self::keep(result, listener))
            .collect())
    }

    fn process_sequential<T, R, I, F>(
        &self,
        items: I,
        worker_fn: F,
        listener: &dyn SearchListener,
        cancel: &CancelFlag,
    ) -> Vec<R>
    where
        I: Iterator<Item = T>,
        F: Fn(T) -> Result<Option<R>>,
    {
        let mut results = Vec::new();
        for item in items {
            if cancel.is_cancelled() {
                break;
            }
            if let Some(result) = Self::keep(worker_fn(item), listener) {
                results.push(result);
            }
        }
        results
    }

    fn keep<R>(result: Result<Option<R>>, listener: &dyn SearchListener) -> Option<R> {
        match result {
            Ok(value) => value,
            Err(e) => {
                listener.general_error(&e);
                None
            }
        }
    }
}
