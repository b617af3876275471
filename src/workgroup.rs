//! Parallel work group: fan a per-chunk processor out over worker threads.
//!
//! The group consumes a pre-chunked input sequence. Workers pull chunks from
//! a bounded queue and run the processor on each; errors land in a shared
//! collector instead of aborting the run, so every chunk is processed even
//! after failures. Completion is synchronized by joining all workers.

use std::error::Error;
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use crossbeam_channel::bounded;
use tracing::debug;

use crate::verbose;

/// Error type surfaced by work-group processors.
pub type WorkError = Box<dyn Error + Send + Sync>;

/// Capacity of the queue between the dispatcher and the workers.
const WORK_QUEUE_CAPACITY: usize = 1000;

/// Append-only bag of errors collected during a work-group run.
///
/// Insertion order is preserved, but concurrent producers race for their
/// position, so [`first`] returns *an* error, not a deterministic one.
///
/// [`first`]: ErrorGroup::first
#[derive(Debug, Default)]
pub struct ErrorGroup {
    errors: Vec<WorkError>,
}

impl ErrorGroup {
    /// Any collected error, or `None` when every chunk succeeded.
    pub fn first(&self) -> Option<&WorkError> {
        self.errors.first()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkError> {
        self.errors.iter()
    }
}

/// A fixed set of work chunks waiting to be processed by `workers` threads.
pub struct WorkGroup<C> {
    workers: usize,
    chunks: Vec<C>,
}

impl<C: Send> WorkGroup<C> {
    /// A group over `chunks` that will run on `workers` threads. A worker
    /// count of zero is clamped to one.
    pub fn new(workers: usize, chunks: Vec<C>) -> Self {
        Self {
            workers: workers.max(1),
            chunks,
        }
    }

    /// Run `process` over every chunk and collect the errors it returns.
    ///
    /// Chunks must not share mutable state; the processor runs concurrently
    /// on all workers. There is no early cancellation: a failing chunk does
    /// not stop the remaining ones.
    pub fn execute<F>(self, process: F) -> ErrorGroup
    where
        F: Fn(C) -> Result<(), WorkError> + Sync,
    {
        let start = Instant::now();
        let total = self.chunks.len();
        let (sender, receiver) = bounded::<C>(WORK_QUEUE_CAPACITY);
        let collected: Mutex<Vec<WorkError>> = Mutex::new(Vec::new());

        thread::scope(|scope| {
            for _ in 0..self.workers {
                let receiver = receiver.clone();
                let process = &process;
                let collected = &collected;
                scope.spawn(move || {
                    for chunk in receiver.iter() {
                        if let Err(err) = process(chunk) {
                            collected.lock().unwrap().push(err);
                        }
                    }
                });
            }
            drop(receiver);

            for chunk in self.chunks {
                // Send fails only when every worker is gone; nothing is
                // left to consume the rest.
                if sender.send(chunk).is_err() {
                    break;
                }
            }
            drop(sender);
        });

        let errors = collected.into_inner().unwrap();
        if verbose() {
            debug!(
                chunks = total,
                workers = self.workers,
                errors = errors.len(),
                elapsed_micros = start.elapsed().as_micros(),
                "work group drained"
            );
        }
        ErrorGroup { errors }
    }
}

/// Split `data` into `num_chunks` near-equal chunks.
///
/// Always returns exactly `num_chunks` chunks (trailing ones may be empty),
/// except that a chunk count of zero or an empty input returns the input as
/// a single chunk. Larger chunks come first: sizes differ by at most one.
pub fn chunk_even<T>(data: Vec<T>, num_chunks: usize) -> Vec<Vec<T>> {
    let len = data.len();
    if num_chunks == 0 || len == 0 {
        return vec![data];
    }

    let chunk_size = len / num_chunks;
    let remainder = len % num_chunks;

    let mut chunks = Vec::with_capacity(num_chunks);
    let mut items = data.into_iter();
    for index in 0..num_chunks {
        let take = chunk_size + usize::from(index < remainder);
        chunks.push(items.by_ref().take(take).collect());
    }
    chunks
}
