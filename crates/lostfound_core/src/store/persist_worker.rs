//! Background persistence worker.
//!
//! # Responsibility
//! - Perform durable collection writes off the caller's thread.
//! - Optionally re-read each written collection and compare it with the
//!   snapshot that was written.
//! - Hand callers a ticket they can wait on or drop.
//!
//! # Invariants
//! - Jobs run strictly in submission order (single FIFO queue, one thread).
//! - Dropping the worker drains queued jobs before the thread exits.
//! - Submitting never panics; a dead worker yields a failed outcome.

use crate::model::category::Category;
use crate::model::item::Item;
use crate::repo::item_repo::ItemRepository;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

const WORKER_THREAD_NAME: &str = "lostfound-persist";

/// Worker lifecycle failure.
#[derive(Debug)]
pub enum PersistError {
    /// The worker thread could not be started.
    Spawn(io::Error),
    /// The worker thread is gone; the job result will never arrive.
    WorkerGone,
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(err) => write!(f, "failed to start persistence worker: {err}"),
            Self::WorkerGone => write!(f, "persistence worker is not running"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn(err) => Some(err),
            Self::WorkerGone => None,
        }
    }
}

/// Result of the read-back performed after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveCheck {
    /// Read-back disabled by configuration.
    Skipped,
    /// Persisted collection equals the written snapshot.
    Matched,
    /// Persisted collection differs from the written snapshot.
    Mismatch { persisted_count: usize },
    /// Persisted collection could not be read back.
    Unreadable(String),
}

/// Final state of one save job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved {
        category: Category,
        count: usize,
        check: SaveCheck,
    },
    Failed {
        category: Category,
        error: String,
    },
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Saved { category, .. } | Self::Failed { category, .. } => *category,
        }
    }
}

/// Handle on one queued save.
///
/// Dropping the ticket keeps the default fire-and-forget behavior.
#[derive(Debug)]
pub struct PersistTicket {
    rx: Receiver<PersistOutcome>,
}

impl PersistTicket {
    /// Creates a ticket that is already resolved.
    pub(crate) fn ready(outcome: PersistOutcome) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(outcome);
        Self { rx }
    }

    /// Blocks until the save and its read-back finished.
    pub fn wait(self) -> Result<PersistOutcome, PersistError> {
        self.rx.recv().map_err(|_| PersistError::WorkerGone)
    }

    /// Returns the outcome if the save already finished.
    pub fn try_outcome(&self) -> Result<Option<PersistOutcome>, PersistError> {
        match self.rx.try_recv() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(PersistError::WorkerGone),
        }
    }
}

enum PersistJob {
    Save {
        category: Category,
        items: Vec<Item>,
        reply: Sender<PersistOutcome>,
    },
    Flush(Sender<()>),
}

/// Single-thread FIFO writer shared by both categories.
pub struct PersistWorker {
    tx: Option<Sender<PersistJob>>,
    handle: Option<JoinHandle<()>>,
}

impl PersistWorker {
    /// Starts the worker thread.
    ///
    /// # Errors
    /// - Returns `PersistError::Spawn` when the OS refuses a new thread.
    pub fn spawn(
        repo: Arc<dyn ItemRepository>,
        verify_after_save: bool,
    ) -> Result<Self, PersistError> {
        let (tx, rx) = mpsc::channel::<PersistJob>();
        let handle = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    match job {
                        PersistJob::Save {
                            category,
                            items,
                            reply,
                        } => {
                            let outcome =
                                run_save(repo.as_ref(), category, &items, verify_after_save);
                            let _ = reply.send(outcome);
                        }
                        PersistJob::Flush(reply) => {
                            let _ = reply.send(());
                        }
                    }
                }
                debug!("event=persist_worker_stop module=store status=ok");
            })
            .map_err(PersistError::Spawn)?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queues a full-collection write for `category`.
    pub fn submit(&self, category: Category, items: Vec<Item>) -> PersistTicket {
        let (reply, rx) = mpsc::channel();
        let job = PersistJob::Save {
            category,
            items,
            reply,
        };
        let Some(tx) = self.tx.as_ref() else {
            return PersistTicket::ready(worker_gone(category));
        };
        if tx.send(job).is_err() {
            return PersistTicket::ready(worker_gone(category));
        }
        PersistTicket { rx }
    }

    /// Blocks until every job queued before this call has finished.
    pub fn flush(&self) -> Result<(), PersistError> {
        let tx = self.tx.as_ref().ok_or(PersistError::WorkerGone)?;
        let (reply, done) = mpsc::channel();
        tx.send(PersistJob::Flush(reply))
            .map_err(|_| PersistError::WorkerGone)?;
        done.recv().map_err(|_| PersistError::WorkerGone)
    }
}

impl Drop for PersistWorker {
    fn drop(&mut self) {
        // Closing the queue lets the thread drain pending jobs and exit.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("event=persist_worker_stop module=store status=error error_code=worker_panicked");
            }
        }
    }
}

fn worker_gone(category: Category) -> PersistOutcome {
    error!(
        "event=store_save module=store status=error category={} error_code=worker_gone",
        category
    );
    PersistOutcome::Failed {
        category,
        error: PersistError::WorkerGone.to_string(),
    }
}

fn run_save(
    repo: &dyn ItemRepository,
    category: Category,
    items: &[Item],
    verify_after_save: bool,
) -> PersistOutcome {
    let started_at = Instant::now();
    if let Err(err) = repo.write_items(category, items) {
        error!(
            "event=store_save module=store status=error category={} count={} error_code=save_failed error={}",
            category,
            items.len(),
            err
        );
        return PersistOutcome::Failed {
            category,
            error: err.to_string(),
        };
    }

    info!(
        "event=store_save module=store status=ok category={} count={} duration_ms={}",
        category,
        items.len(),
        started_at.elapsed().as_millis()
    );

    let check = if verify_after_save {
        verify_saved(repo, category, items)
    } else {
        SaveCheck::Skipped
    };

    PersistOutcome::Saved {
        category,
        count: items.len(),
        check,
    }
}

fn verify_saved(repo: &dyn ItemRepository, category: Category, written: &[Item]) -> SaveCheck {
    match repo.read_items(category) {
        Ok(persisted) if persisted == written => {
            debug!(
                "event=store_verify module=store status=ok category={} count={}",
                category,
                persisted.len()
            );
            SaveCheck::Matched
        }
        Ok(persisted) => {
            warn!(
                "event=store_verify module=store status=mismatch category={} written={} persisted={}",
                category,
                written.len(),
                persisted.len()
            );
            SaveCheck::Mismatch {
                persisted_count: persisted.len(),
            }
        }
        Err(err) => {
            warn!(
                "event=store_verify module=store status=error category={} error_code=read_back_failed error={}",
                category, err
            );
            SaveCheck::Unreadable(err.to_string())
        }
    }
}
