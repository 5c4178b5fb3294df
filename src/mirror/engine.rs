//! Mirror engine: FIFO work queue of directory pairs drained on the calling
//! thread, with deletes and copies dispatched to scoped worker threads.
//!
//! Concurrency model:
//! - Reconciliation of a pair holds one throttle slot while it lists both
//!   sides and consults the confirmation gate.
//! - Each copy takes a throttle slot before its thread is spawned and gives
//!   it back when the thread finishes.
//! - Deletes get one thread each and never wait on the throttle.
//! - The run completes when the queue is empty and the thread scope has
//!   joined every worker.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, Scope};

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;

use crate::core::errors::{MirrorError, Result};
use crate::frontend::Frontend;
use crate::logger::activity::ActivityLog;
use crate::mirror::copy::copy_file;
use crate::mirror::reconcile::{DirectoryPair, Reconciler};
use crate::mirror::snapshot::read_snapshot;
use crate::mirror::stats::{MirrorCounters, MirrorStats};

/// Fixed-capacity counting semaphore over a bounded channel.
struct Throttle {
    slots: Sender<()>,
    freed: Receiver<()>,
}

impl Throttle {
    fn new(capacity: usize) -> Self {
        let (slots, freed) = bounded(capacity.max(1));
        Self { slots, freed }
    }

    /// Block until a slot is free.
    fn acquire(&self) -> ThrottlePermit<'_> {
        // Both ends live in `self`, so the channel cannot disconnect.
        let _ = self.slots.send(());
        ThrottlePermit { throttle: self }
    }

    #[cfg(test)]
    fn in_use(&self) -> usize {
        self.slots.len()
    }
}

/// Held slot; released on drop.
struct ThrottlePermit<'a> {
    throttle: &'a Throttle,
}

impl Drop for ThrottlePermit<'_> {
    fn drop(&mut self) {
        let _ = self.throttle.freed.try_recv();
    }
}

/// One mirror run.
pub struct MirrorEngine<'a> {
    frontend: &'a dyn Frontend,
    activity: &'a ActivityLog,
    throttle: Throttle,
    queue: Mutex<VecDeque<DirectoryPair>>,
    counters: MirrorCounters,
    failure: Mutex<Option<MirrorError>>,
    aborted: AtomicBool,
}

impl<'a> MirrorEngine<'a> {
    /// Engine allowing `parallelism` concurrent reconciliations and copies
    /// (coerced to at least 1).
    pub fn new(frontend: &'a dyn Frontend, activity: &'a ActivityLog, parallelism: usize) -> Self {
        Self {
            frontend,
            activity,
            throttle: Throttle::new(parallelism),
            queue: Mutex::new(VecDeque::new()),
            counters: MirrorCounters::new(),
            failure: Mutex::new(None),
            aborted: AtomicBool::new(false),
        }
    }

    /// Mirror `root.source` onto `root.destination`.
    ///
    /// The first failure is reported through [`Frontend::fatal`], stops all
    /// further dispatch, and is returned once in-flight workers have joined.
    pub fn run(&self, root: DirectoryPair) -> Result<MirrorStats> {
        self.activity.run_start(&root.source, &root.destination);
        self.queue.lock().push_back(root);

        thread::scope(|scope| {
            while !self.is_aborted() {
                let Some(pair) = self.queue.lock().pop_front() else {
                    break;
                };
                if let Err(err) = self.process(scope, &pair) {
                    self.fail(err);
                }
            }
        });

        if let Some(err) = self.failure.lock().take() {
            self.activity.flush();
            return Err(err);
        }
        let stats = self.counters.snapshot();
        self.activity.run_complete(stats);
        self.activity.flush();
        Ok(stats)
    }

    /// Counters so far.
    pub fn stats(&self) -> MirrorStats {
        self.counters.snapshot()
    }

    fn process<'scope, 'env>(
        &'env self,
        scope: &'scope Scope<'scope, 'env>,
        pair: &DirectoryPair,
    ) -> Result<()> {
        let work = {
            let _permit = self.throttle.acquire();
            self.frontend.progress(&format!(
                "Mirroring {} to {}",
                pair.source.display(),
                pair.destination.display()
            ));
            let source = read_snapshot(&pair.source, false)?;
            let destination = read_snapshot(&pair.destination, false)?;
            self.reconciler().reconcile(pair, &source, &destination)?
        };

        self.queue.lock().extend(work.child_pairs);

        for name in work.dirs_to_delete {
            let path = pair.destination.join(name);
            scope.spawn(move || self.guarded(|| self.reconciler().delete_dir(&path)));
        }
        for name in work.files_to_delete {
            let path = pair.destination.join(name);
            scope.spawn(move || self.guarded(|| self.reconciler().delete_file(&path)));
        }
        for name in work.files_to_copy {
            let permit = self.throttle.acquire();
            if self.is_aborted() {
                break;
            }
            let source = pair.source.join(&name);
            let destination = pair.destination.join(&name);
            scope.spawn(move || {
                let _permit = permit;
                self.guarded(|| self.copy(&source, &destination));
            });
        }
        Ok(())
    }

    /// Run a worker body unless the run already failed; record its error.
    fn guarded(&self, task: impl FnOnce() -> Result<()>) {
        if self.is_aborted() {
            return;
        }
        if let Err(err) = task() {
            self.fail(err);
        }
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self.frontend, &self.counters, self.activity)
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<()> {
        self.frontend.progress(&format!(
            "Copy {} to {}",
            source.display(),
            destination.display()
        ));
        let bytes = copy_file(source, destination)?;
        self.counters.file_copied();
        self.activity.file_copied(destination, bytes);
        Ok(())
    }

    fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Record `err`. Only the first failure reaches the frontend.
    fn fail(&self, err: MirrorError) {
        self.activity.error(&err);
        if self.aborted.swap(true, Ordering::AcqRel) {
            return;
        }
        self.activity.flush();
        self.frontend.fatal(&err);
        *self.failure.lock() = Some(err);
    }
}
