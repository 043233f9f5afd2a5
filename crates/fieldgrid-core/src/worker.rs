// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Continuous scanning on a dedicated thread.
//!
//! The grid itself travels between host and worker: [`ScanWorker::submit`]
//! ends the movement phase and sends the grid through a single-slot channel,
//! the worker runs exactly one pass, and the grid comes back on a return
//! channel for [`ScanWorker::try_reclaim`] / [`ScanWorker::reclaim`]. Nothing
//! is shared between the two threads except the phase flags and counters.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::checker::{Checker, OverlapHandler};
use crate::error::WorkerError;
use crate::grid::FieldGrid;

/// Grid handed back by a refused [`ScanWorker::submit`], movement phase restored.
#[derive(Debug)]
pub struct Rejected<T> {
    /// The grid that was not scanned.
    pub grid: FieldGrid<T>,
    /// Why the worker refused it.
    pub reason: WorkerError,
}

/// Counters published by the worker after every pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WorkerStats {
    /// Passes completed.
    pub passes: u64,
    /// Pairwise tests in the last pass (0 unless measurement is on).
    pub checks: u64,
    /// Overlaps in the last pass (0 unless measurement is on).
    pub collisions: u64,
}

#[derive(Debug, Default)]
struct SharedStats {
    passes: AtomicU64,
    checks: AtomicU64,
    collisions: AtomicU64,
}

/// Background scan loop owning a [`Checker`].
pub struct ScanWorker<T, H> {
    jobs: Option<SyncSender<FieldGrid<T>>>,
    done: Receiver<FieldGrid<T>>,
    handle: Option<JoinHandle<Checker<H>>>,
    running: Arc<AtomicBool>,
    stats: Arc<SharedStats>,
}

impl<T, H> ScanWorker<T, H>
where
    T: Send + 'static,
    H: OverlapHandler<T> + Send + 'static,
{
    /// Starts the scan thread.
    pub fn spawn(checker: Checker<H>) -> Result<Self, WorkerError> {
        let (jobs, job_rx) = mpsc::sync_channel::<FieldGrid<T>>(1);
        let (done_tx, done) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(SharedStats::default());

        let handle = thread::Builder::new().name("fieldgrid-scan".into()).spawn({
            let running = Arc::clone(&running);
            let stats = Arc::clone(&stats);
            move || scan_loop(checker, &job_rx, &done_tx, &running, &stats)
        })?;
        info!("scan worker started");
        Ok(Self {
            jobs: Some(jobs),
            done,
            handle: Some(handle),
            running,
            stats,
        })
    }

    /// Ends the movement phase and queues `grid` for one pass.
    ///
    /// On refusal the grid is returned (boxed, it owns every field) with its
    /// movement phase reopened.
    pub fn submit(&self, grid: FieldGrid<T>) -> Result<(), Box<Rejected<T>>> {
        grid.finish_movement();
        let Some(jobs) = self.jobs.as_ref() else {
            return Err(reject(grid, WorkerError::Disconnected));
        };
        match jobs.try_send(grid) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(grid)) => Err(reject(grid, WorkerError::Busy)),
            Err(TrySendError::Disconnected(grid)) => Err(reject(grid, WorkerError::Disconnected)),
        }
    }

    /// Returns the grid if its pass has finished, without blocking.
    pub fn try_reclaim(&self) -> Result<Option<FieldGrid<T>>, WorkerError> {
        match self.done.try_recv() {
            Ok(grid) => Ok(Some(grid)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    /// Blocks until the in-flight pass finishes and returns the grid.
    pub fn reclaim(&self) -> Result<FieldGrid<T>, WorkerError> {
        self.done.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Counters published after the most recent pass.
    pub fn stats(&self) -> WorkerStats {
        WorkerStats {
            passes: self.stats.passes.load(Ordering::Acquire),
            checks: self.stats.checks.load(Ordering::Acquire),
            collisions: self.stats.collisions.load(Ordering::Acquire),
        }
    }

    /// Returns `true` while the scan thread is alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the loop after any in-flight pass and returns the checker.
    ///
    /// Grids that were never reclaimed are returned too, movement phase
    /// reopened; a grid still queued behind the in-flight pass is not scanned.
    pub fn stop(mut self) -> Result<(Checker<H>, Vec<FieldGrid<T>>), WorkerError> {
        self.running.store(false, Ordering::Release);
        self.jobs = None;
        let handle = self.handle.take().ok_or(WorkerError::Disconnected)?;
        let checker = handle.join().map_err(|_| WorkerError::Panicked)?;
        let leftover: Vec<_> = self.done.try_iter().collect();
        let passes = self.stats.passes.load(Ordering::Acquire);
        info!(passes, "scan worker stopped");
        Ok((checker, leftover))
    }
}

impl<T, H> Drop for ScanWorker<T, H> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        self.jobs = None;
        if let Some(handle) = self.handle.take() {
            // A panicked worker has nothing left to hand back.
            let _ = handle.join();
        }
    }
}

fn reject<T>(grid: FieldGrid<T>, reason: WorkerError) -> Box<Rejected<T>> {
    grid.flags().cancel_scan();
    Box::new(Rejected { grid, reason })
}

fn scan_loop<T, H>(
    mut checker: Checker<H>,
    jobs: &Receiver<FieldGrid<T>>,
    done: &mpsc::Sender<FieldGrid<T>>,
    running: &AtomicBool,
    stats: &SharedStats,
) -> Checker<H>
where
    H: OverlapHandler<T>,
{
    while let Ok(mut grid) = jobs.recv() {
        checker.scan(&mut grid);
        let s = checker.stats();
        stats.checks.store(s.checks, Ordering::Release);
        stats.collisions.store(s.collisions, Ordering::Release);
        stats.passes.store(s.passes, Ordering::Release);
        debug!(
            passes = s.passes,
            collisions = s.collisions,
            "scan pass complete"
        );
        if done.send(grid).is_err() || !running.load(Ordering::Acquire) {
            break;
        }
    }
    // Grids still queued go back unscanned.
    for grid in jobs.try_iter() {
        grid.flags().cancel_scan();
        if done.send(grid).is_err() {
            break;
        }
    }
    checker
}
