// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Two-flag movement/scan handoff.
//!
//! A tick alternates between two phases:
//!
//! 1. Movement: `objects_updatable == true`. The host moves objects; moves may
//!    rebind fields.
//! 2. Scan: the host calls [`PhaseFlags::request_scan`], which clears
//!    `objects_updatable` and raises `scan_allowed`. A checker claims the pass
//!    (clearing `scan_allowed`), scans every populated field, then raises
//!    `objects_updatable` again.
//!
//! The flags are the only coordination state between the host and a scan
//! worker. Stores use `Release` and loads `Acquire`, so everything a phase
//! wrote is visible to the thread that observes the flag flip.

use std::sync::atomic::{AtomicBool, Ordering};

/// Scan-allowed / objects-updatable flag pair shared between host and worker.
#[derive(Debug)]
pub struct PhaseFlags {
    scan_allowed: AtomicBool,
    objects_updatable: AtomicBool,
}

impl Default for PhaseFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseFlags {
    /// Flags in the movement phase (no scan requested, objects updatable).
    pub const fn new() -> Self {
        Self {
            scan_allowed: AtomicBool::new(false),
            objects_updatable: AtomicBool::new(true),
        }
    }

    /// `true` once the host has finished moving objects and a pass may start.
    pub fn scan_allowed(&self) -> bool {
        self.scan_allowed.load(Ordering::Acquire)
    }

    /// `true` while the host may move objects.
    pub fn objects_updatable(&self) -> bool {
        self.objects_updatable.load(Ordering::Acquire)
    }

    /// Ends the movement phase: objects become read-only until the next pass completes.
    pub fn request_scan(&self) {
        self.objects_updatable.store(false, Ordering::Release);
        self.scan_allowed.store(true, Ordering::Release);
    }

    /// Claims a requested pass. Returns whether a pass had been requested.
    pub(crate) fn begin_scan(&self) -> bool {
        self.scan_allowed.swap(false, Ordering::AcqRel)
    }

    /// Ends the scan phase and reopens movement.
    pub(crate) fn finish_scan(&self) {
        self.objects_updatable.store(true, Ordering::Release);
    }

    /// Drops a pending request without scanning (used when a submission is rejected).
    pub(crate) fn cancel_scan(&self) {
        self.scan_allowed.store(false, Ordering::Release);
        self.objects_updatable.store(true, Ordering::Release);
    }
}
