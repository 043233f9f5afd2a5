// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pairwise sphere tests over populated fields.
//!
//! Every unordered pair sharing a field is tested once per shared field, so a
//! pair spanning two shared fields produces two notifications. Hosts that need
//! one event per pair dedupe on `(first, second)` themselves.

use tracing::{instrument, trace};

use crate::config::ScanConfig;
use crate::field::Field;
use crate::grid::FieldGrid;
use crate::ident::{FieldId, ObjectId};
use crate::object::CollisionObject;

/// One overlapping non-virtual pair inside one field.
#[derive(Debug)]
pub struct Overlap<'a, T> {
    /// Field in which the pair was tested.
    pub field: &'a Field,
    /// Member listed first in the field.
    pub first: &'a CollisionObject<T>,
    /// Member listed second in the field.
    pub second: &'a CollisionObject<T>,
}

/// Receives overlap notifications from a scan pass.
///
/// Implemented for every `FnMut(&Overlap<'_, T>)` closure.
pub trait OverlapHandler<T> {
    /// Called once per field per overlapping non-virtual pair.
    fn on_overlap(&mut self, overlap: &Overlap<'_, T>);
}

impl<T, F> OverlapHandler<T> for F
where
    F: FnMut(&Overlap<'_, T>),
{
    fn on_overlap(&mut self, overlap: &Overlap<'_, T>) {
        self(overlap);
    }
}

/// Owned copy of an [`Overlap`], without borrowing the grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct OverlapRecord {
    /// Field in which the pair was tested.
    pub field: FieldId,
    /// Member listed first in the field.
    pub first: ObjectId,
    /// Member listed second in the field.
    pub second: ObjectId,
}

impl OverlapRecord {
    /// Returns `true` when the record names `id` on either side.
    pub fn involves(&self, id: ObjectId) -> bool {
        self.first == id || self.second == id
    }
}

/// Handler that queues every notification for the host to drain after a pass.
#[derive(Debug, Default, Clone)]
pub struct OverlapRecorder {
    records: Vec<OverlapRecord>,
}

impl OverlapRecorder {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records queued so far.
    pub fn records(&self) -> &[OverlapRecord] {
        &self.records
    }

    /// Takes every queued record, leaving the recorder empty.
    pub fn drain(&mut self) -> Vec<OverlapRecord> {
        std::mem::take(&mut self.records)
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> OverlapHandler<T> for OverlapRecorder {
    fn on_overlap(&mut self, overlap: &Overlap<'_, T>) {
        self.records.push(OverlapRecord {
            field: overlap.field.id(),
            first: overlap.first.id(),
            second: overlap.second.id(),
        });
    }
}

/// Per-pass counters. Only updated while performance measurement is on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ScanStats {
    /// Pairwise tests in the last measured pass.
    pub checks: u64,
    /// Largest `checks` seen.
    pub max_checks: u64,
    /// Notifications delivered in the last measured pass. Overlaps involving a
    /// virtual object are recorded on the object and not counted here.
    pub collisions: u64,
    /// Largest `collisions` seen.
    pub max_collisions: u64,
    /// Passes completed, measured or not.
    pub passes: u64,
}

/// Runs scan passes and forwards overlaps to its handler.
pub struct Checker<H> {
    handler: H,
    measure: bool,
    stats: ScanStats,
}

impl<H> Checker<H> {
    /// Checker with measurement off.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            measure: false,
            stats: ScanStats::default(),
        }
    }

    /// Checker configured from `config`.
    pub fn with_config(handler: H, config: &ScanConfig) -> Self {
        Self {
            handler,
            measure: config.measure_performance,
            stats: ScanStats::default(),
        }
    }

    /// The notification handler.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the handler (e.g. to drain an [`OverlapRecorder`]).
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consumes the checker, returning its handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Counters since construction.
    pub const fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Turns pair/collision counting on or off.
    pub fn set_measure_performance(&mut self, on: bool) {
        self.measure = on;
    }

    /// Runs one full pass over `grid`'s populated fields.
    ///
    /// Claims a pending scan request if one exists and reopens the movement
    /// phase afterwards. Holding `&mut` on the grid already excludes movement
    /// for the duration of the pass.
    #[instrument(level = "debug", skip_all, fields(populated = grid.populated_count()))]
    pub fn scan<T>(&mut self, grid: &mut FieldGrid<T>)
    where
        H: OverlapHandler<T>,
    {
        grid.flags().begin_scan();
        let (checks, collisions) = self.pass(grid);
        grid.flags().finish_scan();

        self.stats.passes += 1;
        if self.measure {
            self.stats.checks = checks;
            self.stats.collisions = collisions;
            self.stats.max_checks = self.stats.max_checks.max(checks);
            self.stats.max_collisions = self.stats.max_collisions.max(collisions);
        }
    }

    fn pass<T>(&mut self, grid: &mut FieldGrid<T>) -> (u64, u64)
    where
        H: OverlapHandler<T>,
    {
        let (fields, populated, objects) = grid.scan_view();
        let mut checks = 0u64;
        let mut collisions = 0u64;

        for field_id in populated {
            let Some(field) = fields.get(field_id.index()) else {
                continue;
            };
            let members = field.members();
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    let (Some(first), Some(second)) = (objects.get(&a), objects.get(&b)) else {
                        trace!(field = %field.id(), %a, %b, "skipping stale member");
                        continue;
                    };
                    checks += 1;
                    if !first.sphere().overlaps(&second.sphere()) {
                        continue;
                    }

                    let (a_virtual, b_virtual) = (first.is_virtual(), second.is_virtual());
                    if !a_virtual && !b_virtual {
                        collisions += 1;
                        let overlap = Overlap {
                            field,
                            first,
                            second,
                        };
                        self.handler.on_overlap(&overlap);
                        continue;
                    }
                    if a_virtual {
                        if let Some(obj) = objects.get_mut(&a) {
                            obj.record_virtual_collision(b);
                        }
                    }
                    if b_virtual {
                        if let Some(obj) = objects.get_mut(&b) {
                            obj.record_virtual_collision(a);
                        }
                    }
                }
            }
        }
        (checks, collisions)
    }
}
