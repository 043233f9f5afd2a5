// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Collision objects: a moving bounding sphere, its owner payload, and the
//! bookkeeping the grid needs to rebind it lazily.

use std::collections::BTreeSet;
use std::ops::Range;

use fieldgrid_geom::{Sphere, Vec3};

use crate::field::CellCoord;
use crate::ident::{FieldId, ObjectId};

/// Half-open per-axis cell ranges covered by a sphere, already clamped to the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Covered rows (Y axis).
    pub rows: Range<usize>,
    /// Covered columns (X axis).
    pub cols: Range<usize>,
    /// Covered depth slices (Z axis); always `0..1` on 2D grids.
    pub depths: Range<usize>,
}

impl CellRange {
    /// Returns `true` when any axis covers no cell.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty() || self.depths.is_empty()
    }

    /// Number of cells in the cartesian product of the three ranges.
    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.rows.len() * self.cols.len() * self.depths.len()
    }

    /// Iterates covered coordinates in row-major order (row, then col, then depth).
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.rows.clone().flat_map(move |row| {
            self.cols.clone().flat_map(move |col| {
                self.depths.clone().map(move |depth| CellCoord::new(row, col, depth))
            })
        })
    }
}

/// A registered bounding sphere tracked by the grid.
///
/// `T` is the host's owner payload; the grid never inspects it.
///
/// The travel budget is the distance the sphere may still move (or grow)
/// before its covered cell range could change. Every update spends
/// `distance moved + |radius delta|`; once it reaches zero the grid
/// recomputes the range and a fresh budget.
#[derive(Debug, Clone)]
pub struct CollisionObject<T> {
    id: ObjectId,
    owner: T,
    sphere: Sphere,
    travel_budget: f32,
    fields: Vec<FieldId>,
    range: Option<CellRange>,
    virtual_object: bool,
    virtual_collisions: BTreeSet<ObjectId>,
}

impl<T> CollisionObject<T> {
    pub(crate) fn new(id: ObjectId, owner: T, sphere: Sphere) -> Self {
        Self {
            id,
            owner,
            sphere,
            travel_budget: 0.0,
            fields: Vec::new(),
            range: None,
            virtual_object: false,
            virtual_collisions: BTreeSet::new(),
        }
    }

    /// Object handle.
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Owner payload supplied at registration.
    pub const fn owner(&self) -> &T {
        &self.owner
    }

    /// Mutable access to the owner payload.
    pub fn owner_mut(&mut self) -> &mut T {
        &mut self.owner
    }

    /// Current bounding sphere.
    pub const fn sphere(&self) -> Sphere {
        self.sphere
    }

    /// Current center.
    pub const fn center(&self) -> Vec3 {
        self.sphere.center()
    }

    /// Current radius.
    pub const fn radius(&self) -> f32 {
        self.sphere.radius()
    }

    /// Remaining movement before the grid recomputes membership.
    pub const fn travel_budget(&self) -> f32 {
        self.travel_budget
    }

    /// Fields the object is currently bound to.
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    /// Cell range of the last successful bind, if any.
    pub const fn cell_range(&self) -> Option<&CellRange> {
        self.range.as_ref()
    }

    /// Returns `true` when the object is bound to at least one field.
    pub fn is_bound(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Returns `true` for sensor-style objects that record overlaps instead of
    /// triggering notifications.
    pub const fn is_virtual(&self) -> bool {
        self.virtual_object
    }

    /// Distinct objects this virtual object overlapped since the set was last cleared.
    ///
    /// The set accumulates across scan passes; call
    /// [`CollisionObject::clear_virtual_collisions`] when a pass's results have
    /// been consumed.
    pub const fn virtual_collisions(&self) -> &BTreeSet<ObjectId> {
        &self.virtual_collisions
    }

    /// Empties the recorded virtual-collision set.
    pub fn clear_virtual_collisions(&mut self) {
        self.virtual_collisions.clear();
    }

    /// Moves/resizes the sphere and spends travel budget.
    ///
    /// Returns `true` when the budget is exhausted and membership must be
    /// recomputed.
    pub(crate) fn apply_motion(&mut self, sphere: Sphere) -> bool {
        let moved = self.sphere.center().distance(&sphere.center());
        let grown = (sphere.radius() - self.sphere.radius()).abs();
        self.travel_budget -= moved + grown;
        self.sphere = sphere;
        self.travel_budget <= 0.0
    }

    pub(crate) fn set_travel_budget(&mut self, budget: f32) {
        self.travel_budget = budget;
    }

    pub(crate) fn set_virtual(&mut self, on: bool) {
        self.virtual_object = on;
        self.virtual_collisions.clear();
    }

    pub(crate) fn record_virtual_collision(&mut self, other: ObjectId) {
        self.virtual_collisions.insert(other);
    }

    /// Replaces the bound range/fields, returning the previously bound fields.
    pub(crate) fn rebind(
        &mut self,
        range: Option<CellRange>,
        fields: Vec<FieldId>,
    ) -> Vec<FieldId> {
        self.range = range;
        std::mem::replace(&mut self.fields, fields)
    }

    pub(crate) fn into_owner(self) -> T {
        self.owner
    }
}
