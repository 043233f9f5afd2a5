// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The grid manager: dense field array, object registry, lazy rebinding, and
//! the populated-field list the checker iterates.
//!
//! Membership is recomputed only when an object has spent its travel budget.
//! The budget is the smallest distance any sphere extent can travel along any
//! grid axis before its floor cell index changes, so movement within budget
//! can never change the covered cells. When it is spent the covered range is
//! recomputed; fields are only touched if the range actually changed.

use std::ops::Range;
use std::sync::Arc;

use fieldgrid_geom::{Axis, Sphere, Vec3};
use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument, warn};

use crate::config::GridConfig;
use crate::error::GridError;
use crate::field::{CellCoord, Field};
use crate::ident::{FieldId, ObjectId};
use crate::object::{CellRange, CollisionObject};
use crate::phase::PhaseFlags;

/// Per-axis cell counts of a grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridDims {
    /// Cells along Y.
    pub rows: usize,
    /// Cells along X.
    pub cols: usize,
    /// Cells along Z (`1` for planar grids).
    pub depths: usize,
}

impl GridDims {
    /// Total number of fields.
    pub const fn field_count(&self) -> usize {
        self.rows * self.cols * self.depths
    }

    /// Row-major dense index of `coord`, or `None` when out of range.
    pub const fn index_of(&self, coord: CellCoord) -> Option<usize> {
        if coord.row >= self.rows || coord.col >= self.cols || coord.depth >= self.depths {
            return None;
        }
        Some((coord.row * self.cols + coord.col) * self.depths + coord.depth)
    }
}

/// Rebinding counters (diagnostics only).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct GridStats {
    /// Times a covered range and travel budget were recomputed.
    pub recomputes: u64,
    /// Times an object's field membership actually changed.
    pub rebinds: u64,
    /// Binds that ended outside the grid.
    pub out_of_grid: u64,
}

pub(crate) type Registry<T> = FxHashMap<ObjectId, CollisionObject<T>>;

/// Uniform collision grid owning every field and registered object.
///
/// `T` is the host's owner payload attached to each object.
#[derive(Debug)]
pub struct FieldGrid<T> {
    origin: Vec3,
    cell_size: f32,
    dims: GridDims,
    use_depth: bool,
    fields: Vec<Field>,
    populated: Vec<FieldId>,
    objects: Registry<T>,
    next_id: u64,
    enabled: bool,
    flags: Arc<PhaseFlags>,
    stats: GridStats,
}

impl<T> FieldGrid<T> {
    /// Builds the grid described by `config`.
    ///
    /// Fields are allocated once, ids assigned row-major. Runtime resizing is
    /// not supported; build a new grid instead.
    pub fn new(config: &GridConfig) -> Result<Self, GridError> {
        let dims = config.dims()?;
        let origin = config.origin();
        let cell_size = config.cell_size;
        let mut fields = Vec::with_capacity(dims.field_count());
        for row in 0..dims.rows {
            for col in 0..dims.cols {
                for depth in 0..dims.depths {
                    let coord = CellCoord::new(row, col, depth);
                    let index = u32::try_from(fields.len())
                        .map_err(|_| GridError::InvalidConfig("field count exceeds u32".into()))?;
                    let id = FieldId::new(index);
                    let min = origin.add(&Vec3::new(
                        cell_origin(col, cell_size),
                        cell_origin(row, cell_size),
                        cell_origin(depth, cell_size),
                    ));
                    fields.push(Field::new(id, coord, min, cell_size));
                }
            }
        }
        info!(
            rows = dims.rows,
            cols = dims.cols,
            depths = dims.depths,
            fields = fields.len(),
            cell_size,
            "collision grid built"
        );
        Ok(Self {
            origin,
            cell_size,
            dims,
            use_depth: config.depth.is_some(),
            fields,
            populated: Vec::new(),
            objects: FxHashMap::default(),
            next_id: 0,
            enabled: config.enabled,
            flags: Arc::new(PhaseFlags::new()),
            stats: GridStats::default(),
        })
    }

    // ── Geometry ────────────────────────────────────────────────────────

    /// World position of the grid's minimum corner.
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Cell edge length.
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Per-axis cell counts.
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// `true` for volumetric grids (a depth extent was configured).
    pub const fn is_volumetric(&self) -> bool {
        self.use_depth
    }

    // ── Fields ──────────────────────────────────────────────────────────

    /// Every field in row-major order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field by id.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.index())
    }

    /// Field at an integer coordinate.
    pub fn field_at(&self, coord: CellCoord) -> Option<&Field> {
        self.dims.index_of(coord).and_then(|i| self.fields.get(i))
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Ids of fields with at least one member. Order is unspecified.
    pub fn populated_ids(&self) -> &[FieldId] {
        &self.populated
    }

    /// Fields with at least one member.
    pub fn populated_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.populated.iter().filter_map(|id| self.fields.get(id.index()))
    }

    /// Number of fields with at least one member.
    pub fn populated_count(&self) -> usize {
        self.populated.len()
    }

    // ── Objects ─────────────────────────────────────────────────────────

    /// Registered object by handle.
    pub fn object(&self, id: ObjectId) -> Option<&CollisionObject<T>> {
        self.objects.get(&id)
    }

    /// Mutable access to a registered object (owner payload, virtual set).
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut CollisionObject<T>> {
        self.objects.get_mut(&id)
    }

    /// Every registered object. Order is unspecified.
    pub fn objects(&self) -> impl Iterator<Item = &CollisionObject<T>> + '_ {
        self.objects.values()
    }

    /// Number of registered objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Registers a sphere owned by `owner` and binds it when the grid is enabled.
    ///
    /// # Errors
    /// - [`GridError::InvalidSphere`] for non-finite input (nothing is registered).
    /// - [`GridError::ScanPending`] during a scan phase (nothing is registered).
    /// - [`GridError::OutOfGrid`] when the sphere misses every cell; the object
    ///   *is* registered under the id carried by the error.
    pub fn register(&mut self, owner: T, sphere: Sphere) -> Result<ObjectId, GridError> {
        self.ensure_updatable()?;
        if !sphere.is_valid() {
            return Err(GridError::InvalidSphere);
        }
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, CollisionObject::new(id, owner, sphere));
        if self.enabled {
            self.bind(id)?;
        }
        Ok(id)
    }

    /// Moves an object to `center`, keeping its radius.
    pub fn update(&mut self, id: ObjectId, center: Vec3) -> Result<(), GridError> {
        let radius = self.objects.get(&id).ok_or(GridError::UnknownObject(id))?.radius();
        self.update_sphere(id, Sphere::new(center, radius))
    }

    /// Moves an object to `center` and resizes it to `radius`.
    pub fn update_with_radius(
        &mut self,
        id: ObjectId,
        center: Vec3,
        radius: f32,
    ) -> Result<(), GridError> {
        self.update_sphere(id, Sphere::new(center, radius))
    }

    /// Replaces an object's sphere.
    ///
    /// Spends travel budget; membership is recomputed only once the budget is
    /// exhausted, and fields are rebound only if the covered range changed.
    ///
    /// # Errors
    /// [`GridError::OutOfGrid`] when the recomputed membership is empty. The
    /// new sphere is kept, so the object can be moved back in later.
    pub fn update_sphere(&mut self, id: ObjectId, sphere: Sphere) -> Result<(), GridError> {
        self.ensure_updatable()?;
        if !sphere.is_valid() {
            return Err(GridError::InvalidSphere);
        }
        let obj = self.objects.get_mut(&id).ok_or(GridError::UnknownObject(id))?;
        let exhausted = obj.apply_motion(sphere);
        if exhausted && self.enabled {
            self.bind(id)?;
        }
        Ok(())
    }

    /// Unbinds an object from every field, forgets it, and returns its owner payload.
    pub fn dispose(&mut self, id: ObjectId) -> Result<T, GridError> {
        self.ensure_updatable()?;
        let mut obj = self.objects.remove(&id).ok_or(GridError::UnknownObject(id))?;
        let old = obj.rebind(None, Vec::new());
        for field in old {
            Self::unlink(&mut self.fields, &mut self.populated, field, id);
        }
        debug!(%id, "object disposed");
        Ok(obj.into_owner())
    }

    /// Toggles sensor semantics for an object and clears its recorded collisions.
    pub fn set_virtual(&mut self, id: ObjectId, on: bool) -> Result<(), GridError> {
        let obj = self.objects.get_mut(&id).ok_or(GridError::UnknownObject(id))?;
        obj.set_virtual(on);
        Ok(())
    }

    // ── Activation ──────────────────────────────────────────────────────

    /// `true` while objects are bound on registration/update.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables binding.
    ///
    /// Enabling binds every registered object. Objects outside the grid are
    /// collected into a single [`GridError::ActivationIncomplete`]; every
    /// other object is bound regardless.
    #[instrument(level = "debug", skip(self), fields(objects = self.objects.len()))]
    pub fn set_enabled(&mut self, on: bool) -> Result<(), GridError> {
        self.enabled = on;
        if !on {
            return Ok(());
        }
        let mut ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        ids.sort_unstable();
        let mut outside = Vec::new();
        for id in ids {
            match self.bind(id) {
                Ok(()) => {}
                Err(GridError::OutOfGrid(id)) => outside.push(id),
                Err(e) => return Err(e),
            }
        }
        info!(
            populated = self.populated.len(),
            outside = outside.len(),
            "collision grid activated"
        );
        if outside.is_empty() {
            Ok(())
        } else {
            Err(GridError::ActivationIncomplete(outside))
        }
    }

    // ── Phase handoff ───────────────────────────────────────────────────

    /// Shared scan/move flags (clone to poll them from another thread).
    pub fn phase_flags(&self) -> Arc<PhaseFlags> {
        Arc::clone(&self.flags)
    }

    /// `true` while objects may move.
    pub fn objects_updatable(&self) -> bool {
        self.flags.objects_updatable()
    }

    /// `true` when a scan pass has been requested but not yet claimed.
    pub fn scan_allowed(&self) -> bool {
        self.flags.scan_allowed()
    }

    /// Ends the movement phase for this tick (scan-allowed on, objects-updatable off).
    pub fn finish_movement(&self) {
        self.flags.request_scan();
    }

    // ── Diagnostics ─────────────────────────────────────────────────────

    /// Rebinding counters since construction or the last reset.
    pub const fn stats(&self) -> GridStats {
        self.stats
    }

    /// Zeroes the rebinding counters.
    pub fn reset_stats(&mut self) {
        self.stats = GridStats::default();
    }

    // ── Internals ───────────────────────────────────────────────────────

    pub(crate) fn flags(&self) -> &PhaseFlags {
        &self.flags
    }

    /// Disjoint borrows for the checker: fields and populated list read-only,
    /// objects mutable (virtual objects record collisions).
    pub(crate) fn scan_view(&mut self) -> (&[Field], &[FieldId], &mut Registry<T>) {
        (&self.fields, &self.populated, &mut self.objects)
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.get_mut(id.index())
    }

    fn ensure_updatable(&self) -> Result<(), GridError> {
        if self.flags.objects_updatable() {
            Ok(())
        } else {
            Err(GridError::ScanPending)
        }
    }

    /// Recomputes range + budget for `id` and rebinds fields if the range changed.
    fn bind(&mut self, id: ObjectId) -> Result<(), GridError> {
        let sphere = self.objects.get(&id).ok_or(GridError::UnknownObject(id))?.sphere();
        let range = self.covered_range(&sphere);
        let budget = self.travel_budget(&sphere);
        self.stats.recomputes += 1;

        let obj = self.objects.get_mut(&id).ok_or(GridError::UnknownObject(id))?;
        if range.is_empty() {
            // Zero budget: the next update retries the bind.
            obj.set_travel_budget(0.0);
            let old = obj.rebind(None, Vec::new());
            for field in old {
                Self::unlink(&mut self.fields, &mut self.populated, field, id);
            }
            self.stats.out_of_grid += 1;
            warn!(
                %id,
                center = ?sphere.center(),
                radius = sphere.radius(),
                "object outside collision grid"
            );
            return Err(GridError::OutOfGrid(id));
        }
        obj.set_travel_budget(budget);
        if obj.cell_range() == Some(&range) {
            return Ok(());
        }

        let new_fields: Vec<FieldId> = range
            .cells()
            .filter_map(|c| self.dims.index_of(c))
            .filter_map(|i| self.fields.get(i).map(Field::id))
            .collect();
        let old_fields = obj.rebind(Some(range), new_fields.clone());
        for field in &old_fields {
            Self::unlink(&mut self.fields, &mut self.populated, *field, id);
        }
        for field in &new_fields {
            Self::link(&mut self.fields, &mut self.populated, *field, id);
        }
        self.stats.rebinds += 1;
        debug!(%id, from = old_fields.len(), to = new_fields.len(), budget, "object rebound");
        Ok(())
    }

    /// Covered cells per axis, clamped to the grid. Planar grids pin depth to `0..1`.
    pub(crate) fn covered_range(&self, sphere: &Sphere) -> CellRange {
        let local = sphere.center().sub(&self.origin);
        let r = sphere.radius();
        let depths = if self.use_depth {
            self.axis_range(local.get(Axis::Z), r, self.dims.depths)
        } else {
            0..1
        };
        CellRange {
            rows: self.axis_range(local.get(Axis::Y), r, self.dims.rows),
            cols: self.axis_range(local.get(Axis::X), r, self.dims.cols),
            depths,
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn axis_range(&self, coord: f32, radius: f32, count: usize) -> Range<usize> {
        let n = count as f32;
        let lo = ((coord - radius) / self.cell_size).floor().clamp(0.0, n);
        let hi = (((coord + radius) / self.cell_size).floor() + 1.0).clamp(0.0, n);
        (lo as usize)..(hi as usize)
    }

    /// Smallest distance any sphere extent can move along a grid axis before
    /// its floor cell index changes.
    ///
    /// Moving an extent down by its offset `f·edge` lands exactly on the
    /// boundary (index unchanged); moving it up by `(1-f)·edge` crosses into the
    /// next cell. Spending the budget by straight-line distance bounds every
    /// per-axis displacement, so an update within budget never changes the range.
    pub(crate) fn travel_budget(&self, sphere: &Sphere) -> f32 {
        let local = sphere.center().sub(&self.origin);
        let r = sphere.radius();
        let axes: &[Axis] = if self.use_depth {
            &Axis::ALL
        } else {
            &[Axis::X, Axis::Y]
        };
        let edge = self.cell_size;
        let mut budget = f32::INFINITY;
        for axis in axes {
            let c = local.get(*axis);
            for extent in [c - r, c + r] {
                let t = extent / edge;
                let frac = t - t.floor();
                budget = budget.min(frac * edge).min((1.0 - frac) * edge);
            }
        }
        budget.max(0.0)
    }

    fn link(fields: &mut [Field], populated: &mut Vec<FieldId>, field: FieldId, id: ObjectId) {
        let Some(f) = fields.get_mut(field.index()) else {
            return;
        };
        f.add_member(id);
        if f.len() == 1 {
            f.set_populated_slot(Some(populated.len()));
            populated.push(field);
        }
    }

    fn unlink(fields: &mut [Field], populated: &mut Vec<FieldId>, field: FieldId, id: ObjectId) {
        let Some(f) = fields.get_mut(field.index()) else {
            return;
        };
        if !f.remove_member(id) || !f.is_empty() {
            return;
        }
        let Some(slot) = f.populated_slot() else {
            return;
        };
        f.set_populated_slot(None);
        populated.swap_remove(slot);
        if let Some(moved) = populated.get(slot).copied() {
            if let Some(mf) = fields.get_mut(moved.index()) {
                mf.set_populated_slot(Some(slot));
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn cell_origin(index: usize, cell_size: f32) -> f32 {
    index as f32 * cell_size
}
