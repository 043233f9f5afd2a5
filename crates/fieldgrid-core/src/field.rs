// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Grid cells ("fields") and their member lists.

use fieldgrid_geom::{Aabb, Vec3};

use crate::ident::{FieldId, ObjectId};

/// Integer address of a field inside the grid.
///
/// `row` follows the Y axis, `col` the X axis and `depth` the Z axis. 2D grids
/// only ever use `depth == 0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Row index (Y axis).
    pub row: usize,
    /// Column index (X axis).
    pub col: usize,
    /// Depth index (Z axis).
    pub depth: usize,
}

impl CellCoord {
    /// Creates a coordinate from its components.
    pub const fn new(row: usize, col: usize, depth: usize) -> Self {
        Self { row, col, depth }
    }
}

/// One fixed-size cell of the grid and the objects currently overlapping it.
///
/// A field is a passive container. The grid decides when it joins or leaves
/// the populated-field list; `populated_slot` is the grid's back-pointer into
/// that list so removal stays O(1).
#[derive(Debug, Clone)]
pub struct Field {
    id: FieldId,
    coord: CellCoord,
    min: Vec3,
    edge: f32,
    members: Vec<ObjectId>,
    populated_slot: Option<usize>,
}

impl Field {
    pub(crate) fn new(id: FieldId, coord: CellCoord, min: Vec3, edge: f32) -> Self {
        Self {
            id,
            coord,
            min,
            edge,
            members: Vec::new(),
            populated_slot: None,
        }
    }

    /// Field identifier.
    pub const fn id(&self) -> FieldId {
        self.id
    }

    /// Integer grid coordinate.
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// World-space minimum corner.
    pub const fn min_corner(&self) -> Vec3 {
        self.min
    }

    /// Edge length shared by every field of the grid.
    pub const fn edge(&self) -> f32 {
        self.edge
    }

    /// World-space bounds of the cell (a cube; 2D grids ignore its Z extent).
    pub fn bounds(&self) -> Aabb {
        Aabb::cube(self.min, self.edge)
    }

    /// Objects currently overlapping the field. Order is unspecified.
    pub fn members(&self) -> &[ObjectId] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when no object overlaps the field.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` when `id` is a member.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.contains(&id)
    }

    pub(crate) fn add_member(&mut self, id: ObjectId) {
        self.members.push(id);
    }

    /// Removes `id`; returns `false` when it was not a member.
    pub(crate) fn remove_member(&mut self, id: ObjectId) -> bool {
        match self.members.iter().position(|m| *m == id) {
            Some(pos) => {
                self.members.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) const fn populated_slot(&self) -> Option<usize> {
        self.populated_slot
    }

    pub(crate) fn set_populated_slot(&mut self, slot: Option<usize>) {
        self.populated_slot = slot;
    }
}
