// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line-list geometry for drawing the grid.

use fieldgrid_geom::Vec3;

use crate::field::Field;
use crate::grid::FieldGrid;

/// The 12 cube edges as 24 indices into [`field_corners`]' output.
///
/// Corner `i` sits at max X when bit 0 is set, max Y for bit 1, max Z for bit 2.
/// The first eight indices are the edges along X, then Y, then Z.
pub const CUBE_EDGE_INDICES: [u32; 24] = [
    0, 1, 2, 3, 4, 5, 6, 7, 0, 2, 1, 3, 4, 6, 5, 7, 0, 4, 1, 5, 2, 6, 3, 7,
];

/// Vertices and line-list indices for every field of a grid.
///
/// Field `k` owns vertices `8k..8k + 8`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wireframe {
    /// Cell corners, eight per field in field-id order.
    pub vertices: Vec<Vec3>,
    /// Pairs of vertex indices, one pair per edge.
    pub indices: Vec<u32>,
}

impl Wireframe {
    /// Number of line segments.
    pub fn line_count(&self) -> usize {
        self.indices.len() / 2
    }
}

/// The eight corners of a field's cube.
pub fn field_corners(field: &Field) -> [Vec3; 8] {
    field.bounds().corners()
}

/// Builds the wireframe of every field. `None` when vertex indices would not fit in `u32`.
pub fn grid_wireframe<T>(grid: &FieldGrid<T>) -> Option<Wireframe> {
    let count = grid.field_count();
    let mut out = Wireframe {
        vertices: Vec::with_capacity(count.checked_mul(8)?),
        indices: Vec::with_capacity(count.checked_mul(CUBE_EDGE_INDICES.len())?),
    };
    for field in grid.fields() {
        let base = u32::try_from(out.vertices.len()).ok().filter(|b| b.checked_add(7).is_some())?;
        out.vertices.extend(field_corners(field));
        out.indices.extend(CUBE_EDGE_INDICES.iter().map(|i| base + i));
    }
    Some(out)
}
