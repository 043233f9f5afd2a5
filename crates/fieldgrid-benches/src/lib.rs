// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared scene builders for the fieldgrid benchmarks.

use fieldgrid_core::{FieldGrid, GridConfig, GridError, ObjectId, Sphere, Vec3};

/// Side length of the benchmark world.
pub const WORLD: f32 = 1_000.0;
/// Cell edge used by every benchmark grid.
pub const CELL: f32 = 25.0;

/// Deterministic xorshift stream; benches must not depend on ambient RNG.
#[derive(Debug, Clone)]
pub struct XorShift(u64);

impl XorShift {
    /// Seeded stream. A zero seed is remapped so the stream never sticks.
    pub const fn new(seed: u64) -> Self {
        if seed == 0 {
            Self(0x9e37_79b9_7f4a_7c15)
        } else {
            Self(seed)
        }
    }

    /// Next value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        let top = u16::try_from(self.0 >> 48).unwrap_or(u16::MAX);
        f32::from(top) / 65_536.0
    }

    /// Next value in `[lo, hi)`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_unit()
    }
}

/// A planar grid populated with `count` small spheres scattered uniformly.
pub fn scattered_grid(
    count: usize,
    seed: u64,
) -> Result<(FieldGrid<usize>, Vec<ObjectId>), GridError> {
    let mut grid = FieldGrid::new(&GridConfig::planar(Vec3::ZERO, WORLD, WORLD, CELL))?;
    let mut rng = XorShift::new(seed);
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let center = Vec3::planar(rng.range(0.0, WORLD), rng.range(0.0, WORLD));
        let radius = rng.range(1.0, CELL * 0.5);
        match grid.register(i, Sphere::new(center, radius)) {
            Ok(id) | Err(GridError::OutOfGrid(id)) => ids.push(id),
            Err(e) => return Err(e),
        }
    }
    Ok((grid, ids))
}
