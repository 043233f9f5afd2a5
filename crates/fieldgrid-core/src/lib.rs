// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Uniform-grid broad phase for moving bounding spheres.

The world is partitioned into equal cubic cells (fields). Each registered
object is bound to the fields its sphere touches; a scan pass tests only
pairs that share a field and reports overlaps.

Core pieces:
- [`FieldGrid`]: fields, object registry, lazy rebinding, populated list.
- [`Checker`]: pairwise sphere tests and [`OverlapHandler`] notifications.
- [`ScanWorker`]: the same pass on a dedicated thread, grid ownership handed
  back and forth between movement and scan phases.
- [`debug`]: highlight bookkeeping and wireframe geometry for visualisers.

Design notes:
- Membership is recomputed only after an object spends its travel budget;
  fields are rebound only when the covered cell range changed.
- A pair sharing several fields is reported once per shared field.
- Virtual (sensor) objects never notify; they record who they overlapped.
- The library logs through `tracing` and never installs a subscriber.
"]

mod checker;
mod config;
/// Renderer-agnostic grid diagnostics.
pub mod debug;
mod error;
mod field;
mod grid;
mod ident;
mod object;
mod phase;
mod worker;

pub use checker::{Checker, Overlap, OverlapHandler, OverlapRecord, OverlapRecorder, ScanStats};
pub use config::{
    ConfigError, ConfigService, ConfigStore, GridConfig, ScanConfig, GRID_CONFIG_KEY,
    SCAN_CONFIG_KEY,
};
pub use error::{GridError, WorkerError};
pub use field::{CellCoord, Field};
pub use grid::{FieldGrid, GridDims, GridStats};
pub use ident::{FieldId, ObjectId};
pub use object::{CellRange, CollisionObject};
pub use phase::PhaseFlags;
pub use worker::{Rejected, ScanWorker, WorkerStats};

pub use fieldgrid_geom::{Sphere, Vec3};
