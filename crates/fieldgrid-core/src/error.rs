// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for grid operations and the background scan worker.

use thiserror::Error;

use crate::ident::ObjectId;

/// Errors raised synchronously by [`crate::FieldGrid`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Grid configuration rejected before allocation.
    #[error("invalid grid config: {0}")]
    InvalidConfig(String),
    /// Center or radius is NaN/infinite, or the radius is negative.
    #[error("invalid bounding sphere: center must be finite and radius finite and >= 0")]
    InvalidSphere,
    /// The object's sphere overlaps no cell after binding.
    ///
    /// The object stays registered with an empty membership set until it is
    /// moved back inside the grid.
    #[error("{0} does not overlap the collision grid")]
    OutOfGrid(ObjectId),
    /// Activation bound every object except the listed ones, which lie outside the grid.
    #[error("grid activation left {} object(s) outside the grid", .0.len())]
    ActivationIncomplete(Vec<ObjectId>),
    /// The handle does not name a registered object.
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
    /// Movement was attempted while a scan pass is pending or running.
    #[error("objects cannot be updated while a scan pass is pending")]
    ScanPending,
}

/// Errors raised by [`crate::ScanWorker`].
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The OS refused to spawn the scan thread.
    #[error("failed to spawn scan worker: {0}")]
    Spawn(#[from] std::io::Error),
    /// A grid is already queued for the next pass.
    #[error("scan worker is busy with another grid")]
    Busy,
    /// The worker thread is gone (stopped or panicked) and holds no channel.
    #[error("scan worker disconnected")]
    Disconnected,
    /// The worker thread panicked; the checker could not be recovered.
    #[error("scan worker panicked")]
    Panicked,
}
