// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer-agnostic grid diagnostics: timed field highlights and line-list
//! wireframes. Nothing here draws; hosts feed the output to their renderer.

mod highlight;
mod wireframe;

pub use highlight::{highlight_channel, HighlightBoard, HighlightQueue, HighlightRequest, Rgba};
pub use wireframe::{field_corners, grid_wireframe, Wireframe, CUBE_EDGE_INDICES};
