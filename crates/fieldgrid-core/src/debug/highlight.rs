// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Timed field highlighting.
//!
//! Overlap handlers (possibly on the scan worker) push requests through a
//! [`HighlightQueue`]; the host drains them into a [`HighlightBoard`] once per
//! frame and asks it for per-field colours.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::grid::FieldGrid;
use crate::ident::FieldId;

/// Linear RGBA colour.
pub type Rgba = [f32; 4];

/// Ask for `field` to be drawn in `color`.
///
/// `duration == None` (or a zero duration) keeps the highlight until
/// [`HighlightBoard::clear`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HighlightRequest {
    /// Field to highlight.
    pub field: FieldId,
    /// Highlight colour.
    pub color: Rgba,
    /// How long to keep it; `None` is indefinite.
    pub duration: Option<Duration>,
}

/// Cloneable, thread-safe producer side of the highlight channel.
#[derive(Debug, Clone)]
pub struct HighlightQueue {
    tx: Sender<HighlightRequest>,
}

impl HighlightQueue {
    /// Queues a highlight. Requests sent after the board is dropped are discarded.
    pub fn request(&self, field: FieldId, color: Rgba, duration: Option<Duration>) {
        let req = HighlightRequest {
            field,
            color,
            duration,
        };
        let _ = self.tx.send(req);
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Active {
    color: Rgba,
    remaining: Option<Duration>,
}

/// Host-side state: which fields are highlighted and for how long.
#[derive(Debug)]
pub struct HighlightBoard {
    rx: Receiver<HighlightRequest>,
    line_color: Rgba,
    active: BTreeMap<FieldId, Active>,
    populated_color: Option<Rgba>,
}

/// Creates a connected queue/board pair. Unhighlighted fields use `line_color`.
pub fn highlight_channel(line_color: Rgba) -> (HighlightQueue, HighlightBoard) {
    let (tx, rx) = mpsc::channel();
    let board = HighlightBoard {
        rx,
        line_color,
        active: BTreeMap::new(),
        populated_color: None,
    };
    (HighlightQueue { tx }, board)
}

impl HighlightBoard {
    /// Drains pending requests, then ages timed highlights by `elapsed`.
    ///
    /// A field requested more than once keeps its first colour and the longest
    /// duration; an indefinite request outlasts any timed one. Highlights
    /// whose remaining time runs out are removed.
    pub fn update(&mut self, elapsed: Duration) {
        while let Ok(req) = self.rx.try_recv() {
            self.merge(req);
        }
        self.active.retain(|_, a| match a.remaining {
            None => true,
            Some(left) => match left.checked_sub(elapsed) {
                Some(rest) if !rest.is_zero() => {
                    a.remaining = Some(rest);
                    true
                }
                _ => false,
            },
        });
    }

    fn merge(&mut self, req: HighlightRequest) {
        let duration = req.duration.filter(|d| !d.is_zero());
        self.active
            .entry(req.field)
            .and_modify(|a| {
                a.remaining = match (a.remaining, duration) {
                    (Some(old), Some(new)) => Some(old.max(new)),
                    _ => None,
                };
            })
            .or_insert(Active {
                color: req.color,
                remaining: duration,
            });
    }

    /// Currently highlighted fields with their colours, in field-id order.
    pub fn highlighted(&self) -> impl Iterator<Item = (FieldId, Rgba)> + '_ {
        self.active.iter().map(|(id, a)| (*id, a.color))
    }

    /// Time left on a field's highlight: `None` when not highlighted,
    /// `Some(None)` when indefinite.
    pub fn remaining(&self, field: FieldId) -> Option<Option<Duration>> {
        self.active.get(&field).map(|a| a.remaining)
    }

    /// Flips the "colour every populated field" mode. Turning it either way
    /// drops all active highlights.
    pub fn toggle_populated(&mut self, color: Rgba) {
        self.populated_color = match self.populated_color {
            Some(_) => None,
            None => Some(color),
        };
        self.active.clear();
    }

    /// Returns `true` while populated fields are coloured.
    pub const fn shows_populated(&self) -> bool {
        self.populated_color.is_some()
    }

    /// Colour a renderer should use for `field`.
    pub fn field_color<T>(&self, grid: &FieldGrid<T>, field: FieldId) -> Rgba {
        if let Some(a) = self.active.get(&field) {
            return a.color;
        }
        match self.populated_color {
            Some(c) if grid.field(field).is_some_and(|f| !f.is_empty()) => c,
            _ => self.line_color,
        }
    }

    /// Eight vertex colours per field, matching [`super::grid_wireframe`]'s vertex order.
    pub fn vertex_colors<T>(&self, grid: &FieldGrid<T>) -> Vec<Rgba> {
        grid.fields()
            .iter()
            .flat_map(|f| [self.field_color(grid, f.id()); 8])
            .collect()
    }

    /// Drops every highlight (timed and indefinite).
    pub fn clear(&mut self) {
        self.active.clear();
    }
}
