//! Linear undo/redo history over arena events.
//!
//! The log is a flat sequence with a single cursor. Events up to and
//! including the cursor are applied; events after it are waiting to be
//! redone. Appending always discards the redo-pending tail, so history never
//! branches.

use crate::registry::ShapeRegistry;
use crate::shapes::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A user action recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HistoryEvent {
    /// A shape was placed on the arena.
    Create { shape_id: ShapeId },
    /// A shape was dragged from `previous` to `new` (top-left corners).
    Move {
        shape_id: ShapeId,
        previous: Point,
        new: Point,
    },
}

impl HistoryEvent {
    /// The shape this event targets.
    pub fn shape_id(&self) -> ShapeId {
        match self {
            HistoryEvent::Create { shape_id } | HistoryEvent::Move { shape_id, .. } => *shape_id,
        }
    }

    /// Apply the inverse of this event.
    fn revert(&self, registry: &mut ShapeRegistry) {
        match *self {
            HistoryEvent::Create { shape_id } => {
                registry.detach(shape_id);
            }
            HistoryEvent::Move {
                shape_id, previous, ..
            } => {
                if !registry.set_position(shape_id, previous) {
                    log::warn!("Undo move: unknown shape {shape_id}");
                }
            }
        }
    }

    /// Apply this event forward.
    fn apply(&self, registry: &mut ShapeRegistry) {
        match *self {
            HistoryEvent::Create { shape_id } => {
                if !registry.attach(shape_id) {
                    log::warn!("Redo create: unknown shape {shape_id}");
                }
            }
            HistoryEvent::Move { shape_id, new, .. } => {
                if !registry.set_position(shape_id, new) {
                    log::warn!("Redo move: unknown shape {shape_id}");
                }
            }
        }
    }
}

/// Event log with a cursor.
#[derive(Debug, Clone, Default)]
pub struct History {
    events: Vec<HistoryEvent>,
    /// Number of applied events; the cursor is `applied - 1`.
    applied: usize,
    /// Maximum number of events to keep (None = unbounded).
    limit: Option<usize>,
}

impl History {
    /// Create an unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `limit` events (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    /// Record a new event.
    ///
    /// Drops every redo-pending event, pushes `event` and moves the cursor
    /// onto it. Returns the dropped events in their original order.
    pub fn append(&mut self, event: HistoryEvent) -> Vec<HistoryEvent> {
        let discarded: Vec<HistoryEvent> = self.events.drain(self.applied..).collect();
        self.events.push(event);
        self.applied = self.events.len();

        if let Some(limit) = self.limit {
            if self.events.len() > limit {
                let excess = self.events.len() - limit;
                self.events.drain(..excess);
                self.applied -= excess;
            }
        }

        log::debug!(
            "History append {:?}: {} events, {} discarded",
            event,
            self.events.len(),
            discarded.len()
        );
        discarded
    }

    /// Undo the event at the cursor.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, registry: &mut ShapeRegistry) -> bool {
        if !self.has_undo() {
            return false;
        }
        let event = self.events[self.applied - 1];
        event.revert(registry);
        self.applied -= 1;
        log::debug!("Undo {:?}, cursor {:?}", event, self.cursor());
        true
    }

    /// Redo the event after the cursor.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, registry: &mut ShapeRegistry) -> bool {
        if !self.has_redo() {
            return false;
        }
        self.applied += 1;
        let event = self.events[self.applied - 1];
        event.apply(registry);
        log::debug!("Redo {:?}, cursor {:?}", event, self.cursor());
        true
    }

    /// Check if undo is available.
    pub fn has_undo(&self) -> bool {
        !self.events.is_empty() && self.applied > 0
    }

    /// Check if redo is available.
    pub fn has_redo(&self) -> bool {
        !self.events.is_empty() && self.applied < self.events.len()
    }

    /// Index of the most recently applied event, or None when fully undone.
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// The most recently applied event.
    pub fn current(&self) -> Option<&HistoryEvent> {
        self.cursor().and_then(|i| self.events.get(i))
    }

    /// All events, applied and redo-pending.
    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    /// Events waiting to be redone.
    pub fn redo_pending(&self) -> &[HistoryEvent] {
        &self.events[self.applied..]
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Forget every event without touching any shape.
    pub fn clear(&mut self) {
        self.events.clear();
        self.applied = 0;
    }
}
