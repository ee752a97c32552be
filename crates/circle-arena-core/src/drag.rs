//! Drag session: turns pointer down/move/up into one bounded reposition.

use crate::registry::ShapeRegistry;
use crate::shapes::ShapeId;
use kurbo::{Point, Size};

/// Resolves a canvas point to the shape drawn on top at that point.
pub trait HitTest {
    fn resolve_topmost_shape_at(&self, point: Point) -> Option<ShapeId>;
}

impl HitTest for ShapeRegistry {
    fn resolve_topmost_shape_at(&self, point: Point) -> Option<ShapeId> {
        self.topmost_at(point)
    }
}

/// A finished drag, ready to be recorded as a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRecord {
    pub shape_id: ShapeId,
    pub previous: Point,
    pub new: Point,
}

/// State of the drag interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A shape is being dragged.
    Dragging {
        target: ShapeId,
        /// Top-left corner of the target when the drag started.
        origin: Point,
    },
}

/// Outcome of starting a drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragStart {
    /// The previous drag, if one was still open and had to be completed.
    pub flushed: Option<MoveRecord>,
    /// The shape now being dragged, or None if nothing was under the point.
    pub target: Option<ShapeId>,
}

/// Compute the top-left corner for a shape centered on `point`, kept inside
/// the canvas on each axis independently.
pub fn clamp_to_canvas(point: Point, shape: Size, canvas: Size) -> Point {
    let left = point.x - shape.width / 2.0;
    let top = point.y - shape.height / 2.0;
    Point::new(
        left.min(canvas.width - shape.width).max(0.0),
        top.min(canvas.height - shape.height).max(0.0),
    )
}

/// Tracks at most one in-progress drag.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The shape being dragged, if any.
    pub fn target(&self) -> Option<ShapeId> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { target, .. } => Some(target),
        }
    }

    /// Begin dragging the topmost shape under `point`.
    ///
    /// An open drag is completed first and returned in `flushed`.
    pub fn start<H>(&mut self, point: Point, hit_test: &H, registry: &ShapeRegistry) -> DragStart
    where
        H: HitTest + ?Sized,
    {
        let flushed = self.end(registry);

        let Some(target) = hit_test.resolve_topmost_shape_at(point) else {
            log::debug!("Drag start at {point:?}: no shape");
            return DragStart { flushed, target: None };
        };
        let Some(circle) = registry.get(target) else {
            log::warn!("Drag start: hit test returned unknown shape {target}");
            return DragStart { flushed, target: None };
        };

        self.state = DragState::Dragging {
            target,
            origin: circle.position,
        };
        log::debug!("Drag start on {target} from {:?}", circle.position);
        DragStart {
            flushed,
            target: Some(target),
        }
    }

    /// Move the dragged shape so it is centered on `point`, clamped to
    /// `canvas`. Returns the new top-left corner, or None when idle.
    pub fn update(&mut self, point: Point, canvas: Size, registry: &mut ShapeRegistry) -> Option<Point> {
        let DragState::Dragging { target, .. } = self.state else {
            return None;
        };
        let circle = registry.get_mut(target)?;
        let position = clamp_to_canvas(point, circle.size(), canvas);
        circle.position = position;
        Some(position)
    }

    /// Finish the drag and report where the shape went.
    ///
    /// A drag that did not move the shape still yields a record.
    pub fn end(&mut self, registry: &ShapeRegistry) -> Option<MoveRecord> {
        let DragState::Dragging { target, origin } = std::mem::take(&mut self.state) else {
            return None;
        };
        let Some(circle) = registry.get(target) else {
            log::warn!("Drag end: unknown shape {target}");
            return None;
        };
        let record = MoveRecord {
            shape_id: target,
            previous: origin,
            new: circle.position,
        };
        log::debug!("Drag end on {target}: {:?} -> {:?}", record.previous, record.new);
        Some(record)
    }
}
