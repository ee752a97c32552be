//! The arena: owns the shapes, the history and the drag session.

use crate::config::ArenaConfig;
use crate::drag::{DragSession, HitTest, MoveRecord};
use crate::history::{History, HistoryEvent};
use crate::input::{Command, MouseButton, PointerEvent};
use crate::random::{Generator, RandomGenerator};
use crate::registry::ShapeRegistry;
use crate::shapes::{Circle, SerializableColor, ShapeId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Observable state of one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub id: ShapeId,
    pub position: Point,
    pub size: f64,
    pub stroke: SerializableColor,
    pub fill: SerializableColor,
}

impl From<&Circle> for ShapeSnapshot {
    fn from(circle: &Circle) -> Self {
        Self {
            id: circle.id(),
            position: circle.position,
            size: circle.diameter(),
            stroke: circle.stroke,
            fill: circle.fill,
        }
    }
}

/// Everything a presentation layer needs to redraw the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub width: f64,
    pub height: f64,
    /// Visible shapes, back to front.
    pub shapes: Vec<ShapeSnapshot>,
    pub has_undo: bool,
    pub has_redo: bool,
}

/// A bounded surface of circles with linear undo/redo.
pub struct Arena {
    bounds: Size,
    circle_size: f64,
    registry: ShapeRegistry,
    history: History,
    drag: DragSession,
    generator: Box<dyn Generator>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(&ArenaConfig::default())
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("bounds", &self.bounds)
            .field("circle_size", &self.circle_size)
            .field("registry", &self.registry)
            .field("history", &self.history)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl Arena {
    /// Create an empty arena using the `rand` generator.
    pub fn new(config: &ArenaConfig) -> Self {
        Self::with_generator(config, RandomGenerator::from_seed(config.seed))
    }

    /// Create an empty arena with a custom placement/color source.
    pub fn with_generator(config: &ArenaConfig, generator: impl Generator + 'static) -> Self {
        let history = match config.history_limit {
            Some(limit) => History::with_limit(limit),
            None => History::new(),
        };
        Self {
            bounds: Size::new(config.canvas_width, config.canvas_height),
            circle_size: config.circle_size,
            registry: ShapeRegistry::new(),
            history,
            drag: DragSession::new(),
            generator: Box::new(generator),
        }
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Resize the canvas. Later drag updates clamp to the new size.
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        self.bounds = Size::new(width.max(0.0), height.max(0.0));
        log::debug!("Arena resized to {:?}", self.bounds);
    }

    pub fn circle_size(&self) -> f64 {
        self.circle_size
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    /// Visible shapes in z-order (back to front).
    pub fn shapes(&self) -> impl Iterator<Item = &Circle> {
        self.registry.shapes_ordered()
    }

    pub fn has_undo(&self) -> bool {
        self.history.has_undo()
    }

    pub fn has_redo(&self) -> bool {
        self.history.has_redo()
    }

    /// Place a new circle at a random position inside the canvas.
    pub fn create_shape(&mut self) -> ShapeId {
        let area = Rect::new(
            0.0,
            0.0,
            (self.bounds.width - self.circle_size).max(0.0),
            (self.bounds.height - self.circle_size).max(0.0),
        );
        let position = self.generator.random_point_in(area);
        let color = self.generator.random_color();
        let id = self.registry.add(Circle::new(position, self.circle_size, color));
        log::debug!("Created shape {id} at {position:?}");
        self.append(HistoryEvent::Create { shape_id: id });
        id
    }

    /// Record a completed drag. The shape already sits at `new`.
    pub fn record_move(&mut self, shape_id: ShapeId, previous: Point, new: Point) {
        self.append(HistoryEvent::Move {
            shape_id,
            previous,
            new,
        });
    }

    /// Undo the last applied event.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.registry)
    }

    /// Redo the next undone event.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.registry)
    }

    /// Start dragging the topmost shape under `point`.
    /// Returns false if there is no shape there.
    pub fn drag_start(&mut self, point: Point) -> bool {
        let start = self.drag.start(point, &self.registry, &self.registry);
        if let Some(record) = start.flushed {
            self.record(record);
        }
        start.target.is_some()
    }

    /// Start a drag using a host-supplied hit test.
    pub fn drag_start_with<H>(&mut self, point: Point, hit_test: &H) -> bool
    where
        H: HitTest + ?Sized,
    {
        let start = self.drag.start(point, hit_test, &self.registry);
        if let Some(record) = start.flushed {
            self.record(record);
        }
        start.target.is_some()
    }

    /// Follow the pointer with the dragged shape.
    pub fn drag_update(&mut self, point: Point) {
        self.drag.update(point, self.bounds, &mut self.registry);
    }

    /// Drop the dragged shape and record the move.
    pub fn drag_end(&mut self) {
        if let Some(record) = self.drag.end(&self.registry) {
            self.record(record);
        }
    }

    /// Route a pointer event to the drag session. Only the left button drags.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                self.drag_start(position);
            }
            PointerEvent::Move { position } => self.drag_update(position),
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => self.drag_end(),
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => {}
        }
    }

    /// Run a zero-argument command.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::CreateShape => {
                self.create_shape();
            }
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
        }
    }

    /// Capture the observable state.
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            width: self.bounds.width,
            height: self.bounds.height,
            shapes: self.shapes().map(ShapeSnapshot::from).collect(),
            has_undo: self.has_undo(),
            has_redo: self.has_redo(),
        }
    }

    fn record(&mut self, record: MoveRecord) {
        let id = record.shape_id;
        self.record_move(id, record.previous, record.new);

        // A hidden shape with no Create left in the log can never be shown again.
        let creatable = self
            .history
            .events()
            .contains(&HistoryEvent::Create { shape_id: id });
        if !self.registry.is_visible(id) && !creatable && self.registry.forget(id).is_some() {
            log::debug!("Released shape {id} after drag");
        }
    }

    /// Append to history and drop shapes that can no longer be redone.
    fn append(&mut self, event: HistoryEvent) {
        for discarded in self.history.append(event) {
            match discarded {
                HistoryEvent::Create { shape_id } => {
                    if self.drag.target() == Some(shape_id) {
                        continue;
                    }
                    if self.registry.forget(shape_id).is_some() {
                        log::debug!("Released shape {shape_id}");
                    }
                }
                HistoryEvent::Move { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::Color;
    use std::collections::VecDeque;

    /// Generator replaying fixed points; colors are constant.
    struct Scripted {
        points: VecDeque<Point>,
    }

    impl Scripted {
        fn new(points: &[Point]) -> Self {
            Self {
                points: points.iter().copied().collect(),
            }
        }
    }

    impl Generator for Scripted {
        fn random_point_in(&mut self, rect: Rect) -> Point {
            let p = self.points.pop_front().unwrap_or(Point::ZERO);
            Point::new(p.x.clamp(rect.x0, rect.x1), p.y.clamp(rect.y0, rect.y1))
        }

        fn random_color(&mut self) -> Color {
            Color::from_rgba8(12, 34, 56, 255)
        }
    }

    fn arena_with(points: &[Point]) -> Arena {
        Arena::with_generator(&ArenaConfig::default(), Scripted::new(points))
    }

    fn position(arena: &Arena, id: ShapeId) -> Option<Point> {
        arena.registry().get(id).map(|c| c.position)
    }

    fn visible(arena: &Arena) -> Vec<ShapeId> {
        arena.shapes().map(Circle::id).collect()
    }

    #[test]
    fn test_create_and_undo_all() {
        let mut arena = Arena::new(&ArenaConfig {
            seed: Some(1),
            ..ArenaConfig::default()
        });
        for _ in 0..5 {
            arena.create_shape();
        }
        assert_eq!(arena.shapes().count(), 5);
        for _ in 0..5 {
            assert!(arena.undo());
        }
        assert_eq!(arena.shapes().count(), 0);
        assert!(!arena.has_undo());
        assert!(arena.has_redo());
    }

    #[test]
    fn test_created_shapes_stay_inside() {
        let mut arena = Arena::new(&ArenaConfig {
            seed: Some(11),
            ..ArenaConfig::default()
        });
        for _ in 0..100 {
            arena.create_shape();
        }
        for circle in arena.shapes() {
            assert!(circle.position.x >= 0.0 && circle.position.x <= 722.0);
            assert!(circle.position.y >= 0.0 && circle.position.y <= 324.0);
            assert!((circle.diameter() - 50.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_create_on_tiny_canvas() {
        let mut arena = arena_with(&[Point::new(10.0, 10.0)]);
        arena.set_bounds(20.0, 20.0);
        let id = arena.create_shape();
        assert_eq!(position(&arena, id), Some(Point::ZERO));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut arena = arena_with(&[]);

        let a = arena.create_shape();
        assert_eq!(arena.history().events(), &[HistoryEvent::Create { shape_id: a }]);
        assert_eq!(arena.history().cursor(), Some(0));
        assert!(arena.has_undo());
        assert!(!arena.has_redo());

        let b = arena.create_shape();
        assert_eq!(arena.history().len(), 2);
        assert_eq!(arena.history().cursor(), Some(1));

        arena.undo();
        assert_eq!(visible(&arena), vec![a]);
        assert_eq!(arena.history().cursor(), Some(0));
        assert!(arena.has_redo());

        arena.undo();
        assert!(visible(&arena).is_empty());
        assert_eq!(arena.history().cursor(), None);
        assert!(!arena.has_undo());

        arena.redo();
        assert_eq!(visible(&arena), vec![a]);
        assert_eq!(arena.history().cursor(), Some(0));

        let c = arena.create_shape();
        assert_eq!(
            arena.history().events(),
            &[
                HistoryEvent::Create { shape_id: a },
                HistoryEvent::Create { shape_id: c }
            ]
        );
        assert_eq!(arena.history().cursor(), Some(1));
        assert!(!arena.has_redo());

        // B can never come back
        assert!(arena.registry().get(b).is_none());
        assert!(!arena.redo());
        assert_eq!(visible(&arena), vec![a, c]);
    }

    #[test]
    fn test_boundary_undo_redo_change_nothing() {
        let mut arena = arena_with(&[Point::new(100.0, 100.0)]);
        assert!(!arena.undo());
        assert!(!arena.redo());
        assert_eq!(arena.snapshot().shapes.len(), 0);

        arena.create_shape();
        let before = arena.snapshot();
        assert!(!arena.redo());
        assert_eq!(arena.snapshot(), before);

        arena.undo();
        let before = arena.snapshot();
        assert!(!arena.undo());
        assert_eq!(arena.snapshot(), before);
    }

    #[test]
    fn test_drag_clamps_to_canvas() {
        let mut arena = arena_with(&[Point::new(100.0, 100.0)]);
        let id = arena.create_shape();
        assert!(arena.drag_start(Point::new(125.0, 125.0)));

        arena.drag_update(Point::new(-400.0, 10_000.0));
        assert_eq!(position(&arena, id), Some(Point::new(0.0, 324.0)));

        arena.drag_update(Point::new(10_000.0, -400.0));
        assert_eq!(position(&arena, id), Some(Point::new(722.0, 0.0)));

        arena.drag_update(Point::new(300.0, 200.0));
        assert_eq!(position(&arena, id), Some(Point::new(275.0, 175.0)));
    }

    #[test]
    fn test_move_round_trip() {
        let mut arena = arena_with(&[Point::new(100.0, 100.0)]);
        let id = arena.create_shape();
        let before = position(&arena, id);

        assert!(arena.drag_start(Point::new(110.0, 110.0)));
        arena.drag_update(Point::new(400.0, 9_999.0));
        arena.drag_end();
        let dropped = Point::new(375.0, 324.0);
        assert_eq!(position(&arena, id), Some(dropped));
        assert_eq!(
            arena.history().current(),
            Some(&HistoryEvent::Move {
                shape_id: id,
                previous: Point::new(100.0, 100.0),
                new: dropped,
            })
        );

        arena.undo();
        assert_eq!(position(&arena, id), before);
        arena.redo();
        assert_eq!(position(&arena, id), Some(dropped));
    }

    #[test]
    fn test_zero_distance_drag_is_recorded() {
        let mut arena = arena_with(&[Point::new(100.0, 100.0)]);
        let id = arena.create_shape();
        arena.drag_start(Point::new(125.0, 125.0));
        arena.drag_end();
        assert_eq!(arena.history().len(), 2);
        assert_eq!(
            arena.history().current(),
            Some(&HistoryEvent::Move {
                shape_id: id,
                previous: Point::new(100.0, 100.0),
                new: Point::new(100.0, 100.0),
            })
        );
    }

    #[test]
    fn test_drag_on_empty_space() {
        let mut arena = arena_with(&[Point::new(0.0, 0.0)]);
        arena.create_shape();
        assert!(!arena.drag_start(Point::new(500.0, 300.0)));
        arena.drag_update(Point::new(10.0, 10.0));
        arena.drag_end();
        assert_eq!(arena.history().len(), 1);
    }

    #[test]
    fn test_reentrant_drag_flushes() {
        let mut arena = arena_with(&[Point::new(0.0, 0.0), Point::new(300.0, 200.0)]);
        let x = arena.create_shape();
        let y = arena.create_shape();

        arena.drag_start(Point::new(25.0, 25.0));
        arena.drag_update(Point::new(100.0, 100.0));
        assert_eq!(arena.history().len(), 2);

        assert!(arena.drag_start(Point::new(325.0, 225.0)));
        assert_eq!(arena.history().len(), 3);
        assert_eq!(
            arena.history().current(),
            Some(&HistoryEvent::Move {
                shape_id: x,
                previous: Point::new(0.0, 0.0),
                new: Point::new(75.0, 75.0),
            })
        );
        assert_eq!(arena.drag().target(), Some(y));
    }

    #[test]
    fn test_drag_topmost_shape() {
        let mut arena = arena_with(&[Point::new(0.0, 0.0), Point::new(20.0, 20.0)]);
        let _back = arena.create_shape();
        let front = arena.create_shape();
        arena.drag_start(Point::new(30.0, 30.0));
        assert_eq!(arena.drag().target(), Some(front));
    }

    #[test]
    fn test_drag_picks_by_circle_geometry() {
        let mut arena = arena_with(&[Point::new(40.0, 40.0), Point::new(0.0, 0.0)]);
        let back = arena.create_shape();
        let _front = arena.create_shape();

        assert!(!arena.drag_start(Point::new(2.0, 2.0)));
        assert!(arena.drag_start(Point::new(48.0, 48.0)));
        assert_eq!(arena.drag().target(), Some(back));
    }

    #[test]
    fn test_drag_with_custom_hit_test() {
        struct Always(ShapeId);
        impl HitTest for Always {
            fn resolve_topmost_shape_at(&self, _point: Point) -> Option<ShapeId> {
                Some(self.0)
            }
        }

        let mut arena = arena_with(&[Point::new(0.0, 0.0)]);
        let id = arena.create_shape();
        assert!(arena.drag_start_with(Point::new(700.0, 300.0), &Always(id)));
        arena.drag_update(Point::new(200.0, 200.0));
        arena.drag_end();
        assert_eq!(position(&arena, id), Some(Point::new(175.0, 175.0)));
    }

    #[test]
    fn test_resize_mid_drag() {
        let mut arena = arena_with(&[Point::new(0.0, 0.0)]);
        let id = arena.create_shape();
        arena.drag_start(Point::new(25.0, 25.0));
        arena.set_bounds(300.0, 300.0);
        arena.drag_update(Point::new(700.0, 700.0));
        assert_eq!(position(&arena, id), Some(Point::new(250.0, 250.0)));
    }

    #[test]
    fn test_undo_does_not_touch_drag() {
        let mut arena = arena_with(&[Point::new(0.0, 0.0)]);
        let id = arena.create_shape();
        arena.drag_start(Point::new(25.0, 25.0));
        arena.undo();
        assert_eq!(arena.drag().target(), Some(id));
        arena.drag_end();
        // The move lands after the undone create, discarding it
        assert_eq!(arena.history().len(), 1);
        assert!(matches!(arena.history().current(), Some(HistoryEvent::Move { .. })));
        // Nothing can bring the shape back, so it is released
        assert!(arena.registry().get(id).is_none());
        assert_eq!(arena.registry().stored(), 0);
        assert!(arena.shapes().next().is_none());

        // Undoing and redoing the orphaned move stays a no-op on the canvas
        assert!(arena.undo());
        assert!(arena.redo());
        assert!(arena.shapes().next().is_none());
    }

    #[test]
    fn test_drag_end_keeps_visible_shape() {
        let mut arena = arena_with(&[Point::new(0.0, 0.0)]);
        let id = arena.create_shape();
        arena.drag_start(Point::new(25.0, 25.0));
        arena.drag_end();
        assert!(arena.registry().is_visible(id));
        assert_eq!(arena.registry().stored(), 1);
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = ArenaConfig {
            history_limit: Some(2),
            ..ArenaConfig::default()
        };
        let mut arena = Arena::with_generator(&config, Scripted::new(&[]));
        let first = arena.create_shape();
        arena.create_shape();
        arena.create_shape();
        assert_eq!(arena.history().len(), 2);
        arena.undo();
        arena.undo();
        assert!(!arena.undo());
        // Oldest create fell off the log, so its shape stays
        assert_eq!(visible(&arena), vec![first]);
    }

    #[test]
    fn test_pointer_events() {
        let mut arena = arena_with(&[Point::new(100.0, 100.0)]);
        let id = arena.create_shape();

        arena.handle_pointer(PointerEvent::Down {
            position: Point::new(125.0, 125.0),
            button: MouseButton::Right,
        });
        assert!(!arena.drag().is_dragging());

        arena.handle_pointer(PointerEvent::Down {
            position: Point::new(125.0, 125.0),
            button: MouseButton::Left,
        });
        arena.handle_pointer(PointerEvent::Move {
            position: Point::new(225.0, 225.0),
        });
        arena.handle_pointer(PointerEvent::Up {
            position: Point::new(225.0, 225.0),
            button: MouseButton::Right,
        });
        assert!(arena.drag().is_dragging());

        arena.handle_pointer(PointerEvent::Up {
            position: Point::new(225.0, 225.0),
            button: MouseButton::Left,
        });
        assert!(!arena.drag().is_dragging());
        assert_eq!(position(&arena, id), Some(Point::new(200.0, 200.0)));
        assert_eq!(arena.history().len(), 2);
    }

    #[test]
    fn test_execute_commands() {
        let mut arena = arena_with(&[]);
        arena.execute(Command::CreateShape);
        assert_eq!(arena.shapes().count(), 1);
        arena.execute(Command::Undo);
        assert_eq!(arena.shapes().count(), 0);
        arena.execute(Command::Redo);
        assert_eq!(arena.shapes().count(), 1);
    }

    #[test]
    fn test_snapshot() {
        let mut arena = arena_with(&[Point::new(10.0, 20.0)]);
        let id = arena.create_shape();
        let snapshot = arena.snapshot();
        assert_eq!(snapshot.width, 772.0);
        assert_eq!(snapshot.shapes.len(), 1);
        assert_eq!(snapshot.shapes[0].id, id);
        assert_eq!(snapshot.shapes[0].position, Point::new(10.0, 20.0));
        assert_eq!(snapshot.shapes[0].size, 50.0);
        assert_eq!(snapshot.shapes[0].stroke, SerializableColor::new(12, 34, 56, 255));
        assert_eq!(snapshot.shapes[0].fill.a, 195);
        assert!(snapshot.has_undo);
        assert!(!snapshot.has_redo);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("has_undo"));
    }
}
