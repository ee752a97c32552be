//! Shape registry: the ordered set of shapes visible on the arena.

use crate::shapes::{Circle, ShapeId};
use kurbo::Point;
use std::collections::HashMap;

/// Owns every shape the arena has created.
///
/// Shapes hidden by undoing their creation stay in the registry so a redo can
/// bring them back; only `z_order` decides what is visible. Insertion order is
/// draw order (back to front).
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: HashMap<ShapeId, Circle>,
    z_order: Vec<ShapeId>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new shape on top of all others.
    pub fn add(&mut self, circle: Circle) -> ShapeId {
        let id = circle.id();
        self.shapes.insert(id, circle);
        if !self.z_order.contains(&id) {
            self.z_order.push(id);
        }
        id
    }

    /// Make a known shape visible again, appending it on top if absent.
    /// Returns false if the shape is unknown.
    pub fn attach(&mut self, id: ShapeId) -> bool {
        if !self.shapes.contains_key(&id) {
            return false;
        }
        if !self.z_order.contains(&id) {
            self.z_order.push(id);
        }
        true
    }

    /// Hide a shape without dropping its data.
    /// Returns true if the shape was visible.
    pub fn detach(&mut self, id: ShapeId) -> bool {
        let before = self.z_order.len();
        self.z_order.retain(|&shape_id| shape_id != id);
        self.z_order.len() != before
    }

    /// Drop a shape entirely. Used once no history event can bring it back.
    pub fn forget(&mut self, id: ShapeId) -> Option<Circle> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    /// Get a shape by ID, visible or not.
    pub fn get(&self, id: ShapeId) -> Option<&Circle> {
        self.shapes.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Circle> {
        self.shapes.get_mut(&id)
    }

    /// Move a shape's top-left corner. Returns false if the shape is unknown.
    pub fn set_position(&mut self, id: ShapeId, position: Point) -> bool {
        match self.shapes.get_mut(&id) {
            Some(circle) => {
                circle.position = position;
                true
            }
            None => false,
        }
    }

    pub fn is_visible(&self, id: ShapeId) -> bool {
        self.z_order.contains(&id)
    }

    /// Visible shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Circle> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Visible shape IDs in z-order (back to front).
    pub fn z_order(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Topmost visible shape covering the point.
    pub fn topmost_at(&self, point: Point) -> Option<ShapeId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.shapes
                .get(id)
                .is_some_and(|circle| circle.hit_test(point))
        })
    }

    /// Number of visible shapes.
    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// Number of shapes held, including hidden ones.
    pub fn stored(&self) -> usize {
        self.shapes.len()
    }
}
