//! Circle Arena Core Library
//!
//! Platform-agnostic shape registry, undo/redo history and drag handling
//! for the Circle Arena surface.

pub mod arena;
pub mod config;
pub mod drag;
pub mod history;
pub mod input;
pub mod random;
pub mod registry;
pub mod shapes;

pub use arena::{Arena, ArenaSnapshot, ShapeSnapshot};
pub use config::{ArenaConfig, ConfigError, ConfigResult};
pub use drag::{DragSession, DragStart, DragState, HitTest, MoveRecord, clamp_to_canvas};
pub use history::{History, HistoryEvent};
pub use input::{Command, MouseButton, PointerEvent, Shortcut, ShortcutRegistry};
pub use random::{Generator, RandomGenerator};
pub use registry::ShapeRegistry;
pub use shapes::{Circle, SerializableColor, ShapeId};
