//! Inkboard Core Library
//!
//! Platform-agnostic data structures and interaction logic for the Inkboard
//! infinite-canvas whiteboard.

pub mod canvas;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod scene;
pub mod scheduler;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod tools;
pub mod viewport;

pub use canvas::{Canvas, ERASER_RADIUS, LoadNotice};
pub use history::History;
pub use input::{Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use interaction::{Action, Command, Engine, InteractionState, MIN_POINT_DISTANCE, TextPrompt};
pub use scene::Scene;
pub use scheduler::{FrameRequest, FrameScheduler};
pub use selection::{DragState, HIT_RADIUS, SELECTION_PADDING, Selection};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeStyle, ShapeTrait};
pub use storage::{SceneRecord, Storage, StorageError, StorageResult};
pub use tools::{ToolKind, ToolSettings};
pub use viewport::Viewport;
