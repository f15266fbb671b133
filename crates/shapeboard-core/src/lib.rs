//! Shapeboard Core Library
//!
//! Platform-agnostic model for the Shapeboard canvas editor: shape records,
//! live nodes, the transform handle, the scene container and the text panel.

pub mod component;
pub mod input;
pub mod node;
pub mod scene;
pub mod seed;
pub mod selection;
pub mod shapes;
pub mod text_panel;

pub use component::{ShapeComponent, TransformerView};
pub use input::{Click, InputState, Modifiers, MouseButton, PointerEvent};
pub use node::ShapeNode;
pub use scene::{Scene, SceneError, SceneEvent};
pub use selection::{BoundBox, Handle, HandleKind, ManipulationState, MIN_SIZE};
pub use shapes::{Shape, ShapeId, ShapeKind, ShapeStyle, ShapeTrait, SerializableColor};
pub use text_panel::TextEditPanel;
