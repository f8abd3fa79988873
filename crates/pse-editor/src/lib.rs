pub mod editor;
pub mod input;
pub mod panel;
pub mod shortcuts;
pub mod tools;
pub mod transform;

pub use editor::{Editor, EditorAction};
pub use input::{InputEvent, Modifiers};
pub use panel::{PanelError, PanelView};
pub use transform::TransformController;
