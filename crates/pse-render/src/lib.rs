pub mod hit;
pub mod paint;
pub mod scene;

pub use hit::{handle_rect, hit_handle, hit_test};
pub use paint::paint_scene;
pub use scene::{HandleFrame, NodeKey, PaintKind, PaintNode, build_scene};
