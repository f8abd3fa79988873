pub mod config;
pub mod decode;
pub mod id;
pub mod measure;
pub mod model;
pub mod store;

pub use config::{EditorConfig, TextDefaults, Viewport};
pub use decode::{DecodeError, Decoder, ImageDecoder, PsdDecoder};
pub use id::OverlayId;
pub use measure::{ApproxMeasure, TextMeasure};
pub use model::*;
pub use store::{Commit, OverlayStore};
