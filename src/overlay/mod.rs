pub mod palette;
pub mod render;
pub mod scene;

pub use render::{render_scene, OverlayInput};
pub use scene::{Color, Layer, LayerKind, Primitive, Scene};
