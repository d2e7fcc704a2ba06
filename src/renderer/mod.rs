//! WebGPU rendering module
//!
//! Sprites are batched into a flat-colored triangle list in playfield
//! pixels, then mapped to NDC and drawn in a single pass.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{CanvasLayout, RenderState, pixel_to_ndc};
pub use shapes::SpriteBatch;
pub use vertex::{Vertex, colors};
