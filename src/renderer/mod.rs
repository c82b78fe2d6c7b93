//! WebGPU rendering module
//!
//! Scenes are built as flat-colored triangle lists in playfield units and
//! mapped to clip space on upload.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
