//! WebGPU rendering module
//!
//! Shapes are tessellated on the CPU each frame and drawn as one flat-colored
//! triangle list.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::{Vertex, colors};
