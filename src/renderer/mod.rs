//! WebGPU rendering module
//!
//! Shapes are built on the CPU in playfield pixels from a
//! [`crate::sim::RenderSnapshot`] and drawn as one flat-colored triangle list.
//! Target labels are laid out here but drawn by the page.

pub mod labels;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use labels::wrap_label;
pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
