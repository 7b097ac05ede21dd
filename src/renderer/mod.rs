//! WebGPU rendering module
//!
//! Sprites are drawn as flat-colored triangle lists built fresh each frame
//! from the simulation state.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::{Palette, Vertex};
