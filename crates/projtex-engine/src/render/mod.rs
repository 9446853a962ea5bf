//! GPU rendering subsystem.
//!
//! Helpers that turn CPU-side data (meshes, WGSL sources, images) into wgpu
//! resources, plus the lit/projective-texture scene pipeline.
//!
//! Convention:
//! - one vertex buffer per attribute: position (0), normal (1), texcoord (2)
//! - camera matrices arrive already remapped to wgpu's `[0, 1]` depth range

mod ctx;
pub mod mesh_buffers;
pub mod pipeline;
pub mod shader;
pub mod texture;

pub use ctx::RenderCtx;
pub use mesh_buffers::GpuMesh;
pub use pipeline::{DrawBindings, DrawParams, Light, Material, ScenePipeline, SceneUniforms};
pub use shader::{check_interface, ShaderError, ShaderSource, ShaderStage};
pub use texture::{Texture2d, TextureImage};
