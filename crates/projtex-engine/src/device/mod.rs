//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - owning the depth and multisample attachments that follow the surface size
//! - acquiring frames and providing encoders/views for rendering

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::{FrameAttachments, GpuFrame};
pub use gpu::Gpu;
pub use init::GpuInit;
