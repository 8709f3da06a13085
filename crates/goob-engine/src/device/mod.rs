//! GPU device + surface management.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue for a window
//! - configures the surface and reconfigures it on resize
//! - acquires frames and maps surface errors to recovery actions

mod frame;
mod gpu;
mod init;

pub use frame::{GpuFrame, SurfaceErrorAction};
pub use gpu::Gpu;
pub use init::GpuInit;
