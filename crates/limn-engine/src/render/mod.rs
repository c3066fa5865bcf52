//! Concrete wgpu capture buffer for the outline pass.
//!
//! This module is feature-gated behind `renderer`. When the feature is not
//! enabled, this module compiles to nothing and the engine stays GPU-free:
//! the frame protocol still runs against any [`HostRenderer`]
//! implementation, it just has no buffer of its own to blit.
//!
//! [`HostRenderer`]: crate::host::HostRenderer

#[cfg(feature = "renderer")]
pub mod capture;

#[cfg(feature = "renderer")]
pub use capture::CaptureBuffer;
