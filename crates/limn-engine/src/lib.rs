//! Limn Engine -- host-renderer integration for the highlight pipeline.
//!
//! This crate wires the pure resolution model from [`limn_core`] into a
//! host renderer's frame loop. The host's call sites are a fixed ABI
//! boundary: the pipeline exposes one hook per injection point
//! (shader warm-up, frame start, per-entity pre/post draw, composite,
//! glow-query overrides, framebuffer blit, resize) and guarantees that no
//! failure inside a hook ever escapes into the host's frame loop.
//!
//! The concrete wgpu off-screen capture buffer lives behind the `renderer`
//! feature; everything else is GPU-free and drives the host through the
//! [`HostRenderer`](host::HostRenderer) trait, so the full frame protocol
//! is testable headlessly.
//!
//! # Quick Start
//!
//! ```
//! use limn_core::prelude::*;
//! use limn_engine::pipeline::HighlightPipeline;
//!
//! let mut pipeline = HighlightPipeline::new(1280, 720);
//! pipeline.load_resources(|| Ok(())); // host provides the real init
//!
//! let mut snapshot = FeatureSnapshot::default();
//! snapshot.item_highlight.styles.outline = true;
//! pipeline.publish_snapshot(snapshot);
//! assert!(pipeline.outline().is_ready());
//! ```

#![deny(unsafe_code)]

pub mod chams;
pub mod glow;
pub mod host;
pub mod outline;
pub mod pipeline;
pub mod render;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// One-time resource initialization failures.
///
/// Any of these permanently disables the outline feature for the process
/// lifetime (fail-soft): the error is logged once and every later hook
/// becomes a no-op. Nothing is surfaced to the user as a crash.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The highlight shader failed to compile or validate.
    #[error("highlight shader failed to load: {details}")]
    ShaderLoad { details: String },

    /// The off-screen capture buffer could not be allocated.
    #[error("capture buffer allocation failed at {width}x{height}: {details}")]
    BufferAllocation {
        width: u32,
        height: u32,
        details: String,
    },
}

/// Failures inside one frame's capture/composite steps.
///
/// Contained at the hook that observed them: logged, the frame's highlight
/// pass is abandoned, and the next frame gets a fresh attempt.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The host's per-entity draw routine reported a failure.
    #[error("host entity draw failed: {details}")]
    HostDraw { details: String },

    /// A render target could not be bound for writing.
    #[error("render target unavailable: {details}")]
    TargetLost { details: String },

    /// A capture listener reported a failure.
    #[error("capture listener failed: {details}")]
    Listener { details: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for host integrations.
pub mod prelude {
    pub use crate::chams::{ChamsPass, THROUGH_WALL_BIAS};
    pub use crate::glow::GlowCompositor;
    pub use crate::host::{
        CaptureFrame, CaptureListeners, DepthBias, DrawTarget, HostRenderer, OutlineStage,
    };
    pub use crate::outline::{BlitParams, OutlineCompositor};
    pub use crate::pipeline::HighlightPipeline;
    pub use crate::{FrameError, InitError};
}
