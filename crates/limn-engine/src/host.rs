//! The host renderer contract.
//!
//! The host's entity traversal, draw-call mechanics, and windowing are
//! external collaborators; this module pins down the narrow interface the
//! highlight pipeline consumes from them. Modeling the host as a trait
//! (instead of global render state) keeps the frame protocol testable with
//! a recording mock and keeps all shared mutable state explicit.

use limn_core::color::Color4;
use limn_core::entity::EntityView;

use crate::FrameError;

// ---------------------------------------------------------------------------
// Render-state value types
// ---------------------------------------------------------------------------

/// Which framebuffer entity draws currently write into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTarget {
    /// The host's main scene framebuffer.
    Main,
    /// The pipeline's off-screen highlight capture buffer.
    HighlightCapture,
    /// The host's own built-in glow/outline framebuffer.
    HostGlow,
}

/// A depth-test bias override, in polygon-offset terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBias {
    /// Offset scaled by the polygon's depth slope.
    pub slope_scale: f32,
    /// Constant offset in minimum resolvable depth units.
    pub units: f32,
}

/// Which capture point a listener is being invoked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineStage {
    /// The pipeline's own capture buffer, at frame start.
    Custom,
    /// The host's built-in glow buffer, just before the host draws it.
    HostGlow,
}

/// Per-invocation context handed to capture listeners.
#[derive(Debug, Clone, Copy)]
pub struct CaptureFrame {
    /// The capture point being populated.
    pub stage: OutlineStage,
    /// Partial-tick interpolation factor for this frame.
    pub tick_delta: f32,
    /// Silhouette line width configured for this capture pass.
    pub line_width: f32,
}

// ---------------------------------------------------------------------------
// HostRenderer
// ---------------------------------------------------------------------------

/// Services the pipeline consumes from the host render loop.
///
/// All methods are called from the render thread, inside the frame that
/// triggered them. Implementations must not call back into the pipeline
/// except through the host's normal entity-draw path (which is exactly the
/// re-entry the [`RecursionGuard`](limn_core::guard::RecursionGuard)
/// exists for).
pub trait HostRenderer {
    /// Bind `target` as the active write target for subsequent draws.
    fn bind_target(&mut self, target: DrawTarget) -> Result<(), FrameError>;

    /// Draw one entity through the host's normal entity-draw routine into
    /// the currently bound target. The pipeline invokes this recursively
    /// from inside the host's own entity loop.
    fn draw_entity(&mut self, entity: &EntityView) -> Result<(), FrameError>;

    /// Set the flat fill color the host uses when drawing silhouettes into
    /// the capture buffer.
    fn set_highlight_tint(&mut self, color: Color4);

    /// The host's own answer to "does this entity get a glow outline".
    fn has_glow(&self, entity: &EntityView) -> bool;

    /// The host's own team/glow color for this entity.
    fn glow_color(&self, entity: &EntityView) -> Color4;

    /// Apply a depth-bias override for the next entity draw.
    fn set_depth_bias(&mut self, bias: DepthBias);

    /// Restore the default depth state.
    fn clear_depth_bias(&mut self);

    /// Whether the host's built-in glow pass can run this frame.
    fn glow_pass_available(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Capture listeners
// ---------------------------------------------------------------------------

/// A callback that may draw into a bound capture target.
///
/// Returns whether it actually drew content, so the compositor knows the
/// buffer is dirty and worth blitting.
pub type CaptureListenerFn =
    Box<dyn FnMut(&mut dyn HostRenderer, &CaptureFrame) -> Result<bool, FrameError>>;

/// Registry of external code invoked while a capture target is bound.
///
/// This is the seam that lets other features (shape overlays, tracers)
/// draw into the highlight buffers without owning them. Listener failures
/// are contained per listener: logged, skipped, the rest still run.
#[derive(Default)]
pub struct CaptureListeners {
    listeners: Vec<(String, CaptureListenerFn)>,
}

impl CaptureListeners {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener under a name used only for logging.
    pub fn register(&mut self, name: impl Into<String>, listener: CaptureListenerFn) {
        self.listeners.push((name.into(), listener));
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invoke every listener for `frame`, returning whether any reported
    /// drawn content. Errors are logged and do not stop the dispatch.
    pub fn dispatch(&mut self, host: &mut dyn HostRenderer, frame: &CaptureFrame) -> bool {
        let mut drew = false;
        for (name, listener) in &mut self.listeners {
            match listener(host, frame) {
                Ok(listener_drew) => drew |= listener_drew,
                Err(error) => {
                    tracing::warn!(
                        listener = name.as_str(),
                        stage = ?frame.stage,
                        error = %error,
                        "capture listener failed; continuing with remaining listeners"
                    );
                }
            }
        }
        drew
    }
}

impl std::fmt::Debug for CaptureListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}
