//! Off-screen outline capture and composite state.
//!
//! [`OutlineCompositor`] owns the custom highlight framebuffer's lifecycle
//! state and drives the strict per-frame protocol:
//!
//! 1. frame start -- begin the capture pass and run listeners,
//! 2. per-entity redraw into the capture buffer (recursion-guarded),
//! 3. composite bookkeeping once all entities are drawn,
//! 4. alpha-blended blit onto the main framebuffer,
//! 5. reallocation on resize.
//!
//! The GPU resources themselves live in [`crate::render`] (behind the
//! `renderer` feature); this type tracks ready/dirty/color/size and the
//! protocol ordering, which is what the error-containment and fail-soft
//! guarantees hang off.

use limn_core::color::Color4;
use limn_core::config::FeatureSnapshot;
use limn_core::entity::EntityView;
use limn_core::guard::RecursionGuard;
use limn_core::resolve::{resolve, HighlightStyle};

use crate::host::{CaptureFrame, CaptureListeners, DrawTarget, HostRenderer, OutlineStage};
use crate::{FrameError, InitError};

/// Default silhouette line width passed to the capture pass.
const DEFAULT_LINE_WIDTH: f32 = 2.0;

// ---------------------------------------------------------------------------
// CaptureScope
// ---------------------------------------------------------------------------

/// Scoped render-target substitution.
///
/// Binds `target` on creation and restores [`DrawTarget::Main`] on drop, so
/// the main framebuffer comes back even when the body bails out with an
/// error. Restore failures can only be logged from a destructor.
pub(crate) struct CaptureScope<'a> {
    host: &'a mut dyn HostRenderer,
}

impl<'a> CaptureScope<'a> {
    /// Bind `target` for writing and return the scope.
    pub(crate) fn bind(
        host: &'a mut dyn HostRenderer,
        target: DrawTarget,
    ) -> Result<Self, FrameError> {
        host.bind_target(target)?;
        Ok(Self { host })
    }

    /// The host, for draws inside the scope.
    pub(crate) fn host(&mut self) -> &mut dyn HostRenderer {
        self.host
    }
}

impl Drop for CaptureScope<'_> {
    fn drop(&mut self) {
        if let Err(error) = self.host.bind_target(DrawTarget::Main) {
            tracing::error!(error = %error, "failed to restore main render target");
        }
    }
}

// ---------------------------------------------------------------------------
// BlitParams
// ---------------------------------------------------------------------------

/// Parameters for one composite blit of the capture buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitParams {
    /// Accumulated shader time in seconds, for animated outline effects.
    pub elapsed: f32,
    /// Capture buffer dimensions the blit must use.
    pub size: (u32, u32),
}

// ---------------------------------------------------------------------------
// OutlineCompositor
// ---------------------------------------------------------------------------

/// Owner of the off-screen highlight framebuffer state.
///
/// Sole mutator of the ready/dirty flags; everything here runs on the
/// render thread in the host's fixed frame order.
#[derive(Debug)]
pub struct OutlineCompositor {
    /// One-time initialization succeeded.
    ready: bool,
    /// One-time initialization failed; permanent for the process.
    failed: bool,
    /// An outline was drawn this frame and awaits the composite blit.
    dirty: bool,
    /// Tint of the most recent capture redraw.
    color: Color4,
    /// Current capture buffer dimensions.
    size: (u32, u32),
    /// Resize waiting to be applied to the GPU buffer.
    pending_resize: Option<(u32, u32)>,
    /// Silhouette line width for the capture pass.
    line_width: f32,
    /// Accumulated tick-delta for time-based shader parameters.
    elapsed: f32,
}

impl OutlineCompositor {
    /// A compositor for a viewport of `width` x `height`. Not ready until
    /// [`load`](Self::load) succeeds.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            ready: false,
            failed: false,
            dirty: false,
            color: Color4::WHITE,
            size: (width, height),
            pending_resize: None,
            line_width: DEFAULT_LINE_WIDTH,
            elapsed: 0.0,
        }
    }

    /// Run the one-time shader/buffer initialization.
    ///
    /// On failure the outline feature is disabled for the rest of the
    /// process: the error is logged here and later calls are no-ops, even
    /// if the host retries the warm-up hook.
    pub fn load(&mut self, init: impl FnOnce() -> Result<(), InitError>) {
        if self.ready || self.failed {
            return;
        }
        match init() {
            Ok(()) => {
                self.ready = true;
                tracing::info!(
                    width = self.size.0,
                    height = self.size.1,
                    "outline capture resources loaded"
                );
            }
            Err(error) => {
                self.failed = true;
                tracing::error!(
                    error = %error,
                    "failed to load outline capture resources; outline highlights disabled"
                );
            }
        }
    }

    /// Frame-start hook: begin the capture pass and run external listeners.
    ///
    /// Skips everything when not ready (fail-soft). A failure mid-sequence
    /// is logged and abandons this frame's highlight pass; the next frame
    /// starts fresh.
    pub fn frame_start(
        &mut self,
        host: &mut dyn HostRenderer,
        listeners: &mut CaptureListeners,
        tick_delta: f32,
    ) {
        if !self.ready {
            return;
        }
        // Fresh frame: last frame's content is gone once the capture pass
        // clears, so the dirty flag must not leak across the boundary.
        self.dirty = false;
        if let Err(error) = self.begin_capture(host, listeners, tick_delta) {
            tracing::error!(error = %error, "failed to begin outline capture pass");
        }
    }

    fn begin_capture(
        &mut self,
        host: &mut dyn HostRenderer,
        listeners: &mut CaptureListeners,
        tick_delta: f32,
    ) -> Result<(), FrameError> {
        let mut scope = CaptureScope::bind(host, DrawTarget::HighlightCapture)?;
        let frame = CaptureFrame {
            stage: OutlineStage::Custom,
            tick_delta,
            line_width: self.line_width,
        };
        if listeners.dispatch(scope.host(), &frame) {
            self.dirty = true;
        }
        Ok(())
    }

    /// Per-entity hook, called before the host's normal draw of `entity`.
    ///
    /// When the entity resolves for the outline style, redraws just that
    /// entity into the capture buffer with the resolved tint. The guard
    /// check comes first: if a capture redraw is already in flight this is
    /// the nested invocation, and it must return with zero side effects.
    pub fn entity_pre_draw(
        &mut self,
        host: &mut dyn HostRenderer,
        guard: &RecursionGuard,
        entity: &EntityView,
        snapshot: &FeatureSnapshot,
    ) {
        if guard.is_active() || !self.ready {
            return;
        }
        let Some(request) = resolve(entity, snapshot, HighlightStyle::Outline) else {
            return;
        };
        let Some(token) = guard.try_enter() else {
            return;
        };

        self.color = request.color;
        self.dirty = true;
        host.set_highlight_tint(request.color);

        let result = (|| -> Result<(), FrameError> {
            let mut scope = CaptureScope::bind(host, DrawTarget::HighlightCapture)?;
            scope.host().draw_entity(entity)
        })();
        drop(token);

        if let Err(error) = result {
            tracing::warn!(
                entity = entity.id,
                error = %error,
                "outline capture redraw failed for entity"
            );
        }
    }

    /// Composite-point hook: end-of-pass bookkeeping once all entity draws
    /// are finished. Advances the time parameter animated shaders read.
    pub fn composite(&mut self, tick_delta: f32) {
        if !self.ready {
            return;
        }
        self.elapsed += tick_delta;
    }

    /// Draw-to-screen hook: if the buffer is ready and holds content,
    /// consume the dirty flag and return the blit parameters. `None` means
    /// no blit this frame.
    pub fn take_blit(&mut self) -> Option<BlitParams> {
        if !(self.ready && self.dirty) {
            return None;
        }
        self.dirty = false;
        Some(BlitParams {
            elapsed: self.elapsed,
            size: self.size,
        })
    }

    /// Resize hook: record the new viewport size. The stale-sized GPU
    /// buffer must be reallocated (via [`take_pending_resize`]) before the
    /// next capture pass.
    ///
    /// [`take_pending_resize`]: Self::take_pending_resize
    pub fn resized(&mut self, width: u32, height: u32) {
        if (width, height) == self.size {
            return;
        }
        self.size = (width, height);
        self.pending_resize = Some((width, height));
        tracing::debug!(width, height, "outline capture buffer resize queued");
    }

    /// Consume a queued resize, if any. The GPU layer calls this before
    /// each capture pass and reallocates when it returns `Some`.
    pub fn take_pending_resize(&mut self) -> Option<(u32, u32)> {
        self.pending_resize.take()
    }

    /// True once one-time initialization has succeeded.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// True while captured content awaits the composite blit.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Tint of the most recent capture redraw.
    pub fn current_color(&self) -> Color4 {
        self.color
    }

    /// Current capture buffer dimensions.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Silhouette line width for the capture pass.
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Override the silhouette line width.
    pub fn set_line_width(&mut self, line_width: f32) {
        self.line_width = line_width;
    }
}
