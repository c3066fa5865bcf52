//! The pipeline facade.
//!
//! [`HighlightPipeline`] bundles the outline, glow, and chams passes with
//! the recursion guard, listener registry, and current feature snapshot,
//! and exposes one method per host injection point. The host calls these
//! in its fixed frame order:
//!
//! 1. [`load_resources`](HighlightPipeline::load_resources) once at warm-up,
//! 2. [`frame_start`](HighlightPipeline::frame_start),
//! 3. [`entity_pre_draw`](HighlightPipeline::entity_pre_draw) /
//!    [`entity_post_draw`](HighlightPipeline::entity_post_draw) around each
//!    entity draw,
//! 4. glow queries ([`entity_has_glow`](HighlightPipeline::entity_has_glow),
//!    [`entity_glow_color`](HighlightPipeline::entity_glow_color)) wherever
//!    the host evaluates its glow pass,
//! 5. [`composite`](HighlightPipeline::composite) after all entities,
//! 6. [`take_blit`](HighlightPipeline::take_blit) at the draw-to-screen
//!    point,
//! 7. [`resized`](HighlightPipeline::resized) on viewport changes.
//!
//! No method here returns an error: every failure is contained and logged
//! inside the hook that observed it.

use limn_core::color::Color4;
use limn_core::config::FeatureSnapshot;
use limn_core::entity::EntityView;
use limn_core::guard::RecursionGuard;

use crate::chams::ChamsPass;
use crate::glow::GlowCompositor;
use crate::host::{CaptureListenerFn, CaptureListeners, HostRenderer};
use crate::outline::{BlitParams, OutlineCompositor};
use crate::InitError;

/// All highlight passes behind the host's injection points.
#[derive(Debug)]
pub struct HighlightPipeline {
    outline: OutlineCompositor,
    glow: GlowCompositor,
    chams: ChamsPass,
    guard: RecursionGuard,
    listeners: CaptureListeners,
    snapshot: FeatureSnapshot,
}

impl HighlightPipeline {
    /// A pipeline for a viewport of `width` x `height`, with every feature
    /// off until a snapshot is published.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            outline: OutlineCompositor::new(width, height),
            glow: GlowCompositor::new(),
            chams: ChamsPass::new(),
            guard: RecursionGuard::new(),
            listeners: CaptureListeners::new(),
            snapshot: FeatureSnapshot::default(),
        }
    }

    /// Replace the feature snapshot read by all subsequent hooks.
    ///
    /// Published between frames by the settings layer; hooks never observe
    /// a half-updated configuration.
    pub fn publish_snapshot(&mut self, snapshot: FeatureSnapshot) {
        self.snapshot = snapshot;
    }

    /// Register an external capture listener (see
    /// [`CaptureListeners`](crate::host::CaptureListeners)).
    pub fn add_capture_listener(&mut self, name: impl Into<String>, listener: CaptureListenerFn) {
        self.listeners.register(name, listener);
    }

    /// Warm-up hook: run one-time shader and buffer initialization.
    /// Failure permanently disables the outline feature; see
    /// [`OutlineCompositor::load`].
    pub fn load_resources(&mut self, init: impl FnOnce() -> Result<(), InitError>) {
        self.outline.load(init);
    }

    /// Frame-start hook.
    pub fn frame_start(&mut self, host: &mut dyn HostRenderer, tick_delta: f32) {
        debug_assert!(
            !self.guard.is_active(),
            "capture redraw still in flight at frame start"
        );
        self.outline
            .frame_start(host, &mut self.listeners, tick_delta);
    }

    /// Pre-draw hook for one entity: outline capture redraw, then the
    /// chams bracket. Runs before the host's normal draw of `entity`.
    pub fn entity_pre_draw(&mut self, host: &mut dyn HostRenderer, entity: &EntityView) {
        self.outline
            .entity_pre_draw(host, &self.guard, entity, &self.snapshot);
        self.chams.begin(host, entity, &self.snapshot);
    }

    /// Post-draw hook for one entity: closes the chams bracket.
    pub fn entity_post_draw(&mut self, host: &mut dyn HostRenderer) {
        self.chams.end(host);
    }

    /// Glow query override; see [`GlowCompositor::entity_has_glow`].
    pub fn entity_has_glow(&mut self, host: &dyn HostRenderer, entity: &EntityView) -> bool {
        self.glow.entity_has_glow(host, entity, &self.snapshot)
    }

    /// Glow color override; see [`GlowCompositor::entity_glow_color`].
    pub fn entity_glow_color(&self, host: &dyn HostRenderer, entity: &EntityView) -> Color4 {
        self.glow.entity_glow_color(host, entity, &self.snapshot)
    }

    /// Whether the host should draw its glow buffer this frame, given what
    /// the host decided on its own. Consume-once; see
    /// [`GlowCompositor::take_forced_outline`].
    pub fn take_forced_outline(&mut self, host_default: bool) -> bool {
        self.glow.take_forced_outline(host_default)
    }

    /// Composite hook, after all entity draws: populates the host's glow
    /// buffer via listeners, then advances outline shader time.
    pub fn composite(&mut self, host: &mut dyn HostRenderer, tick_delta: f32) {
        self.glow.pre_draw(
            host,
            &mut self.listeners,
            tick_delta,
            self.outline.line_width(),
        );
        self.outline.composite(tick_delta);
    }

    /// Draw-to-screen hook: blit parameters when the capture buffer has
    /// content this frame.
    pub fn take_blit(&mut self) -> Option<BlitParams> {
        self.outline.take_blit()
    }

    /// Consume a queued capture-buffer reallocation.
    pub fn take_pending_resize(&mut self) -> Option<(u32, u32)> {
        self.outline.take_pending_resize()
    }

    /// Resize hook.
    pub fn resized(&mut self, width: u32, height: u32) {
        self.outline.resized(width, height);
    }

    /// Override the silhouette line width handed to capture passes.
    pub fn set_line_width(&mut self, line_width: f32) {
        self.outline.set_line_width(line_width);
    }

    /// The outline compositor's state.
    pub fn outline(&self) -> &OutlineCompositor {
        &self.outline
    }

    /// The recursion guard.
    pub fn guard(&self) -> &RecursionGuard {
        &self.guard
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> &FeatureSnapshot {
        &self.snapshot
    }
}
