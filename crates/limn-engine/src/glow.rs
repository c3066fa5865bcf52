//! Glow-pass overrides and the forced-outline latch.
//!
//! The host already owns a full glow pass (per-entity outline buffer, team
//! colors, the final draw of that buffer). Instead of duplicating it, this
//! module answers the host's two queries (`has_glow`, `glow_color`) with
//! the resolver's verdict when a feature claims the entity, and falls back
//! to the host's own answer otherwise.

use limn_core::color::Color4;
use limn_core::config::FeatureSnapshot;
use limn_core::entity::EntityView;
use limn_core::resolve::{resolve, HighlightStyle};

use crate::host::{CaptureFrame, CaptureListeners, DrawTarget, HostRenderer, OutlineStage};
use crate::outline::CaptureScope;
use crate::FrameError;

/// Overrides for the host's built-in glow pass.
#[derive(Debug, Default)]
pub struct GlowCompositor {
    /// Set when any override or listener put content into the glow buffer
    /// this frame; forces the host to draw its glow pass even if none of
    /// its own entities glow. Consumed once per frame.
    forced_outline: bool,
}

impl GlowCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the host's "does this entity glow" query.
    ///
    /// A resolver match for the glow style wins over the host's own answer
    /// and latches the forced-outline flag, so the glow buffer gets drawn
    /// even when the host itself found nothing glowing.
    pub fn entity_has_glow(
        &mut self,
        host: &dyn HostRenderer,
        entity: &EntityView,
        snapshot: &FeatureSnapshot,
    ) -> bool {
        if resolve(entity, snapshot, HighlightStyle::Glow).is_some() {
            self.forced_outline = true;
            return true;
        }
        host.has_glow(entity)
    }

    /// Answer the host's "what color does this entity glow" query.
    ///
    /// Must agree with [`entity_has_glow`](Self::entity_has_glow): an
    /// entity we claimed gets the resolved color, everything else keeps
    /// the host's team color.
    pub fn entity_glow_color(
        &self,
        host: &dyn HostRenderer,
        entity: &EntityView,
        snapshot: &FeatureSnapshot,
    ) -> Color4 {
        match resolve(entity, snapshot, HighlightStyle::Glow) {
            Some(request) => request.color,
            None => host.glow_color(entity),
        }
    }

    /// Hook just before the host draws its glow buffer to screen: give
    /// listeners a chance to draw extra content into that buffer.
    ///
    /// Skipped entirely when the host reports the glow pass unavailable
    /// this frame. Failures are contained here.
    pub fn pre_draw(
        &mut self,
        host: &mut dyn HostRenderer,
        listeners: &mut CaptureListeners,
        tick_delta: f32,
        line_width: f32,
    ) {
        if !host.glow_pass_available() {
            return;
        }
        if let Err(error) = self.dispatch_into_glow(host, listeners, tick_delta, line_width) {
            tracing::error!(error = %error, "failed to populate host glow buffer");
        }
    }

    fn dispatch_into_glow(
        &mut self,
        host: &mut dyn HostRenderer,
        listeners: &mut CaptureListeners,
        tick_delta: f32,
        line_width: f32,
    ) -> Result<(), FrameError> {
        let mut scope = CaptureScope::bind(host, DrawTarget::HostGlow)?;
        let frame = CaptureFrame {
            stage: OutlineStage::HostGlow,
            tick_delta,
            line_width,
        };
        if listeners.dispatch(scope.host(), &frame) {
            self.forced_outline = true;
        }
        Ok(())
    }

    /// Consume the forced-outline latch.
    ///
    /// The host calls this where it decides whether to draw its glow
    /// buffer; `host_default` is what the host would have decided alone.
    /// The latch clears on read, so one frame's forcing never bleeds into
    /// the next.
    pub fn take_forced_outline(&mut self, host_default: bool) -> bool {
        if self.forced_outline {
            self.forced_outline = false;
            return true;
        }
        host_default
    }

    /// True while the latch is set (test visibility).
    pub fn is_forcing_outline(&self) -> bool {
        self.forced_outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_outline_latch_is_consume_once() {
        let mut glow = GlowCompositor::new();
        glow.forced_outline = true;
        assert!(glow.take_forced_outline(false));
        assert!(
            !glow.take_forced_outline(false),
            "latch must clear after one read"
        );
    }

    #[test]
    fn unset_latch_defers_to_host_default() {
        let mut glow = GlowCompositor::new();
        assert!(glow.take_forced_outline(true));
        assert!(!glow.take_forced_outline(false));
    }
}
