//! Headless demonstration of the highlight frame protocol.
//!
//! Drives a [`HighlightPipeline`] through several frames against a mock
//! host renderer that logs every call, showing the full hook order: warm
//! up, frame start, per-entity pre/post draw, glow queries, composite,
//! and the final blit decision.
//!
//! Run with: `cargo run -p limn-engine --example highlight_demo`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use limn_core::prelude::*;
use limn_engine::prelude::*;

/// A host that records render-state changes to the log instead of a GPU.
struct LoggingHost {
    bound: DrawTarget,
}

impl LoggingHost {
    fn new() -> Self {
        Self {
            bound: DrawTarget::Main,
        }
    }
}

impl HostRenderer for LoggingHost {
    fn bind_target(&mut self, target: DrawTarget) -> Result<(), FrameError> {
        tracing::info!(target = ?target, "bind render target");
        self.bound = target;
        Ok(())
    }

    fn draw_entity(&mut self, entity: &EntityView) -> Result<(), FrameError> {
        tracing::info!(entity = entity.id, target = ?self.bound, "draw entity");
        Ok(())
    }

    fn set_highlight_tint(&mut self, color: Color4) {
        tracing::info!(argb = %format_args!("{:#010x}", color.to_argb()), "set tint");
    }

    fn has_glow(&self, _entity: &EntityView) -> bool {
        false
    }

    fn glow_color(&self, _entity: &EntityView) -> Color4 {
        Color4::WHITE
    }

    fn set_depth_bias(&mut self, bias: DepthBias) {
        tracing::info!(units = bias.units, "depth bias engaged");
    }

    fn clear_depth_bias(&mut self) {
        tracing::info!("depth bias cleared");
    }
}

fn demo_snapshot() -> FeatureSnapshot {
    let mut snapshot = FeatureSnapshot::default();
    snapshot.entity_highlight.styles.outline = true;
    snapshot.item_highlight.styles.glow = true;
    snapshot.fuse_timer.enabled = true;
    snapshot.fuse_timer.highlight.outline = true;
    snapshot.storage_highlight.styles.chams = true;
    snapshot
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut host = LoggingHost::new();
    let mut pipeline = HighlightPipeline::new(1280, 720);

    pipeline.load_resources(|| Ok(()));
    pipeline.publish_snapshot(demo_snapshot());

    pipeline.add_capture_listener(
        "demo_overlay",
        Box::new(|_host, frame| {
            tracing::info!(stage = ?frame.stage, "overlay listener invoked");
            Ok(false)
        }),
    );

    // One frame's worth of candidate entities.
    let entities = [
        EntityView::living(1, Hostility::Hostile),
        EntityView::item(2),
        EntityView::explosive(3, 40),
        EntityView::block(4, Some(StorageKind::Chest)),
    ];

    for frame in 0..3u32 {
        let tick_delta = 0.016;
        tracing::info!(frame, "frame begins");

        pipeline.frame_start(&mut host, tick_delta);

        for entity in &entities {
            pipeline.entity_pre_draw(&mut host, entity);
            host.draw_entity(entity)?;
            pipeline.entity_post_draw(&mut host);

            let glows = pipeline.entity_has_glow(&host, entity);
            if glows {
                let color = pipeline.entity_glow_color(&host, entity);
                tracing::info!(
                    entity = entity.id,
                    argb = %format_args!("{:#010x}", color.to_argb()),
                    "glow override"
                );
            }
        }

        pipeline.composite(&mut host, tick_delta);

        let draw_glow_buffer = pipeline.take_forced_outline(false);
        tracing::info!(draw_glow_buffer, "glow buffer decision");

        match pipeline.take_blit() {
            Some(params) => tracing::info!(
                elapsed = params.elapsed,
                width = params.size.0,
                height = params.size.1,
                "composite blit"
            ),
            None => tracing::info!("nothing to blit"),
        }
    }

    // Viewport resize queues a capture buffer reallocation.
    pipeline.resized(1920, 1080);
    if let Some((width, height)) = pipeline.take_pending_resize() {
        tracing::info!(width, height, "capture buffer reallocated");
    }

    Ok(())
}
