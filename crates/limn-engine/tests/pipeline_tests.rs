//! Integration tests for the full frame protocol.
//!
//! Drives [`HighlightPipeline`] with a recording mock host and asserts the
//! exact call sequences the hooks produce: target binds always restored,
//! capture redraws recursion-guarded, failures contained inside the hook
//! that saw them.

use limn_core::prelude::*;
use limn_engine::prelude::*;

// ---------------------------------------------------------------------------
// Recording mock host
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum HostCall {
    Bind(DrawTarget),
    Draw(u64),
    Tint(Color4),
    SetBias,
    ClearBias,
}

#[derive(Default)]
struct RecordingHost {
    calls: Vec<HostCall>,
    /// Targets whose bind attempts should fail.
    fail_bind: Option<DrawTarget>,
    /// Entity ids whose draws should fail.
    fail_draw: Option<u64>,
    glow_available: bool,
}

impl RecordingHost {
    fn new() -> Self {
        Self {
            glow_available: true,
            ..Self::default()
        }
    }
}

impl HostRenderer for RecordingHost {
    fn bind_target(&mut self, target: DrawTarget) -> Result<(), FrameError> {
        if self.fail_bind == Some(target) {
            return Err(FrameError::TargetLost {
                details: format!("{target:?} unavailable"),
            });
        }
        self.calls.push(HostCall::Bind(target));
        Ok(())
    }

    fn draw_entity(&mut self, entity: &EntityView) -> Result<(), FrameError> {
        if self.fail_draw == Some(entity.id) {
            return Err(FrameError::HostDraw {
                details: format!("entity {} draw failed", entity.id),
            });
        }
        self.calls.push(HostCall::Draw(entity.id));
        Ok(())
    }

    fn set_highlight_tint(&mut self, color: Color4) {
        self.calls.push(HostCall::Tint(color));
    }

    fn has_glow(&self, _entity: &EntityView) -> bool {
        false
    }

    fn glow_color(&self, _entity: &EntityView) -> Color4 {
        Color4::WHITE
    }

    fn set_depth_bias(&mut self, _bias: DepthBias) {
        self.calls.push(HostCall::SetBias);
    }

    fn clear_depth_bias(&mut self) {
        self.calls.push(HostCall::ClearBias);
    }

    fn glow_pass_available(&self) -> bool {
        self.glow_available
    }
}

fn outline_snapshot() -> FeatureSnapshot {
    let mut snapshot = FeatureSnapshot::default();
    snapshot.entity_highlight.styles.outline = true;
    snapshot
}

fn loaded_pipeline(snapshot: FeatureSnapshot) -> HighlightPipeline {
    let mut pipeline = HighlightPipeline::new(1280, 720);
    pipeline.load_resources(|| Ok(()));
    pipeline.publish_snapshot(snapshot);
    pipeline
}

// ---------------------------------------------------------------------------
// Frame start
// ---------------------------------------------------------------------------

#[test]
fn frame_start_binds_capture_then_restores_main() {
    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(outline_snapshot());

    pipeline.frame_start(&mut host, 0.016);

    assert_eq!(
        host.calls,
        vec![
            HostCall::Bind(DrawTarget::HighlightCapture),
            HostCall::Bind(DrawTarget::Main),
        ],
        "frame start must bind the capture buffer and restore main"
    );
}

#[test]
fn frame_start_is_a_no_op_before_resources_load() {
    let mut host = RecordingHost::new();
    let mut pipeline = HighlightPipeline::new(1280, 720);
    pipeline.publish_snapshot(outline_snapshot());

    pipeline.frame_start(&mut host, 0.016);

    assert!(host.calls.is_empty(), "not-ready pipeline must touch nothing");
}

#[test]
fn frame_start_bind_failure_is_contained() {
    let mut host = RecordingHost::new();
    host.fail_bind = Some(DrawTarget::HighlightCapture);
    let mut pipeline = loaded_pipeline(outline_snapshot());

    // Must not panic and must not leave a stray bind behind.
    pipeline.frame_start(&mut host, 0.016);
    assert!(host.calls.is_empty());
    assert!(pipeline.take_blit().is_none());
}

// ---------------------------------------------------------------------------
// Per-entity capture redraw
// ---------------------------------------------------------------------------

#[test]
fn matched_entity_redraw_tints_binds_draws_restores() {
    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(outline_snapshot());
    let entity = EntityView::living(7, Hostility::Hostile);

    pipeline.entity_pre_draw(&mut host, &entity);

    let expected_color = pipeline
        .snapshot()
        .entity_highlight
        .color_for(Hostility::Hostile);
    assert_eq!(
        host.calls,
        vec![
            HostCall::Tint(expected_color),
            HostCall::Bind(DrawTarget::HighlightCapture),
            HostCall::Draw(7),
            HostCall::Bind(DrawTarget::Main),
        ]
    );
    assert!(pipeline.outline().is_dirty());
    assert_eq!(pipeline.outline().current_color(), expected_color);
}

#[test]
fn unmatched_entity_produces_no_host_calls() {
    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(FeatureSnapshot::default());
    let entity = EntityView::living(7, Hostility::Hostile);

    pipeline.entity_pre_draw(&mut host, &entity);
    pipeline.entity_post_draw(&mut host);

    assert!(host.calls.is_empty());
    assert!(!pipeline.outline().is_dirty());
}

#[test]
fn active_guard_suppresses_redraw_entirely() {
    let mut host = RecordingHost::new();
    let mut outline = OutlineCompositor::new(1280, 720);
    outline.load(|| Ok(()));
    let guard = RecursionGuard::new();
    let snapshot = outline_snapshot();
    let entity = EntityView::living(7, Hostility::Hostile);

    // Simulate the nested invocation the host makes while a capture
    // redraw is in flight.
    let token = guard.try_enter().expect("guard starts clear");
    outline.entity_pre_draw(&mut host, &guard, &entity, &snapshot);

    assert!(
        host.calls.is_empty(),
        "guarded invocation must have zero side effects"
    );
    assert!(!outline.is_dirty());

    // Once the redraw in flight releases the guard, the next entity is
    // captured normally.
    drop(token);
    outline.entity_pre_draw(&mut host, &guard, &entity, &snapshot);
    assert!(
        host.calls.contains(&HostCall::Draw(7)),
        "released guard must allow the redraw"
    );
    assert!(outline.is_dirty());
}

#[test]
fn guard_clears_after_each_redraw() {
    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(outline_snapshot());

    pipeline.entity_pre_draw(&mut host, &EntityView::living(1, Hostility::Hostile));
    assert!(!pipeline.guard().is_active());
    pipeline.entity_pre_draw(&mut host, &EntityView::living(2, Hostility::Hostile));

    let draws: Vec<_> = host
        .calls
        .iter()
        .filter(|c| matches!(c, HostCall::Draw(_)))
        .collect();
    assert_eq!(draws.len(), 2, "second entity must redraw normally");
}

#[test]
fn failed_entity_draw_still_restores_main_target() {
    let mut host = RecordingHost::new();
    host.fail_draw = Some(7);
    let mut pipeline = loaded_pipeline(outline_snapshot());

    pipeline.entity_pre_draw(&mut host, &EntityView::living(7, Hostility::Hostile));

    assert_eq!(
        host.calls.last(),
        Some(&HostCall::Bind(DrawTarget::Main)),
        "main target must come back even when the draw fails"
    );
    assert!(!pipeline.guard().is_active());
}

// ---------------------------------------------------------------------------
// Chams bracket through the pipeline
// ---------------------------------------------------------------------------

#[test]
fn chams_bracket_wraps_matched_entity_draw() {
    let mut snapshot = FeatureSnapshot::default();
    snapshot.storage_highlight.styles.chams = true;
    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(snapshot);
    let chest = EntityView::block(9, Some(StorageKind::Chest));

    pipeline.entity_pre_draw(&mut host, &chest);
    host.draw_entity(&chest).unwrap();
    pipeline.entity_post_draw(&mut host);

    assert_eq!(
        host.calls,
        vec![HostCall::SetBias, HostCall::Draw(9), HostCall::ClearBias]
    );
}

// ---------------------------------------------------------------------------
// Composite and blit
// ---------------------------------------------------------------------------

#[test]
fn blit_happens_only_on_dirty_frames() {
    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(outline_snapshot());

    // Frame 1: a hostile entity is captured, so the blit runs.
    pipeline.frame_start(&mut host, 0.016);
    pipeline.entity_pre_draw(&mut host, &EntityView::living(1, Hostility::Hostile));
    pipeline.composite(&mut host, 0.016);
    assert!(pipeline.take_blit().is_some());

    // Frame 2: nothing matched, so the stale buffer must not be drawn.
    pipeline.frame_start(&mut host, 0.016);
    pipeline.composite(&mut host, 0.016);
    assert!(pipeline.take_blit().is_none());
}

#[test]
fn composite_dispatches_glow_stage_listeners() {
    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(FeatureSnapshot::default());
    pipeline.add_capture_listener(
        "glow_overlay",
        Box::new(|_host, frame| {
            assert_eq!(frame.stage, OutlineStage::HostGlow);
            Ok(true)
        }),
    );

    pipeline.composite(&mut host, 0.016);

    assert_eq!(
        host.calls,
        vec![
            HostCall::Bind(DrawTarget::HostGlow),
            HostCall::Bind(DrawTarget::Main),
        ]
    );
    assert!(
        pipeline.take_forced_outline(false),
        "listener content must force the glow buffer draw"
    );
}

#[test]
fn composite_skips_glow_stage_when_pass_unavailable() {
    let mut host = RecordingHost::new();
    host.glow_available = false;
    let mut pipeline = loaded_pipeline(FeatureSnapshot::default());
    pipeline.add_capture_listener("glow_overlay", Box::new(|_host, _frame| Ok(true)));

    pipeline.composite(&mut host, 0.016);

    assert!(host.calls.is_empty());
    assert!(!pipeline.take_forced_outline(false));
}

#[test]
fn failing_listener_does_not_stop_the_rest() {
    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(outline_snapshot());
    pipeline.add_capture_listener(
        "broken",
        Box::new(|_host, _frame| {
            Err(FrameError::Listener {
                details: "boom".to_owned(),
            })
        }),
    );
    pipeline.add_capture_listener("working", Box::new(|_host, _frame| Ok(true)));

    pipeline.frame_start(&mut host, 0.016);

    assert!(
        pipeline.outline().is_dirty(),
        "the working listener's content must still mark the buffer dirty"
    );
}

#[test]
fn configured_line_width_reaches_both_capture_stages() {
    use std::cell::Cell;
    use std::rc::Rc;

    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(outline_snapshot());
    pipeline.set_line_width(3.5);

    let seen = Rc::new(Cell::new(Vec::new()));
    let seen_by_listener = Rc::clone(&seen);
    pipeline.add_capture_listener(
        "width_recorder",
        Box::new(move |_host, frame| {
            let mut widths = seen_by_listener.take();
            widths.push((frame.stage, frame.line_width));
            seen_by_listener.set(widths);
            Ok(false)
        }),
    );

    pipeline.frame_start(&mut host, 0.016);
    pipeline.composite(&mut host, 0.016);

    assert_eq!(
        seen.take(),
        vec![
            (OutlineStage::Custom, 3.5),
            (OutlineStage::HostGlow, 3.5),
        ],
        "both capture stages must carry the configured line width"
    );
}

// ---------------------------------------------------------------------------
// Snapshot swaps and resize
// ---------------------------------------------------------------------------

#[test]
fn snapshot_swap_takes_effect_next_hook() {
    let mut host = RecordingHost::new();
    let mut pipeline = loaded_pipeline(FeatureSnapshot::default());
    let entity = EntityView::living(3, Hostility::Hostile);

    pipeline.entity_pre_draw(&mut host, &entity);
    assert!(host.calls.is_empty());

    pipeline.publish_snapshot(outline_snapshot());
    pipeline.entity_pre_draw(&mut host, &entity);
    assert!(!host.calls.is_empty(), "new snapshot must apply immediately");
}

#[test]
fn resize_queues_one_reallocation() {
    let mut pipeline = loaded_pipeline(FeatureSnapshot::default());

    pipeline.resized(2560, 1440);
    pipeline.resized(2560, 1440);

    assert_eq!(pipeline.take_pending_resize(), Some((2560, 1440)));
    assert_eq!(pipeline.take_pending_resize(), None);
}
