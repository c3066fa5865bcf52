//! Property tests for highlight resolution.
//!
//! These tests use `proptest` to generate random entities and feature
//! snapshots and verify the resolver's contract: determinism, total
//! priority order, and style-axis independence.

use limn_core::prelude::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn hostility_strategy() -> impl Strategy<Value = Hostility> {
    prop_oneof![
        Just(Hostility::Hostile),
        Just(Hostility::Neutral),
        Just(Hostility::Player),
        Just(Hostility::Passive),
    ]
}

fn storage_strategy() -> impl Strategy<Value = Option<StorageKind>> {
    prop_oneof![
        Just(None),
        Just(Some(StorageKind::Chest)),
        Just(Some(StorageKind::EnderChest)),
        Just(Some(StorageKind::Barrel)),
        Just(Some(StorageKind::ShulkerBox)),
        Just(Some(StorageKind::Furnace)),
        Just(Some(StorageKind::Hopper)),
    ]
}

fn entity_strategy() -> impl Strategy<Value = EntityView> {
    let kind = prop_oneof![
        hostility_strategy().prop_map(|h| EntityKind::Living { hostility: h }),
        any::<bool>().prop_map(|pickable| EntityKind::Item { pickable }),
        (0u32..200).prop_map(|fuse_ticks| EntityKind::Explosive { fuse_ticks }),
        storage_strategy().prop_map(|storage| EntityKind::Block { storage }),
        Just(EntityKind::Other),
    ];
    (
        any::<u64>(),
        kind,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(id, kind, alive, friendly, invisible, in_combat_range)| EntityView {
                id,
                kind,
                alive,
                friendly,
                invisible,
                in_combat_range,
            },
        )
}

fn style_set_strategy() -> impl Strategy<Value = StyleSet> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(outline, glow, chams)| StyleSet {
        outline,
        glow,
        chams,
    })
}

fn snapshot_strategy() -> impl Strategy<Value = FeatureSnapshot> {
    (
        style_set_strategy(),
        style_set_strategy(),
        (any::<bool>(), style_set_strategy(), 1u32..200),
        style_set_strategy(),
    )
        .prop_map(|(entity_styles, item_styles, (enabled, fuse_styles, max), storage_styles)| {
            let mut snapshot = FeatureSnapshot::default();
            snapshot.entity_highlight.styles = entity_styles;
            snapshot.item_highlight.styles = item_styles;
            snapshot.fuse_timer.enabled = enabled;
            snapshot.fuse_timer.highlight = fuse_styles;
            snapshot.fuse_timer.max_fuse_ticks = max;
            snapshot.storage_highlight.styles = storage_styles;
            snapshot
        })
}

fn style_strategy() -> impl Strategy<Value = HighlightStyle> {
    prop_oneof![
        Just(HighlightStyle::Outline),
        Just(HighlightStyle::Glow),
        Just(HighlightStyle::Chams),
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    /// Identical inputs always yield identical requests.
    #[test]
    fn resolve_is_deterministic(
        entity in entity_strategy(),
        snapshot in snapshot_strategy(),
        style in style_strategy(),
    ) {
        let first = resolve(&entity, &snapshot, style);
        let second = resolve(&entity, &snapshot, style);
        prop_assert_eq!(first, second);
    }

    /// A request's style always matches the axis it was resolved for.
    #[test]
    fn resolved_style_matches_query(
        entity in entity_strategy(),
        snapshot in snapshot_strategy(),
        style in style_strategy(),
    ) {
        if let Some(request) = resolve(&entity, &snapshot, style) {
            prop_assert_eq!(request.style, style);
        }
    }

    /// An explosive entity with both the fuse-timer and living features
    /// active always resolves to the fuse color, never the living color:
    /// the priority order is total.
    #[test]
    fn fuse_rule_always_beats_living_rule(
        fuse_ticks in 0u32..200,
        snapshot in snapshot_strategy(),
    ) {
        let mut snapshot = snapshot;
        snapshot.fuse_timer.enabled = true;
        snapshot.fuse_timer.highlight.glow = true;
        snapshot.entity_highlight.styles.glow = true;

        let entity = EntityView::explosive(1, fuse_ticks);
        let request = resolve(&entity, &snapshot, HighlightStyle::Glow)
            .expect("active fuse timer must claim explosives");
        prop_assert_eq!(request.color, snapshot.fuse_timer.fuse_color(fuse_ticks));
    }

    /// Disabling one style axis never affects resolution on another.
    #[test]
    fn style_axes_are_independent(
        entity in entity_strategy(),
        snapshot in snapshot_strategy(),
    ) {
        let outline_before = resolve(&entity, &snapshot, HighlightStyle::Outline);

        let mut glow_off = snapshot.clone();
        glow_off.entity_highlight.styles.glow = false;
        glow_off.item_highlight.styles.glow = false;
        glow_off.fuse_timer.highlight.glow = false;
        glow_off.storage_highlight.styles.glow = false;

        prop_assert_eq!(
            resolve(&entity, &glow_off, HighlightStyle::Outline),
            outline_before
        );
        prop_assert_eq!(resolve(&entity, &glow_off, HighlightStyle::Glow), None);
    }

    /// resolve_all agrees with per-style resolve.
    #[test]
    fn resolve_all_is_consistent(
        entity in entity_strategy(),
        snapshot in snapshot_strategy(),
    ) {
        let all = resolve_all(&entity, &snapshot);
        for style in HighlightStyle::ALL {
            let single = resolve(&entity, &snapshot, style);
            let from_all = all.iter().find(|r| r.style == style).copied();
            prop_assert_eq!(single, from_all);
        }
    }
}
