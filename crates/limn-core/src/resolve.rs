//! Priority-ordered highlight resolution.
//!
//! [`resolve`] answers, for one entity and one style, "should this entity be
//! highlighted, and in what color?" It is a pure function of the
//! [`EntityView`] and the frame's [`FeatureSnapshot`]: calling it twice with
//! identical inputs yields identical results, and a non-match is a normal
//! `None`, never an error.
//!
//! The priority order between features is a deliberate policy, not an
//! accident of control flow, so it is written as an explicit ordered rule
//! table ([`RULES`]) instead of cascading conditionals. First match wins;
//! later rules are not evaluated once one succeeds:
//!
//! 1. item-category (most specific),
//! 2. fuse-timer (color recomputed from the fuse every call),
//! 3. storage-category (no classification means no match),
//! 4. generic living-entity.

use serde::{Deserialize, Serialize};

use crate::color::Color4;
use crate::config::FeatureSnapshot;
use crate::entity::{EntityKind, EntityView};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// The three highlight styles. Within one style the rule chain picks a
/// single winner; across styles the same entity may match independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightStyle {
    /// Colored silhouette composited from the off-screen capture buffer.
    Outline,
    /// Host glow-pass recoloring.
    Glow,
    /// Through-wall rendering via a depth-bias override.
    Chams,
}

impl HighlightStyle {
    /// All styles, in a fixed order.
    pub const ALL: [Self; 3] = [Self::Outline, Self::Glow, Self::Chams];
}

/// A positive resolution for one entity, one style, one frame.
///
/// Constructed per entity per frame, consumed immediately, discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRequest {
    /// The style axis this request was resolved for.
    pub style: HighlightStyle,
    /// Tint to apply, freshly computed this call.
    pub color: Color4,
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// One entry in the priority chain.
struct Rule {
    /// Stable name, exposed through [`rule_names`] so the order itself can
    /// be asserted in tests.
    name: &'static str,
    /// Is the owning feature active for this style this frame?
    active: fn(&FeatureSnapshot, HighlightStyle) -> bool,
    /// Does the entity match, and if so with what color? `None` means the
    /// chain continues to the next rule.
    matched_color: fn(&EntityView, &FeatureSnapshot) -> Option<Color4>,
}

/// The priority chain, highest priority first.
const RULES: &[Rule] = &[
    Rule {
        name: "item",
        active: |snapshot, style| snapshot.item_highlight.styles.contains(style),
        matched_color: |entity, snapshot| match entity.kind {
            EntityKind::Item { pickable: true } => Some(snapshot.item_highlight.color),
            _ => None,
        },
    },
    Rule {
        name: "fuse-timer",
        active: |snapshot, style| {
            snapshot.fuse_timer.enabled && snapshot.fuse_timer.highlight.contains(style)
        },
        matched_color: |entity, snapshot| match entity.kind {
            EntityKind::Explosive { fuse_ticks } => {
                Some(snapshot.fuse_timer.fuse_color(fuse_ticks))
            }
            _ => None,
        },
    },
    Rule {
        name: "storage",
        active: |snapshot, style| snapshot.storage_highlight.styles.contains(style),
        matched_color: |entity, snapshot| match entity.kind {
            EntityKind::Block { storage: Some(kind) } => {
                Some(snapshot.storage_highlight.color_for(kind))
            }
            _ => None,
        },
    },
    Rule {
        name: "living",
        active: |snapshot, style| snapshot.entity_highlight.styles.contains(style),
        matched_color: |entity, snapshot| match entity.kind {
            EntityKind::Living { hostility } if entity.should_be_shown() => {
                Some(snapshot.entity_highlight.color_for(hostility))
            }
            _ => None,
        },
    },
];

/// The rule names in evaluation order. Exists so the priority policy is
/// directly assertable.
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|rule| rule.name).collect()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve one entity against one style's priority chain.
///
/// Deterministic and side-effect-free. Returns `None` when no active
/// feature claims the entity for this style.
pub fn resolve(
    entity: &EntityView,
    snapshot: &FeatureSnapshot,
    style: HighlightStyle,
) -> Option<HighlightRequest> {
    RULES
        .iter()
        .filter(|rule| (rule.active)(snapshot, style))
        .find_map(|rule| {
            (rule.matched_color)(entity, snapshot)
                .map(|color| HighlightRequest { style, color })
        })
}

/// Resolve all three style axes independently. A single entity can yield up
/// to three requests, one per style, each from its own chain evaluation.
pub fn resolve_all(entity: &EntityView, snapshot: &FeatureSnapshot) -> Vec<HighlightRequest> {
    HighlightStyle::ALL
        .iter()
        .filter_map(|&style| resolve(entity, snapshot, style))
        .collect()
}
