//! Per-frame feature configuration snapshot.
//!
//! External feature modules (the highlight-producing gameplay features) own
//! their settings; once per frame they publish a [`FeatureSnapshot`] that
//! the resolver reads. The core never mutates module state -- the snapshot
//! is a plain value, serializable so a frame's configuration can be captured
//! for diagnostics or replayed in tests.
//!
//! Each feature activates independently per highlight style via a
//! [`StyleSet`]: the priority order between features applies *within* one
//! style's resolution chain, while the three styles are independent axes.

use serde::{Deserialize, Serialize};

use crate::color::Color4;
use crate::entity::{Hostility, StorageKind};
use crate::resolve::HighlightStyle;

// ---------------------------------------------------------------------------
// StyleSet
// ---------------------------------------------------------------------------

/// Which highlight styles a feature is currently active for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSet {
    /// Silhouette outline via the off-screen capture buffer.
    pub outline: bool,
    /// Host glow-pass override.
    pub glow: bool,
    /// Through-wall depth-bias shading.
    pub chams: bool,
}

impl StyleSet {
    /// All styles off.
    pub const OFF: Self = Self {
        outline: false,
        glow: false,
        chams: false,
    };

    /// True if the given style is active in this set.
    pub fn contains(self, style: HighlightStyle) -> bool {
        match style {
            HighlightStyle::Outline => self.outline,
            HighlightStyle::Glow => self.glow,
            HighlightStyle::Chams => self.chams,
        }
    }
}

// ---------------------------------------------------------------------------
// Feature configurations
// ---------------------------------------------------------------------------

/// Generic living-entity highlight: applies to living entities passing the
/// relevance predicate, colored by combat classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHighlight {
    /// Styles this feature is active for.
    pub styles: StyleSet,
    /// Color for hostile entities.
    pub hostile: Color4,
    /// Color for neutral entities.
    pub neutral: Color4,
    /// Color for other players.
    pub player: Color4,
    /// Color for passive entities.
    pub passive: Color4,
}

impl EntityHighlight {
    /// Color for a living entity's combat classification.
    pub fn color_for(&self, hostility: Hostility) -> Color4 {
        match hostility {
            Hostility::Hostile => self.hostile,
            Hostility::Neutral => self.neutral,
            Hostility::Player => self.player,
            Hostility::Passive => self.passive,
        }
    }
}

impl Default for EntityHighlight {
    fn default() -> Self {
        Self {
            styles: StyleSet::OFF,
            hostile: Color4::opaque(255, 64, 64),
            neutral: Color4::opaque(255, 200, 64),
            player: Color4::opaque(64, 128, 255),
            passive: Color4::opaque(64, 255, 128),
        }
    }
}

/// Item-category highlight: applies to render-eligible dropped items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemHighlight {
    /// Styles this feature is active for.
    pub styles: StyleSet,
    /// Flat color for all matched items.
    pub color: Color4,
}

impl Default for ItemHighlight {
    fn default() -> Self {
        Self {
            styles: StyleSet::OFF,
            color: Color4::opaque(255, 255, 255),
        }
    }
}

/// Fuse-countdown highlight for primed explosives.
///
/// The overlay itself (the countdown text) is a separate feature concern;
/// `highlight` is the sub-toggle that additionally tints the entity. The
/// color is a function of remaining fuse and is recomputed on every
/// resolution call so the transition animates as the timer runs down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuseTimer {
    /// Master toggle for the fuse-timer feature.
    pub enabled: bool,
    /// Styles the entity tint is active for (the feature's highlight
    /// sub-toggle; independent of the countdown overlay).
    pub highlight: StyleSet,
    /// Fuse value considered "freshly primed"; at or above this the color
    /// is fully `safe`.
    pub max_fuse_ticks: u32,
    /// Color at maximum fuse.
    pub safe: Color4,
    /// Color at detonation.
    pub danger: Color4,
}

impl FuseTimer {
    /// Color for `fuse_ticks` remaining: `danger` at zero, `safe` at
    /// `max_fuse_ticks` or above, linearly blended between.
    pub fn fuse_color(&self, fuse_ticks: u32) -> Color4 {
        let max = self.max_fuse_ticks.max(1);
        let t = fuse_ticks.min(max) as f32 / max as f32;
        self.danger.lerp(self.safe, t)
    }
}

impl Default for FuseTimer {
    fn default() -> Self {
        Self {
            enabled: false,
            highlight: StyleSet::OFF,
            max_fuse_ticks: 80,
            safe: Color4::opaque(64, 255, 64),
            danger: Color4::opaque(255, 32, 32),
        }
    }
}

/// Storage-container highlight: colors block entities by their storage
/// classification. Entities without a category never match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageHighlight {
    /// Styles this feature is active for.
    pub styles: StyleSet,
    /// Color for chests.
    pub chest: Color4,
    /// Color for ender chests.
    pub ender_chest: Color4,
    /// Color for barrels.
    pub barrel: Color4,
    /// Color for shulker boxes.
    pub shulker_box: Color4,
    /// Color for furnaces.
    pub furnace: Color4,
    /// Color for hoppers.
    pub hopper: Color4,
}

impl StorageHighlight {
    /// Color for a storage classification.
    pub fn color_for(&self, kind: StorageKind) -> Color4 {
        match kind {
            StorageKind::Chest => self.chest,
            StorageKind::EnderChest => self.ender_chest,
            StorageKind::Barrel => self.barrel,
            StorageKind::ShulkerBox => self.shulker_box,
            StorageKind::Furnace => self.furnace,
            StorageKind::Hopper => self.hopper,
        }
    }
}

impl Default for StorageHighlight {
    fn default() -> Self {
        Self {
            styles: StyleSet::OFF,
            chest: Color4::opaque(255, 164, 64),
            ender_chest: Color4::opaque(160, 64, 255),
            barrel: Color4::opaque(200, 140, 80),
            shulker_box: Color4::opaque(255, 96, 200),
            furnace: Color4::opaque(128, 128, 128),
            hopper: Color4::opaque(96, 96, 112),
        }
    }
}

// ---------------------------------------------------------------------------
// FeatureSnapshot
// ---------------------------------------------------------------------------

/// The complete per-frame snapshot of highlight-producing features.
///
/// Built fresh each frame from external module state; the default is
/// everything off, so an absent module simply contributes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    /// Generic living-entity highlight.
    pub entity_highlight: EntityHighlight,
    /// Item-category highlight.
    pub item_highlight: ItemHighlight,
    /// Fuse-countdown highlight.
    pub fuse_timer: FuseTimer,
    /// Storage-container highlight.
    pub storage_highlight: StorageHighlight,
}
