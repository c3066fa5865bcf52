//! Read-only entity snapshots consumed by the highlight resolver.
//!
//! The resolver never sees the host's live entity objects. Instead the host
//! builds an [`EntityView`] per candidate entity per frame: a cheap,
//! immutable summary of the facts the highlight rules care about. This keeps
//! the resolver a pure function and keeps stale state from one frame out of
//! the next.

use serde::{Deserialize, Serialize};

/// Combat stance of a living entity, as classified by the host.
///
/// Drives the color of the generic living-entity highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hostility {
    /// Actively dangerous (monsters, attacking players).
    Hostile,
    /// Will fight back but does not initiate.
    Neutral,
    /// Another player.
    Player,
    /// Harmless.
    Passive,
}

/// Storage-container category, the classification the storage highlight
/// keys its colors on. Entities that hold no items get no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    Chest,
    EnderChest,
    Barrel,
    ShulkerBox,
    Furnace,
    Hopper,
}

/// What kind of entity this is, with the per-kind facts the rules read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A living entity (mob or player).
    Living {
        /// Combat classification, used for highlight coloring.
        hostility: Hostility,
    },
    /// A dropped item stack.
    Item {
        /// Whether the host considers the item render-eligible (on the
        /// ground, not despawning this frame).
        pickable: bool,
    },
    /// A primed explosive with a running fuse.
    Explosive {
        /// Game ticks until detonation.
        fuse_ticks: u32,
    },
    /// A block-like entity that may hold items.
    Block {
        /// Storage classification, `None` for non-container blocks.
        storage: Option<StorageKind>,
    },
    /// Anything else; never highlighted.
    Other,
}

/// A read-only snapshot of one entity for one frame of resolution.
///
/// Constructed by the host per candidate entity, consumed immediately by
/// [`resolve`](crate::resolve::resolve), and discarded. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    /// Host-assigned entity id, used only for logging.
    pub id: u64,
    /// Kind and per-kind facts.
    pub kind: EntityKind,
    /// False once the entity has died but is still being rendered.
    pub alive: bool,
    /// True for teammates and other entities the player should not target.
    pub friendly: bool,
    /// True while an invisibility effect hides the entity.
    pub invisible: bool,
    /// True when the entity is inside the host's combat alert range.
    pub in_combat_range: bool,
}

impl EntityView {
    /// Snapshot of a living entity with default relevance flags (alive,
    /// not friendly, visible, in range).
    pub fn living(id: u64, hostility: Hostility) -> Self {
        Self {
            id,
            kind: EntityKind::Living { hostility },
            alive: true,
            friendly: false,
            invisible: false,
            in_combat_range: true,
        }
    }

    /// Snapshot of a render-eligible dropped item.
    pub fn item(id: u64) -> Self {
        Self {
            id,
            kind: EntityKind::Item { pickable: true },
            alive: true,
            friendly: false,
            invisible: false,
            in_combat_range: true,
        }
    }

    /// Snapshot of a primed explosive with `fuse_ticks` remaining.
    pub fn explosive(id: u64, fuse_ticks: u32) -> Self {
        Self {
            id,
            kind: EntityKind::Explosive { fuse_ticks },
            alive: true,
            friendly: false,
            invisible: false,
            in_combat_range: true,
        }
    }

    /// Snapshot of a block-like entity with an optional storage category.
    pub fn block(id: u64, storage: Option<StorageKind>) -> Self {
        Self {
            id,
            kind: EntityKind::Block { storage },
            alive: true,
            friendly: false,
            invisible: false,
            in_combat_range: true,
        }
    }

    /// True if this is a living entity.
    pub fn is_living(&self) -> bool {
        matches!(self.kind, EntityKind::Living { .. })
    }

    /// The "should be shown" relevance predicate for the generic
    /// living-entity highlight: alive, not a teammate, not invisible, and
    /// within the host's combat alert range.
    pub fn should_be_shown(&self) -> bool {
        self.is_living() && self.alive && !self.friendly && !self.invisible && self.in_combat_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_be_shown_requires_all_flags() {
        let base = EntityView::living(1, Hostility::Hostile);
        assert!(base.should_be_shown());

        let mut dead = base;
        dead.alive = false;
        assert!(!dead.should_be_shown());

        let mut teammate = base;
        teammate.friendly = true;
        assert!(!teammate.should_be_shown());

        let mut hidden = base;
        hidden.invisible = true;
        assert!(!hidden.should_be_shown());

        let mut far = base;
        far.in_combat_range = false;
        assert!(!far.should_be_shown());
    }

    #[test]
    fn non_living_entities_are_never_shown_as_living() {
        assert!(!EntityView::item(2).should_be_shown());
        assert!(!EntityView::explosive(3, 40).should_be_shown());
        assert!(!EntityView::block(4, Some(StorageKind::Chest)).should_be_shown());
    }
}
